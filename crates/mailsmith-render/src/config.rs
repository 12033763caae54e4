//! Renderer configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config:
//!
//! ```rust
//! use mailsmith_render::RenderConfig;
//!
//! let config = RenderConfig::from_yaml("max_document_bytes: 80000\nfixups:\n  vendor_prefixes: false\n").unwrap();
//! assert_eq!(config.max_document_bytes, 80_000);
//! assert!(!config.fixups.vendor_prefixes);
//! assert!(config.fixups.outlook_width);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::{Palette, DEFAULT_THEME};

/// Toggles for the client compatibility fixups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixupConfig {
    /// Rewrite `max-width` declarations as `width` for the legacy desktop client.
    pub outlook_width: bool,
    /// Append table-spacing and image-interpolation blocks.
    pub outlook_blocks: bool,
    /// Append the webmail engine blocks.
    pub webmail_blocks: bool,
    /// Duplicate `border-radius`, `box-shadow`, `transform` and `transition`
    /// with vendor prefixes.
    pub vendor_prefixes: bool,
    /// Replace flex/grid and `rem`/`vh`/`vw` with legacy equivalents.
    pub legacy_fallbacks: bool,
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self {
            outlook_width: true,
            outlook_blocks: true,
            webmail_blocks: true,
            vendor_prefixes: true,
            legacy_fallbacks: true,
        }
    }
}

impl FixupConfig {
    pub fn none() -> Self {
        Self {
            outlook_width: false,
            outlook_blocks: false,
            webmail_blocks: false,
            vendor_prefixes: false,
            legacy_fallbacks: false,
        }
    }
}

/// The closing block appended to every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Phrase whose presence in the input suppresses the block.
    pub marker: String,
    pub lines: Vec<String>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            marker: "Practice Operations Team".to_string(),
            lines: vec![
                "Best regards,".to_string(),
                "Practice Operations Team".to_string(),
                "Performance & Analytics".to_string(),
            ],
        }
    }
}

/// Who urgent alerts escalate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            name: "Regional Operations Manager".to_string(),
            phone: "(281) 555-0142".to_string(),
            email: "operations@example.com".to_string(),
        }
    }
}

/// Configuration for a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Theme used when no override or inference applies.
    pub default_theme: String,
    /// Ceiling for the whole rendered document.
    pub max_document_bytes: usize,
    /// Ceiling for the composed style sheet before inlining.
    pub max_stylesheet_bytes: usize,
    /// Rewrite class-based styling into inline `style` attributes.
    pub inline_styles: bool,
    pub fixups: FixupConfig,
    pub signature: SignatureConfig,
    pub escalation_contact: ContactConfig,
    /// Extra palettes keyed by theme name. A built-in name is overridden.
    pub custom_themes: BTreeMap<String, Palette>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
            max_document_bytes: 100 * 1024,
            max_stylesheet_bytes: 50 * 1024,
            inline_styles: true,
            fixups: FixupConfig::default(),
            signature: SignatureConfig::default(),
            escalation_contact: ContactConfig::default(),
            custom_themes: BTreeMap::new(),
        }
    }
}

impl RenderConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.default_theme, "default");
        assert_eq!(config.max_document_bytes, 102_400);
        assert_eq!(config.max_stylesheet_bytes, 51_200);
        assert!(config.inline_styles);
        assert_eq!(config.fixups, FixupConfig::default());
        assert!(config.signature.lines.contains(&config.signature.marker));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = RenderConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_partial_nested_override() {
        let config = RenderConfig::from_yaml(
            "escalation_contact:\n  name: Dr. Lee\nsignature:\n  marker: Clinic Team\n",
        )
        .unwrap();
        assert_eq!(config.escalation_contact.name, "Dr. Lee");
        assert_eq!(config.escalation_contact.phone, ContactConfig::default().phone);
        assert_eq!(config.signature.marker, "Clinic Team");
    }

    #[test]
    fn test_custom_theme_requires_all_tokens() {
        let err = RenderConfig::from_yaml("custom_themes:\n  lake:\n    primary: blue\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mail.json");
        std::fs::write(&path, r#"{"inline_styles": false}"#).unwrap();
        let config = RenderConfig::from_file(&path).unwrap();
        assert!(!config.inline_styles);
    }

    #[test]
    fn test_from_file_missing() {
        let err = RenderConfig::from_file("/nonexistent/mailsmith.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
