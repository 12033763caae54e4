//! Theme palettes and token substitution.
//!
//! A [`Theme`] is a name plus a [`Palette`] of thirteen semantic color tokens.
//! Style sheets reference tokens as `var(--primary)`; [`Theme::substitute`]
//! replaces those placeholders with literal values because most email clients
//! ignore CSS custom properties.
//!
//! # From YAML
//!
//! ```rust
//! use mailsmith_render::Theme;
//!
//! let theme = Theme::from_yaml("clearlake", r##"
//! primary: "#004e7c"
//! secondary: "#5c7c8a"
//! accent: "#f2a65a"
//! success: "#2e7d32"
//! warning: "#ed6c02"
//! danger: "#c62828"
//! text: "#1f2933"
//! text-light: "#616e7c"
//! background: "#ffffff"
//! background-light: "#f5f7fa"
//! background-dark: "#102a43"
//! border: "#d9e2ec"
//! border-light: "#f0f4f8"
//! "##).unwrap();
//!
//! assert_eq!(theme.token("accent"), Some("#f2a65a"));
//! ```

use std::borrow::Cow;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Names of every token a palette supplies, in declaration order.
pub const TOKEN_NAMES: [&str; 13] = [
    "primary",
    "secondary",
    "accent",
    "success",
    "warning",
    "danger",
    "text",
    "text-light",
    "background",
    "background-light",
    "background-dark",
    "border",
    "border-light",
];

/// The fixed token record every theme supplies.
///
/// Deserialization rejects a palette missing any token, which keeps the
/// invariant that all themes expose the same token set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
    pub text: String,
    pub text_light: String,
    pub background: String,
    pub background_light: String,
    pub background_dark: String,
    pub border: String,
    pub border_light: String,
}

impl Palette {
    /// Looks up a token by its CSS name (`text-light`, not `text_light`).
    pub fn get(&self, token: &str) -> Option<&str> {
        let value = match token {
            "primary" => &self.primary,
            "secondary" => &self.secondary,
            "accent" => &self.accent,
            "success" => &self.success,
            "warning" => &self.warning,
            "danger" => &self.danger,
            "text" => &self.text,
            "text-light" => &self.text_light,
            "background" => &self.background,
            "background-light" => &self.background_light,
            "background-dark" => &self.background_dark,
            "border" => &self.border,
            "border-light" => &self.border_light,
            _ => return None,
        };
        Some(value.as_str())
    }
}

static VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\(\s*--([A-Za-z0-9_-]+)\s*(?:,\s*([^)]*?)\s*)?\)").expect("valid var() pattern")
});

/// A named palette used to parameterize style sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    palette: Palette,
}

impl Theme {
    pub fn new(name: impl Into<String>, palette: Palette) -> Self {
        Self {
            name: name.into(),
            palette,
        }
    }

    /// Parses a palette from YAML and names it.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Parse`] if the YAML is malformed, a token is
    /// missing, or an unknown key is present.
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, ThemeError> {
        let name = name.into();
        let palette: Palette = serde_yaml::from_str(yaml).map_err(|e| ThemeError::Parse {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { name, palette })
    }

    /// Loads a palette from a YAML file, naming the theme after the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string();
        Self::from_yaml(name, &content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn token(&self, token: &str) -> Option<&str> {
        self.palette.get(token)
    }

    /// Iterates `(token, value)` pairs in [`TOKEN_NAMES`] order.
    pub fn tokens(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        TOKEN_NAMES
            .iter()
            .filter_map(move |name| self.palette.get(name).map(|v| (*name, v)))
    }

    /// Replaces `var(--token)` placeholders with this theme's literal values.
    ///
    /// Unknown tokens fall back to the placeholder's own fallback argument when
    /// one is given, and are otherwise left untouched.
    pub fn substitute<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains("var(") {
            return Cow::Borrowed(text);
        }
        VAR_PATTERN.replace_all(text, |caps: &Captures<'_>| {
            match self.palette.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => match caps.get(2) {
                    Some(fallback) if !fallback.as_str().is_empty() => {
                        fallback.as_str().to_string()
                    }
                    _ => caps[0].to_string(),
                },
            }
        })
    }
}
