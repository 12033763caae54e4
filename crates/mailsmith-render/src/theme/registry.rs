//! Built-in themes and theme selection.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::theme::{Palette, Theme};

/// Name of the theme used when nothing else matches.
pub const DEFAULT_THEME: &str = "default";

fn palette(colors: [&str; 13]) -> Palette {
    let [primary, secondary, accent, success, warning, danger, text, text_light, background, background_light, background_dark, border, border_light] =
        colors.map(str::to_string);
    Palette {
        primary,
        secondary,
        accent,
        success,
        warning,
        danger,
        text,
        text_light,
        background,
        background_light,
        background_dark,
        border,
        border_light,
    }
}

static BUILTIN_THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        Theme::new(
            DEFAULT_THEME,
            palette([
                "#2563eb", "#64748b", "#0ea5e9", "#16a34a", "#d97706", "#dc2626", "#1f2937",
                "#6b7280", "#ffffff", "#f9fafb", "#111827", "#e5e7eb", "#f3f4f6",
            ]),
        ),
        Theme::new(
            "baytown",
            palette([
                "#0f4c81", "#3a7ca5", "#f4a261", "#2a9d8f", "#e9c46a", "#e76f51", "#1d3557",
                "#5c677d", "#ffffff", "#f1f6fb", "#0b2545", "#d0dde9", "#eaf1f8",
            ]),
        ),
        Theme::new(
            "humble",
            palette([
                "#2d6a4f", "#52796f", "#d4a373", "#40916c", "#f4a261", "#bc4749", "#1b2d24",
                "#5f6f65", "#ffffff", "#f3f8f4", "#081c15", "#cfe1d6", "#e9f2ec",
            ]),
        ),
        Theme::new(
            "executive",
            palette([
                "#1a1a2e", "#4a4e69", "#c9a227", "#2f855a", "#b7791f", "#9b2c2c", "#16161d",
                "#5a5a6e", "#ffffff", "#f7f7f9", "#0f0f1a", "#d8d8e0", "#efeff3",
            ]),
        ),
    ]
});

/// A lookup table of themes keyed by name.
///
/// Lookups never fail: an unknown name resolves to the default theme.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
    default: String,
}

impl ThemeRegistry {
    /// Creates a registry holding the built-in themes.
    pub fn builtin() -> Self {
        let themes = BUILTIN_THEMES
            .iter()
            .map(|t| (t.name().to_string(), t.clone()))
            .collect();
        Self {
            themes,
            default: DEFAULT_THEME.to_string(),
        }
    }

    /// Adds or replaces a theme.
    pub fn insert(&mut self, theme: Theme) {
        self.themes.insert(theme.name().to_string(), theme);
    }

    /// Sets the fallback theme. Ignored if no theme with that name exists.
    pub fn set_default(&mut self, name: &str) {
        if self.themes.contains_key(name) {
            self.default = name.to_string();
        } else {
            tracing::warn!(theme = name, "default theme not registered, keeping {}", self.default);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Returns the named theme, or the default theme for unknown names.
    pub fn get(&self, name: &str) -> &Theme {
        self.themes
            .get(name)
            .or_else(|| self.themes.get(&self.default))
            .unwrap_or(&BUILTIN_THEMES[0])
    }

    pub fn default_theme(&self) -> &Theme {
        self.get(&self.default)
    }

    /// Theme names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }

    /// Picks the theme for a render.
    ///
    /// Precedence: an explicit override naming a registered theme, then a
    /// theme whose name occurs in `location`, then `executive` when any
    /// recipient address mentions it, then the default theme.
    pub fn select(
        &self,
        explicit: Option<&str>,
        location: Option<&str>,
        recipients: &[String],
    ) -> &Theme {
        if let Some(name) = explicit {
            if self.contains(name) {
                return self.get(name);
            }
            tracing::debug!(theme = name, "unknown theme override, inferring instead");
        }

        if let Some(location) = location {
            let location = location.to_lowercase();
            let matched = self
                .names()
                .filter(|name| *name != self.default && *name != "executive")
                .find(|name| location.contains(name));
            if let Some(name) = matched {
                return self.get(name);
            }
        }

        if self.contains("executive")
            && recipients
                .iter()
                .any(|r| r.to_lowercase().contains("executive"))
        {
            return self.get("executive");
        }

        self.default_theme()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
