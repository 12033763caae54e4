//! Named color palettes for email style sheets.
//!
//! Themes are fixed records of thirteen semantic tokens (`primary`,
//! `text-light`, `border`, ...). Style sheets reference them as
//! `var(--token)` and the inliner swaps in literal values, because most
//! email clients drop custom properties.
//!
//! The [`ThemeRegistry`] holds the built-in themes (`default`, `baytown`,
//! `humble`, `executive`) plus any custom palettes loaded from YAML, and
//! implements theme selection for a render.

mod registry;
#[allow(clippy::module_inception)]
mod theme;

pub use registry::{ThemeRegistry, DEFAULT_THEME};
pub use theme::{Palette, Theme, TOKEN_NAMES};
