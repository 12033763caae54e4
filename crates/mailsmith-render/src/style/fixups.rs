//! Client compatibility fixups.
//!
//! Text-level rewrites applied to a composed style sheet before it is parsed.
//! Each one is switched by a flag on [`FixupConfig`]. They run once per
//! composed sheet, before the size optimizer.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::FixupConfig;

/// Table and image rules for the legacy desktop client.
pub const OUTLOOK_BLOCKS: &str = "\
table { border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; }
img { -ms-interpolation-mode: bicubic; }
";

/// Link-color and container resets for the two large webmail engines.
pub const WEBMAIL_BLOCKS: &str = "\
u + #body a { color: inherit; text-decoration: none; font-size: inherit; font-family: inherit; font-weight: inherit; line-height: inherit; }
.ExternalClass, .ExternalClass p, .ExternalClass span, .ExternalClass font, .ExternalClass td, .ExternalClass div { line-height: 100%; }
";

// `max-width` in declaration position only; media query preludes are
// preceded by `(` and stay untouched.
static MAX_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[{;\s])max-width\s*:").expect("valid max-width pattern"));

static PREFIXABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[{;\s])(border-radius|box-shadow|transform|transition)\s*:([^;}]*)(;?)")
        .expect("valid prefix pattern")
});

static FLEX_GRID_DISPLAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"display\s*:\s*(inline-flex|inline-grid|flex|grid)\b").expect("valid display pattern")
});

static REM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d*\.?\d+)rem\b").expect("valid rem pattern"));

static VIEWPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d*\.?\d+)v[hw]\b").expect("valid viewport pattern"));

/// Applies every enabled fixup to `css`.
///
/// ```rust
/// use mailsmith_render::config::FixupConfig;
/// use mailsmith_render::style::apply_fixups;
///
/// let css = apply_fixups(".a { display: flex; border-radius: 4px; }", &FixupConfig::default());
/// assert!(css.contains("display: table"));
/// assert!(css.contains("-webkit-border-radius: 4px;"));
/// ```
pub fn apply_fixups(css: &str, config: &FixupConfig) -> String {
    let mut out: Cow<'_, str> = Cow::Borrowed(css);

    if config.legacy_fallbacks {
        out = Cow::Owned(legacy_fallbacks(&out).into_owned());
    }
    if config.outlook_width {
        out = Cow::Owned(outlook_width(&out).into_owned());
    }
    if config.vendor_prefixes {
        out = Cow::Owned(vendor_prefixes(&out).into_owned());
    }

    let mut out = out.into_owned();
    if config.outlook_blocks {
        push_block(&mut out, OUTLOOK_BLOCKS);
    }
    if config.webmail_blocks {
        push_block(&mut out, WEBMAIL_BLOCKS);
    }
    out
}

fn push_block(css: &mut String, block: &str) {
    if !css.is_empty() && !css.ends_with('\n') {
        css.push('\n');
    }
    css.push_str(block);
}

/// Rewrites `max-width:` declarations as `width:`.
pub fn outlook_width(css: &str) -> Cow<'_, str> {
    MAX_WIDTH.replace_all(css, "${1}width:")
}

/// Adds `-webkit-` and `-moz-` copies ahead of each prefixable declaration.
pub fn vendor_prefixes(css: &str) -> Cow<'_, str> {
    PREFIXABLE.replace_all(css, |caps: &Captures<'_>| {
        let lead = &caps[1];
        let property = &caps[2];
        let value = caps[3].trim();
        let semi = &caps[4];
        format!(
            "{lead}-webkit-{property}: {value}; -moz-{property}: {value}; {property}: {value}{semi}"
        )
    })
}

/// Replaces layout features and units that older clients ignore.
///
/// `display: flex`/`grid` become table layout, `rem` becomes pixels at a
/// 16px root, and viewport units become percentages.
pub fn legacy_fallbacks(css: &str) -> Cow<'_, str> {
    let display = FLEX_GRID_DISPLAY.replace_all(css, |caps: &Captures<'_>| {
        if caps[1].starts_with("inline-") {
            "display: inline-table".to_string()
        } else {
            "display: table".to_string()
        }
    });
    let rem = REM.replace_all(&display, |caps: &Captures<'_>| {
        let px = caps[1].parse::<f64>().unwrap_or(0.0) * 16.0;
        format!("{}px", trim_float(px))
    });
    let viewport = VIEWPORT.replace_all(&rem, "${1}%");
    Cow::Owned(viewport.into_owned())
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::parse_css;

    #[test]
    fn test_max_width_rewritten() {
        let css = outlook_width(".a { width: 100%; max-width: 600px; }");
        assert_eq!(css, ".a { width: 100%; width: 600px; }");
    }

    #[test]
    fn test_max_width_in_media_prelude_untouched() {
        let css = outlook_width("@media only screen and (max-width: 620px) { .a { max-width: 1px; } }");
        assert!(css.contains("(max-width: 620px)"));
        assert!(css.contains(".a { width: 1px; }"));
    }

    #[test]
    fn test_vendor_prefixes_added() {
        let css = vendor_prefixes(".a{border-radius:4px;color:red}");
        assert!(css.contains("-webkit-border-radius: 4px;"));
        assert!(css.contains("-moz-border-radius: 4px;"));
        assert!(css.contains("border-radius: 4px;"));
        assert!(css.contains("color:red"));
    }

    #[test]
    fn test_vendor_prefixes_skip_prefixed() {
        let css = vendor_prefixes(".a { -webkit-transform: none; }");
        assert_eq!(css, ".a { -webkit-transform: none; }");
    }

    #[test]
    fn test_vendor_prefix_without_trailing_semicolon() {
        let css = vendor_prefixes(".a { box-shadow: 0 1px 2px #000 }");
        let rules = parse_css(&css);
        let decls = rules.class("a").unwrap();
        assert_eq!(decls["-webkit-box-shadow"], "0 1px 2px #000");
        assert_eq!(decls["box-shadow"], "0 1px 2px #000");
    }

    #[test]
    fn test_legacy_display() {
        let css = legacy_fallbacks(".a { display: flex; } .b { display:inline-grid; } .c { display: flexible; }");
        assert!(css.contains(".a { display: table; }"));
        assert!(css.contains(".b { display: inline-table; }"));
        assert!(css.contains("display: flexible"));
    }

    #[test]
    fn test_legacy_units() {
        let css = legacy_fallbacks(".a { padding: 1rem 0.5rem; height: 100vh; width: 50vw; margin: 1.25rem; }");
        assert!(css.contains("padding: 16px 8px"));
        assert!(css.contains("height: 100%"));
        assert!(css.contains("width: 50%"));
        assert!(css.contains("margin: 20px"));
    }

    #[test]
    fn test_blocks_appended() {
        let css = apply_fixups(".a { color: red; }", &FixupConfig::default());
        assert!(css.contains("mso-table-lspace: 0pt"));
        assert!(css.contains("-ms-interpolation-mode: bicubic"));
        assert!(css.contains("u + #body a"));
        assert!(css.contains(".ExternalClass"));
    }

    #[test]
    fn test_appended_blocks_stay_residual() {
        let css = apply_fixups("", &FixupConfig::default());
        let rules = parse_css(&css);
        assert!(rules.is_empty());
        assert_eq!(rules.residual_rules().len(), 4);
    }

    #[test]
    fn test_disabled_is_identity() {
        let source = ".a { display: flex; max-width: 2rem; transform: none; }";
        assert_eq!(apply_fixups(source, &FixupConfig::none()), source);
    }
}
