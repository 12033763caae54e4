//! Class-to-inline-style rewriting.
//!
//! For each element carrying a `class` or `style` attribute, in document
//! order:
//!
//! 1. The existing `style` attribute is the base.
//! 2. Each class, in the order written on the element, overwrites the
//!    properties its rule declares. The last class listed wins a conflict,
//!    whatever the rule order in the sheet.
//! 3. `var(--token)` placeholders resolve against the theme. Unknown tokens
//!    are left in place.
//! 4. Properties email clients mishandle are dropped: flex and grid display,
//!    fixed and absolute positioning, and every transform, animation and
//!    transition property.
//! 5. The result becomes a single `style` attribute and `class` is removed.
//!
//! A fragment the [`MarkupParser`] rejects comes back unchanged, still
//! class-styled.

use quick_xml::escape::unescape;

use super::{Document, Element, MarkupParser, XmlParser};
use crate::error::Degraded;
use crate::escape::escape_attribute;
use crate::style::{parse_declarations, Declarations, RuleSet};
use crate::theme::Theme;

/// Result of an inlining pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inlined {
    pub html: String,
    /// Set when the markup could not be parsed and `html` is the input as-is.
    pub degraded: Option<Degraded>,
    /// Number of elements whose style was rewritten.
    pub elements: usize,
}

/// Inlines `rules` into `markup` with the default strict parser.
///
/// ```rust
/// use mailsmith_render::markup::inline;
/// use mailsmith_render::style::parse_css;
/// use mailsmith_render::ThemeRegistry;
///
/// let rules = parse_css(".a { color: red; } .b { color: blue; padding: 4px; }");
/// let theme = ThemeRegistry::builtin().default_theme().clone();
/// let out = inline(r#"<p class="a b">hi</p>"#, &rules, &theme);
/// assert_eq!(out.html, r#"<p style="color: blue; padding: 4px">hi</p>"#);
/// ```
pub fn inline(markup: &str, rules: &RuleSet, theme: &Theme) -> Inlined {
    inline_with(&XmlParser, markup, rules, theme)
}

/// Inlines using a caller-chosen parser.
pub fn inline_with<P>(parser: &P, markup: &str, rules: &RuleSet, theme: &Theme) -> Inlined
where
    P: MarkupParser + ?Sized,
{
    let mut document: Document = match parser.parse(markup) {
        Ok(document) => document,
        Err(degraded) => {
            tracing::warn!(reason = %degraded.reason, "markup not inlined, keeping class styling");
            return Inlined {
                html: markup.to_string(),
                degraded: Some(degraded),
                elements: 0,
            };
        }
    };

    let mut elements = 0;
    document.for_each_element_mut(|element| {
        if inline_element(element, rules, theme) {
            elements += 1;
        }
    });

    Inlined {
        html: document.to_markup(),
        degraded: None,
        elements,
    }
}

fn attribute_text(element: &Element, name: &str) -> Option<String> {
    let raw = element.attribute(name)?;
    Some(match unescape(raw) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    })
}

/// Rewrites one element. Returns `false` if it had neither class nor style.
fn inline_element(element: &mut Element, rules: &RuleSet, theme: &Theme) -> bool {
    let classes = attribute_text(element, "class");
    let style = attribute_text(element, "style");
    if classes.is_none() && style.is_none() {
        return false;
    }

    let mut declarations = style
        .as_deref()
        .map(parse_declarations)
        .unwrap_or_default();

    for class in classes.as_deref().unwrap_or("").split_whitespace() {
        if let Some(rule) = rules.class(class) {
            for (property, value) in rule {
                declarations.insert(property.clone(), value.clone());
            }
        }
    }

    let resolved: Declarations = declarations
        .into_iter()
        .map(|(property, value)| {
            let value = theme.substitute(&value).into_owned();
            (property, value)
        })
        .filter(|(property, value)| !is_excluded(property, value))
        .collect();

    element.remove_attribute("class");
    if resolved.is_empty() {
        element.remove_attribute("style");
    } else {
        let style = serialize(&resolved);
        element.set_attribute("style", escape_attribute(&style));
    }
    true
}

/// Writes declarations as `prop: value; prop: value`.
pub fn serialize(declarations: &Declarations) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn unprefixed(property: &str) -> &str {
    for prefix in ["-webkit-", "-moz-", "-ms-", "-o-"] {
        if let Some(rest) = property.strip_prefix(prefix) {
            return rest;
        }
    }
    property
}

fn is_family(property: &str, family: &str) -> bool {
    property == family
        || property
            .strip_prefix(family)
            .is_some_and(|rest| rest.starts_with('-'))
}

/// True for declarations that must not reach an email client.
pub fn is_excluded(property: &str, value: &str) -> bool {
    let property = property.to_ascii_lowercase();
    let property = unprefixed(&property);
    if ["transform", "animation", "transition"]
        .iter()
        .any(|family| is_family(property, family))
    {
        return true;
    }

    let value = value.trim().to_ascii_lowercase();
    match property {
        "display" => matches!(value.as_str(), "flex" | "grid" | "inline-flex" | "inline-grid"),
        "position" => matches!(value.as_str(), "fixed" | "absolute"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::parse_css;
    use crate::theme::ThemeRegistry;

    fn theme() -> Theme {
        ThemeRegistry::builtin().default_theme().clone()
    }

    #[test]
    fn test_later_class_wins() {
        let rules = parse_css(".a { color: red; } .b { color: blue; }");
        let out = inline(r#"<p class="a b">x</p>"#, &rules, &theme());
        assert_eq!(out.html, r#"<p style="color: blue">x</p>"#);
    }

    #[test]
    fn test_element_order_beats_sheet_order() {
        let rules = parse_css(".a { color: red; } .b { color: blue; }");
        let out = inline(r#"<p class="b a">x</p>"#, &rules, &theme());
        assert!(out.html.contains("color: red"));
    }

    #[test]
    fn test_existing_style_is_base() {
        let rules = parse_css(".a { color: red; }");
        let out = inline(
            r#"<p class="a" style="color: green; margin: 0">x</p>"#,
            &rules,
            &theme(),
        );
        assert_eq!(out.html, r#"<p style="color: red; margin: 0">x</p>"#);
    }

    #[test]
    fn test_theme_tokens_resolved() {
        let theme = theme();
        let rules = parse_css(".a { color: var(--primary); border: 1px solid var(--border); }");
        let out = inline(r#"<td class="a">x</td>"#, &rules, &theme);
        assert!(!out.html.contains("var(--"));
        assert!(out.html.contains(theme.token("primary").unwrap()));
    }

    #[test]
    fn test_unknown_token_left_in_place() {
        let rules = parse_css(".a { color: var(--nope); }");
        let out = inline(r#"<td class="a">x</td>"#, &rules, &theme());
        assert!(out.html.contains("var(--nope)"));
    }

    #[test]
    fn test_incompatible_properties_stripped() {
        let rules = parse_css(
            ".a { display: flex; transform: rotate(45deg); -webkit-transform: rotate(45deg); color: red; }
             .b { position: fixed; transition: all 1s; animation: spin 1s; text-transform: uppercase; }",
        );
        let out = inline(r#"<div class="a b">x</div>"#, &rules, &theme());
        assert_eq!(
            out.html,
            r#"<div style="color: red; text-transform: uppercase">x</div>"#
        );
    }

    #[test]
    fn test_inline_style_also_filtered() {
        let rules = RuleSet::default();
        let out = inline(
            r#"<div style="display: grid; border-left-color: var(--danger)">x</div>"#,
            &rules,
            &theme(),
        );
        assert!(!out.html.contains("grid"));
        assert!(!out.html.contains("var(--"));
    }

    #[test]
    fn test_unknown_class_removed_without_style() {
        let out = inline(r#"<p class="missing">x</p>"#, &RuleSet::default(), &theme());
        assert_eq!(out.html, "<p>x</p>");
        assert_eq!(out.elements, 1);
    }

    #[test]
    fn test_nested_elements_and_plain_ones() {
        let rules = parse_css(".t { width: 600px; } .c { padding: 0; }");
        let out = inline(
            r#"<table class="t" width="600"><tr><td class="c">x</td><td>y</td></tr></table>"#,
            &rules,
            &theme(),
        );
        assert_eq!(
            out.html,
            r#"<table width="600" style="width: 600px"><tr><td style="padding: 0">x</td><td>y</td></tr></table>"#
        );
        assert_eq!(out.elements, 2);
    }

    #[test]
    fn test_quotes_in_values_escaped() {
        let rules = parse_css(r#".a { font-family: "Segoe UI", Arial; }"#);
        let out = inline(r#"<p class="a">x</p>"#, &rules, &theme());
        assert_eq!(
            out.html,
            r#"<p style="font-family: &quot;Segoe UI&quot;, Arial">x</p>"#
        );
    }

    #[test]
    fn test_malformed_markup_fails_soft() {
        let rules = parse_css(".a { color: red; }");
        let markup = r#"<table class="a"><tr><td>unclosed"#;
        let out = inline(markup, &rules, &theme());
        assert_eq!(out.html, markup);
        assert!(out.degraded.is_some());
    }

    #[test]
    fn test_excluded_predicate() {
        assert!(is_excluded("display", "flex"));
        assert!(is_excluded("DISPLAY", " Inline-Grid "));
        assert!(is_excluded("transform-origin", "center"));
        assert!(is_excluded("-moz-transition", "none"));
        assert!(!is_excluded("display", "block"));
        assert!(!is_excluded("position", "relative"));
        assert!(!is_excluded("text-transform", "uppercase"));
    }
}
