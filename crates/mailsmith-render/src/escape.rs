//! The escaping boundary.
//!
//! Every caller-supplied string reaches markup through this module. Template
//! variants never hand raw input to the template engine: they build a context
//! value and pass it through [`escape_value`], which escapes every string at
//! any depth (lists of providers, nested alert records, and so on). The engine
//! itself runs with auto-escaping disabled so nothing is escaped twice.
//!
//! Besides the five HTML-significant characters, `=` and `` ` `` are encoded
//! so that text such as `onerror=` can never read as an attribute assignment,
//! even in clients with broken parsers.

use std::borrow::Cow;

use serde_json::Value;

/// Escapes text for use in element content or a quoted attribute value.
///
/// ```rust
/// use mailsmith_render::escape::escape_html;
///
/// assert_eq!(escape_html("a < b"), "a &lt; b");
/// assert!(!escape_html("<img onerror=x>").contains("onerror="));
/// ```
pub fn escape_html(text: &str) -> String {
    let escaped = htmlize::escape_all_quotes(text);
    if !escaped.contains(['=', '`']) {
        return escaped.into_owned();
    }
    escaped.replace('=', "&#61;").replace('`', "&#96;")
}

/// Escapes a value destined for a double-quoted attribute.
///
/// Used for values the renderer itself produces (inline styles), which may
/// legitimately contain `=` inside `url()` or font stacks.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    htmlize::escape_attribute(value)
}

/// Recursively escapes every string inside a JSON value.
///
/// Object keys are left alone: templates look fields up by key and never print
/// them. Numbers, booleans and nulls pass through unchanged.
pub fn escape_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_html(s)),
        Value::Array(items) => Value::Array(items.iter().map(escape_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), escape_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Returns the link target if it is a `https:`, `mailto:` or relative URL.
///
/// The result is normalized (whitespace and control characters removed) but
/// not escaped; it still has to pass through [`escape_value`] with the rest of
/// the context. Anything else (`javascript:`, `data:`, `vbscript:`, plain `http:`, or a
/// scheme hidden behind whitespace and control characters) yields `None` and
/// the link is dropped.
pub fn safe_url(url: &str) -> Option<String> {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if compact.is_empty() {
        return None;
    }

    let lower = compact.to_ascii_lowercase();
    let allowed = match lower.find(':') {
        Some(colon) => {
            let scheme_end = lower.find(['/', '?', '#']).unwrap_or(lower.len());
            if colon > scheme_end {
                // A colon after the path starts is not a scheme separator.
                true
            } else {
                let scheme = &lower[..colon];
                scheme == "https" || scheme == "mailto"
            }
        }
        None => true,
    };

    allowed.then_some(compact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escapes_markup_characters() {
        let out = escape_html(r#"<script>alert("x") & 'y'</script>"#);
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!out.contains('"'));
        assert!(!out.contains('\''));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains("&amp;"));
    }

    #[test]
    fn test_escapes_attribute_assignment() {
        let out = escape_html("<img src=x onerror=alert(1)>");
        assert!(!out.contains("onerror="));
        assert!(out.contains("&#61;"));
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("Baytown Dental"), "Baytown Dental");
    }

    #[test]
    fn test_escape_value_reaches_nested_strings() {
        let value = json!({
            "name": "<b>",
            "providers": [{"name": "<i>", "production": 10}],
            "alerts": ["<script>"]
        });
        let escaped = escape_value(&value);
        assert_eq!(escaped["name"], "&lt;b&gt;");
        assert_eq!(escaped["providers"][0]["name"], "&lt;i&gt;");
        assert_eq!(escaped["providers"][0]["production"], 10);
        assert_eq!(escaped["alerts"][0], "&lt;script&gt;");
    }

    #[test]
    fn test_safe_url_allows_https_mailto_relative() {
        assert!(safe_url("https://example.com/a?b=1").is_some());
        assert!(safe_url("mailto:ops@example.com").is_some());
        assert!(safe_url("/reports/42").is_some());
        assert!(safe_url("reports/42#top").is_some());
    }

    #[test]
    fn test_safe_url_rejects_script_schemes() {
        assert_eq!(safe_url("javascript:alert(1)"), None);
        assert_eq!(safe_url("JaVaScRiPt:alert(1)"), None);
        assert_eq!(safe_url("java\tscript:alert(1)"), None);
        assert_eq!(safe_url(" data:text/html;base64,PHNjcmlwdD4="), None);
        assert_eq!(safe_url("vbscript:msgbox"), None);
        assert_eq!(safe_url("http://plain.example.com"), None);
        assert_eq!(safe_url(""), None);
    }

    #[test]
    fn test_safe_url_is_escaped_by_boundary() {
        let url = safe_url("https://example.com/?a=1&b=\"2\"").unwrap();
        let escaped = escape_value(&serde_json::Value::String(url));
        let escaped = escaped.as_str().unwrap();
        assert!(escaped.contains("&amp;"));
        assert!(!escaped.contains('"'));
    }
}
