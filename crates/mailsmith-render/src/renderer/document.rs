//! The document shell around a rendered fragment.
//!
//! The shell is XHTML like the fragments, so the assembled document parses
//! as a whole and the inliner reaches the wrapper elements too.

use std::fmt::Write as _;

use crate::escape::escape_html;

/// Informational only; no mail client enforces it.
pub const CSP_COMMENT: &str =
    "<!-- Content-Security-Policy: default-src 'none'; style-src 'unsafe-inline'; img-src https:; -->";

/// Fixed content width of the body table, in pixels.
pub const CONTENT_WIDTH: u32 = 600;

/// Parts of the shell that vary per render.
#[derive(Debug, Clone, Copy)]
pub struct Shell<'a> {
    /// Plain-text subject; escaped here for the title and preheader.
    pub subject: &'a str,
    /// Style sheet for the `<style>` block, theme tokens already resolved.
    pub css: &'a str,
    pub footer: &'a str,
}

/// Wraps `fragment` in the full email document.
pub fn assemble(fragment: &str, shell: &Shell<'_>) -> String {
    let subject = escape_html(shell.subject);
    let footer = escape_html(shell.footer);
    let mut out = String::with_capacity(fragment.len() + shell.css.len() + 2048);

    out.push_str("<!DOCTYPE html>\n");
    out.push_str("<html lang=\"en\" xmlns=\"http://www.w3.org/1999/xhtml\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str("<meta name=\"x-apple-disable-message-reformatting\" />\n");
    out.push_str(CSP_COMMENT);
    out.push('\n');
    let _ = writeln!(out, "<title>{}</title>", subject);
    if !shell.css.trim().is_empty() {
        let _ = writeln!(out, "<style type=\"text/css\">\n{}</style>", shell.css);
    }
    out.push_str("</head>\n");

    out.push_str("<body class=\"email-body\" id=\"body\">\n");
    let _ = writeln!(out, "<span class=\"preheader\">{}</span>", subject);
    out.push_str(
        "<table role=\"presentation\" class=\"email-wrapper\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\n\
         <tr><td class=\"email-outer\" align=\"center\">\n",
    );
    let _ = writeln!(
        out,
        "<table role=\"presentation\" class=\"email-container\" width=\"{}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">",
        CONTENT_WIDTH
    );
    out.push_str("<tr><td class=\"email-content\">\n");
    out.push_str(fragment);
    if !fragment.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</td></tr>\n</table>\n");
    let _ = writeln!(
        out,
        "<table role=\"presentation\" class=\"email-footer\" width=\"{}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">",
        CONTENT_WIDTH
    );
    let _ = writeln!(out, "<tr><td class=\"footer-text\">{}</td></tr>", footer);
    out.push_str("</table>\n</td></tr>\n</table>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkupParser, XmlParser};

    fn shell<'a>(subject: &'a str, css: &'a str) -> Shell<'a> {
        Shell {
            subject,
            css,
            footer: "Sent automatically.",
        }
    }

    #[test]
    fn test_document_structure() {
        let html = assemble("<p class=\"body-text\">Hi</p>", &shell("Weekly", ".a{color:red}"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("<meta charset=\"utf-8\" />"));
        assert!(html.contains(CSP_COMMENT));
        assert!(html.contains("width=\"600\""));
        assert!(html.contains("<style type=\"text/css\">\n.a{color:red}</style>"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_subject_escaped_in_title_and_preheader() {
        let html = assemble("<p>x</p>", &shell("<b>Q1</b> & more", ""));
        assert!(html.contains("<title>&lt;b&gt;Q1&lt;/b&gt; &amp; more</title>"));
        assert!(html.contains("<span class=\"preheader\">&lt;b&gt;Q1"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_empty_sheet_omits_style_block() {
        let html = assemble("<p>x</p>", &shell("s", "  "));
        assert!(!html.contains("<style"));
    }

    #[test]
    fn test_shell_is_well_formed() {
        let html = assemble("<p class=\"body-text\">Hi</p>", &shell("Weekly", ".a{color:red}"));
        assert!(XmlParser.parse(&html).is_ok());
    }
}
