//! Style sheet parsing into class rules.
//!
//! # Design
//!
//! The parser is built on `cssparser` (the tokenizer used by Firefox), which
//! gives robust handling of strings, escapes and nested blocks. On top of it,
//! the sheet is split three ways:
//!
//! - **Class rules**: a selector list made only of single class selectors
//!   (`.metric-card`, `.a, .b`). These land in the [`RuleSet`] and are what the
//!   inliner applies.
//! - **Media blocks**: `@media` rules cannot be inlined, so they are kept
//!   verbatim and re-emitted in the document's `<style>` block.
//! - **Residual rules**: element, compound and descendant selectors (`body`,
//!   `u + #body a`). Also kept verbatim for the `<style>` block.
//!
//! Declaration values are stored as raw text. A trailing `!important` is
//! dropped because inline styles already take precedence.
//!
//! Malformed rules and declarations are skipped, never reported as errors: a
//! typo in a style sheet should cost one rule, not the whole email.
//!
//! # Example
//!
//! ```rust
//! use mailsmith_render::style::parse_css;
//!
//! let rules = parse_css(".a { color: red !important; } body { margin: 0; } @media (max-width: 600px) { .a { color: blue; } }");
//! assert_eq!(rules.class("a").unwrap()["color"], "red");
//! assert_eq!(rules.media_blocks().len(), 1);
//! assert_eq!(rules.residual_rules(), ["body{margin: 0;}"]);
//! ```

use std::borrow::Cow;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered property → value map. Insertion order is precedence order.
pub type Declarations = IndexMap<String, String>;

/// Parsed style sheet: class rules plus the parts that cannot be inlined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: IndexMap<String, Declarations>,
    media: Vec<String>,
    residual: Vec<String>,
    skipped: usize,
}

impl RuleSet {
    /// Looks up a rule by selector, e.g. `.metric-card`.
    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.rules.get(selector)
    }

    /// Looks up the rule for a bare class name.
    pub fn class(&self, class: &str) -> Option<&Declarations> {
        self.rules.get(&format!(".{}", class))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Verbatim `@media` rules, in source order.
    pub fn media_blocks(&self) -> &[String] {
        &self.media
    }

    /// Verbatim non-class rules, in source order.
    pub fn residual_rules(&self) -> &[String] {
        &self.residual
    }

    /// Number of rules and declarations dropped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The CSS that must stay in a `<style>` block after inlining.
    pub fn leftover_css(&self) -> String {
        let mut out = String::new();
        for rule in self.residual.iter().chain(self.media.iter()) {
            out.push_str(rule);
            out.push('\n');
        }
        out
    }

    fn merge_rule(&mut self, selector: String, declarations: &Declarations) {
        let entry = self.rules.entry(selector).or_default();
        for (property, value) in declarations {
            entry.insert(property.clone(), value.clone());
        }
    }
}

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment pattern"));

/// Removes `/* ... */` blocks. An unterminated comment runs to the end.
pub fn strip_comments(css: &str) -> Cow<'_, str> {
    if !css.contains("/*") {
        return Cow::Borrowed(css);
    }
    let mut stripped = COMMENT.replace_all(css, "").into_owned();
    if let Some(open) = stripped.find("/*") {
        stripped.truncate(open);
    }
    Cow::Owned(stripped)
}

/// Drops a trailing `!important` marker from a declaration value.
pub fn strip_important(value: &str) -> &str {
    let value = value.trim();
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return value[..bang].trim_end();
        }
    }
    value
}

/// Parses a `style` attribute body: `;`-separated, each split on its first `:`.
///
/// Later duplicates overwrite earlier ones in place. Entries without a colon
/// or with an empty side are skipped.
pub fn parse_declarations(text: &str) -> Declarations {
    let mut declarations = Declarations::new();
    for part in text.split(';') {
        let Some((property, value)) = part.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = strip_important(value);
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.insert(property, value.to_string());
    }
    declarations
}

/// Parses style sheet text into a [`RuleSet`]. Never fails.
pub fn parse_css(css: &str) -> RuleSet {
    let css = strip_comments(css);
    let mut input = ParserInput::new(&css);
    let mut parser = Parser::new(&mut input);

    let mut collector = RuleCollector {
        rules: RuleSet::default(),
    };
    let mut skipped = 0;

    for result in cssparser::StyleSheetParser::new(&mut parser, &mut collector) {
        if let Err((err, slice)) = result {
            skipped += 1;
            tracing::debug!(error = ?err.kind, rule = slice.trim(), "skipping malformed css rule");
        }
    }

    let mut rules = collector.rules;
    rules.skipped += skipped;
    rules
}

struct RuleCollector {
    rules: RuleSet,
}

enum Prelude {
    Classes(Vec<String>),
    Verbatim(String),
}

/// Consumes the rest of `input` and returns its source text.
fn rest_of<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start)
}

impl<'i> QualifiedRuleParser<'i> for RuleCollector {
    type Prelude = Prelude;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        let mut classes = Vec::new();
        let mut simple = true;
        // True at the start of each selector in a comma-separated list.
        let mut expect_class = true;

        loop {
            let token = match input.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::Delim('.') if expect_class => match input.next_including_whitespace() {
                    Ok(Token::Ident(name)) => {
                        classes.push(name.as_ref().to_string());
                        expect_class = false;
                    }
                    _ => simple = false,
                },
                Token::WhiteSpace(_) => {}
                Token::Comma => {
                    if expect_class {
                        simple = false;
                    }
                    expect_class = true;
                }
                _ => simple = false,
            }
        }

        let raw = input.slice_from(start).trim();
        if simple && !expect_class && !classes.is_empty() {
            return Ok(Prelude::Classes(classes));
        }
        if raw.is_empty() || raw.contains(['{', '}', ';']) {
            return Err(input.new_custom_error::<(), ()>(()));
        }
        Ok(Prelude::Verbatim(raw.to_string()))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        match prelude {
            Prelude::Classes(names) => {
                let mut decl_parser = DeclarationCollector;
                let body = RuleBodyParser::new(input, &mut decl_parser);

                let mut declarations = Declarations::new();
                for item in body {
                    match item {
                        Ok((property, value)) => {
                            declarations.insert(property, value);
                        }
                        Err((_, slice)) => {
                            self.rules.skipped += 1;
                            tracing::debug!(declaration = slice.trim(), "skipping malformed declaration");
                        }
                    }
                }

                for name in names {
                    self.rules.merge_rule(format!(".{}", name), &declarations);
                }
            }
            Prelude::Verbatim(selector) => {
                let body = rest_of(input).trim();
                self.rules.residual.push(format!("{}{{{}}}", selector, body));
            }
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for RuleCollector {
    type Prelude = String;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if !name.eq_ignore_ascii_case("media") {
            // @import, @font-face and friends either reference external
            // resources or are unsupported by mail clients.
            return Err(input.new_custom_error::<(), ()>(()));
        }
        Ok(rest_of(input).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let body = rest_of(input).trim();
        self.rules.media.push(format!("@media {}{{{}}}", prelude, body));
        Ok(())
    }
}

struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = (String, String);
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let value = strip_important(rest_of(input));
        if value.is_empty() {
            return Err(input.new_custom_error::<(), ()>(()));
        }
        Ok((name.as_ref().to_ascii_lowercase(), value.to_string()))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_class_rule() {
        let rules = parse_css(".metric-card { color: red; padding: 16px 8px; }");
        let decls = rules.class("metric-card").unwrap();
        assert_eq!(decls["color"], "red");
        assert_eq!(decls["padding"], "16px 8px");
        assert_eq!(rules.get(".metric-card"), Some(decls));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let rules = parse_css(".a { margin: 0; color: red; padding: 1px; }");
        let props: Vec<_> = rules.class("a").unwrap().keys().cloned().collect();
        assert_eq!(props, ["margin", "color", "padding"]);
    }

    #[test]
    fn test_important_stripped() {
        let rules = parse_css(".a { color: red !important; width: 100% ! IMPORTANT }");
        let decls = rules.class("a").unwrap();
        assert_eq!(decls["color"], "red");
        assert_eq!(decls["width"], "100%");
    }

    #[test]
    fn test_comments_stripped() {
        let rules = parse_css("/* header */ .a { /* inner */ color: red; } /* trailing");
        assert_eq!(rules.class("a").unwrap()["color"], "red");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_values_keep_raw_text() {
        let rules = parse_css(
            ".a { font-family: 'Segoe UI', Arial, sans-serif; border: 1px solid var(--border); }",
        );
        let decls = rules.class("a").unwrap();
        assert_eq!(decls["font-family"], "'Segoe UI', Arial, sans-serif");
        assert_eq!(decls["border"], "1px solid var(--border)");
    }

    #[test]
    fn test_selector_list_defines_each_class() {
        let rules = parse_css(".a, .b { color: blue; }");
        assert_eq!(rules.class("a").unwrap()["color"], "blue");
        assert_eq!(rules.class("b").unwrap()["color"], "blue");
    }

    #[test]
    fn test_repeated_selector_merges() {
        let rules = parse_css(".a { color: red; margin: 0; } .a { color: blue; }");
        let decls = rules.class("a").unwrap();
        assert_eq!(decls["color"], "blue");
        assert_eq!(decls["margin"], "0");
    }

    #[test]
    fn test_media_blocks_side_channel() {
        let rules = parse_css(
            ".a { color: red; } @media only screen and (max-width: 620px) { .a { color: blue; } }",
        );
        assert_eq!(rules.class("a").unwrap()["color"], "red");
        assert_eq!(rules.media_blocks().len(), 1);
        let media = &rules.media_blocks()[0];
        assert!(media.starts_with("@media only screen and (max-width: 620px){"));
        assert!(media.contains(".a { color: blue; }"));
    }

    #[test]
    fn test_non_class_selectors_are_residual() {
        let rules = parse_css("body { margin: 0; } .a .b { color: red; } .c.d { color: red; } u + #body a { color: inherit; }");
        assert!(rules.is_empty());
        assert_eq!(rules.residual_rules().len(), 4);
        assert_eq!(rules.residual_rules()[0], "body{margin: 0;}");
    }

    #[test]
    fn test_pseudo_class_is_residual() {
        let rules = parse_css(".button:hover { color: red; }");
        assert!(rules.class("button").is_none());
        assert_eq!(rules.residual_rules().len(), 1);
    }

    #[test]
    fn test_import_dropped() {
        let rules = parse_css("@import url(https://fonts.example.com/a.css); .a { color: red; }");
        assert_eq!(rules.class("a").unwrap()["color"], "red");
        assert!(rules.leftover_css().is_empty());
        assert_eq!(rules.skipped(), 1);
    }

    #[test]
    fn test_malformed_css_does_not_panic() {
        let inputs = [
            ".a { color: red; } .b { color: ; } .c { : blue; }",
            ".a { color: red",
            "}}}} .a { color: red; }",
            "{ color: red; }",
            ".a { color: red; } .b color: blue } .c { color: green; }",
            "@media { .a { color",
            ".",
            "",
            "/*",
            ".a { background: url(\"unterminated ; }",
        ];
        for css in inputs {
            let _ = parse_css(css);
        }
    }

    #[test]
    fn test_malformed_rule_skipped_neighbours_survive() {
        let rules = parse_css(".a { color: red; } { color: blue; } .c { color: green; }");
        assert_eq!(rules.class("a").unwrap()["color"], "red");
        assert_eq!(rules.class("c").unwrap()["color"], "green");
        assert!(rules.skipped() >= 1);
    }

    #[test]
    fn test_empty_declaration_skipped() {
        let rules = parse_css(".a { color: ; margin: 0; }");
        let decls = rules.class("a").unwrap();
        assert!(!decls.contains_key("color"));
        assert_eq!(decls["margin"], "0");
        assert_eq!(rules.skipped(), 1);
    }

    #[test]
    fn test_parse_declarations_inline() {
        let decls = parse_declarations("color: red; ; bogus; WIDTH : 50% !important; background: url(https://x/y.png)");
        assert_eq!(decls["color"], "red");
        assert_eq!(decls["width"], "50%");
        assert_eq!(decls["background"], "url(https://x/y.png)");
        assert_eq!(decls.len(), 3);
    }

    #[test]
    fn test_strip_important_variants() {
        assert_eq!(strip_important("red !important"), "red");
        assert_eq!(strip_important("red!important"), "red");
        assert_eq!(strip_important("red ! important "), "red");
        assert_eq!(strip_important("red"), "red");
        assert_eq!(strip_important("'wow!' serif"), "'wow!' serif");
    }
}
