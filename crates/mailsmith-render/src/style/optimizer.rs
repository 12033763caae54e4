//! Style sheet size optimizer.
//!
//! Brings a sheet under a byte ceiling in escalating steps, stopping at the
//! first that fits:
//!
//! 1. Minify: drop comments, collapse whitespace, remove spaces around
//!    `{ } : ; ,`.
//! 2. Critical only: keep declarations naming a property from a short
//!    allow-list (colors, backgrounds, font sizes, display and dimensions).
//! 3. Truncate at the ceiling. The tail may be syntactically broken; the
//!    parser skips what it cannot read.
//!
//! Truncation only ever applies to minified text.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::css_parser::strip_comments;

/// Declarations containing any of these survive the critical-only pass.
pub const CRITICAL_PROPERTIES: [&str; 6] = [
    "color:",
    "background:",
    "font-size:",
    "display:",
    "width:",
    "height:",
];

/// How far the optimizer had to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizerStage {
    /// Minification changed nothing.
    Untouched,
    Minified,
    CriticalOnly,
    Truncated,
}

impl fmt::Display for OptimizerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptimizerStage::Untouched => "untouched",
            OptimizerStage::Minified => "minified",
            OptimizerStage::CriticalOnly => "critical-only",
            OptimizerStage::Truncated => "truncated",
        };
        f.write_str(name)
    }
}

/// Output of [`optimize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub css: String,
    pub stage: OptimizerStage,
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static PUNCTUATION_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{}:;,])\s*").expect("valid punctuation pattern"));

/// Minifies `css` and, if still needed, degrades it until it fits `ceiling` bytes.
///
/// ```rust
/// use mailsmith_render::style::{optimize, OptimizerStage};
///
/// let out = optimize(".a {\n  color: red;\n}\n", 1024);
/// assert_eq!(out.css, ".a{color:red}");
/// assert_eq!(out.stage, OptimizerStage::Minified);
/// ```
pub fn optimize(css: &str, ceiling: usize) -> Optimized {
    let minified = minify(css);
    let stage = if minified == css {
        OptimizerStage::Untouched
    } else {
        OptimizerStage::Minified
    };
    if minified.len() <= ceiling {
        return Optimized { css: minified, stage };
    }

    let critical = critical_only(&minified);
    if critical.len() <= ceiling {
        tracing::debug!(
            minified = minified.len(),
            critical = critical.len(),
            ceiling,
            "style sheet reduced to critical declarations"
        );
        return Optimized {
            css: critical,
            stage: OptimizerStage::CriticalOnly,
        };
    }

    tracing::warn!(
        bytes = critical.len(),
        ceiling,
        "style sheet over budget after critical pass; truncating"
    );
    Optimized {
        css: truncate(&critical, ceiling).to_string(),
        stage: OptimizerStage::Truncated,
    }
}

/// Strips comments and redundant whitespace.
pub fn minify(css: &str) -> String {
    let stripped = strip_comments(css);
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let tight = PUNCTUATION_SPACE.replace_all(&collapsed, "$1");
    tight.replace(";}", "}").trim().to_string()
}

fn is_critical(declaration: &str) -> bool {
    let declaration = declaration.trim();
    CRITICAL_PROPERTIES.iter().any(|p| declaration.contains(p))
}

fn matching_brace(css: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in css[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Keeps only critical declarations. Rules and at-rule blocks left empty are
/// dropped, as is an unbalanced tail.
pub fn critical_only(css: &str) -> String {
    let mut out = String::new();
    let mut rest = css;

    while let Some(open) = rest.find('{') {
        let Some(close) = matching_brace(rest, open) else {
            break;
        };
        let prelude = rest[..open].trim();
        let body = &rest[open + 1..close];

        if prelude.starts_with('@') {
            let inner = critical_only(body);
            if !inner.is_empty() {
                out.push_str(prelude);
                out.push('{');
                out.push_str(&inner);
                out.push('}');
            }
        } else {
            let kept: Vec<&str> = body
                .split(';')
                .filter(|d| is_critical(d))
                .map(str::trim)
                .collect();
            if !kept.is_empty() {
                out.push_str(prelude);
                out.push('{');
                out.push_str(&kept.join(";"));
                out.push('}');
            }
        }
        rest = &rest[close + 1..];
    }
    out
}

/// Cuts `text` to at most `ceiling` bytes on a character boundary.
pub fn truncate(text: &str, ceiling: usize) -> &str {
    if text.len() <= ceiling {
        return text;
    }
    let mut end = ceiling;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
