//! The closing signature block.
//!
//! Callers sometimes sign their own notes. If the configured marker phrase
//! appears anywhere in the input (case-insensitive, any string at any
//! depth), the block is not appended. This is a heuristic: a note that merely
//! mentions the team name also suppresses it.

use serde_json::{json, Value};

use super::FragmentContext;
use crate::error::RenderError;

/// True if any string inside `value` contains `needle` (already lowercased).
fn mentions(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| mentions(v, needle)),
        Value::Object(map) => map.values().any(|v| mentions(v, needle)),
        _ => false,
    }
}

pub(crate) fn append(
    mut body: String,
    input: &Value,
    ctx: &FragmentContext<'_>,
) -> Result<String, RenderError> {
    let signature = ctx.signature;
    if signature.lines.is_empty() {
        return Ok(body);
    }

    let marker = signature.marker.trim().to_lowercase();
    if !marker.is_empty() && mentions(input, &marker) {
        tracing::debug!(marker = %signature.marker, "input already signed, skipping signature");
        return Ok(body);
    }

    let block = ctx.render("signature", &json!({ "lines": signature.lines }))?;
    body.push_str(&block);
    Ok(body)
}
