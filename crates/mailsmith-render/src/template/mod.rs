//! Email template variants.
//!
//! Each document type is a unit struct implementing [`EmailTemplate`]:
//! validate the input record, then render a markup fragment. The renderer
//! reaches them through [`template_for`], a fixed dispatch table keyed by
//! [`DocumentType`].
//!
//! Variants build a JSON context and hand it to
//! [`FragmentContext::render`], which escapes every string in it before the
//! engine sees it. That is the only path from caller data to markup.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

pub mod format;
pub mod validate;

mod alert;
mod engine;
mod executive_summary;
mod practice_report;
mod provider_update;
mod signature;
mod sources;

pub use alert::{AlertNotification, Urgency};
pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use executive_summary::ExecutiveSummary;
pub use practice_report::{MetricStatus, PracticeReport};
pub use provider_update::ProviderUpdate;

use crate::config::{ContactConfig, SignatureConfig};
use crate::error::{RenderError, ValidationError};
use crate::escape::escape_value;

/// The closed set of document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PracticeReport,
    ExecutiveSummary,
    ProviderUpdate,
    AlertNotification,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::PracticeReport,
        DocumentType::ExecutiveSummary,
        DocumentType::ProviderUpdate,
        DocumentType::AlertNotification,
    ];

    /// The canonical tag, which is also the built-in template name.
    pub fn name(self) -> &'static str {
        match self {
            DocumentType::PracticeReport => "practice_report",
            DocumentType::ExecutiveSummary => "executive_summary",
            DocumentType::ProviderUpdate => "provider_update",
            DocumentType::AlertNotification => "alert_notification",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = RenderError;

    /// Accepts the canonical tag or its hyphenated form, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('-', "_");
        DocumentType::ALL
            .into_iter()
            .find(|doc| doc.name() == tag)
            .ok_or_else(|| RenderError::UnknownDocumentType(s.to_string()))
    }
}

/// What a variant needs from the renderer while producing markup.
#[derive(Clone, Copy)]
pub struct FragmentContext<'a> {
    pub engine: &'a dyn TemplateEngine,
    pub signature: &'a SignatureConfig,
    pub contact: &'a ContactConfig,
}

impl<'a> FragmentContext<'a> {
    /// Escapes `context` and renders the named template with it.
    pub fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        self.engine.render_named(template, &escape_value(context))
    }

    /// Appends the signature block unless `input` already carries its marker.
    pub fn finish(&self, body: String, input: &Value) -> Result<String, RenderError> {
        signature::append(body, input, self)
    }
}

/// A document type's validation and markup capability.
pub trait EmailTemplate: Send + Sync {
    fn document_type(&self) -> DocumentType;

    /// Checks `input` against the field contract. Nothing is rendered.
    fn validate(&self, input: &Value) -> Result<(), ValidationError>;

    /// Renders the body fragment, signature included.
    ///
    /// Re-validates, so calling it on unchecked input is safe.
    fn render_fragment(&self, input: &Value, ctx: &FragmentContext<'_>) -> Result<String, RenderError>;

    /// Plain-text subject line. Not escaped; subjects are not markup.
    fn subject(&self, input: &Value) -> String;

    /// Location field used for theme inference.
    fn location<'v>(&self, input: &'v Value) -> Option<&'v str> {
        input.get("location").and_then(Value::as_str)
    }
}

static TEMPLATE_TABLE: [&dyn EmailTemplate; 4] = [
    &PracticeReport,
    &ExecutiveSummary,
    &ProviderUpdate,
    &AlertNotification,
];

/// Looks up the variant for a document type.
pub fn template_for(document: DocumentType) -> &'static dyn EmailTemplate {
    TEMPLATE_TABLE
        .iter()
        .copied()
        .find(|t| t.document_type() == document)
        .unwrap_or(TEMPLATE_TABLE[0])
}

/// Every registered variant, in [`DocumentType::ALL`] order.
pub fn templates() -> impl Iterator<Item = &'static dyn EmailTemplate> {
    TEMPLATE_TABLE.iter().copied()
}

/// Reads a string field for subject lines, tolerating bad input.
pub(crate) fn text_field<'v>(input: &'v Value, key: &str) -> &'v str {
    input.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}
