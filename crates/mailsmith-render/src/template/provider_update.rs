//! Provider update: a list of changes affecting one provider.

use serde_json::{json, Value};

use super::validate::root;
use super::{text_field, DocumentType, EmailTemplate, FragmentContext};
use crate::error::{RenderError, ValidationError};

struct Update<'a> {
    title: &'a str,
    detail: &'a str,
}

struct ProviderNotice<'a> {
    provider_name: &'a str,
    location: Option<&'a str>,
    effective_date: Option<&'a str>,
    updates: Vec<Update<'a>>,
    notes: Option<&'a str>,
}

fn parse(input: &Value) -> Result<ProviderNotice<'_>, ValidationError> {
    let rec = root(input)?;
    let provider_name = rec.str("provider_name")?;

    let items = rec.list("updates", true)?;
    let mut updates = Vec::with_capacity(items.len());
    for scoped in rec.records("updates", items)? {
        let update = scoped.record();
        updates.push(Update {
            title: update.str("title")?,
            detail: update.str("detail")?,
        });
    }

    Ok(ProviderNotice {
        provider_name,
        location: rec.opt_str("location")?,
        effective_date: rec.opt_str("effective_date")?,
        updates,
        notes: rec.opt_str("notes")?,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderUpdate;

impl EmailTemplate for ProviderUpdate {
    fn document_type(&self) -> DocumentType {
        DocumentType::ProviderUpdate
    }

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        parse(input).map(|_| ())
    }

    fn render_fragment(&self, input: &Value, ctx: &FragmentContext<'_>) -> Result<String, RenderError> {
        let notice = parse(input)?;
        let updates: Vec<Value> = notice
            .updates
            .iter()
            .map(|u| json!({ "title": u.title, "detail": u.detail }))
            .collect();
        let context = json!({
            "provider_name": notice.provider_name,
            "location": notice.location,
            "effective_date": notice.effective_date,
            "updates": updates,
            "notes": notice.notes,
        });
        let body = ctx.render(DocumentType::ProviderUpdate.name(), &context)?;
        ctx.finish(body, input)
    }

    fn subject(&self, input: &Value) -> String {
        format!("Provider Update: {}", text_field(input, "provider_name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldProblem;
    use crate::template::testing::ctx;

    fn sample() -> Value {
        json!({
            "provider_name": "Dr. Alvarez",
            "location": "Humble",
            "effective_date": "April 1",
            "updates": [
                {"title": "New schedule", "detail": "Fridays move to 7am starts."},
                {"title": "Fee schedule", "detail": "Crown fees updated."}
            ]
        })
    }

    #[test]
    fn test_renders_updates() {
        let html = ProviderUpdate.render_fragment(&sample(), &ctx()).unwrap();
        assert!(html.contains("Dr. Alvarez"));
        assert_eq!(html.matches("class=\"update-item\"").count(), 2);
        assert!(html.contains("Effective April 1"));
        assert!(html.contains("header-subtitle"));
    }

    #[test]
    fn test_updates_required() {
        let mut input = sample();
        input.as_object_mut().unwrap().remove("updates");
        let err = ProviderUpdate.validate(&input).unwrap_err();
        assert_eq!(err.field, "updates");
        assert_eq!(err.problem, FieldProblem::Missing);
    }

    #[test]
    fn test_update_detail_required() {
        let mut input = sample();
        input["updates"][1]["detail"] = json!("  ");
        let err = ProviderUpdate.validate(&input).unwrap_err();
        assert_eq!(err.field, "updates[1].detail");
        assert_eq!(err.problem, FieldProblem::Empty);
    }

    #[test]
    fn test_location_used_for_theme() {
        assert_eq!(ProviderUpdate.location(&sample()), Some("Humble"));
    }

    #[test]
    fn test_subject() {
        assert_eq!(ProviderUpdate.subject(&sample()), "Provider Update: Dr. Alvarez");
    }
}
