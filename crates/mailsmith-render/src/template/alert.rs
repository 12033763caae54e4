//! Alert notification with urgency styling and escalation.

use std::fmt;

use serde_json::{json, Value};

use super::validate::root;
use super::{text_field, DocumentType, EmailTemplate, FragmentContext};
use crate::error::{RenderError, ValidationError};
use crate::escape::safe_url;

/// Alert urgency. Unknown or missing values read as [`Urgency::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    Immediate,
    High,
    #[default]
    Normal,
}

/// Presentation for one urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyStyle {
    /// Theme token for the banner accent.
    pub color: &'static str,
    pub icon: &'static str,
    pub copy: &'static str,
    /// Expected response time, shown in the escalation block.
    pub response_window: &'static str,
    /// Whether the escalation contact block is included.
    pub escalate: bool,
}

impl Urgency {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("immediate") => Urgency::Immediate,
            Some("high") => Urgency::High,
            None | Some("normal") => Urgency::Normal,
            Some(other) => {
                tracing::debug!(urgency = other, "unknown urgency, treating as normal");
                Urgency::Normal
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::High => "high",
            Urgency::Normal => "normal",
        }
    }

    pub fn style(self) -> UrgencyStyle {
        match self {
            Urgency::Immediate => UrgencyStyle {
                color: "danger",
                icon: "\u{1F6A8}",
                copy: "Immediate action required",
                response_window: "1 hour",
                escalate: true,
            },
            Urgency::High => UrgencyStyle {
                color: "warning",
                icon: "\u{26A0}\u{FE0F}",
                copy: "High priority: please review today",
                response_window: "4 hours",
                escalate: true,
            },
            Urgency::Normal => UrgencyStyle {
                color: "primary",
                icon: "\u{2139}\u{FE0F}",
                copy: "For your information",
                response_window: "1 business day",
                escalate: false,
            },
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Alert<'a> {
    alert_type: &'a str,
    title: &'a str,
    message: &'a str,
    urgency: Urgency,
    location: Option<&'a str>,
    details: Vec<&'a str>,
    action_url: Option<String>,
}

fn parse(input: &Value) -> Result<Alert<'_>, ValidationError> {
    let rec = root(input)?;
    let alert_type = rec.str("alert_type")?;
    let title = rec.str("title")?;
    let message = rec.str("message")?;
    let urgency = Urgency::parse(rec.opt_str("urgency")?);

    let items = rec.opt_list("details")?;
    let details = rec.strings("details", items)?;

    let action_url = match rec.opt_str("action_url")? {
        Some(url) => {
            let safe = safe_url(url);
            if safe.is_none() {
                tracing::warn!("dropping action_url with disallowed scheme");
            }
            safe
        }
        None => None,
    };

    Ok(Alert {
        alert_type,
        title,
        message,
        urgency,
        location: rec.opt_str("location")?,
        details,
        action_url,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotification;

impl EmailTemplate for AlertNotification {
    fn document_type(&self) -> DocumentType {
        DocumentType::AlertNotification
    }

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        parse(input).map(|_| ())
    }

    fn render_fragment(&self, input: &Value, ctx: &FragmentContext<'_>) -> Result<String, RenderError> {
        let alert = parse(input)?;
        let style = alert.urgency.style();
        let context = json!({
            "alert_type": alert.alert_type,
            "title": alert.title,
            "message": alert.message,
            "urgency": alert.urgency.as_str(),
            "color": style.color,
            "icon": style.icon,
            "urgency_copy": style.copy,
            "response_window": style.response_window,
            "escalate": style.escalate,
            "location": alert.location,
            "details": alert.details,
            "action_url": alert.action_url,
            "contact": {
                "name": ctx.contact.name,
                "phone": ctx.contact.phone,
                "email": ctx.contact.email,
            },
        });
        let body = ctx.render(DocumentType::AlertNotification.name(), &context)?;
        ctx.finish(body, input)
    }

    fn subject(&self, input: &Value) -> String {
        let title = text_field(input, "title");
        let urgency = Urgency::parse(input.get("urgency").and_then(Value::as_str));
        match urgency {
            Urgency::Immediate => format!("[IMMEDIATE] {}", title),
            Urgency::High => format!("[HIGH] {}", title),
            Urgency::Normal => format!("{}: {}", text_field(input, "alert_type"), title),
        }
    }
}
