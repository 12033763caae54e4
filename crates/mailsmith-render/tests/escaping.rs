//! Caller-supplied text must never reach the document as live markup.

use mailsmith_render::escape::escape_html;
use mailsmith_render::{DocumentType, RenderRequest, Renderer};
use proptest::prelude::*;
use serde_json::{json, Value};

const PAYLOADS: &[&str] = &[
    "<script>alert(1)</script>",
    "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
    "<img src=x onerror=alert(1)>",
    "\"><svg onload=alert(1)>",
    "' onclick='alert(1)",
    "<a href=\"javascript:alert(1)\">click</a>",
    "<iframe src=\"data:text/html;base64,PHNjcmlwdD4=\"></iframe>",
    "<scr<script>ipt>alert(1)</scr</script>ipt>",
    "&lt;script&gt;alert(1)&lt;/script&gt;",
    "\u{FF1C}script\u{FF1E}alert(1)",
    "<body onload=alert('x')>",
    "`${alert(1)}`",
];

fn practice_report(payload: &str) -> Value {
    json!({
        "location": payload,
        "period": payload,
        "financial_data": {
            "production": {"value": 143343, "goal": 160000},
            "collections": {"value": 120000, "goal": 150000},
            "new_patients": {"value": 30, "goal": 40},
            "case_acceptance": {"value": 0.55, "goal": 0.7}
        },
        "providers": [
            {"name": payload, "role": payload, "production": 1000, "goal": 2000},
            {"name": "Kim Tran", "role": payload}
        ],
        "alerts": [payload, {"title": payload, "message": payload}],
        "notes": payload
    })
}

fn executive_summary(payload: &str) -> Value {
    json!({
        "period": payload,
        "kpis": [{"label": payload, "value": 10, "format": "number", "change": 1.0}],
        "highlights": [payload, payload],
        "locations": [{"name": payload, "production": 100, "collections": 90}],
        "notes": payload
    })
}

fn provider_update(payload: &str) -> Value {
    json!({
        "provider_name": payload,
        "location": payload,
        "effective_date": payload,
        "updates": [{"title": payload, "detail": payload}],
        "notes": payload
    })
}

fn alert_notification(payload: &str, urgency: &str) -> Value {
    json!({
        "alert_type": payload,
        "title": payload,
        "message": payload,
        "urgency": urgency,
        "location": payload,
        "details": [payload],
        "action_url": payload
    })
}

fn inputs(payload: &str) -> Vec<(DocumentType, Value)> {
    vec![
        (DocumentType::PracticeReport, practice_report(payload)),
        (DocumentType::ExecutiveSummary, executive_summary(payload)),
        (DocumentType::ProviderUpdate, provider_update(payload)),
        (DocumentType::AlertNotification, alert_notification(payload, "immediate")),
        (DocumentType::AlertNotification, alert_notification(payload, "normal")),
    ]
}

fn assert_inert(html: &str, payload: &str, context: &str) {
    let lower = html.to_lowercase();
    if payload.contains(['<', '>', '"', '\'', '&', '=']) {
        assert!(!html.contains(payload), "raw payload {:?} in {}", payload, context);
    }
    assert!(!lower.contains("<script"), "script tag in {}", context);
    assert!(!lower.contains("<svg"), "svg tag in {}", context);
    assert!(!lower.contains("<iframe"), "iframe tag in {}", context);
    for handler in ["onerror=", "onclick=", "onload="] {
        assert!(!lower.contains(handler), "{} in {}", handler, context);
    }
    assert!(!lower.contains("href=\"javascript:"), "script link in {}", context);
    assert!(!lower.contains("href=\"data:"), "data link in {}", context);
}

#[test]
fn test_payloads_are_inert_in_every_variant() {
    let renderer = Renderer::default();
    for payload in PAYLOADS {
        for (document, data) in inputs(payload) {
            let email = renderer
                .render(&RenderRequest::new(document, data))
                .unwrap_or_else(|e| panic!("{} failed for {:?}: {}", document, payload, e));
            assert_inert(&email.html, payload, &format!("{} / {:?}", document, payload));
        }
    }
}

#[test]
fn test_payloads_are_inert_without_inlining() {
    let config = mailsmith_render::RenderConfig {
        inline_styles: false,
        ..Default::default()
    };
    let renderer = Renderer::new(config);
    for payload in PAYLOADS {
        for (document, data) in inputs(payload) {
            let email = renderer.render(&RenderRequest::new(document, data)).unwrap();
            assert_inert(&email.html, payload, &format!("{} / {:?}", document, payload));
        }
    }
}

#[test]
fn test_unsafe_action_urls_dropped() {
    let renderer = Renderer::default();
    for url in [
        "javascript:alert(1)",
        "JaVaScRiPt:alert(1)",
        " java\tscript:alert(1)",
        "data:text/html,<script>alert(1)</script>",
        "vbscript:msgbox(1)",
    ] {
        let mut data = alert_notification("Schedule gap", "high");
        data["action_url"] = json!(url);
        let html = renderer.render_alert_notification(data).unwrap().html;
        assert!(!html.contains("Review details"), "link kept for {:?}", url);
    }
}

#[test]
fn test_safe_action_url_kept() {
    let mut data = alert_notification("Schedule gap", "high");
    data["action_url"] = json!("https://reports.example.com/gap");
    let html = Renderer::default().render_alert_notification(data).unwrap().html;
    assert!(html.contains("href=\"https://reports.example.com/gap\""));
}

#[test]
fn test_subject_escaped_in_document() {
    let data = provider_update("<b>Dr. X</b>");
    let email = Renderer::default().render_provider_update(data).unwrap();
    assert_eq!(email.subject, "Provider Update: <b>Dr. X</b>");
    assert!(!email.html.contains("<b>"));
}

proptest! {
    #[test]
    fn prop_escaped_text_has_no_markup(text in any::<String>()) {
        let escaped = escape_html(&text);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
        prop_assert!(!escaped.contains('='));
    }

    #[test]
    fn prop_arbitrary_notes_never_open_tags(notes in "[a-z<>\"'=&/ ]{0,40}") {
        let mut data = provider_update("Dr. Alvarez");
        data["notes"] = json!(notes);
        let email = Renderer::default().render_provider_update(data).unwrap();
        let body = email.html.split("<body").nth(1).unwrap_or("");
        prop_assert!(!body.contains("<a"), "stray anchor");
        prop_assert!(!body.contains("<script"));
        if !notes.trim().is_empty() {
            prop_assert!(body.contains(&escape_html(&notes)));
        }
    }
}
