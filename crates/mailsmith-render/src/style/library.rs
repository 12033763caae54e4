//! Style sheet fragments for email documents.
//!
//! Fragments are stored as `(name, css)` pairs and concatenated per document
//! type by [`compose`]. Colors are written as `var(--token)` placeholders and
//! resolved against a [`Theme`](crate::Theme) at inline time, so the same text
//! serves every palette.
//!
//! The fragments are written the way a web designer would write them, modern
//! constructs included (`display: grid`, `rem` units, transitions). The
//! compatibility fixups and the inliner's stripping pass are what make them
//! safe for mail clients; the library itself does not try to be.

use crate::template::DocumentType;

/// Element-level resets. None of these are class rules, so they stay in the
/// document's `<style>` block after inlining.
const BASE_RESET: &str = r#"
/* Reset */
body {
    margin: 0;
    padding: 0;
    width: 100% !important;
    -webkit-text-size-adjust: 100%;
    -ms-text-size-adjust: 100%;
}
table, td {
    border-collapse: collapse;
}
img {
    border: 0;
    height: auto;
    line-height: 100%;
    outline: none;
    text-decoration: none;
}
p {
    margin: 0;
}
a {
    color: var(--primary);
}
"#;

const LAYOUT: &str = r#"
/* Document shell */
.email-body {
    margin: 0;
    padding: 0;
    background-color: var(--background-light);
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
    color: var(--text);
}
.preheader {
    display: none !important;
    visibility: hidden;
    opacity: 0;
    color: transparent;
    height: 0;
    max-height: 0;
    overflow: hidden;
    font-size: 1px;
    line-height: 1px;
}
.email-wrapper {
    width: 100%;
    background-color: var(--background-light);
}
.email-outer {
    padding: 24px 12px;
}
.email-container {
    width: 100%;
    max-width: 600px;
    background-color: var(--background);
    border: 1px solid var(--border);
    border-radius: 8px;
}
.email-content {
    padding: 0;
}
.email-footer {
    width: 100%;
    max-width: 600px;
}
.footer-text {
    padding: 16px 24px;
    font-size: 12px;
    line-height: 18px;
    color: var(--text-light);
    text-align: center;
}
"#;

const TYPOGRAPHY: &str = r#"
/* Typography */
.section {
    padding: 8px 24px 16px 24px;
}
.section-title {
    margin: 0 0 12px 0;
    font-size: 1.125rem;
    line-height: 24px;
    font-weight: 600;
    color: var(--text);
    border-bottom: 2px solid var(--border-light);
    padding-bottom: 6px;
}
.body-text {
    font-size: 14px;
    line-height: 22px;
    color: var(--text);
}
.notes {
    margin: 0;
    padding: 12px 16px;
    font-size: 14px;
    line-height: 22px;
    color: var(--text);
    background-color: var(--background-light);
    border-left: 3px solid var(--secondary);
}
.empty-state {
    font-size: 13px;
    font-style: italic;
    color: var(--text-light);
}
"#;

const HEADER: &str = r#"
/* Header banner */
.header-banner {
    width: 100%;
    background-color: var(--primary);
    border-radius: 8px 8px 0 0;
}
.header-cell {
    padding: 28px 24px 24px 24px;
}
.header-eyebrow {
    margin: 0 0 6px 0;
    font-size: 0.75rem;
    letter-spacing: 1px;
    text-transform: uppercase;
    color: var(--background-light);
}
.header-title {
    margin: 0;
    font-size: 1.625rem;
    line-height: 32px;
    font-weight: 700;
    color: var(--background);
}
.header-subtitle {
    margin: 6px 0 0 0;
    font-size: 14px;
    color: var(--border-light);
}
"#;

const METRICS: &str = r#"
/* Metric cards */
.metric-grid {
    width: 100%;
    padding: 16px 16px 0 16px;
}
.metric-cell {
    padding: 8px;
    vertical-align: top;
}
.metric-card {
    padding: 16px;
    background-color: var(--background);
    border: 1px solid var(--border);
    border-top: 4px solid var(--secondary);
    border-radius: 6px;
    box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
    transition: box-shadow 0.2s ease-in-out;
}
.metric-on-track {
    border-top: 4px solid var(--success);
}
.metric-near-goal {
    border-top: 4px solid var(--warning);
}
.metric-below-goal {
    border-top: 4px solid var(--danger);
}
.metric-label {
    margin: 0 0 4px 0;
    font-size: 12px;
    letter-spacing: 0.5px;
    text-transform: uppercase;
    color: var(--text-light);
}
.metric-value {
    margin: 0;
    font-size: 1.5rem;
    line-height: 30px;
    font-weight: 700;
    color: var(--text);
}
.metric-subtitle {
    margin: 4px 0 10px 0;
    font-size: 13px;
    color: var(--text-light);
}
.progress-track {
    height: 6px;
    background-color: var(--border-light);
    border-radius: 3px;
    overflow: hidden;
}
.progress-bar {
    height: 6px;
    background-color: var(--secondary);
    border-radius: 3px;
}
.progress-on-track {
    background-color: var(--success);
}
.progress-near-goal {
    background-color: var(--warning);
}
.progress-below-goal {
    background-color: var(--danger);
}
"#;

const TABLES: &str = r#"
/* Data tables */
.data-table {
    width: 100%;
    border: 1px solid var(--border);
    font-size: 13px;
}
.table-header {
    padding: 10px 12px;
    font-size: 11px;
    font-weight: 600;
    letter-spacing: 0.5px;
    text-transform: uppercase;
    color: var(--text-light);
    background-color: var(--background-light);
    border-bottom: 1px solid var(--border);
}
.table-cell {
    padding: 10px 12px;
    color: var(--text);
    border-bottom: 1px solid var(--border-light);
}
.table-cell-alt {
    background-color: var(--background-light);
}
.table-cell-num {
    text-align: right;
    white-space: nowrap;
}
.provider-name {
    font-weight: 600;
    color: var(--text);
}
.provider-role {
    font-size: 12px;
    color: var(--text-light);
}
.status-pill {
    display: inline-block;
    padding: 2px 8px;
    font-size: 11px;
    font-weight: 600;
    border-radius: 10px;
    color: var(--background);
    background-color: var(--secondary);
}
.status-on-track {
    background-color: var(--success);
}
.status-near-goal {
    background-color: var(--warning);
}
.status-below-goal {
    background-color: var(--danger);
}
"#;

const ALERT_LIST: &str = r#"
/* Inline alert list */
.alert-list {
    width: 100%;
}
.alert-item {
    padding: 10px 12px;
    margin-bottom: 8px;
    background-color: var(--background-light);
    border-left: 4px solid var(--warning);
}
.alert-item-title {
    margin: 0 0 2px 0;
    font-size: 13px;
    font-weight: 600;
    color: var(--text);
}
.alert-item-message {
    margin: 0;
    font-size: 13px;
    color: var(--text-light);
}
"#;

const KPIS: &str = r#"
/* Executive KPIs */
.kpi-grid {
    display: grid;
    width: 100%;
    padding: 16px 16px 0 16px;
}
.kpi-cell {
    padding: 8px;
    vertical-align: top;
}
.kpi-card {
    padding: 16px;
    text-align: center;
    background-color: var(--background-light);
    border: 1px solid var(--border);
    border-radius: 6px;
}
.kpi-label {
    margin: 0 0 6px 0;
    font-size: 11px;
    letter-spacing: 0.5px;
    text-transform: uppercase;
    color: var(--text-light);
}
.kpi-value {
    margin: 0;
    font-size: 1.375rem;
    line-height: 28px;
    font-weight: 700;
    color: var(--primary);
}
.kpi-change {
    margin: 6px 0 0 0;
    font-size: 12px;
    font-weight: 600;
}
.change-up {
    color: var(--success);
}
.change-down {
    color: var(--danger);
}
.change-flat {
    color: var(--text-light);
}
.highlight-list {
    margin: 0;
    padding: 0 0 0 18px;
}
.highlight-item {
    margin: 0 0 6px 0;
    font-size: 14px;
    line-height: 21px;
    color: var(--text);
}
"#;

const UPDATES: &str = r#"
/* Provider updates */
.update-list {
    width: 100%;
}
.update-item {
    padding: 12px 16px;
    margin-bottom: 10px;
    border: 1px solid var(--border);
    border-left: 4px solid var(--accent);
    border-radius: 4px;
}
.update-title {
    margin: 0 0 4px 0;
    font-size: 15px;
    font-weight: 600;
    color: var(--text);
}
.update-detail {
    margin: 0;
    font-size: 14px;
    line-height: 21px;
    color: var(--text-light);
}
.effective-date {
    display: inline-block;
    margin-top: 8px;
    padding: 4px 10px;
    font-size: 12px;
    color: var(--primary);
    background-color: var(--background-light);
    border-radius: 12px;
}
"#;

const ALERTS: &str = r#"
/* Alert notification */
.alert-banner {
    width: 100%;
    background-color: var(--background-light);
    border-left: 6px solid var(--primary);
    border-radius: 8px 8px 0 0;
}
.alert-immediate {
    background-color: #fdecea;
    border-left: 6px solid var(--danger);
}
.alert-high {
    background-color: #fff4e5;
    border-left: 6px solid var(--warning);
}
.alert-normal {
    border-left: 6px solid var(--primary);
}
.alert-cell {
    padding: 24px;
}
.alert-eyebrow {
    margin: 0 0 8px 0;
    font-size: 12px;
    font-weight: 700;
    letter-spacing: 0.5px;
    text-transform: uppercase;
    color: var(--text);
}
.alert-icon {
    display: inline-block;
    font-size: 16px;
    transform: translateY(1px);
    animation: pulse 2s infinite;
}
.alert-title {
    margin: 0;
    font-size: 1.375rem;
    line-height: 28px;
    font-weight: 700;
    color: var(--text);
}
.alert-type {
    margin: 6px 0 0 0;
    font-size: 13px;
    color: var(--text-light);
}
.alert-body {
    padding: 20px 24px;
}
.alert-message {
    margin: 0 0 12px 0;
    font-size: 15px;
    line-height: 23px;
    color: var(--text);
}
.detail-list {
    margin: 0 0 16px 0;
    padding: 0 0 0 18px;
}
.detail-item {
    margin: 0 0 4px 0;
    font-size: 14px;
    line-height: 21px;
    color: var(--text);
}
.escalation-box {
    width: 100%;
    background-color: var(--background-light);
    border: 1px solid var(--danger);
    border-radius: 6px;
}
.escalation-cell {
    padding: 14px 16px;
}
.escalation-title {
    margin: 0 0 4px 0;
    font-size: 13px;
    font-weight: 700;
    text-transform: uppercase;
    color: var(--danger);
}
.escalation-text {
    margin: 0;
    font-size: 14px;
    line-height: 21px;
    color: var(--text);
}
.escalation-link {
    color: var(--danger);
    font-weight: 600;
}
"#;

const BUTTONS: &str = r#"
/* Buttons */
.button-table {
    margin: 8px 0 16px 0;
}
.button-cell {
    background-color: var(--primary);
    border-radius: 6px;
}
.button {
    display: inline-block;
    padding: 12px 22px;
    font-size: 14px;
    font-weight: 600;
    color: var(--background);
    text-decoration: none;
    border-radius: 6px;
    transition: background-color 0.15s ease;
}
"#;

const SIGNATURE: &str = r#"
/* Signature */
.signature {
    width: 100%;
    border-top: 1px solid var(--border-light);
}
.signature-cell {
    padding: 20px 24px 24px 24px;
}
.signature-text {
    margin: 0 0 4px 0;
    font-size: 14px;
    color: var(--text);
}
.signature-line {
    margin: 0;
    font-size: 13px;
    line-height: 19px;
    color: var(--text-light);
}
"#;

const UTILITIES: &str = r#"
/* Utilities */
.text-center {
    text-align: center !important;
}
.text-right {
    text-align: right !important;
}
.text-muted {
    color: var(--text-light) !important;
}
.font-bold {
    font-weight: 700 !important;
}
.mt-0 {
    margin-top: 0 !important;
}
.mb-0 {
    margin-bottom: 0 !important;
}
.spacer {
    height: 16px;
    line-height: 16px;
    font-size: 16px;
}
"#;

const RESPONSIVE: &str = r#"
/* Small screens */
@media only screen and (max-width: 620px) {
    .email-container { width: 100% !important; }
    .metric-cell, .kpi-cell { display: block !important; width: 100% !important; }
    .header-title { font-size: 22px !important; line-height: 28px !important; }
}
@media (prefers-color-scheme: dark) {
    .email-body, .email-wrapper { background-color: #111111 !important; }
}
"#;

/// Named style sheet fragments, in composition order.
pub const FRAGMENTS: &[(&str, &str)] = &[
    ("reset", BASE_RESET),
    ("layout", LAYOUT),
    ("typography", TYPOGRAPHY),
    ("header", HEADER),
    ("metrics", METRICS),
    ("tables", TABLES),
    ("alert-list", ALERT_LIST),
    ("kpis", KPIS),
    ("updates", UPDATES),
    ("alerts", ALERTS),
    ("buttons", BUTTONS),
    ("signature", SIGNATURE),
    ("utilities", UTILITIES),
    ("responsive", RESPONSIVE),
];

const SHARED: &[&str] = &["reset", "layout", "typography", "header", "signature", "utilities"];

/// Fragments each document type needs on top of the shared set.
pub fn components(document: DocumentType) -> &'static [&'static str] {
    match document {
        DocumentType::PracticeReport => &["metrics", "tables", "alert-list"],
        DocumentType::ExecutiveSummary => &["kpis", "tables"],
        DocumentType::ProviderUpdate => &["updates"],
        DocumentType::AlertNotification => &["alerts", "buttons"],
    }
}

/// Per-theme accents appended after the components.
fn theme_accent(theme: &str) -> Option<&'static str> {
    match theme {
        "executive" => Some(
            ".header-banner { border-bottom: 4px solid var(--accent); }\n\
             .kpi-value { color: var(--text); }\n",
        ),
        "baytown" => Some(".section-title { border-bottom: 2px solid var(--accent); }\n"),
        "humble" => Some(".metric-card { border-radius: 10px; }\n"),
        _ => None,
    }
}

/// Returns a fragment by name.
pub fn fragment(name: &str) -> Option<&'static str> {
    FRAGMENTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, css)| *css)
}

/// Concatenates the style sheet for a document type and theme.
///
/// Fragment order follows [`FRAGMENTS`] regardless of which set requested
/// them, so later fragments can refine earlier ones predictably. Media
/// queries always come last.
pub fn compose(document: DocumentType, theme: &str) -> String {
    let wanted = components(document);
    let mut css = String::new();
    for (name, body) in FRAGMENTS {
        if *name == "responsive" {
            continue;
        }
        if SHARED.contains(name) || wanted.contains(name) {
            css.push_str(body);
        }
    }
    if let Some(accent) = theme_accent(theme) {
        css.push_str("\n/* Theme accent */\n");
        css.push_str(accent);
    }
    css.push_str(RESPONSIVE);
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_component_name_exists() {
        for doc in DocumentType::ALL {
            for name in components(doc) {
                assert!(fragment(name).is_some(), "missing fragment {}", name);
            }
        }
        for name in SHARED {
            assert!(fragment(name).is_some(), "missing fragment {}", name);
        }
    }

    #[test]
    fn test_compose_includes_only_requested_components() {
        let css = compose(DocumentType::ProviderUpdate, "default");
        assert!(css.contains(".update-item"));
        assert!(css.contains(".signature"));
        assert!(!css.contains(".metric-card"));
        assert!(!css.contains(".alert-banner"));
    }

    #[test]
    fn test_media_queries_last() {
        let css = compose(DocumentType::PracticeReport, "default");
        let media = css.find("@media").unwrap();
        assert!(css[..media].contains(".metric-card"));
        assert!(!css[media..].contains("/* Utilities */"));
    }

    #[test]
    fn test_theme_accent_varies_sheet() {
        let plain = compose(DocumentType::ExecutiveSummary, "default");
        let exec = compose(DocumentType::ExecutiveSummary, "executive");
        assert_ne!(plain, exec);
        assert!(exec.contains("border-bottom: 4px solid var(--accent)"));
    }

    #[test]
    fn test_sheets_stay_under_budget() {
        for doc in DocumentType::ALL {
            assert!(compose(doc, "executive").len() < 50 * 1024);
        }
    }
}
