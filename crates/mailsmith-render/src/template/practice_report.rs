//! Practice performance report: four financial metrics against goal, a
//! provider table, optional alerts and notes.

use serde_json::{json, Value};

use super::format::{
    format_currency, format_number, format_percent, format_percent_points, normalize_percent,
    percent_of,
};
use super::validate::{root, Item, Record};
use super::{text_field, DocumentType, EmailTemplate, FragmentContext};
use crate::error::{RenderError, ValidationError};

/// Attainment band for a metric or provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    OnTrack,
    NearGoal,
    BelowGoal,
}

impl MetricStatus {
    /// Bands attainment given in points: at least 100 is on track, at least
    /// 90 is near goal.
    pub fn from_points(points: f64) -> Self {
        if points >= 100.0 {
            MetricStatus::OnTrack
        } else if points >= 90.0 {
            MetricStatus::NearGoal
        } else {
            MetricStatus::BelowGoal
        }
    }

    /// Class suffix used by the metric, progress and status styles.
    pub fn class(self) -> &'static str {
        match self {
            MetricStatus::OnTrack => "on-track",
            MetricStatus::NearGoal => "near-goal",
            MetricStatus::BelowGoal => "below-goal",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Currency,
    Count,
    Rate,
}

impl Kind {
    fn format(self, value: f64) -> String {
        match self {
            Kind::Currency => format_currency(value),
            Kind::Count => format_number(value),
            Kind::Rate => format_percent(value),
        }
    }
}

const METRICS: [(&str, &str, Kind); 4] = [
    ("production", "Production", Kind::Currency),
    ("collections", "Collections", Kind::Currency),
    ("new_patients", "New Patients", Kind::Count),
    ("case_acceptance", "Case Acceptance", Kind::Rate),
];

struct Metric {
    label: &'static str,
    kind: Kind,
    value: f64,
    goal: f64,
}

impl Metric {
    fn attainment(&self) -> Option<f64> {
        match self.kind {
            // Either scale is accepted for rates; compare like with like.
            Kind::Rate => percent_of(normalize_percent(self.value), normalize_percent(self.goal)),
            _ => percent_of(self.value, self.goal),
        }
    }

    fn context(&self) -> Value {
        let attainment = self.attainment();
        let status = attainment.map_or(MetricStatus::OnTrack, MetricStatus::from_points);
        let bar_width = attainment.map_or(100.0, |p| p.clamp(0.0, 100.0)).round() as u32;
        json!({
            "label": self.label,
            "value": self.kind.format(self.value),
            "goal": self.kind.format(self.goal),
            "attainment": attainment.map_or_else(|| "n/a".to_string(), format_percent_points),
            "status": status.class(),
            "bar_width": bar_width,
        })
    }
}

struct Provider<'a> {
    name: &'a str,
    role: Option<&'a str>,
    production: Option<f64>,
    goal: Option<f64>,
}

struct Alert<'a> {
    title: Option<&'a str>,
    message: &'a str,
}

struct Report<'a> {
    location: &'a str,
    period: Option<&'a str>,
    metrics: Vec<Metric>,
    providers: Vec<Provider<'a>>,
    alerts: Vec<Alert<'a>>,
    notes: Option<&'a str>,
}

fn parse_alerts<'a>(rec: &Record<'a, '_>) -> Result<Vec<Alert<'a>>, ValidationError> {
    let items = rec.opt_list("alerts")?;
    let mut alerts = Vec::with_capacity(items.len());
    for item in rec.items("alerts", items)? {
        alerts.push(match item {
            Item::Text(message) => Alert {
                title: None,
                message,
            },
            Item::Record(scoped) => {
                let alert = scoped.record();
                Alert {
                    title: alert.opt_str("title")?,
                    message: alert.str("message")?,
                }
            }
        });
    }
    Ok(alerts)
}

fn parse(input: &Value) -> Result<Report<'_>, ValidationError> {
    let rec = root(input)?;
    let location = rec.str("location")?;

    let financial = rec.record("financial_data")?;
    let financial = financial.record();
    let mut metrics = Vec::with_capacity(METRICS.len());
    for (key, label, kind) in METRICS {
        let metric = financial.record(key)?;
        let metric = metric.record();
        metrics.push(Metric {
            label,
            kind,
            value: metric.number("value")?,
            goal: metric.non_negative("goal")?,
        });
    }

    let items = rec.list("providers", false)?;
    let mut providers = Vec::with_capacity(items.len());
    for scoped in rec.records("providers", items)? {
        let provider = scoped.record();
        providers.push(Provider {
            name: provider.str("name")?,
            role: provider.opt_str("role")?,
            production: provider.opt_number("production")?,
            goal: provider.opt_number("goal")?,
        });
    }

    Ok(Report {
        location,
        period: rec.opt_str("period")?,
        metrics,
        providers,
        alerts: parse_alerts(&rec)?,
        notes: rec.opt_str("notes")?,
    })
}

fn provider_context(index: usize, provider: &Provider<'_>) -> Value {
    let attainment = match (provider.production, provider.goal) {
        (Some(production), Some(goal)) => percent_of(production, goal),
        _ => None,
    };
    json!({
        "name": provider.name,
        "role": provider.role,
        "production": provider.production.map(format_currency),
        "goal": provider.goal.map(format_currency),
        "attainment": attainment.map(format_percent_points),
        "status": attainment.map(|p| MetricStatus::from_points(p).class()),
        "alt": index % 2 == 1,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PracticeReport;

impl EmailTemplate for PracticeReport {
    fn document_type(&self) -> DocumentType {
        DocumentType::PracticeReport
    }

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        parse(input).map(|_| ())
    }

    fn render_fragment(&self, input: &Value, ctx: &FragmentContext<'_>) -> Result<String, RenderError> {
        let report = parse(input)?;

        let metric_rows: Vec<Value> = report
            .metrics
            .chunks(2)
            .map(|row| Value::Array(row.iter().map(Metric::context).collect()))
            .collect();
        let providers: Vec<Value> = report
            .providers
            .iter()
            .enumerate()
            .map(|(i, p)| provider_context(i, p))
            .collect();
        let alerts: Vec<Value> = report
            .alerts
            .iter()
            .map(|a| json!({ "title": a.title, "message": a.message }))
            .collect();

        let context = json!({
            "location": report.location,
            "period": report.period,
            "metric_rows": metric_rows,
            "providers": providers,
            "alerts": alerts,
            "notes": report.notes,
        });
        let body = ctx.render(DocumentType::PracticeReport.name(), &context)?;
        ctx.finish(body, input)
    }

    fn subject(&self, input: &Value) -> String {
        format!("Practice Performance Report: {}", text_field(input, "location"))
    }
}
