//! Executive summary: headline KPIs, highlights and a per-location table.

use serde_json::{json, Value};

use super::format::{
    format_change, format_currency, format_number, format_percent, format_percent_points,
    percent_of,
};
use super::validate::root;
use super::{text_field, DocumentType, EmailTemplate, FragmentContext};
use crate::error::{RenderError, ValidationError};

const KPIS_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KpiFormat {
    Currency,
    Percent,
    Number,
}

impl KpiFormat {
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "currency" => Some(KpiFormat::Currency),
            "percent" => Some(KpiFormat::Percent),
            "number" => Some(KpiFormat::Number),
            _ => None,
        }
    }

    fn apply(self, value: f64) -> String {
        match self {
            KpiFormat::Currency => format_currency(value),
            KpiFormat::Percent => format_percent(value),
            KpiFormat::Number => format_number(value),
        }
    }
}

struct Kpi<'a> {
    label: &'a str,
    value: f64,
    format: KpiFormat,
    change: Option<f64>,
}

impl Kpi<'_> {
    fn context(&self) -> Value {
        let (trend, arrow) = match self.change {
            Some(c) if c > 0.0 => ("up", "\u{25B2}"),
            Some(c) if c < 0.0 => ("down", "\u{25BC}"),
            _ => ("flat", "\u{25AC}"),
        };
        json!({
            "label": self.label,
            "value": self.format.apply(self.value),
            "change": self.change.map(format_change),
            "trend": trend,
            "arrow": arrow,
        })
    }
}

struct Location<'a> {
    name: &'a str,
    production: f64,
    collections: f64,
}

struct Summary<'a> {
    period: &'a str,
    kpis: Vec<Kpi<'a>>,
    highlights: Vec<&'a str>,
    locations: Vec<Location<'a>>,
    notes: Option<&'a str>,
}

fn parse(input: &Value) -> Result<Summary<'_>, ValidationError> {
    let rec = root(input)?;
    let period = rec.str("period")?;

    let items = rec.list("kpis", true)?;
    let mut kpis = Vec::with_capacity(items.len());
    for scoped in rec.records("kpis", items)? {
        let kpi = scoped.record();
        let format = match kpi.opt_str("format")? {
            None => KpiFormat::Number,
            Some(tag) => KpiFormat::parse(tag).ok_or_else(|| {
                ValidationError::wrong_type(
                    format!("{}.format", scoped.path()),
                    "one of currency, percent, number",
                )
            })?,
        };
        kpis.push(Kpi {
            label: kpi.str("label")?,
            value: kpi.number("value")?,
            format,
            change: kpi.opt_number("change")?,
        });
    }

    let items = rec.opt_list("highlights")?;
    let highlights = rec.strings("highlights", items)?;

    let items = rec.opt_list("locations")?;
    let mut locations = Vec::with_capacity(items.len());
    for scoped in rec.records("locations", items)? {
        let location = scoped.record();
        locations.push(Location {
            name: location.str("name")?,
            production: location.non_negative("production")?,
            collections: location.non_negative("collections")?,
        });
    }

    Ok(Summary {
        period,
        kpis,
        highlights,
        locations,
        notes: rec.opt_str("notes")?,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutiveSummary;

impl EmailTemplate for ExecutiveSummary {
    fn document_type(&self) -> DocumentType {
        DocumentType::ExecutiveSummary
    }

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        parse(input).map(|_| ())
    }

    fn render_fragment(&self, input: &Value, ctx: &FragmentContext<'_>) -> Result<String, RenderError> {
        let summary = parse(input)?;

        let kpi_rows: Vec<Value> = summary
            .kpis
            .chunks(KPIS_PER_ROW)
            .map(|row| Value::Array(row.iter().map(Kpi::context).collect()))
            .collect();
        let locations: Vec<Value> = summary
            .locations
            .iter()
            .enumerate()
            .map(|(i, l)| {
                json!({
                    "name": l.name,
                    "production": format_currency(l.production),
                    "collections": format_currency(l.collections),
                    "rate": percent_of(l.collections, l.production).map(format_percent_points),
                    "alt": i % 2 == 1,
                })
            })
            .collect();

        let context = json!({
            "period": summary.period,
            "kpi_rows": kpi_rows,
            "kpi_count": summary.kpis.len(),
            "highlights": summary.highlights,
            "locations": locations,
            "location_count": summary.locations.len(),
            "notes": summary.notes,
        });
        let body = ctx.render(DocumentType::ExecutiveSummary.name(), &context)?;
        ctx.finish(body, input)
    }

    fn subject(&self, input: &Value) -> String {
        format!("Executive Summary: {}", text_field(input, "period"))
    }
}
