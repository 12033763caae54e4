//! The render pipeline.
//!
//! [`Renderer`] turns a document type and a JSON record into a finished
//! email:
//!
//! ```text
//! validate ──► fragment ──► theme ──► sheet (cached) ──► assemble ──► inline
//! ```
//!
//! Only validation can fail a render. Style sheet and markup problems are
//! absorbed: an oversized sheet is degraded by the optimizer, and markup the
//! inliner cannot parse is sent with class styling and the full sheet in a
//! `<style>` block.
//!
//! # Example
//!
//! ```rust
//! use mailsmith_render::{DocumentType, RenderConfig, RenderRequest, Renderer};
//! use serde_json::json;
//!
//! let renderer = Renderer::new(RenderConfig::default());
//! let request = RenderRequest::new(
//!     DocumentType::ProviderUpdate,
//!     json!({
//!         "provider_name": "Dr. Alvarez",
//!         "updates": [{"title": "Schedule", "detail": "Fridays start at 7am."}]
//!     }),
//! );
//! let email = renderer.render(&request).unwrap();
//! assert_eq!(email.subject, "Provider Update: Dr. Alvarez");
//! assert!(!email.html.contains("class="));
//! ```

mod cache;
mod document;

pub use cache::{CachedSheet, StyleCache};
pub use document::{assemble, Shell, CONTENT_WIDTH, CSP_COMMENT};

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::RenderConfig;
use crate::error::{RenderError, ValidationError};
use crate::markup::inline;
use crate::style::{parse_css, OptimizerStage};
use crate::template::{
    template_for, DocumentType, FragmentContext, MiniJinjaEngine, TemplateEngine,
};
use crate::theme::{Theme, ThemeRegistry};

const FOOTER: &str =
    "You are receiving this message because you are on the practice reporting list.";

/// One render call's inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub document_type: DocumentType,
    pub data: Value,
    /// Explicit theme override. Unknown names fall through to inference.
    pub theme: Option<String>,
    /// Recipient addresses, used only for theme inference.
    pub recipients: Vec<String>,
}

impl RenderRequest {
    pub fn new(document_type: DocumentType, data: Value) -> Self {
        Self {
            document_type,
            data,
            theme: None,
            recipients: Vec::new(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }
}

/// Size and degradation figures for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Composed sheet size after fixups, before optimization.
    pub stylesheet_bytes: usize,
    pub optimized_bytes: usize,
    pub stage: OptimizerStage,
    pub document_bytes: usize,
    /// The inliner could not parse the document and left class styling.
    pub inline_degraded: bool,
    /// The document is still above `max_document_bytes`.
    pub over_budget: bool,
}

/// A finished email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub html: String,
    pub subject: String,
    /// Name of the theme that was applied.
    pub theme: String,
    pub stats: RenderStats,
}

/// Renders emails for every [`DocumentType`].
///
/// A renderer is immutable once built and can be shared across threads; the
/// only interior state is its [`StyleCache`].
pub struct Renderer {
    config: RenderConfig,
    themes: ThemeRegistry,
    engine: Box<dyn TemplateEngine>,
    cache: StyleCache,
}

impl Renderer {
    /// Builds a renderer with the built-in templates.
    ///
    /// Palettes in `config.custom_themes` are added to the built-in themes,
    /// replacing any with the same name.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_engine(config, Box::new(MiniJinjaEngine::new()))
    }

    /// Builds a renderer around a caller-supplied template engine.
    ///
    /// The engine must provide a template for every document type name plus
    /// `signature`.
    pub fn with_engine(config: RenderConfig, engine: Box<dyn TemplateEngine>) -> Self {
        let mut themes = ThemeRegistry::builtin();
        for (name, palette) in &config.custom_themes {
            themes.insert(Theme::new(name.clone(), palette.clone()));
        }
        themes.set_default(&config.default_theme);
        let cache = StyleCache::new(config.fixups, config.max_stylesheet_bytes);
        Self {
            config,
            themes,
            engine,
            cache,
        }
    }

    /// Loads a config file and builds a renderer from it.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        Ok(Self::new(RenderConfig::from_file(path)?))
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn cache(&self) -> &StyleCache {
        &self.cache
    }

    /// Checks `data` against a document type's field contract.
    pub fn validate(&self, document: DocumentType, data: &Value) -> Result<(), ValidationError> {
        template_for(document).validate(data)
    }

    /// Picks the theme a request would render with.
    pub fn select_theme(&self, request: &RenderRequest) -> &Theme {
        let location = template_for(request.document_type).location(&request.data);
        self.themes
            .select(request.theme.as_deref(), location, &request.recipients)
    }

    /// Runs the full pipeline.
    ///
    /// # Errors
    ///
    /// [`RenderError::Validation`] when `request.data` breaks the document
    /// type's contract; nothing is rendered in that case.
    /// [`RenderError::Template`] only if a template engine fails, which the
    /// built-in templates do not.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderedEmail, RenderError> {
        let document = request.document_type;
        let template = template_for(document);
        template.validate(&request.data)?;

        let ctx = FragmentContext {
            engine: self.engine.as_ref(),
            signature: &self.config.signature,
            contact: &self.config.escalation_contact,
        };
        let fragment = template.render_fragment(&request.data, &ctx)?;
        let subject = template.subject(&request.data);

        let theme = self.select_theme(request);
        let sheet = self.cache.get(document, theme.name());

        let mut inline_degraded = false;
        let html = if self.config.inline_styles {
            let rules = parse_css(&sheet.css);
            let leftover = rules.leftover_css();
            let shell = Shell {
                subject: &subject,
                css: &theme.substitute(&leftover),
                footer: FOOTER,
            };
            let inlined = inline(&assemble(&fragment, &shell), &rules, theme);
            match inlined.degraded {
                None => inlined.html,
                Some(_) => {
                    inline_degraded = true;
                    self.class_styled(&fragment, &subject, &sheet.css, theme)
                }
            }
        } else {
            self.class_styled(&fragment, &subject, &sheet.css, theme)
        };

        let document_bytes = html.len();
        let over_budget = document_bytes > self.config.max_document_bytes;
        if over_budget {
            tracing::warn!(
                document = %document,
                bytes = document_bytes,
                ceiling = self.config.max_document_bytes,
                "rendered document exceeds size ceiling"
            );
        }
        tracing::info!(
            document = %document,
            theme = theme.name(),
            bytes = document_bytes,
            stylesheet = sheet.css.len(),
            stage = %sheet.stage,
            "rendered email"
        );

        Ok(RenderedEmail {
            html,
            subject,
            theme: theme.name().to_string(),
            stats: RenderStats {
                stylesheet_bytes: sheet.source_bytes,
                optimized_bytes: sheet.css.len(),
                stage: sheet.stage,
                document_bytes,
                inline_degraded,
                over_budget,
            },
        })
    }

    /// The document with the whole sheet in `<style>` and classes left in place.
    ///
    /// Templates may write tokens into `style` attributes, so the fragment is
    /// substituted as well as the sheet.
    fn class_styled(&self, fragment: &str, subject: &str, css: &str, theme: &Theme) -> String {
        let shell = Shell {
            subject,
            css: &theme.substitute(css),
            footer: FOOTER,
        };
        assemble(&theme.substitute(fragment), &shell)
    }

    pub fn render_practice_report(&self, data: Value) -> Result<RenderedEmail, RenderError> {
        self.render(&RenderRequest::new(DocumentType::PracticeReport, data))
    }

    pub fn render_executive_summary(&self, data: Value) -> Result<RenderedEmail, RenderError> {
        self.render(&RenderRequest::new(DocumentType::ExecutiveSummary, data))
    }

    pub fn render_provider_update(&self, data: Value) -> Result<RenderedEmail, RenderError> {
        self.render(&RenderRequest::new(DocumentType::ProviderUpdate, data))
    }

    pub fn render_alert_notification(&self, data: Value) -> Result<RenderedEmail, RenderError> {
        self.render(&RenderRequest::new(DocumentType::AlertNotification, data))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("themes", &self.themes.names().collect::<Vec<_>>())
            .field("cached_sheets", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Palette;
    use serde_json::json;

    fn alert(urgency: &str) -> Value {
        json!({
            "alert_type": "Schedule",
            "title": "Hygiene schedule gap",
            "message": "Three open hygiene slots tomorrow.",
            "urgency": urgency,
            "location": "Humble"
        })
    }

    #[test]
    fn test_render_inlines_everything() {
        let email = Renderer::default()
            .render(&RenderRequest::new(DocumentType::AlertNotification, alert("high")))
            .unwrap();
        assert!(!email.html.contains("class="));
        assert!(!email.html.contains("var(--"));
        assert!(email.html.contains("style=\""));
        assert!(!email.stats.inline_degraded);
        assert!(!email.stats.over_budget);
        assert_eq!(email.stats.document_bytes, email.html.len());
    }

    #[test]
    fn test_media_queries_kept_in_style_block() {
        let email = Renderer::default().render_alert_notification(alert("normal")).unwrap();
        let style = email.html.find("<style").unwrap();
        assert!(email.html[style..].contains("@media"));
    }

    #[test]
    fn test_location_selects_theme() {
        let email = Renderer::default().render_alert_notification(alert("normal")).unwrap();
        assert_eq!(email.theme, "humble");
    }

    #[test]
    fn test_explicit_theme_wins() {
        let request = RenderRequest::new(DocumentType::AlertNotification, alert("normal"))
            .with_theme("executive");
        let email = Renderer::default().render(&request).unwrap();
        assert_eq!(email.theme, "executive");
    }

    #[test]
    fn test_validation_fails_before_rendering() {
        let renderer = Renderer::default();
        let err = renderer
            .render_alert_notification(json!({"alert_type": "x", "title": "y"}))
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "message");
        assert!(renderer.cache().is_empty());
    }

    #[test]
    fn test_no_inline_keeps_classes_and_full_sheet() {
        let config = RenderConfig {
            inline_styles: false,
            ..RenderConfig::default()
        };
        let email = Renderer::new(config).render_alert_notification(alert("immediate")).unwrap();
        assert!(email.html.contains("class=\"alert-banner alert-immediate\""));
        assert!(email.html.contains(".alert-banner{"));
        assert!(!email.html.contains("var(--"));
        let danger = ThemeRegistry::builtin().get("humble").token("danger").unwrap().to_string();
        assert!(email.html.contains(&format!("border-left-color: {};", danger)));
    }

    #[test]
    fn test_degraded_inlining_falls_back_to_class_styling() {
        let mut engine = MiniJinjaEngine::new();
        // Unclosed table: the assembled document is no longer well-formed.
        engine
            .add_template(
                "alert_notification",
                r#"<table class="alert-banner alert-{{ urgency }}" style="border-left-color: var(--{{ color }});"><tr><td>{{ title }}</td></tr>"#,
            )
            .unwrap();
        let renderer = Renderer::with_engine(RenderConfig::default(), Box::new(engine));
        let email = renderer.render_alert_notification(alert("immediate")).unwrap();

        assert!(email.stats.inline_degraded);
        assert!(email.html.contains("class=\"alert-banner alert-immediate\""));
        assert!(email.html.contains(".alert-banner{"));
        assert!(email.html.contains("Hygiene schedule gap"));
        assert!(!email.html.contains("var(--"));
    }

    #[test]
    fn test_custom_theme_registered_and_default() {
        let mut palette: Palette = ThemeRegistry::builtin().default_theme().palette().clone();
        palette.primary = "#123456".to_string();
        let mut config = RenderConfig::default();
        config.custom_themes.insert("pasadena".to_string(), palette);
        config.default_theme = "pasadena".to_string();
        let renderer = Renderer::new(config);
        assert!(renderer.themes().contains("pasadena"));

        let mut data = alert("normal");
        data["location"] = json!("Somewhere else");
        let email = renderer.render_alert_notification(data).unwrap();
        assert_eq!(email.theme, "pasadena");
        assert!(email.html.contains("#123456"));
    }

    #[test]
    fn test_small_document_ceiling_flags_over_budget() {
        let config = RenderConfig {
            max_document_bytes: 1024,
            ..RenderConfig::default()
        };
        let email = Renderer::new(config).render_alert_notification(alert("high")).unwrap();
        assert!(email.stats.over_budget);
    }

    #[test]
    fn test_renderer_is_shareable_across_threads() {
        let renderer = Renderer::default();
        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| renderer.render_alert_notification(alert("high")).unwrap().html))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(renderer.cache().len(), 1);
    }
}
