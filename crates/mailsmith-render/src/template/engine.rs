//! Template engine abstraction.
//!
//! Variants never talk to MiniJinja directly: they go through the
//! [`TemplateEngine`] trait, which the renderer hands them inside a
//! [`FragmentContext`](super::FragmentContext). The default implementation,
//! [`MiniJinjaEngine`], comes preloaded with the built-in email templates and
//! the numeric formatting filters.
//!
//! Auto-escaping is switched off. Contexts are escaped as a whole before they
//! reach the engine (see [`crate::escape`]), so engine-side escaping would
//! double-encode every entity.

use minijinja::{AutoEscape, Environment, Value};

use super::format::register_filters;
use super::sources::TEMPLATES;
use crate::error::RenderError;

/// A template engine that can render named templates with data.
pub trait TemplateEngine: Send + Sync {
    /// Compiles and renders a template string in one step.
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Adds or replaces a named template.
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError>;

    /// Renders a previously registered template.
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    fn has_template(&self, name: &str) -> bool;
}

/// MiniJinja-based template engine.
///
/// # Example
///
/// ```rust
/// use mailsmith_render::template::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let out = engine.render_template("{{ amount|currency }}", &json!({"amount": 143343})).unwrap();
/// assert_eq!(out, "$143,343");
/// assert!(engine.has_template("practice_report"));
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine with the filters and built-in templates registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(false);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        register_filters(&mut env);
        for &(name, source) in TEMPLATES {
            // A broken built-in surfaces at render time as a missing template.
            if let Err(err) = env.add_template(name, source) {
                tracing::error!(template = name, error = %err, "built-in template failed to compile");
            }
        }
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let value = Value::from_serialize(data);
        Ok(self.env.render_str(template, value)?)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        let value = Value::from_serialize(data);
        Ok(tmpl.render(value)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}
