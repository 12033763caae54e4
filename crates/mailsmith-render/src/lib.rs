//! # Mailsmith Render - Email-Safe HTML Rendering
//!
//! `mailsmith-render` turns structured business data (practice performance
//! reports, executive summaries, provider updates, alert notifications) into
//! self-contained HTML email documents that hold up in standards-lagging mail
//! clients.
//!
//! ## Core Concepts
//!
//! - [`Renderer`]: the pipeline. Validate, render a fragment, pick a theme,
//!   prepare the style sheet, assemble the document, inline styles.
//! - [`DocumentType`]: the closed set of document types; each has an
//!   [`EmailTemplate`](template::EmailTemplate) variant with a field contract.
//! - [`Theme`] and [`ThemeRegistry`]: named palettes of thirteen color
//!   tokens, referenced from style sheets as `var(--token)`.
//! - [`escape`]: the escaping boundary every caller-supplied string crosses.
//! - [`style`]: the style sheet library, CSS parser, client fixups and size
//!   optimizer.
//! - [`markup`]: the node tree and the class-to-inline-style rewriter.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailsmith_render::{DocumentType, RenderConfig, RenderRequest, Renderer};
//! use serde_json::json;
//!
//! let renderer = Renderer::new(RenderConfig::default());
//! let data = json!({
//!     "alert_type": "Collections",
//!     "title": "Collections below goal",
//!     "message": "Collections are 18% behind plan this week.",
//!     "urgency": "immediate"
//! });
//! let request = RenderRequest::new(DocumentType::AlertNotification, data)
//!     .with_recipient("regional-ops@example.com");
//!
//! let email = renderer.render(&request).unwrap();
//! assert_eq!(email.subject, "[IMMEDIATE] Collections below goal");
//! assert!(email.html.starts_with("<!DOCTYPE html>"));
//! assert!(email.html.contains("Regional Operations Manager"));
//! ```
//!
//! ## Failure Model
//!
//! Only [`ValidationError`] stops a render, and it is raised before any
//! markup exists. An oversized style sheet is minified, then reduced to
//! critical declarations, then truncated. Markup the inliner cannot parse is
//! delivered with class styling. Both are logged through `tracing` and
//! reported in [`RenderStats`].
//!
//! ## Themes
//!
//! ```rust
//! use mailsmith_render::{Theme, ThemeRegistry};
//!
//! let registry = ThemeRegistry::builtin();
//! let theme: &Theme = registry.select(None, Some("Baytown Family Dental"), &[]);
//! assert_eq!(theme.name(), "baytown");
//! assert_eq!(theme.substitute("color: var(--missing, #000)"), "color: #000");
//! ```

pub mod config;
mod error;
pub mod escape;
pub mod markup;
pub mod renderer;
pub mod style;
pub mod template;
pub mod theme;

pub use config::{ContactConfig, FixupConfig, RenderConfig, SignatureConfig};
pub use error::{
    ConfigError, Degraded, FieldProblem, RenderError, Stage, ThemeError, ValidationError,
};
pub use renderer::{RenderRequest, RenderStats, RenderedEmail, Renderer};
pub use style::OptimizerStage;
pub use template::{DocumentType, EmailTemplate};
pub use theme::{Palette, Theme, ThemeRegistry, DEFAULT_THEME};
