//! Style sheets: composition, parsing, client fixups and size control.
//!
//! A render's sheet moves through this module in one direction:
//!
//! ```text
//! library::compose ──► fixups::apply_fixups ──► optimizer::optimize ──► css_parser::parse_css
//!   (fragments)          (client patches)         (size ceiling)          (RuleSet for inlining)
//! ```
//!
//! The first three steps depend only on document type and theme, so the
//! renderer caches their output. Parsing happens per render.

pub mod css_parser;
pub mod fixups;
pub mod library;
pub mod optimizer;

pub use css_parser::{parse_css, parse_declarations, strip_comments, Declarations, RuleSet};
pub use fixups::apply_fixups;
pub use library::compose;
pub use optimizer::{minify, optimize, Optimized, OptimizerStage};
