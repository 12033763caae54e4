//! Per-process cache of prepared style sheets.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::FixupConfig;
use crate::style::{apply_fixups, compose, optimize, OptimizerStage};
use crate::template::DocumentType;

/// A composed, fixed-up and optimized sheet.
///
/// Theme tokens are still `var(--token)` placeholders; they are resolved per
/// render against the selected palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSheet {
    pub css: String,
    /// Size after fixups, before optimization.
    pub source_bytes: usize,
    pub stage: OptimizerStage,
}

impl CachedSheet {
    /// Runs the full preparation pipeline for one document type and theme.
    pub fn build(
        document: DocumentType,
        theme: &str,
        fixups: &FixupConfig,
        ceiling: usize,
    ) -> Self {
        let composed = compose(document, theme);
        let fixed = apply_fixups(&composed, fixups);
        let optimized = optimize(&fixed, ceiling);
        Self {
            css: optimized.css,
            source_bytes: fixed.len(),
            stage: optimized.stage,
        }
    }
}

type Key = (DocumentType, String);

/// Append-only map from `(document type, theme name)` to a prepared sheet.
///
/// Entries never change once written. Two threads racing on the same key
/// both build the sheet and one result wins; both are identical.
#[derive(Debug)]
pub struct StyleCache {
    fixups: FixupConfig,
    ceiling: usize,
    entries: RwLock<HashMap<Key, Arc<CachedSheet>>>,
}

impl StyleCache {
    pub fn new(fixups: FixupConfig, ceiling: usize) -> Self {
        Self {
            fixups,
            ceiling,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the sheet for `document` and `theme`, building it on a miss.
    pub fn get(&self, document: DocumentType, theme: &str) -> Arc<CachedSheet> {
        let key = (document, theme.to_string());
        if let Some(sheet) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(document = %document, theme, "style cache hit");
            return Arc::clone(sheet);
        }

        tracing::debug!(document = %document, theme, "style cache miss");
        let sheet = Arc::new(CachedSheet::build(document, theme, &self.fixups, self.ceiling));
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert(sheet))
    }

    pub fn contains(&self, document: DocumentType, theme: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(document, theme.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
