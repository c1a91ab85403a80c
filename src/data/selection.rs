use std::sync::Arc;

use super::{DetailCache, DetailRecord};

/// Record shown in the detail view
#[derive(Clone, Debug, Default)]
pub struct Selection {
    active: Option<Arc<DetailRecord>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit choice, kept until the next `select`
    pub fn select(&mut self, record: Arc<DetailRecord>) {
        tracing::debug!(symbol = %record.symbol, "detail selected");
        self.active = Some(record);
    }

    pub fn current(&self) -> Option<Arc<DetailRecord>> {
        self.active.clone()
    }

    /// Fall back to the earliest cached record when nothing valid is selected.
    ///
    /// The cache only grows at its end, so an established default never moves
    /// when more records arrive.
    pub fn default_if_unset(&mut self, cache: &DetailCache) -> Option<Arc<DetailRecord>> {
        if let Some(active) = &self.active {
            if cache.contains(&active.symbol) {
                return Some(Arc::clone(active));
            }
        }

        self.active = cache.first();
        if let Some(record) = &self.active {
            tracing::debug!(symbol = %record.symbol, "default detail selected");
        }
        self.active.clone()
    }
}
