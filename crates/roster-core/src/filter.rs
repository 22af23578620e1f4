//! Filter controller
//!
//! Holds the one category selection (initially "All"). A change of value
//! triggers exactly one roster reload; re-selecting the current value does
//! nothing. The category selector itself is never re-derived here.

use crate::store::LoadOutcome;
use crate::sync::RosterSync;
use crate::types::Filter;
use parking_lot::Mutex;
use std::sync::Arc;

/// Owner of the current filter selection
#[derive(Debug, Clone)]
pub struct FilterController {
    current: Arc<Mutex<Filter>>,
    sync: RosterSync,
}

impl FilterController {
    /// Create controller starting at "All"
    #[must_use]
    pub fn new(sync: RosterSync) -> Self {
        Self {
            current: Arc::new(Mutex::new(Filter::All)),
            sync,
        }
    }

    /// Current selection
    #[must_use]
    pub fn current(&self) -> Filter {
        self.current.lock().clone()
    }

    /// Change the selection
    ///
    /// Returns `None` when `filter` is already selected, otherwise the
    /// outcome of the single reload it triggered.
    pub async fn select(&self, filter: Filter) -> Option<LoadOutcome> {
        let ticket = {
            let mut current = self.current.lock();
            if *current == filter {
                tracing::debug!(%filter, "filter unchanged");
                return None;
            }
            tracing::info!(from = %*current, to = %filter, "filter changed");
            *current = filter.clone();
            self.sync.store().issue()
        };
        Some(self.sync.resync(ticket, filter).await)
    }

    /// Reload with the selection active now; returns the filter used
    pub async fn reload(&self) -> (Filter, LoadOutcome) {
        let (filter, ticket) = {
            let current = self.current.lock();
            (current.clone(), self.sync.store().issue())
        };
        let outcome = self.sync.resync(ticket, filter.clone()).await;
        (filter, outcome)
    }
}
