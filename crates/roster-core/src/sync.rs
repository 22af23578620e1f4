//! Load-and-repaint step shared by every path that refreshes the roster

use crate::projector::project;
use crate::store::{LoadOutcome, LoadTicket, RosterStore};
use crate::surface::RenderSurface;
use crate::types::Filter;
use std::sync::Arc;

/// Refreshes the roster through the store and repaints the surface
#[derive(Clone)]
pub struct RosterSync {
    store: Arc<RosterStore>,
    surface: Arc<dyn RenderSurface>,
}

impl RosterSync {
    #[must_use]
    pub fn new(store: Arc<RosterStore>, surface: Arc<dyn RenderSurface>) -> Self {
        Self { store, surface }
    }

    /// Complete the load for `ticket` and repaint from whatever the store
    /// now holds
    ///
    /// A superseded load does not repaint; the load that superseded it will.
    pub async fn resync(&self, ticket: LoadTicket, filter: Filter) -> LoadOutcome {
        let outcome = self.store.complete(ticket, filter).await;
        if !matches!(outcome, LoadOutcome::Superseded) {
            self.surface.render_roster(&project(&self.store.view()));
        }
        outcome
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<RosterStore> {
        &self.store
    }
}

impl std::fmt::Debug for RosterSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterSync")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
