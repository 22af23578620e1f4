//! Roster snapshot store
//!
//! Owns the one roster snapshot on display. Each `load` issues a single
//! remote read and, when it completes, replaces the state wholesale:
//! - success installs a new immutable snapshot
//! - failure installs an explicit failed state; the old snapshot is dropped
//! - a response for a load that has since been superseded is discarded
//!
//! The catalog of known categories and activity names only ever grows.

use crate::error::ServiceError;
use crate::service::RosterService;
use crate::types::{ActivityMap, Category, Filter};
use indexmap::IndexSet;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The result of exactly one completed roster read
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSnapshot {
    /// Filter the read was issued with
    pub filter: Filter,
    /// Activities in response order
    pub activities: ActivityMap,
}

/// What the roster view currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RosterState {
    /// No load has completed yet
    #[default]
    Pending,
    /// Latest load succeeded
    Loaded(Arc<RosterSnapshot>),
    /// Latest load failed
    Failed {
        /// Filter the failed read was issued with
        filter: Filter,
        /// Diagnostic text, not shown verbatim
        reason: String,
    },
}

impl RosterState {
    /// Filter of the state on display (`All` before the first load)
    #[must_use]
    pub fn filter(&self) -> Filter {
        match self {
            Self::Pending => Filter::All,
            Self::Loaded(snapshot) => snapshot.filter.clone(),
            Self::Failed { filter, .. } => filter.clone(),
        }
    }

    /// Installed snapshot, if the latest load succeeded
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<RosterSnapshot>> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Additive-only set of categories and activity names seen so far
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    categories: IndexSet<Category>,
    activities: IndexSet<String>,
}

impl Catalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add categories, keeping first-seen order; returns how many were new
    pub fn extend_categories(&mut self, categories: impl IntoIterator<Item = Category>) -> usize {
        let before = self.categories.len();
        self.categories.extend(categories);
        self.categories.len() - before
    }

    /// Add activity names, keeping first-seen order; returns how many were new
    pub fn extend_activities<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) -> usize {
        let before = self.activities.len();
        self.activities.extend(names.into_iter().cloned());
        self.activities.len() - before
    }

    /// Known categories in first-seen order
    #[inline]
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Activity names seen in any load, in first-seen order
    #[inline]
    pub fn activities(&self) -> impl Iterator<Item = &String> {
        self.activities.iter()
    }

    /// Check category membership
    #[inline]
    #[must_use]
    pub fn knows_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    #[inline]
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[inline]
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }
}

/// Roster state plus catalog, read together for projection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterView {
    pub state: RosterState,
    pub catalog: Catalog,
}

/// Outcome of one `load`
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Snapshot installed
    Applied(Arc<RosterSnapshot>),
    /// Read failed; failed state installed
    Failed(ServiceError),
    /// A newer load was issued first; response discarded
    Superseded,
}

impl LoadOutcome {
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Position of one load in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Exclusive owner of the roster snapshot
pub struct RosterStore {
    service: Arc<dyn RosterService>,
    state: RwLock<RosterState>,
    catalog: Mutex<Catalog>,
    /// Ticket of the most recently issued load
    issued: AtomicU64,
}

impl RosterStore {
    /// Create store reading through `service`
    #[must_use]
    pub fn new(service: Arc<dyn RosterService>) -> Self {
        Self {
            service,
            state: RwLock::new(RosterState::Pending),
            catalog: Mutex::new(Catalog::new()),
            issued: AtomicU64::new(0),
        }
    }

    /// Issue one read for `filter` and install its result
    ///
    /// The last issued load wins: if another load was issued while this one
    /// was in flight, this response is discarded whatever it was.
    pub async fn load(&self, filter: Filter) -> LoadOutcome {
        let ticket = self.issue();
        self.complete(ticket, filter).await
    }

    /// Reserve the next load ticket without reading yet
    ///
    /// Callers that pick the filter under their own lock issue the ticket
    /// under that same lock, so ticket order matches selection order.
    #[must_use]
    pub fn issue(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Perform the read for an issued ticket and install its result
    pub async fn complete(&self, LoadTicket(ticket): LoadTicket, filter: Filter) -> LoadOutcome {
        tracing::debug!(%filter, ticket, "roster load issued");

        let result = match filter.category() {
            None => self.service.list_activities().await,
            Some(category) => self.service.filter_activities(category).await,
        };

        let mut state = self.state.write();
        if self.issued.load(Ordering::SeqCst) != ticket {
            tracing::debug!(%filter, ticket, "discarding superseded roster response");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(activities) => {
                let added = self.catalog.lock().extend_activities(activities.keys());
                tracing::info!(%filter, count = activities.len(), new_names = added, "roster loaded");
                let snapshot = Arc::new(RosterSnapshot { filter, activities });
                *state = RosterState::Loaded(Arc::clone(&snapshot));
                LoadOutcome::Applied(snapshot)
            }
            Err(error) => {
                tracing::error!(%filter, %error, "roster load failed");
                *state = RosterState::Failed {
                    filter,
                    reason: error.to_string(),
                };
                LoadOutcome::Failed(error)
            }
        }
    }

    /// Fetch the category list and merge it into the catalog
    ///
    /// # Errors
    /// The service error; the catalog is left unchanged.
    pub async fn load_categories(&self) -> Result<usize, ServiceError> {
        let categories = self.service.categories().await.map_err(|error| {
            tracing::error!(%error, "category load failed");
            error
        })?;
        let added = self.extend_categories(categories);
        tracing::info!(added, "categories loaded");
        Ok(added)
    }

    /// Add categories to the known set; never removes any
    pub fn extend_categories(&self, categories: impl IntoIterator<Item = Category>) -> usize {
        self.catalog.lock().extend_categories(categories)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RosterState {
        self.state.read().clone()
    }

    /// Current snapshot, if the latest load succeeded
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<RosterSnapshot>> {
        self.state.read().snapshot().cloned()
    }

    /// Current catalog
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.catalog.lock().clone()
    }

    /// State and catalog for projection
    #[must_use]
    pub fn view(&self) -> RosterView {
        let state = self.state.read().clone();
        let catalog = self.catalog.lock().clone();
        RosterView { state, catalog }
    }

    /// Loads issued so far
    #[inline]
    #[must_use]
    pub fn loads_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStore")
            .field("state", &*self.state.read())
            .field("loads_issued", &self.loads_issued())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_additive() {
        let mut catalog = Catalog::new();
        assert_eq!(
            catalog.extend_categories(["Sports", "Arts"].map(Category::from)),
            2
        );
        assert_eq!(
            catalog.extend_categories(["Arts", "Games"].map(Category::from)),
            1
        );
        let tags: Vec<&str> = catalog.categories().map(Category::as_str).collect();
        assert_eq!(tags, ["Sports", "Arts", "Games"]);
        assert!(catalog.knows_category(&Category::new("Games")));
    }

    #[test]
    fn catalog_activity_names_dedup() {
        let mut catalog = Catalog::new();
        let first = vec!["Chess Club".to_string(), "Gym Class".to_string()];
        let second = vec!["Gym Class".to_string()];
        catalog.extend_activities(&first);
        assert_eq!(catalog.extend_activities(&second), 0);
        assert_eq!(catalog.activity_count(), 2);
    }

    #[test]
    fn state_filter_defaults_to_all() {
        assert_eq!(RosterState::Pending.filter(), Filter::All);
        let failed = RosterState::Failed {
            filter: Filter::from_selection("Arts"),
            reason: "boom".into(),
        };
        assert_eq!(failed.filter().as_str(), "Arts");
        assert!(failed.snapshot().is_none());
    }
}
