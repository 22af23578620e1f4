//! Sync controller
//!
//! The single object a front end constructs at startup. It wires the
//! notification channel, snapshot store, filter controller, dispatcher and
//! report renderer around one service and one rendering surface, and owns
//! the startup sequence:
//! - load categories and populate the filter selector once
//! - load the unfiltered roster
//!
//! Instances share nothing, so tests build one per case.

use crate::config::ClientConfig;
use crate::dispatcher::{Action, ActionDispatcher, LifecycleOutcome};
use crate::error::ServiceError;
use crate::filter::FilterController;
use crate::notification::NotificationChannel;
use crate::projector::{project, project_categories, RosterPresentation};
use crate::report::{AttendanceOutcome, ReportOutcome, ReportRenderer};
use crate::service::RosterService;
use crate::store::{LoadOutcome, RosterStore, RosterView};
use crate::surface::RenderSurface;
use crate::sync::RosterSync;
use crate::types::Filter;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What startup did
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOutcome {
    /// New categories, or why the category read failed
    pub categories: Result<usize, ServiceError>,
    /// The initial unfiltered load
    pub roster: LoadOutcome,
}

/// Front-end facing controller
#[derive(Clone)]
pub struct SyncController {
    config: ClientConfig,
    store: Arc<RosterStore>,
    surface: Arc<dyn RenderSurface>,
    notifications: NotificationChannel,
    filter: FilterController,
    dispatcher: ActionDispatcher,
    reports: ReportRenderer,
}

impl SyncController {
    /// Wire a controller around `service` and `surface`
    #[must_use]
    pub fn new(
        config: ClientConfig,
        service: Arc<dyn RosterService>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        let notifications = NotificationChannel::new(config.notification_ttl());
        let store = Arc::new(RosterStore::new(Arc::clone(&service)));
        let sync = RosterSync::new(Arc::clone(&store), Arc::clone(&surface));
        let filter = FilterController::new(sync);
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&service),
            notifications.clone(),
            filter.clone(),
            Arc::clone(&surface),
        );
        let reports = ReportRenderer::new(service, Arc::clone(&surface));

        Self {
            config,
            store,
            surface,
            notifications,
            filter,
            dispatcher,
            reports,
        }
    }

    /// Load categories, then the unfiltered roster
    ///
    /// A failed category read is logged and leaves the selector with only
    /// the sentinel; the roster load proceeds either way.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        tracing::info!(base_url = %self.config.base_url, "bootstrapping roster");

        let categories = self.store.load_categories().await;
        let options = project_categories(&self.store.catalog(), &self.filter.current());
        self.surface.render_categories(&options);

        let (_, roster) = self.filter.reload().await;
        BootstrapOutcome { categories, roster }
    }

    /// Change the category filter
    ///
    /// Returns `None` when `filter` is already selected.
    pub async fn select_filter(&self, filter: Filter) -> Option<LoadOutcome> {
        self.filter.select(filter).await
    }

    /// Reload the roster with the current filter
    pub async fn refresh(&self) -> (Filter, LoadOutcome) {
        self.filter.reload().await
    }

    /// Run an action lifecycle inline
    pub async fn submit(&self, action: Action) -> LifecycleOutcome {
        self.dispatcher.dispatch(action).await
    }

    /// Enqueue an action lifecycle as its own task
    pub fn spawn(&self, action: Action) -> JoinHandle<LifecycleOutcome> {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move { dispatcher.dispatch(action).await })
    }

    /// Query a student report
    pub async fn request_report(&self, email: &str) -> ReportOutcome {
        self.reports.request(email).await
    }

    /// Query attendance for an activity
    pub async fn lookup_attendance(&self, activity: &str, email: Option<&str>) -> AttendanceOutcome {
        self.reports.attendance(activity, email).await
    }

    /// Project what the roster area shows now
    #[must_use]
    pub fn presentation(&self) -> RosterPresentation {
        project(&self.store.view())
    }

    /// Current roster state and catalog
    #[must_use]
    pub fn view(&self) -> RosterView {
        self.store.view()
    }

    /// Current filter selection
    #[must_use]
    pub fn current_filter(&self) -> Filter {
        self.filter.current()
    }

    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<RosterStore> {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cancel pending dismissal timers and hide every surface
    ///
    /// In-flight remote calls are not cancelled; they run to completion.
    pub fn shutdown(&self) {
        self.notifications.dismiss_all();
        tracing::debug!("controller shut down");
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("filter", &self.filter.current())
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}
