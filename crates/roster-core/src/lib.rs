//! Roster Core - synchronization and feedback engine
//!
//! Keeps a rendering surface consistent with a remote activity roster:
//! - Re-fetches authoritative state, one atomic snapshot per read
//! - Maps the category filter to the right fetch
//! - Drives signup, unregister and attendance through one lifecycle
//! - Shows each outcome as a transient, self-dismissing notification
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_core::{Action, ClientConfig, SyncController};
//!
//! # async fn example(service: std::sync::Arc<dyn roster_core::RosterService>,
//! #                  surface: std::sync::Arc<dyn roster_core::RenderSurface>) {
//! let controller = SyncController::new(ClientConfig::new(), service, surface);
//! controller.bootstrap().await;
//!
//! let outcome = controller
//!     .submit(Action::signup("Chess Club", "a@x.com"))
//!     .await;
//! println!("{}", outcome.message);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod notification;
pub mod projector;
pub mod report;
pub mod service;
pub mod store;
pub mod surface;
pub mod sync;
pub mod types;

// Re-exports for convenience
pub use config::ClientConfig;
pub use controller::{BootstrapOutcome, SyncController};
pub use dispatcher::{Action, ActionDispatcher, ActionKind, LifecycleOutcome};
pub use error::{ConfigError, ServiceError, GENERIC_REASON};
pub use filter::FilterController;
pub use notification::{Notification, NotificationChannel, Severity, Surface};
pub use projector::{
    ActivityCard, ParticipantRow, ReportLine, ReportView, RosterBody, RosterPresentation,
    SelectOption,
};
pub use report::{AttendanceOutcome, ReportOutcome, ReportRenderer};
pub use service::RosterService;
pub use store::{
    Catalog, LoadOutcome, LoadTicket, RosterSnapshot, RosterState, RosterStore, RosterView,
};
pub use surface::{FormKind, RenderSurface};
pub use sync::RosterSync;
pub use types::{
    ActionReply, Activity, ActivityAttendance, ActivityMap, AttendanceLookup, Category, Filter,
    LifecycleId, ReportEntry, StudentActivityReport, StudentAttendance,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for front ends
    pub use crate::{
        Action, ClientConfig, Filter, FormKind, NotificationChannel, RenderSurface,
        RosterPresentation, RosterService, Severity, Surface, SyncController,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
