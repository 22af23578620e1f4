//! Action dispatcher
//!
//! Every mutating action runs the same lifecycle:
//! 1. issue exactly one remote call and await its single response
//! 2. on success, notify on the action's surface, clear its form where the
//!    action calls for it, and reload the roster with the filter active
//!    at reload time (signup and unregister only)
//! 3. on rejection, notify the server's reason (or the generic fallback)
//! 4. on transport failure, notify a fixed "try again" message
//!
//! Identical actions in flight together are not coalesced; each runs its
//! own lifecycle to completion.

use crate::error::ServiceError;
use crate::filter::FilterController;
use crate::notification::{NotificationChannel, Severity, Surface};
use crate::service::RosterService;
use crate::store::LoadOutcome;
use crate::surface::{FormKind, RenderSurface};
use crate::types::{ActionReply, Filter, LifecycleId};
use std::sync::Arc;

/// A user intent that mutates server state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Signup {
        activity: String,
        email: String,
    },
    Unregister {
        activity: String,
        email: String,
    },
    RecordAttendance {
        activity: String,
        email: String,
        date: String,
    },
}

/// Action discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Signup,
    Unregister,
    RecordAttendance,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Unregister => "unregister",
            Self::RecordAttendance => "record_attendance",
        }
    }

    /// Surface that carries this action's feedback
    #[must_use]
    pub fn surface(self) -> Surface {
        match self {
            Self::Signup | Self::Unregister => Surface::Signup,
            Self::RecordAttendance => Surface::Attendance,
        }
    }

    /// Whether success changes the roster
    #[must_use]
    pub fn reloads_roster(self) -> bool {
        matches!(self, Self::Signup | Self::Unregister)
    }

    /// Form reset on success
    #[must_use]
    pub fn clears_form(self) -> Option<FormKind> {
        match self {
            Self::Signup => Some(FormKind::Signup),
            Self::Unregister => None,
            Self::RecordAttendance => Some(FormKind::Attendance),
        }
    }

    /// Message shown when no response was obtained
    #[must_use]
    pub fn transport_message(self) -> &'static str {
        match self {
            Self::Signup => "Failed to sign up. Please try again.",
            Self::Unregister => "Failed to unregister. Please try again.",
            Self::RecordAttendance => "Failed to record attendance. Please try again.",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    /// Signup action
    pub fn signup(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Signup {
            activity: activity.into(),
            email: email.into(),
        }
    }

    /// Unregister action
    pub fn unregister(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Unregister {
            activity: activity.into(),
            email: email.into(),
        }
    }

    /// Attendance action
    pub fn record_attendance(
        activity: impl Into<String>,
        email: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self::RecordAttendance {
            activity: activity.into(),
            email: email.into(),
            date: date.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Signup { .. } => ActionKind::Signup,
            Self::Unregister { .. } => ActionKind::Unregister,
            Self::RecordAttendance { .. } => ActionKind::RecordAttendance,
        }
    }

    /// Target activity
    #[must_use]
    pub fn activity(&self) -> &str {
        match self {
            Self::Signup { activity, .. }
            | Self::Unregister { activity, .. }
            | Self::RecordAttendance { activity, .. } => activity,
        }
    }

    /// Student email
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Signup { email, .. }
            | Self::Unregister { email, .. }
            | Self::RecordAttendance { email, .. } => email,
        }
    }
}

/// How a lifecycle ended
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleOutcome {
    pub id: LifecycleId,
    pub kind: ActionKind,
    pub surface: Surface,
    pub severity: Severity,
    /// Text that was shown
    pub message: String,
    /// Filter the roster was reloaded with, and how that load ended
    pub reload: Option<(Filter, LoadOutcome)>,
    pub form_cleared: Option<FormKind>,
}

impl LifecycleOutcome {
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.severity == Severity::Success
    }
}

/// Drives actions through the lifecycle
///
/// Holds only handles to the shared rendezvous points; no per-call state
/// outlives a call.
#[derive(Clone)]
pub struct ActionDispatcher {
    service: Arc<dyn RosterService>,
    notifications: NotificationChannel,
    filter: FilterController,
    surface: Arc<dyn RenderSurface>,
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(
        service: Arc<dyn RosterService>,
        notifications: NotificationChannel,
        filter: FilterController,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        Self {
            service,
            notifications,
            filter,
            surface,
        }
    }

    /// Run one lifecycle to completion
    pub async fn dispatch(&self, action: Action) -> LifecycleOutcome {
        let id = LifecycleId::new();
        let kind = action.kind();
        let surface = kind.surface();
        tracing::debug!(%id, %kind, activity = action.activity(), "lifecycle started");

        let result = self.call(&action).await;

        match result {
            Ok(reply) => {
                self.notifications
                    .show(surface, reply.message.clone(), Severity::Success);

                let form_cleared = kind.clears_form();
                if let Some(form) = form_cleared {
                    self.surface.clear_form(form);
                }

                let reload = if kind.reloads_roster() {
                    Some(self.filter.reload().await)
                } else {
                    None
                };

                tracing::info!(%id, %kind, activity = action.activity(), "lifecycle succeeded");
                LifecycleOutcome {
                    id,
                    kind,
                    surface,
                    severity: Severity::Success,
                    message: reply.message,
                    reload,
                    form_cleared,
                }
            }
            Err(error) => {
                if error.is_transport() {
                    tracing::error!(%id, %kind, %error, "lifecycle transport failure");
                } else {
                    tracing::warn!(%id, %kind, %error, "lifecycle rejected");
                }
                let message = error.user_message(kind.transport_message()).to_string();
                self.notifications
                    .show(surface, message.clone(), Severity::Error);
                LifecycleOutcome {
                    id,
                    kind,
                    surface,
                    severity: Severity::Error,
                    message,
                    reload: None,
                    form_cleared: None,
                }
            }
        }
    }

    async fn call(&self, action: &Action) -> Result<ActionReply, ServiceError> {
        match action {
            Action::Signup { activity, email } => self.service.signup(activity, email).await,
            Action::Unregister { activity, email } => {
                self.service.unregister(activity, email).await
            }
            Action::RecordAttendance {
                activity,
                email,
                date,
            } => self.service.record_attendance(activity, email, date).await,
        }
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("filter", &self.filter.current())
            .finish_non_exhaustive()
    }
}
