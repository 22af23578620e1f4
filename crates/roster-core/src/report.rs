//! Report renderer
//!
//! One-shot, read-only queries outside the roster editing flow. Results are
//! built fresh per query and never cached. Failures use the surface's
//! blocking alert, not a notification surface.

use crate::projector::{project_report, ReportView};
use crate::service::RosterService;
use crate::surface::RenderSurface;
use crate::types::AttendanceLookup;
use std::sync::Arc;

/// Alert text when the report request got no response
pub const REPORT_TRANSPORT_MESSAGE: &str = "Failed to generate report. Please try again.";
/// Alert text when the attendance lookup got no response
pub const ATTENDANCE_TRANSPORT_MESSAGE: &str = "Failed to load attendance. Please try again.";

/// Outcome of a report query
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Rendered(ReportView),
    /// Alert text that was raised
    Alerted(String),
}

/// Outcome of an attendance lookup
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceOutcome {
    Rendered(AttendanceLookup),
    Alerted(String),
}

/// Runs report and attendance queries
#[derive(Clone)]
pub struct ReportRenderer {
    service: Arc<dyn RosterService>,
    surface: Arc<dyn RenderSurface>,
}

impl ReportRenderer {
    #[must_use]
    pub fn new(service: Arc<dyn RosterService>, surface: Arc<dyn RenderSurface>) -> Self {
        Self { service, surface }
    }

    /// Query and render the report for `email`
    pub async fn request(&self, email: &str) -> ReportOutcome {
        match self.service.activity_report(email).await {
            Ok(report) => {
                let view = project_report(&report);
                tracing::info!(
                    student = email,
                    activities = view.total_activities,
                    "report rendered"
                );
                self.surface.render_report(&view);
                ReportOutcome::Rendered(view)
            }
            Err(error) => {
                if error.is_transport() {
                    tracing::error!(student = email, %error, "report request failed");
                } else {
                    tracing::warn!(student = email, %error, "report rejected");
                }
                let message = error.user_message(REPORT_TRANSPORT_MESSAGE).to_string();
                self.surface.alert(&message);
                ReportOutcome::Alerted(message)
            }
        }
    }

    /// Query and render attendance for `activity`, optionally for one student
    pub async fn attendance(&self, activity: &str, email: Option<&str>) -> AttendanceOutcome {
        match self.service.activity_attendance(activity, email).await {
            Ok(lookup) => {
                tracing::info!(activity, student = email, "attendance rendered");
                self.surface.render_attendance(&lookup);
                AttendanceOutcome::Rendered(lookup)
            }
            Err(error) => {
                if error.is_transport() {
                    tracing::error!(activity, student = email, %error, "attendance lookup failed");
                } else {
                    tracing::warn!(activity, student = email, %error, "attendance lookup rejected");
                }
                let message = error.user_message(ATTENDANCE_TRANSPORT_MESSAGE).to_string();
                self.surface.alert(&message);
                AttendanceOutcome::Alerted(message)
            }
        }
    }
}

impl std::fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRenderer").finish_non_exhaustive()
    }
}
