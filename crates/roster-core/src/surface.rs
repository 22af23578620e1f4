//! Rendering surface seam
//!
//! The engine hands finished presentation models to a [`RenderSurface`];
//! how they become markup or terminal text is the surface's business.
//! Notifications are not routed through here: surfaces follow them with
//! [`crate::NotificationChannel::subscribe`].

use crate::projector::{ReportView, RosterPresentation, SelectOption};
use crate::types::AttendanceLookup;

/// Input forms the engine may reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Signup,
    Attendance,
}

/// Consumer of presentation output
pub trait RenderSurface: Send + Sync {
    /// Replace the roster list and activity selectors
    fn render_roster(&self, presentation: &RosterPresentation);

    /// Populate the category filter selector
    fn render_categories(&self, options: &[SelectOption]);

    /// Reset an input form
    fn clear_form(&self, form: FormKind);

    /// Show a student report
    fn render_report(&self, report: &ReportView);

    /// Show an attendance lookup
    fn render_attendance(&self, lookup: &AttendanceLookup);

    /// Blocking, out-of-band message
    fn alert(&self, message: &str);
}
