//! Remote activity service seam
//!
//! The engine never talks HTTP itself; it drives a [`RosterService`].
//! Every method issues exactly one remote call and resolves exactly once.

use crate::error::ServiceError;
use crate::types::{
    ActionReply, ActivityMap, AttendanceLookup, Category, StudentActivityReport,
};
use async_trait::async_trait;

/// Remote activity service
#[async_trait]
pub trait RosterService: Send + Sync {
    /// Unfiltered listing
    async fn list_activities(&self) -> Result<ActivityMap, ServiceError>;

    /// Listing scoped to one category
    async fn filter_activities(&self, category: &Category) -> Result<ActivityMap, ServiceError>;

    /// Every known category tag
    async fn categories(&self) -> Result<Vec<Category>, ServiceError>;

    /// Enroll `email` in `activity`
    async fn signup(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError>;

    /// Remove `email` from `activity`
    async fn unregister(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError>;

    /// Append an attendance record
    async fn record_attendance(
        &self,
        activity: &str,
        email: &str,
        date: &str,
    ) -> Result<ActionReply, ServiceError>;

    /// Aggregate report for one student
    async fn activity_report(&self, email: &str) -> Result<StudentActivityReport, ServiceError>;

    /// Attendance of an activity, or of one student within it
    async fn activity_attendance(
        &self,
        activity: &str,
        email: Option<&str>,
    ) -> Result<AttendanceLookup, ServiceError>;
}
