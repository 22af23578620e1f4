//! Core data model
//!
//! Wire shapes for the activity service plus the client-side notions built
//! on top of them:
//! - Activities, keyed by name in response order
//! - Categories and the filter selection
//! - Per-student reports and attendance lookups

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Activities keyed by name, in the order the server returned them
pub type ActivityMap = IndexMap<String, Activity>;

/// Server-defined category tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category tag
    #[inline]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Tag text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Roster filter: the "All" sentinel or one category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Unfiltered listing
    #[default]
    All,
    /// Listing scoped to one category
    Category(Category),
}

impl Filter {
    /// Selector value of the sentinel
    pub const ALL_LABEL: &'static str = "All";

    /// Map a selector value to a filter
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        if value == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Category(Category::new(value))
        }
    }

    /// Selector value for this filter
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Category(c) => c.as_str(),
        }
    }

    /// Category this filter is scoped to
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::All => None,
            Self::Category(c) => Some(c),
        }
    }

    /// Check for the sentinel
    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Category> for Filter {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

/// An enrollment offering
///
/// The name is the key of the enclosing [`ActivityMap`]. Fields the
/// client does not consume (e.g. raw attendance records) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub category: Category,
    pub schedule: String,
    pub max_participants: u32,
    /// Emails in enrollment order
    #[serde(default)]
    pub participants: Vec<String>,
    /// Hours per session
    pub duration_per_session: f64,
}

impl Activity {
    /// Remaining capacity.
    ///
    /// The server keeps this non-negative; the client only displays it.
    #[inline]
    #[must_use]
    pub fn spots_left(&self) -> i64 {
        let taken = i64::try_from(self.participants.len()).unwrap_or(i64::MAX);
        i64::from(self.max_participants) - taken
    }

    /// Check enrollment
    #[inline]
    #[must_use]
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// Success body of a mutating call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: String,
}

impl ActionReply {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One activity line of a student report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub category: Category,
    pub attended_sessions: u32,
    pub hours: f64,
}

/// Per-student aggregate, built fresh for every query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StudentActivityReport {
    /// Queried email, echoed by the server
    #[serde(default)]
    pub student: String,
    #[serde(default)]
    pub activities: IndexMap<String, ReportEntry>,
    pub total_activities: usize,
    pub total_hours: f64,
}

impl StudentActivityReport {
    /// Check for a student with no activities
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// All attendance for one activity, by session date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAttendance {
    pub activity: String,
    pub attendance_records: IndexMap<String, Vec<String>>,
    pub session_duration: f64,
}

/// Attendance of one student in one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendance {
    pub student: String,
    pub activity: String,
    pub attended_dates: Vec<String>,
    pub total_sessions: u32,
    pub total_hours: f64,
}

/// Result of an attendance lookup, shaped by whether a student was given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttendanceLookup {
    Student(StudentAttendance),
    Activity(ActivityAttendance),
}

/// Identifier of one action lifecycle (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LifecycleId(pub Ulid);

impl LifecycleId {
    /// Generate new lifecycle ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for LifecycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LifecycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_selection_maps_sentinel() {
        assert_eq!(Filter::from_selection("All"), Filter::All);
        assert_eq!(
            Filter::from_selection("Sports"),
            Filter::Category(Category::new("Sports"))
        );
        assert_eq!(Filter::from_selection("Sports").as_str(), "Sports");
        assert!(Filter::default().is_all());
    }

    #[test]
    fn activity_map_keeps_response_order() {
        let json = r#"{
            "Zeta": {"description": "z", "category": "Arts", "schedule": "Mon",
                     "max_participants": 3, "participants": ["a@x.com"],
                     "duration_per_session": 1.0, "attendance_records": {}},
            "Alpha": {"description": "a", "category": "Games", "schedule": "Tue",
                      "max_participants": 2, "participants": [],
                      "duration_per_session": 1.5}
        }"#;
        let map: ActivityMap = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
        assert_eq!(map["Zeta"].spots_left(), 2);
        assert!(map["Zeta"].has_participant("a@x.com"));
    }

    #[test]
    fn spots_left_is_not_clamped() {
        let activity = Activity {
            description: String::new(),
            category: Category::new("Sports"),
            schedule: String::new(),
            max_participants: 1,
            participants: vec!["a@x.com".into(), "b@x.com".into()],
            duration_per_session: 1.0,
        };
        assert_eq!(activity.spots_left(), -1);
    }

    #[test]
    fn attendance_lookup_shapes() {
        let student: AttendanceLookup = serde_json::from_str(
            r#"{"student": "a@x.com", "activity": "Chess Club",
                "attended_dates": ["2024-01-05"], "total_sessions": 1, "total_hours": 1.5}"#,
        )
        .unwrap();
        assert!(matches!(student, AttendanceLookup::Student(ref s) if s.total_sessions == 1));

        let activity: AttendanceLookup = serde_json::from_str(
            r#"{"activity": "Chess Club",
                "attendance_records": {"2024-01-05": ["a@x.com"]}, "session_duration": 1.5}"#,
        )
        .unwrap();
        assert!(matches!(activity, AttendanceLookup::Activity(_)));
    }

    #[test]
    fn report_without_student_field() {
        let report: StudentActivityReport =
            serde_json::from_str(r#"{"activities": {}, "total_activities": 0, "total_hours": 0}"#)
                .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total_hours, 0.0);
    }
}
