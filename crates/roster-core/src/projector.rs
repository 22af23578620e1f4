//! View projector
//!
//! Pure functions from roster state to a presentation model. Nothing here
//! mutates the store or touches a rendering surface.

use crate::store::{Catalog, RosterSnapshot, RosterState, RosterView};
use crate::types::{Activity, Filter, StudentActivityReport};

/// Placeholder before the first load completes
pub const LOADING_TEXT: &str = "Loading activities...";
/// Placeholder after a failed load
pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
/// Placeholder for an activity without participants
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet";
/// Placeholder for a report without activities
pub const NO_REPORT_ACTIVITIES_TEXT: &str = "No activities found for this student.";

/// Everything the roster area shows
#[derive(Debug, Clone, PartialEq)]
pub struct RosterPresentation {
    pub body: RosterBody,
    /// Targets for the signup and attendance selectors
    pub activity_options: Vec<String>,
}

/// Main roster list
#[derive(Debug, Clone, PartialEq)]
pub enum RosterBody {
    Placeholder(String),
    Cards(Vec<ActivityCard>),
}

/// One activity as displayed
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCard {
    pub name: String,
    pub category: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub availability_label: String,
    pub duration_label: String,
    /// Empty when nobody is enrolled
    pub participants: Vec<ParticipantRow>,
}

impl ActivityCard {
    /// Text shown instead of an empty participant list
    #[must_use]
    pub fn participants_placeholder(&self) -> Option<&'static str> {
        self.participants.is_empty().then_some(NO_PARTICIPANTS_TEXT)
    }
}

/// Participant line; also the parameters of its unregister action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub activity: String,
    pub email: String,
}

/// Selector option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Project a full roster view
#[must_use]
pub fn project(view: &RosterView) -> RosterPresentation {
    let body = match &view.state {
        RosterState::Pending => RosterBody::Placeholder(LOADING_TEXT.to_string()),
        RosterState::Failed { .. } => RosterBody::Placeholder(LOAD_FAILED_TEXT.to_string()),
        RosterState::Loaded(snapshot) => RosterBody::Cards(project_cards(snapshot)),
    };
    RosterPresentation {
        body,
        activity_options: view.catalog.activities().cloned().collect(),
    }
}

/// One card per activity, in snapshot order
#[must_use]
pub fn project_cards(snapshot: &RosterSnapshot) -> Vec<ActivityCard> {
    snapshot
        .activities
        .iter()
        .map(|(name, activity)| project_card(name, activity))
        .collect()
}

fn project_card(name: &str, activity: &Activity) -> ActivityCard {
    let spots_left = activity.spots_left();
    ActivityCard {
        name: name.to_string(),
        category: activity.category.to_string(),
        description: activity.description.clone(),
        schedule: activity.schedule.clone(),
        spots_left,
        availability_label: format!("{spots_left} spots left"),
        duration_label: duration_label(activity.duration_per_session),
        participants: activity
            .participants
            .iter()
            .map(|email| ParticipantRow {
                activity: name.to_string(),
                email: email.clone(),
            })
            .collect(),
    }
}

/// "1 hour", "1.5 hours"
#[must_use]
pub fn duration_label(hours: f64) -> String {
    #[allow(clippy::float_cmp)]
    let unit = if hours == 1.0 { "hour" } else { "hours" };
    format!("{hours} {unit}")
}

/// Category selector: the sentinel first, then known categories
#[must_use]
pub fn project_categories(catalog: &Catalog, selected: &Filter) -> Vec<SelectOption> {
    std::iter::once(Filter::All)
        .chain(catalog.categories().cloned().map(Filter::Category))
        .map(|filter| SelectOption {
            value: filter.as_str().to_string(),
            label: filter.as_str().to_string(),
            selected: &filter == selected,
        })
        .collect()
}

/// A rendered student report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub student: String,
    pub entries: Vec<ReportLine>,
    /// Set instead of entries when the student has no activities
    pub placeholder: Option<String>,
    pub total_activities: usize,
    pub total_hours: f64,
}

/// One activity of a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub activity: String,
    pub category: String,
    pub attended_sessions: u32,
    pub hours: f64,
}

/// Project a report
#[must_use]
pub fn project_report(report: &StudentActivityReport) -> ReportView {
    let entries: Vec<ReportLine> = report
        .activities
        .iter()
        .map(|(name, entry)| ReportLine {
            activity: name.clone(),
            category: entry.category.to_string(),
            attended_sessions: entry.attended_sessions,
            hours: entry.hours,
        })
        .collect();
    let placeholder = entries
        .is_empty()
        .then(|| NO_REPORT_ACTIVITIES_TEXT.to_string());
    ReportView {
        student: report.student.clone(),
        entries,
        placeholder,
        total_activities: report.total_activities,
        total_hours: report.total_hours,
    }
}
