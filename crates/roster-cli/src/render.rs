//! Plain-text rendering of presentation models

use roster_core::projector::duration_label;
use roster_core::{
    ActivityAttendance, ActivityCard, AttendanceLookup, Notification, ReportView, RosterBody,
    RosterPresentation, SelectOption, Severity, StudentAttendance,
};

/// Roster list, one block per activity
#[must_use]
pub fn roster_text(presentation: &RosterPresentation) -> String {
    match &presentation.body {
        RosterBody::Placeholder(text) => format!("{text}\n"),
        RosterBody::Cards(cards) if cards.is_empty() => "No activities.\n".to_string(),
        RosterBody::Cards(cards) => cards.iter().map(card_text).collect::<Vec<_>>().join("\n"),
    }
}

fn card_text(card: &ActivityCard) -> String {
    let mut out = format!(
        "{} [{}]\n  {}\n  Schedule: {}\n  Duration: {} per session\n  Availability: {}\n",
        card.name,
        card.category,
        card.description,
        card.schedule,
        card.duration_label,
        card.availability_label
    );
    match card.participants_placeholder() {
        Some(placeholder) => out.push_str(&format!("  {placeholder}\n")),
        None => {
            out.push_str("  Participants:\n");
            for row in &card.participants {
                out.push_str(&format!("    - {}\n", row.email));
            }
        }
    }
    out
}

/// Category selector on one line; the selected option is starred
#[must_use]
pub fn categories_text(options: &[SelectOption]) -> String {
    let labels: Vec<String> = options
        .iter()
        .map(|o| {
            if o.selected {
                format!("*{}", o.label)
            } else {
                o.label.clone()
            }
        })
        .collect();
    format!("Categories: {}\n", labels.join(" | "))
}

#[must_use]
pub fn report_text(report: &ReportView) -> String {
    let mut out = format!("Activity report for {}\n", report.student);
    if let Some(placeholder) = &report.placeholder {
        out.push_str(&format!("  {placeholder}\n"));
    }
    for line in &report.entries {
        out.push_str(&format!(
            "  {} ({}): {} sessions, {}\n",
            line.activity,
            line.category,
            line.attended_sessions,
            duration_label(line.hours)
        ));
    }
    out.push_str(&format!(
        "Total activities: {}\nTotal hours: {}\n",
        report.total_activities, report.total_hours
    ));
    out
}

#[must_use]
pub fn attendance_text(lookup: &AttendanceLookup) -> String {
    match lookup {
        AttendanceLookup::Activity(activity) => activity_attendance_text(activity),
        AttendanceLookup::Student(student) => student_attendance_text(student),
    }
}

fn activity_attendance_text(attendance: &ActivityAttendance) -> String {
    let mut out = format!(
        "Attendance for {} ({} per session)\n",
        attendance.activity,
        duration_label(attendance.session_duration)
    );
    if attendance.attendance_records.is_empty() {
        out.push_str("  No sessions recorded\n");
    }
    for (date, attendees) in &attendance.attendance_records {
        out.push_str(&format!("  {date}: {}\n", attendees.join(", ")));
    }
    out
}

fn student_attendance_text(attendance: &StudentAttendance) -> String {
    let mut out = format!(
        "{} at {}: {} sessions, {}\n",
        attendance.student,
        attendance.activity,
        attendance.total_sessions,
        duration_label(attendance.total_hours)
    );
    for date in &attendance.attended_dates {
        out.push_str(&format!("  {date}\n"));
    }
    out
}

/// One notification line, tagged with its surface
#[must_use]
pub fn notification_text(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Success => "ok",
        Severity::Error => "error",
    };
    format!("[{}] {marker}: {}\n", notification.surface, notification.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_core::projector::{project, project_report};
    use roster_core::{Catalog, Filter, RosterSnapshot, RosterState, RosterView, Surface};
    use roster_test_utils::{activity, report};
    use std::sync::Arc;

    fn presentation() -> RosterPresentation {
        let mut activities = roster_core::ActivityMap::new();
        activities.insert(
            "Chess Club".to_string(),
            activity("Games", 12, &["michael@school.edu"], 1.5),
        );
        activities.insert("Art Club".to_string(), activity("Arts", 15, &[], 1.0));
        project(&RosterView {
            state: RosterState::Loaded(Arc::new(RosterSnapshot {
                filter: Filter::All,
                activities,
            })),
            catalog: Catalog::new(),
        })
    }

    #[test]
    fn roster_blocks() {
        let text = roster_text(&presentation());
        assert_eq!(
            text,
            "Chess Club [Games]\n\
             \x20 A games activity\n\
             \x20 Schedule: Fridays, 3:30 PM - 5:00 PM\n\
             \x20 Duration: 1.5 hours per session\n\
             \x20 Availability: 11 spots left\n\
             \x20 Participants:\n\
             \x20   - michael@school.edu\n\
             \n\
             Art Club [Arts]\n\
             \x20 A arts activity\n\
             \x20 Schedule: Fridays, 3:30 PM - 5:00 PM\n\
             \x20 Duration: 1 hour per session\n\
             \x20 Availability: 15 spots left\n\
             \x20 No participants yet\n"
        );
    }

    #[test]
    fn placeholder_body() {
        let text = roster_text(&project(&RosterView::default()));
        assert_eq!(text, "Loading activities...\n");
    }

    #[test]
    fn selected_category_is_starred() {
        let mut catalog = Catalog::new();
        catalog.extend_categories(["Arts", "Sports"].map(roster_core::Category::from));
        let options =
            roster_core::projector::project_categories(&catalog, &Filter::from_selection("Arts"));
        assert_eq!(categories_text(&options), "Categories: All | *Arts | Sports\n");
    }

    #[test]
    fn report_with_and_without_activities() {
        let view = project_report(&report(
            "emma@school.edu",
            &[("Programming Class", "Academic", 2, 2.0)],
        ));
        assert_eq!(
            report_text(&view),
            "Activity report for emma@school.edu\n\
             \x20 Programming Class (Academic): 2 sessions, 2 hours\n\
             Total activities: 1\n\
             Total hours: 2\n"
        );

        let empty = project_report(&report("new@school.edu", &[]));
        assert!(report_text(&empty).contains("No activities found for this student."));
    }

    #[tokio::test]
    async fn notification_line() {
        let channel = roster_core::NotificationChannel::new(std::time::Duration::from_secs(5));
        let shown = channel.show(
            Surface::Signup,
            "Signed up a@x.com for Chess Club",
            Severity::Success,
        );
        assert_eq!(
            notification_text(&shown),
            "[signup] ok: Signed up a@x.com for Chess Club\n"
        );
        let failed = channel.show(Surface::Attendance, "Activity not found", Severity::Error);
        assert_eq!(
            notification_text(&failed),
            "[attendance] error: Activity not found\n"
        );
    }
}
