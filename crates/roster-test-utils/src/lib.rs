//! Testing utilities for the roster workspace
//!
//! Shared test doubles, fixtures, and setup helpers.

#![allow(missing_docs)]

pub mod fake_service;
pub mod surface;

pub use fake_service::{Call, Endpoint, FakeRosterService, Gate};
pub use surface::{RecordingSurface, SurfaceEvent};

use indexmap::IndexMap;
use roster_core::{
    Activity, ActivityMap, Category, ClientConfig, ReportEntry, StudentActivityReport,
    SyncController,
};
use std::sync::Arc;

pub fn activity(category: &str, max_participants: u32, participants: &[&str], hours: f64) -> Activity {
    Activity {
        description: format!("A {} activity", category.to_lowercase()),
        category: Category::new(category),
        schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
        max_participants,
        participants: participants.iter().map(|p| (*p).to_string()).collect(),
        duration_per_session: hours,
    }
}

/// Five activities over four categories, in a fixed order
pub fn sample_roster() -> ActivityMap {
    let mut roster = ActivityMap::new();
    roster.insert(
        "Chess Club".to_string(),
        activity("Games", 12, &["michael@school.edu", "daniel@school.edu"], 1.5),
    );
    roster.insert(
        "Programming Class".to_string(),
        activity("Academic", 20, &["emma@school.edu"], 1.0),
    );
    roster.insert(
        "Gym Class".to_string(),
        activity("Sports", 30, &["john@school.edu", "olivia@school.edu"], 1.0),
    );
    roster.insert(
        "Soccer Team".to_string(),
        activity("Sports", 22, &["liam@school.edu"], 1.5),
    );
    roster.insert("Art Club".to_string(), activity("Arts", 15, &[], 1.5));
    roster
}

pub fn report(student: &str, entries: &[(&str, &str, u32, f64)]) -> StudentActivityReport {
    let activities: IndexMap<String, ReportEntry> = entries
        .iter()
        .map(|(name, category, sessions, hours)| {
            (
                (*name).to_string(),
                ReportEntry {
                    category: Category::new(*category),
                    attended_sessions: *sessions,
                    hours: *hours,
                },
            )
        })
        .collect();
    StudentActivityReport {
        student: student.to_string(),
        total_activities: activities.len(),
        total_hours: activities.values().map(|e| e.hours).sum(),
        activities,
    }
}

pub fn setup_controller(service: Arc<FakeRosterService>) -> (SyncController, Arc<RecordingSurface>) {
    setup_controller_with(ClientConfig::new(), service)
}

pub fn setup_controller_with(
    config: ClientConfig,
    service: Arc<FakeRosterService>,
) -> (SyncController, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::new());
    let controller = SyncController::new(config, service, surface.clone());
    (controller, surface)
}
