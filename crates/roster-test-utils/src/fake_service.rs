//! In-memory activity service
//!
//! Behaves like the real service (same validation, same messages) and adds
//! test controls:
//! - every call is logged before it resolves
//! - `fail_next` queues a one-shot error for an endpoint
//! - `hold_next` parks the next call to an endpoint until its gate is released

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use roster_core::{
    ActionReply, Activity, ActivityAttendance, ActivityMap, AttendanceLookup, Category,
    ReportEntry, RosterService, ServiceError, StudentActivityReport, StudentAttendance,
};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListActivities,
    FilterActivities,
    Categories,
    Signup,
    Unregister,
    RecordAttendance,
    ActivityReport,
    ActivityAttendance,
}

/// One logged call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub args: Vec<String>,
}

/// Releases one held call
#[derive(Debug)]
pub struct Gate {
    tx: oneshot::Sender<()>,
}

impl Gate {
    pub fn release(self) {
        let _ = self.tx.send(());
    }
}

#[derive(Debug, Clone)]
struct Record {
    activity: Activity,
    attendance: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct FakeState {
    records: IndexMap<String, Record>,
    categories: Option<Vec<Category>>,
    calls: Vec<Call>,
    faults: HashMap<Endpoint, VecDeque<ServiceError>>,
    gates: HashMap<Endpoint, VecDeque<oneshot::Receiver<()>>>,
}

/// Scriptable [`RosterService`]
#[derive(Debug, Default)]
pub struct FakeRosterService {
    state: Mutex<FakeState>,
}

fn not_found() -> ServiceError {
    ServiceError::rejected(404, Some("Activity not found"))
}

fn not_signed_up() -> ServiceError {
    ServiceError::rejected(400, Some("Student is not signed up for this activity"))
}

impl FakeRosterService {
    /// Service with no activities
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Service serving `roster`
    #[must_use]
    pub fn with_roster(roster: ActivityMap) -> Self {
        let service = Self::new();
        for (name, activity) in roster {
            service.insert_activity(name, activity);
        }
        service
    }

    /// Service serving [`crate::sample_roster`]
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_roster(crate::sample_roster())
    }

    pub fn insert_activity(&self, name: impl Into<String>, activity: Activity) {
        self.state.lock().records.insert(
            name.into(),
            Record {
                activity,
                attendance: IndexMap::new(),
            },
        );
    }

    pub fn remove_activity(&self, name: &str) {
        self.state.lock().records.shift_remove(name);
    }

    /// Serve a fixed category list instead of deriving one
    pub fn set_categories(&self, categories: Vec<Category>) {
        self.state.lock().categories = Some(categories);
    }

    /// Make the next call to `endpoint` fail with `error`
    pub fn fail_next(&self, endpoint: Endpoint, error: ServiceError) {
        self.state
            .lock()
            .faults
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Park the next call to `endpoint` until the returned gate is released
    #[must_use]
    pub fn hold_next(&self, endpoint: Endpoint) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.state
            .lock()
            .gates
            .entry(endpoint)
            .or_default()
            .push_back(rx);
        Gate { tx }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    #[must_use]
    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn participants(&self, activity: &str) -> Vec<String> {
        self.state
            .lock()
            .records
            .get(activity)
            .map(|r| r.activity.participants.clone())
            .unwrap_or_default()
    }

    async fn enter(&self, endpoint: Endpoint, args: &[&str]) -> Result<(), ServiceError> {
        let (gate, fault) = {
            let mut state = self.state.lock();
            state.calls.push(Call {
                endpoint,
                args: args.iter().map(|a| (*a).to_string()).collect(),
            });
            let gate = state.gates.get_mut(&endpoint).and_then(VecDeque::pop_front);
            let fault = state.faults.get_mut(&endpoint).and_then(VecDeque::pop_front);
            (gate, fault)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        fault.map_or(Ok(()), Err)
    }

    fn listing(&self, category: Option<&Category>) -> ActivityMap {
        self.state
            .lock()
            .records
            .iter()
            .filter(|(_, r)| category.map_or(true, |c| &r.activity.category == c))
            .map(|(name, r)| (name.clone(), r.activity.clone()))
            .collect()
    }
}

#[async_trait]
impl RosterService for FakeRosterService {
    async fn list_activities(&self) -> Result<ActivityMap, ServiceError> {
        self.enter(Endpoint::ListActivities, &[]).await?;
        Ok(self.listing(None))
    }

    async fn filter_activities(&self, category: &Category) -> Result<ActivityMap, ServiceError> {
        self.enter(Endpoint::FilterActivities, &[category.as_str()])
            .await?;
        if category.as_str() == roster_core::Filter::ALL_LABEL {
            return Ok(self.listing(None));
        }
        Ok(self.listing(Some(category)))
    }

    async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.enter(Endpoint::Categories, &[]).await?;
        let state = self.state.lock();
        if let Some(categories) = &state.categories {
            return Ok(categories.clone());
        }
        let sorted: BTreeSet<Category> = state
            .records
            .values()
            .map(|r| r.activity.category.clone())
            .collect();
        Ok(sorted.into_iter().collect())
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError> {
        self.enter(Endpoint::Signup, &[activity, email]).await?;
        let mut state = self.state.lock();
        let record = state.records.get_mut(activity).ok_or_else(not_found)?;
        if record.activity.has_participant(email) {
            return Err(ServiceError::rejected(400, Some("Student is already signed up")));
        }
        record.activity.participants.push(email.to_string());
        Ok(ActionReply::new(format!("Signed up {email} for {activity}")))
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<ActionReply, ServiceError> {
        self.enter(Endpoint::Unregister, &[activity, email]).await?;
        let mut state = self.state.lock();
        let record = state.records.get_mut(activity).ok_or_else(not_found)?;
        let position = record
            .activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or_else(not_signed_up)?;
        record.activity.participants.remove(position);
        Ok(ActionReply::new(format!("Unregistered {email} from {activity}")))
    }

    async fn record_attendance(
        &self,
        activity: &str,
        email: &str,
        date: &str,
    ) -> Result<ActionReply, ServiceError> {
        self.enter(Endpoint::RecordAttendance, &[activity, email, date])
            .await?;
        let mut state = self.state.lock();
        let record = state.records.get_mut(activity).ok_or_else(not_found)?;
        if !record.activity.has_participant(email) {
            return Err(not_signed_up());
        }
        let attendees = record.attendance.entry(date.to_string()).or_default();
        if attendees.iter().any(|a| a == email) {
            return Err(ServiceError::rejected(
                400,
                Some("Student attendance already recorded for this date"),
            ));
        }
        attendees.push(email.to_string());
        Ok(ActionReply::new(format!(
            "Recorded attendance for {email} at {activity} on {date}"
        )))
    }

    async fn activity_report(&self, email: &str) -> Result<StudentActivityReport, ServiceError> {
        self.enter(Endpoint::ActivityReport, &[email]).await?;
        let state = self.state.lock();
        let activities: IndexMap<String, ReportEntry> = state
            .records
            .iter()
            .filter(|(_, r)| r.activity.has_participant(email))
            .map(|(name, r)| {
                let sessions = r
                    .attendance
                    .values()
                    .filter(|attendees| attendees.iter().any(|a| a == email))
                    .count();
                let attended_sessions = u32::try_from(sessions).unwrap_or(u32::MAX);
                (
                    name.clone(),
                    ReportEntry {
                        category: r.activity.category.clone(),
                        attended_sessions,
                        hours: f64::from(attended_sessions) * r.activity.duration_per_session,
                    },
                )
            })
            .collect();
        Ok(StudentActivityReport {
            student: email.to_string(),
            total_activities: activities.len(),
            total_hours: activities.values().map(|e| e.hours).sum(),
            activities,
        })
    }

    async fn activity_attendance(
        &self,
        activity: &str,
        email: Option<&str>,
    ) -> Result<AttendanceLookup, ServiceError> {
        let mut args = vec![activity];
        args.extend(email);
        self.enter(Endpoint::ActivityAttendance, &args).await?;
        let state = self.state.lock();
        let record = state.records.get(activity).ok_or_else(not_found)?;
        let Some(email) = email else {
            return Ok(AttendanceLookup::Activity(ActivityAttendance {
                activity: activity.to_string(),
                attendance_records: record.attendance.clone(),
                session_duration: record.activity.duration_per_session,
            }));
        };
        if !record.activity.has_participant(email) {
            return Err(not_signed_up());
        }
        let attended_dates: Vec<String> = record
            .attendance
            .iter()
            .filter(|(_, attendees)| attendees.iter().any(|a| a == email))
            .map(|(date, _)| date.clone())
            .collect();
        let total_sessions = u32::try_from(attended_dates.len()).unwrap_or(u32::MAX);
        Ok(AttendanceLookup::Student(StudentAttendance {
            student: email.to_string(),
            activity: activity.to_string(),
            attended_dates,
            total_sessions,
            total_hours: f64::from(total_sessions) * record.activity.duration_per_session,
        }))
    }
}
