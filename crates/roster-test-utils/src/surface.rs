//! Rendering surface that records what it was asked to show

use parking_lot::Mutex;
use roster_core::{
    AttendanceLookup, FormKind, RenderSurface, ReportView, RosterPresentation, SelectOption,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Roster(RosterPresentation),
    Categories(Vec<SelectOption>),
    FormCleared(FormKind),
    Report(ReportView),
    Attendance(AttendanceLookup),
    Alert(String),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    #[must_use]
    pub fn last_roster(&self) -> Option<RosterPresentation> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::Roster(p) => Some(p.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn roster_renders(&self) -> usize {
        self.count(|e| matches!(e, SurfaceEvent::Roster(_)))
    }

    #[must_use]
    pub fn category_renders(&self) -> Vec<Vec<SelectOption>> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Categories(options) => Some(options.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn cleared_forms(&self) -> Vec<FormKind> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::FormCleared(form) => Some(*form),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn last_report(&self) -> Option<ReportView> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::Report(view) => Some(view.clone()),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl RenderSurface for RecordingSurface {
    fn render_roster(&self, presentation: &RosterPresentation) {
        self.push(SurfaceEvent::Roster(presentation.clone()));
    }

    fn render_categories(&self, options: &[SelectOption]) {
        self.push(SurfaceEvent::Categories(options.to_vec()));
    }

    fn clear_form(&self, form: FormKind) {
        self.push(SurfaceEvent::FormCleared(form));
    }

    fn render_report(&self, report: &ReportView) {
        self.push(SurfaceEvent::Report(report.clone()));
    }

    fn render_attendance(&self, lookup: &AttendanceLookup) {
        self.push(SurfaceEvent::Attendance(lookup.clone()));
    }

    fn alert(&self, message: &str) {
        self.push(SurfaceEvent::Alert(message.to_string()));
    }
}
