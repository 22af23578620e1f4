//! Terminal rendering surface
//!
//! All output goes through one shared [`Console`] so roster repaints,
//! alerts and notification lines never interleave mid-line.

use crate::render::{attendance_text, categories_text, notification_text, report_text, roster_text};
use parking_lot::Mutex;
use roster_core::{
    AttendanceLookup, FormKind, NotificationChannel, RenderSurface, ReportView,
    RosterPresentation, SelectOption, Surface,
};
use std::io::Write;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared, line-atomic output sink
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Write `text` in one piece
    pub fn print(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(error) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(%error, "console write failed");
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// [`RenderSurface`] printing plain text
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    console: Console,
}

impl TerminalSurface {
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl RenderSurface for TerminalSurface {
    fn render_roster(&self, presentation: &RosterPresentation) {
        self.console.print(&roster_text(presentation));
    }

    fn render_categories(&self, options: &[SelectOption]) {
        self.console.print(&categories_text(options));
    }

    fn clear_form(&self, form: FormKind) {
        // Terminal forms are the command line itself; nothing to reset.
        tracing::trace!(?form, "form cleared");
    }

    fn render_report(&self, report: &ReportView) {
        self.console.print(&report_text(report));
    }

    fn render_attendance(&self, lookup: &AttendanceLookup) {
        self.console.print(&attendance_text(lookup));
    }

    fn alert(&self, message: &str) {
        self.console.print(&format!("! {message}\n"));
    }
}

/// Print each surface's notifications as they appear and when they expire
///
/// The tasks end when the channel is dropped.
pub fn spawn_notification_printers(
    channel: &NotificationChannel,
    console: &Console,
) -> Vec<JoinHandle<()>> {
    Surface::ALL
        .into_iter()
        .map(|surface| {
            let mut updates = channel.subscribe(surface);
            let console = console.clone();
            tokio::spawn(async move {
                while updates.changed().await.is_ok() {
                    let current = updates.borrow_and_update().clone();
                    match current {
                        Some(notification) => console.print(&notification_text(&notification)),
                        None => console.print(&format!("[{surface}] cleared\n")),
                    }
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::Severity;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn alert_is_prefixed() {
        let buffer = Buffer::default();
        let surface = TerminalSurface::new(Console::new(Box::new(buffer.clone())));
        surface.alert("Activity not found");
        assert_eq!(buffer.text(), "! Activity not found\n");
    }

    #[tokio::test(start_paused = true)]
    async fn printers_follow_show_and_expiry() {
        let buffer = Buffer::default();
        let console = Console::new(Box::new(buffer.clone()));
        let channel = NotificationChannel::new(Duration::from_secs(5));
        let printers = spawn_notification_printers(&channel, &console);

        channel.show(Surface::Attendance, "Recorded", Severity::Success);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(buffer.text(), "[attendance] ok: Recorded\n");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            buffer.text(),
            "[attendance] ok: Recorded\n[attendance] cleared\n"
        );

        drop(channel);
        for printer in printers {
            printer.await.unwrap();
        }
    }
}
