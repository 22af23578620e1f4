//! Notification channel
//!
//! Each surface is a small state machine, `Idle -> Visible(timer) -> Idle`:
//! - `show` cancels the surface's pending dismissal, replaces the message
//!   and arms a fresh timer
//! - the timer, or an explicit `dismiss`, returns the surface to `Idle`
//!
//! Cancel and re-arm happen under the surface lock, and every timer carries
//! the generation it was armed for, so a late timer never hides a newer
//! message.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Named transient-message slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Signup and unregister feedback
    Signup,
    /// Attendance feedback
    Attendance,
}

impl Surface {
    /// Every surface
    pub const ALL: [Surface; 2] = [Surface::Signup, Surface::Attendance];

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Signup => 0,
            Self::Attendance => 1,
        }
    }

    /// Stable name for logs and display
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Attendance => "attendance",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A message currently shown on a surface
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub surface: Surface,
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    /// Count of `show` calls on this surface when this one was made
    pub generation: u64,
}

enum SlotState {
    Idle,
    Visible {
        notification: Notification,
        timer: JoinHandle<()>,
    },
}

struct Slot {
    state: Mutex<SlotInner>,
    published: watch::Sender<Option<Notification>>,
}

struct SlotInner {
    state: SlotState,
    generation: u64,
}

impl Slot {
    fn new() -> Self {
        let (published, _) = watch::channel(None);
        Self {
            state: Mutex::new(SlotInner {
                state: SlotState::Idle,
                generation: 0,
            }),
            published,
        }
    }
}

struct ChannelInner {
    slots: [Slot; 2],
    ttl: Duration,
}

impl ChannelInner {
    fn slot(&self, surface: Surface) -> &Slot {
        &self.slots[surface.index()]
    }

    /// Timer-driven dismissal; a no-op once the surface has moved on.
    fn expire(&self, surface: Surface, generation: u64) {
        let slot = self.slot(surface);
        let mut inner = slot.state.lock();
        if inner.generation != generation {
            return;
        }
        if let SlotState::Visible { .. } = inner.state {
            // The running timer is this task; dropping its handle detaches it.
            inner.state = SlotState::Idle;
            slot.published.send_replace(None);
            tracing::debug!(%surface, generation, "notification dismissed by timer");
        }
    }
}

/// Owner of both notification surfaces
///
/// Cheap to clone; clones share the same surfaces. `show` arms a Tokio
/// timer and must be called from within a runtime.
#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<ChannelInner>,
}

impl NotificationChannel {
    /// Create channel whose messages live for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                slots: [Slot::new(), Slot::new()],
                ttl,
            }),
        }
    }

    /// Show `text` on `surface`, superseding whatever is there
    pub fn show(&self, surface: Surface, text: impl Into<String>, severity: Severity) -> Notification {
        let slot = self.inner.slot(surface);
        let mut inner = slot.state.lock();

        inner.generation += 1;
        let generation = inner.generation;

        if let SlotState::Visible { timer, .. } =
            std::mem::replace(&mut inner.state, SlotState::Idle)
        {
            timer.abort();
        }

        let notification = Notification {
            surface,
            text: text.into(),
            severity,
            created_at: Utc::now(),
            generation,
        };

        let timer = tokio::spawn(expire_after(
            Arc::downgrade(&self.inner),
            surface,
            generation,
            self.inner.ttl,
        ));

        inner.state = SlotState::Visible {
            notification: notification.clone(),
            timer,
        };
        slot.published.send_replace(Some(notification.clone()));

        tracing::debug!(%surface, generation, severity = severity.as_str(), "notification shown");
        notification
    }

    /// Hide `surface` now and cancel its timer
    pub fn dismiss(&self, surface: Surface) {
        let slot = self.inner.slot(surface);
        let mut inner = slot.state.lock();
        if let SlotState::Visible { timer, .. } =
            std::mem::replace(&mut inner.state, SlotState::Idle)
        {
            timer.abort();
            slot.published.send_replace(None);
            tracing::debug!(%surface, "notification dismissed");
        }
    }

    /// Hide every surface
    pub fn dismiss_all(&self) {
        for surface in Surface::ALL {
            self.dismiss(surface);
        }
    }

    /// Message currently on `surface`
    #[must_use]
    pub fn current(&self, surface: Surface) -> Option<Notification> {
        match &self.inner.slot(surface).state.lock().state {
            SlotState::Idle => None,
            SlotState::Visible { notification, .. } => Some(notification.clone()),
        }
    }

    /// Check visibility
    #[inline]
    #[must_use]
    pub fn is_visible(&self, surface: Surface) -> bool {
        self.current(surface).is_some()
    }

    /// Total `show` calls made on `surface`
    #[must_use]
    pub fn shows(&self, surface: Surface) -> u64 {
        self.inner.slot(surface).state.lock().generation
    }

    /// Follow `surface` as it is shown and hidden
    #[must_use]
    pub fn subscribe(&self, surface: Surface) -> watch::Receiver<Option<Notification>> {
        self.inner.slot(surface).published.subscribe()
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("ttl", &self.inner.ttl)
            .field("signup", &self.current(Surface::Signup))
            .field("attendance", &self.current(Surface::Attendance))
            .finish()
    }
}

async fn expire_after(channel: Weak<ChannelInner>, surface: Surface, generation: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    if let Some(channel) = channel.upgrade() {
        channel.expire(surface, generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn hides_after_ttl() {
        let channel = NotificationChannel::new(TTL);
        channel.show(Surface::Signup, "Signed up", Severity::Success);

        settle(4_900).await;
        assert!(channel.is_visible(Surface::Signup));

        settle(200).await;
        assert!(!channel.is_visible(Surface::Signup));
    }

    #[tokio::test(start_paused = true)]
    async fn show_resets_timer() {
        let channel = NotificationChannel::new(TTL);
        channel.show(Surface::Signup, "first", Severity::Success);

        settle(3_000).await;
        channel.show(Surface::Signup, "second", Severity::Error);

        // Past the first deadline, inside the second.
        settle(3_000).await;
        let current = channel.current(Surface::Signup).unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(current.generation, 2);

        settle(2_100).await;
        assert!(!channel.is_visible(Surface::Signup));
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_are_independent() {
        let channel = NotificationChannel::new(TTL);
        channel.show(Surface::Signup, "a", Severity::Success);
        settle(3_000).await;
        channel.show(Surface::Attendance, "b", Severity::Success);

        settle(2_500).await;
        assert!(!channel.is_visible(Surface::Signup));
        assert!(channel.is_visible(Surface::Attendance));
        assert_eq!(channel.shows(Surface::Signup), 1);
        assert_eq!(channel.shows(Surface::Attendance), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_dismiss_cancels_timer() {
        let channel = NotificationChannel::new(TTL);
        channel.show(Surface::Attendance, "Recorded", Severity::Success);
        channel.dismiss(Surface::Attendance);
        assert!(!channel.is_visible(Surface::Attendance));

        channel.show(Surface::Attendance, "Again", Severity::Success);
        settle(4_000).await;
        assert!(channel.is_visible(Surface::Attendance));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_latest() {
        let channel = NotificationChannel::new(TTL);
        let mut rx = channel.subscribe(Surface::Signup);

        channel.show(Surface::Signup, "one", Severity::Success);
        channel.show(Surface::Signup, "two", Severity::Success);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|n| n.text.clone()), Some("two".into()));

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
