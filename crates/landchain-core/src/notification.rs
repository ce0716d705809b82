//! Notification projection.
//!
//! [`NotificationProjector`] maps lifecycle events to display messages;
//! [`NotificationSlot`] holds the one message currently visible and tracks
//! when it should auto-dismiss.
//!
//! Both are sans-IO. The slot never sleeps: `show` hands back a
//! [`DismissTimer`] and the driver calls [`NotificationSlot::expire`] when it
//! fires (or polls [`NotificationSlot::tick`]). Each `show` and `dismiss`
//! bumps a generation, so a timer armed for an earlier message is a no-op.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::lifecycle::{EventDetail, LifecycleEvent, LifecycleState, OperationKind, RequestRef};

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Operation in progress.
    Loading,
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// A display message for one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Request the message is about.
    pub request: RequestRef,
    /// Visual category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// How long to stay visible. Zero means until replaced.
    pub duration: Duration,
    /// Whether the user may close it.
    pub dismissable: bool,
}

/// Maps lifecycle events to notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationProjector {
    window: Duration,
}

impl Default for NotificationProjector {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

impl NotificationProjector {
    /// Terminal notifications stay visible for `window`.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Notification for `event`. `None` for `Idle`, which is never shown, and
    /// for an event whose detail does not fit its state.
    pub fn project(&self, event: &LifecycleEvent) -> Option<Notification> {
        let (kind, title, description) = match (event.state, &event.detail) {
            (LifecycleState::Pending, _) => {
                let description = match event.kind {
                    OperationKind::Register => "Registering land on the ledger...",
                    OperationKind::Transfer => "Transferring land ownership on the ledger...",
                };
                (NotificationKind::Loading, "Processing", description.to_string())
            },
            (LifecycleState::Succeeded, EventDetail::Registered { id }) => (
                NotificationKind::Success,
                "Registration Successful",
                format!("Land ID {id} has been successfully registered."),
            ),
            (LifecycleState::Succeeded, EventDetail::Transferred { id, new_owner }) => (
                NotificationKind::Success,
                "Transfer Successful",
                format!("Land ID {id} has been transferred to {new_owner}."),
            ),
            (LifecycleState::Failed, EventDetail::Failed { message, .. }) => {
                (NotificationKind::Error, failure_title(event.kind), message.clone())
            },
            _ => return None,
        };

        let loading = kind == NotificationKind::Loading;
        Some(Notification {
            request: event.request,
            kind,
            title: title.to_string(),
            description,
            duration: if loading { Duration::ZERO } else { self.window },
            dismissable: !loading,
        })
    }
}

fn failure_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Register => "Registration Failed",
        OperationKind::Transfer => "Transfer Failed",
    }
}

/// Token identifying one armed auto-dismiss timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissToken(u64);

/// Auto-dismiss request returned by [`NotificationSlot::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissTimer {
    /// Pass to [`NotificationSlot::expire`] when the timer fires.
    pub token: DismissToken,
    /// When the timer should fire.
    pub at: Instant,
}

#[derive(Debug)]
struct Shown {
    notification: Notification,
    token: DismissToken,
    deadline: Option<Instant>,
}

/// Holds at most one visible notification.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    current: Option<Shown>,
    generation: u64,
}

impl NotificationSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible notification, if any.
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|shown| &shown.notification)
    }

    /// Show `notification`, replacing whatever is visible.
    ///
    /// Returns the timer to arm, or `None` for a notification that stays
    /// until replaced. Any earlier timer becomes stale.
    pub fn show(&mut self, notification: Notification, now: Instant) -> Option<DismissTimer> {
        let token = self.next_token();
        let deadline = (!notification.duration.is_zero()).then(|| now + notification.duration);

        tracing::debug!(
            request = %notification.request,
            kind = ?notification.kind,
            "notification shown"
        );
        self.current = Some(Shown { notification, token, deadline });

        deadline.map(|at| DismissTimer { token, at })
    }

    /// Timer `token` fired. Dismisses only if it still belongs to the
    /// visible notification.
    pub fn expire(&mut self, token: DismissToken) -> Option<Notification> {
        if self.current.as_ref().is_none_or(|shown| shown.token != token) {
            return None;
        }
        self.take("expired")
    }

    /// User closed the notification. Ignored for non-dismissable ones.
    ///
    /// Invalidates the outstanding timer.
    pub fn dismiss(&mut self) -> Option<Notification> {
        if !self.current()?.dismissable {
            return None;
        }
        self.take("dismissed")
    }

    /// Dismiss the visible notification if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<Notification> {
        let deadline = self.current.as_ref()?.deadline?;
        if now < deadline {
            return None;
        }
        self.take("expired")
    }

    fn take(&mut self, why: &'static str) -> Option<Notification> {
        let shown = self.current.take()?;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(request = %shown.notification.request, why, "notification cleared");
        Some(shown.notification)
    }

    fn next_token(&mut self) -> DismissToken {
        self.generation = self.generation.wrapping_add(1);
        DismissToken(self.generation)
    }
}
