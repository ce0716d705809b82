//! Notification driver.
//!
//! Runs a [`NotificationSlot`] against the environment's clock: projects each
//! lifecycle event, shows it, and arms the slot's dismiss timer. The binary
//! has no UI, so "showing" a notification means logging it.

use std::time::Duration;

use landchain_core::{
    DismissTimer, Environment, LifecycleEvent, Notification, NotificationKind,
    NotificationProjector, NotificationSlot,
};
use tokio::sync::broadcast::{Receiver, error::RecvError};

/// Drive notifications until the event channel closes.
///
/// Deadlines are taken from `env`'s clock. Returns the slot as it was when
/// the channel closed.
pub async fn drive<E: Environment>(
    mut events: Receiver<LifecycleEvent>,
    projector: NotificationProjector,
    env: E,
) -> NotificationSlot {
    let mut slot = NotificationSlot::new();
    let mut timer: Option<DismissTimer> = None;

    loop {
        let wait = timer.map_or(Duration::ZERO, |t| t.at.saturating_duration_since(env.now()));

        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    if let Some(notification) = projector.project(&event) {
                        log_shown(&notification);
                        timer = slot.show(notification, env.now());
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification driver fell behind");
                },
                Err(RecvError::Closed) => break,
            },
            () = env.sleep(wait), if timer.is_some() => {
                if let Some(expired) = timer.take().and_then(|t| slot.expire(t.token)) {
                    tracing::debug!(request = %expired.request, "notification auto-dismissed");
                }
            },
        }
    }

    slot
}

fn log_shown(notification: &Notification) {
    let Notification { request, title, description, .. } = notification;
    match notification.kind {
        NotificationKind::Loading | NotificationKind::Success => {
            tracing::info!(%request, "{title}: {description}");
        },
        NotificationKind::Error => tracing::warn!(%request, "{title}: {description}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use landchain_core::{EventDetail, LifecycleState, OperationKind, RequestRef};
    use landchain_harness::SimEnv;
    use tokio::sync::broadcast;

    use super::*;
    use crate::system_env::SystemEnv;

    fn event(state: LifecycleState, detail: EventDetail) -> LifecycleEvent {
        LifecycleEvent {
            request: RequestRef(1),
            session: None,
            kind: OperationKind::Register,
            state,
            detail,
        }
    }

    fn projector() -> NotificationProjector {
        NotificationProjector::new(Duration::from_secs(5))
    }

    fn pending() -> LifecycleEvent {
        event(LifecycleState::Pending, EventDetail::Submitted { id: "1001".to_string() })
    }

    fn registered() -> LifecycleEvent {
        event(LifecycleState::Succeeded, EventDetail::Registered { id: "1001".to_string() })
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_notification_auto_dismisses() {
        let (tx, rx) = broadcast::channel(8);
        let driver = tokio::spawn(drive(rx, projector(), SystemEnv::new()));

        tx.send(pending()).unwrap();
        tx.send(registered()).unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        drop(tx);

        assert!(driver.await.unwrap().current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_notification_visible_within_window() {
        let (tx, rx) = broadcast::channel(8);
        let driver = tokio::spawn(drive(rx, projector(), SystemEnv::new()));

        tx.send(registered()).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(tx);

        let slot = driver.await.unwrap();
        assert_eq!(slot.current().unwrap().kind, NotificationKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_stays_until_replaced() {
        let (tx, rx) = broadcast::channel(8);
        let driver = tokio::spawn(drive(rx, projector(), SystemEnv::new()));

        tx.send(pending()).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(tx);

        let slot = driver.await.unwrap();
        assert_eq!(slot.current().unwrap().kind, NotificationKind::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn deadlines_follow_the_environment_clock() {
        let env = SimEnv::with_seed(1);
        let (tx, rx) = broadcast::channel(8);
        let driver = tokio::spawn(drive(rx, projector(), env.clone()));

        tx.send(registered()).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Past the window on the environment clock; the runtime clock has
        // moved by a millisecond. An unprojected event wakes the driver.
        env.advance(Duration::from_secs(6));
        tx.send(event(LifecycleState::Idle, EventDetail::Submitted { id: "1001".to_string() }))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(tx);

        assert!(driver.await.unwrap().current().is_none());
    }
}
