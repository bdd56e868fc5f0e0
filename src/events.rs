//! Streaming event channels. See `spec.md` §5.
//!
//! Five independently-typed `tokio::sync::mpsc` channels (bound 1 — tokio
//! has no true unbuffered channel) carry staging/deployment progress to
//! the caller: resource changes, link changes, child changes, a single
//! terminal `complete`, and `error`. The dispatcher-task shape (a task
//! owns the `Sender`s, the caller holds the `Receiver`s) mirrors the
//! `(Receiver<PipelineEvent>, JoinHandle<...>)` pair the buildit-style
//! orchestrator returns from `execute()`.

use crate::changes::{BlueprintChanges, ChildChangesMessage, LinkChangesMessage, ResourceChangesMessage};
use tokio::sync::mpsc;

/// A single error notification on the error channel. Carries a rendered
/// message rather than `ContainerError` itself so the channel stays
/// `Clone`-free and cheap to move around; the unit (resource/link/child
/// name) is attached when known.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub unit: Option<String>,
    pub message: String,
}

impl ErrorEvent {
    pub fn new(unit: Option<String>, err: &crate::error::ContainerError) -> Self {
        Self {
            unit,
            message: err.to_string(),
        }
    }
}

const CHANNEL_BOUND: usize = 1;

/// Receiving half handed to the caller of `StageChanges`/`Deploy`/`Destroy`.
pub struct ContainerEvents {
    pub resource_changes: mpsc::Receiver<ResourceChangesMessage>,
    pub link_changes: mpsc::Receiver<LinkChangesMessage>,
    pub child_changes: mpsc::Receiver<ChildChangesMessage>,
    pub complete: mpsc::Receiver<BlueprintChanges>,
    pub error: mpsc::Receiver<ErrorEvent>,
}

/// Sending half held by the task performing the work. Every `send_*`
/// method swallows a closed receiver (the caller stopped listening) —
/// dropping the event rather than failing the run, logged at `debug`
/// since it's an expected shutdown path, not a defect.
#[derive(Clone)]
pub struct EventSink {
    resource_changes: mpsc::Sender<ResourceChangesMessage>,
    link_changes: mpsc::Sender<LinkChangesMessage>,
    child_changes: mpsc::Sender<ChildChangesMessage>,
    complete: mpsc::Sender<BlueprintChanges>,
    error: mpsc::Sender<ErrorEvent>,
}

impl EventSink {
    pub fn channel() -> (EventSink, ContainerEvents) {
        let (rc_tx, rc_rx) = mpsc::channel(CHANNEL_BOUND);
        let (lc_tx, lc_rx) = mpsc::channel(CHANNEL_BOUND);
        let (cc_tx, cc_rx) = mpsc::channel(CHANNEL_BOUND);
        let (done_tx, done_rx) = mpsc::channel(CHANNEL_BOUND);
        let (err_tx, err_rx) = mpsc::channel(CHANNEL_BOUND);

        (
            EventSink {
                resource_changes: rc_tx,
                link_changes: lc_tx,
                child_changes: cc_tx,
                complete: done_tx,
                error: err_tx,
            },
            ContainerEvents {
                resource_changes: rc_rx,
                link_changes: lc_rx,
                child_changes: cc_rx,
                complete: done_rx,
                error: err_rx,
            },
        )
    }

    pub async fn send_resource_change(&self, msg: ResourceChangesMessage) {
        if self.resource_changes.send(msg).await.is_err() {
            tracing::debug!("resource-changes receiver dropped, discarding event");
        }
    }

    pub async fn send_link_change(&self, msg: LinkChangesMessage) {
        if self.link_changes.send(msg).await.is_err() {
            tracing::debug!("link-changes receiver dropped, discarding event");
        }
    }

    pub async fn send_child_change(&self, msg: ChildChangesMessage) {
        if self.child_changes.send(msg).await.is_err() {
            tracing::debug!("child-changes receiver dropped, discarding event");
        }
    }

    pub async fn send_complete(&self, changes: BlueprintChanges) {
        if self.complete.send(changes).await.is_err() {
            tracing::debug!("complete receiver dropped, discarding event");
        }
    }

    pub async fn send_error(&self, unit: Option<String>, err: &crate::error::ContainerError) {
        tracing::warn!(unit = unit.as_deref().unwrap_or("<none>"), error = %err, "container error");
        if self.error.send(ErrorEvent::new(unit, err)).await.is_err() {
            tracing::debug!("error receiver dropped, discarding event");
        }
    }
}
