// Best-effort narration delivery, decoupled from state commits.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::narration::NarrationEvent;
use crate::domain::ports::NarrationSink;

/// Handle used by resolution to queue narration without waiting on delivery.
#[derive(Clone, Debug)]
pub struct NarrationPublisher {
    tx: mpsc::Sender<NarrationEvent>,
}

impl NarrationPublisher {
    /// Creates a publisher plus the receiving end, for callers that drain it themselves.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NarrationEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Creates a publisher and spawns the task that feeds `sink` in order.
    pub fn spawn(sink: Arc<dyn NarrationSink>, capacity: usize) -> Self {
        let (publisher, rx) = Self::channel(capacity);
        tokio::spawn(dispatch(rx, sink));
        publisher
    }

    /// Queues events in order. Never blocks; a full or closed channel drops events.
    pub fn publish_all(&self, events: Vec<NarrationEvent>) {
        for event in events {
            if let Err(err) = self.tx.try_send(event) {
                let reason = match err {
                    mpsc::error::TrySendError::Full(_) => "channel full",
                    mpsc::error::TrySendError::Closed(_) => "dispatcher stopped",
                };
                warn!(reason, "narration event dropped");
            }
        }
    }
}

async fn dispatch(mut rx: mpsc::Receiver<NarrationEvent>, sink: Arc<dyn NarrationSink>) {
    while let Some(event) = rx.recv().await {
        let game_id = event.game_id;
        if let Err(err) = sink.publish(event).await {
            warn!(game_id = %game_id, error = %err, "narration delivery failed");
        }
    }
    debug!("narration dispatcher stopped");
}
