// Narration sink adapters: in-process broadcast, log output and a chat webhook.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::narration::NarrationEvent;
use crate::domain::ports::NarrationSink;

// Fans events out to in-process subscribers. No subscribers is not an error.
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<NarrationEvent>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<NarrationEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl NarrationSink for BroadcastSink {
    async fn publish(&self, event: NarrationEvent) -> Result<(), String> {
        if self.tx.send(event).is_err() {
            debug!("no narration subscribers");
        }
        Ok(())
    }
}

// Writes every event to the structured log.
#[derive(Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl NarrationSink for TracingSink {
    async fn publish(&self, event: NarrationEvent) -> Result<(), String> {
        info!(
            game_id = %event.game_id,
            round_id = %event.round_id,
            zone_id = ?event.zone_id,
            narration = ?event.narration,
            "narration"
        );
        Ok(())
    }
}

// Posts each event as JSON to the chat bridge.
#[derive(Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NarrationSink for WebhookSink {
    async fn publish(&self, event: NarrationEvent) -> Result<(), String> {
        let response = self
            .http
            .post(&self.url)
            .json(&event)
            .send()
            .await
            .map_err(|e| format!("webhook unreachable: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("webhook returned {}", response.status()));
        }
        Ok(())
    }
}

// Delivers to every inner sink; reports the first failure after trying all.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NarrationSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn NarrationSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl NarrationSink for FanoutSink {
    async fn publish(&self, event: NarrationEvent) -> Result<(), String> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.publish(event.clone()).await {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
