//! Outbound event streams: "signal detected" and "alert generated".
//!
//! The bus itself is synchronous observer fan-out, matching the engine's
//! no-internal-threads model. Async consumers attach through
//! [`BroadcastBridge`], which publishes into a bounded broadcast channel.

use crate::models::alert::AggregatedAlert;
use crate::models::signal::TradingSignal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// One engine event, as seen by channel consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    SignalDetected(TradingSignal),
    AlertGenerated(AggregatedAlert),
}

/// Observer contract. Default methods are no-ops so a subscriber can watch
/// a single stream.
pub trait EventSubscriber: Send + Sync {
    fn on_signal(&self, _signal: &TradingSignal) {}
    fn on_alert(&self, _alert: &AggregatedAlert) {}
}

pub type SubscriberId = u64;

/// Fan-out over registered subscribers, unsubscription-safe via ids.
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriberId,
    subscribers: Vec<(SubscriberId, Arc<dyn EventSubscriber>)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish_signal(&self, signal: &TradingSignal) {
        for (_, subscriber) in &self.subscribers {
            subscriber.on_signal(signal);
        }
    }

    pub fn publish_alert(&self, alert: &AggregatedAlert) {
        for (_, subscriber) in &self.subscribers {
            subscriber.on_alert(alert);
        }
    }
}

/// Bridges engine events into a bounded `tokio::sync::broadcast` channel.
///
/// A receiver that falls behind by more than the channel capacity loses
/// the oldest events (the channel's ring semantics). That is the explicit
/// drop-oldest policy for slow consumers.
pub struct BroadcastBridge {
    tx: broadcast::Sender<EngineEvent>,
}

impl BroadcastBridge {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<EngineEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}

impl EventSubscriber for BroadcastBridge {
    fn on_signal(&self, signal: &TradingSignal) {
        // Send only fails when no receiver is attached; events are
        // droppable observability data, not state.
        let _ = self.tx.send(EngineEvent::SignalDetected(signal.clone()));
    }

    fn on_alert(&self, alert: &AggregatedAlert) {
        let _ = self.tx.send(EngineEvent::AlertGenerated(alert.clone()));
    }
}

/// Logs every engine event through `tracing`.
pub struct LogSubscriber;

impl EventSubscriber for LogSubscriber {
    fn on_signal(&self, signal: &TradingSignal) {
        debug!(
            signal_type = signal.signal_type.as_str(),
            direction = signal.direction.as_str(),
            confidence = signal.confidence,
            "signal detected: {}",
            signal.message
        );
    }

    fn on_alert(&self, alert: &AggregatedAlert) {
        info!(
            level = alert.level.as_str(),
            confidence = alert.overall_confidence,
            signals = alert.signals.len(),
            "alert generated: {}",
            alert.title
        );
    }
}
