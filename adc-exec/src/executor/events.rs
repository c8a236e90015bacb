use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Event {
    BatchStarted {
        operation: String,
        items: usize,
    },
    BatchFinished {
        succeeded: usize,
        failed: usize,
        aborted: bool,
    },
    ItemStarted {
        index: usize,
    },
    ItemSucceeded {
        index: usize,
    },
    ItemFailed {
        index: usize,
        kind: &'static str,
        message: String,
        continued: bool,
    },
}

impl Event {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Event::BatchStarted { operation, items } => json!({
                "type": "batch.started",
                "operation": operation,
                "items": items,
            }),
            Event::BatchFinished {
                succeeded,
                failed,
                aborted,
            } => json!({
                "type": "batch.finished",
                "succeeded": succeeded,
                "failed": failed,
                "aborted": aborted,
            }),
            Event::ItemStarted { index } => json!({ "type": "item.started", "index": index }),
            Event::ItemSucceeded { index } => json!({ "type": "item.succeeded", "index": index }),
            Event::ItemFailed {
                index,
                kind,
                message,
                continued,
            } => json!({
                "type": "item.failed",
                "index": index,
                "kind": kind,
                "message": message,
                "continued": continued,
            }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

/// Fans each event out to every inner sink, in insertion order.
#[derive(Default)]
pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes one JSON object per event to stderr, keeping stdout free for output items.
pub struct StderrEventSink;

#[async_trait]
impl EventSink for StderrEventSink {
    async fn emit(&self, event: Event) {
        eprintln!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to `tracing` at debug level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        debug!(event = %event.to_json(), "batch event");
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
