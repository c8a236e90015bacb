use std::sync::Arc;

use adc_core::{AdcError, Operation, OutputItem, RequestSpec, Resource, ResourceOperation};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::executor::events::{Event, EventSink};
use crate::executor::http::AdcTransport;
use crate::executor::types::BatchOutcome;
use crate::executor::worker::{execute_item, prepare_item, Worker};
use crate::host::Host;

pub struct Executor {
    transport: Arc<dyn AdcTransport>,
    event_sink: Arc<dyn EventSink>,
}

impl Executor {
    pub fn new(transport: Arc<dyn AdcTransport>, event_sink: Arc<dyn EventSink>) -> Self {
        Self {
            transport,
            event_sink,
        }
    }

    /// Runs every item of the host's batch, strictly in order.
    ///
    /// With continue-on-fail enabled the outcome holds exactly one output item per
    /// input item. Otherwise the first failure is returned and nothing else is.
    pub async fn execute(&self, host: &dyn Host) -> Result<BatchOutcome, AdcError> {
        let total = host.items().len();
        let mut outcome = BatchOutcome::default();
        if total == 0 {
            return Ok(outcome);
        }

        // Resource and operation are read once, from the first item.
        let op = match resolve_operation(host) {
            Ok(op) => op,
            Err(e) => return self.fail_whole_batch(host, e).await,
        };

        info!(%op, items = total, "starting batch");
        self.event_sink
            .emit(Event::BatchStarted {
                operation: op.to_string(),
                items: total,
            })
            .await;

        let worker = Worker {
            host,
            transport: self.transport.as_ref(),
        };

        for index in 0..total {
            self.event_sink.emit(Event::ItemStarted { index }).await;
            match execute_item(&worker, op, index).await {
                Ok(item) => {
                    self.event_sink.emit(Event::ItemSucceeded { index }).await;
                    outcome.record_success(item);
                }
                Err(e) => {
                    let continued = host.continue_on_fail();
                    self.emit_item_failed(index, &e, continued).await;
                    if !continued {
                        warn!(index, error = %e, "item failed, aborting batch");
                        self.emit_finished(&outcome, true).await;
                        return Err(e);
                    }
                    warn!(index, error = %e, "item failed, continuing");
                    outcome.record_failure(OutputItem::error(index, e.to_string()));
                }
            }
        }

        info!(succeeded = outcome.succeeded, failed = outcome.failed, "batch finished");
        self.emit_finished(&outcome, false).await;
        Ok(outcome)
    }

    /// Selector failure: every item fails the same way.
    async fn fail_whole_batch(
        &self,
        host: &dyn Host,
        e: AdcError,
    ) -> Result<BatchOutcome, AdcError> {
        let mut outcome = BatchOutcome::default();
        if !host.continue_on_fail() {
            self.emit_item_failed(0, &e, false).await;
            self.emit_finished(&outcome, true).await;
            return Err(e);
        }
        for index in 0..host.items().len() {
            self.emit_item_failed(index, &e, true).await;
            outcome.record_failure(OutputItem::error(index, e.to_string()));
        }
        self.emit_finished(&outcome, false).await;
        Ok(outcome)
    }

    async fn emit_item_failed(&self, index: usize, e: &AdcError, continued: bool) {
        self.event_sink
            .emit(Event::ItemFailed {
                index,
                kind: e.kind(),
                message: e.to_string(),
                continued,
            })
            .await;
    }

    async fn emit_finished(&self, outcome: &BatchOutcome, aborted: bool) {
        self.event_sink
            .emit(Event::BatchFinished {
                succeeded: outcome.succeeded,
                failed: outcome.failed,
                aborted,
            })
            .await;
    }
}

/// Request an item would send, or why it could not be built.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub index: usize,
    pub request: Result<RequestSpec, AdcError>,
}

/// Builds every item's request without contacting the appliance.
pub async fn plan_batch(host: &dyn Host) -> Result<Vec<PlannedItem>, AdcError> {
    if host.items().is_empty() {
        return Ok(Vec::new());
    }
    let op = resolve_operation(host)?;
    let mut planned = Vec::with_capacity(host.items().len());
    for index in 0..host.items().len() {
        let request = prepare_item(host, op, index).await.map(|p| p.request);
        planned.push(PlannedItem { index, request });
    }
    Ok(planned)
}

fn resolve_operation(host: &dyn Host) -> Result<ResourceOperation, AdcError> {
    let resource =
        selector(host, "resource")?.unwrap_or_else(|| Resource::File.as_str().to_string());
    let operation = match selector(host, "operation")? {
        Some(o) => o,
        None => default_operation(&resource).to_string(),
    };
    ResourceOperation::parse(&resource, &operation)
}

fn selector(host: &dyn Host, name: &str) -> Result<Option<String>, AdcError> {
    match host.parameter(name, 0) {
        None => Ok(None),
        Some(JsonValue::Null) => Err(AdcError::invalid_parameter(name, "resolved to null")),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(_) => Err(AdcError::invalid_parameter(name, "must be a string")),
    }
}

fn default_operation(resource: &str) -> &'static str {
    match resource {
        "certificate" => Operation::Create.as_str(),
        _ => Operation::Upload.as_str(),
    }
}
