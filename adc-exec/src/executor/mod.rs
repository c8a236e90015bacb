mod batch;
pub mod events;
pub mod http;
mod types;
mod worker;

pub use batch::{plan_batch, Executor, PlannedItem};
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StderrEventSink, TracingEventSink,
};
pub use http::{AdcTransport, ReqwestTransport, TransportError};
pub use types::{BatchOutcome, TransportConfig};
pub use worker::ItemResult;
