#![forbid(unsafe_code)]

//! Runs a batch of items against a Citrix ADC appliance.
//!
//! The host supplies items, parameters and binary attachments through [`Host`];
//! the appliance is reached through an [`AdcTransport`].

pub mod credentials;
pub mod executor;
pub mod host;

pub use crate::credentials::AdcCredentials;
pub use crate::executor::{
    plan_batch, AdcTransport, BatchOutcome, CompositeEventSink, Event, EventSink, Executor,
    NoOpEventSink, PlannedItem, ReqwestTransport, StderrEventSink, TracingEventSink,
    TransportConfig,
};
pub use crate::host::{Host, StaticHost};
