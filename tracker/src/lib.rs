//! Tracks page visits against a collector.
//!
//! A [`Tracker`] checks whether a visit should be counted, creates a record for it and then refreshes that
//! record every [`REFRESH_INTERVAL`] so the collector can derive how long the visit lasted. The returned
//! [`Session`] controls the heartbeat.

#[macro_use]
extern crate tracing;

pub mod api;
pub mod attributes;
pub mod bootstrap;
pub mod eligibility;
pub mod environment;
mod session;
mod tracker;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::{
    ActionId,
    RecordId,
};
pub use attributes::{
    ActionAttributes,
    Attributes,
};
pub use bootstrap::Bootstrap;
pub use environment::Environment;
pub use session::{
    Callbacks,
    Session,
    FAILURE_BACKLOG,
    REFRESH_INTERVAL,
};
pub use tracker::Tracker;
pub use transport::{
    HttpTransport,
    Transport,
    TransportError,
};
