//! Appointment storage boundary.
//!
//! The storage service is an opaque external actor reachable only via
//! asynchronous request/response. This crate defines the
//! [`AppointmentStore`] trait that models it, the [`StoreError`] taxonomy,
//! an HTTP implementation ([`HttpStore`]), and an in-memory implementation
//! ([`MemoryStore`]) so the client's core logic is testable without a
//! running service.

pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{AppointmentStore, BoxFuture, ErrorStore};
