//! Stock allocation domain module.
//!
//! Decides which single batch of stock fulfils an order line. Everything here
//! is deterministic, in-memory domain logic (no IO, no storage): callers
//! build [`Batch`] and [`OrderLine`] values, call [`allocate`], and persist
//! whatever changed.

pub mod batch;
pub mod error;
pub mod order_line;
pub mod service;

pub use batch::Batch;
pub use error::{AllocationResult, OutOfStock};
pub use order_line::OrderLine;
pub use service::allocate;

pub use stockalloc_core::{OrderId, Reference, Sku};
