//! Allocation error model.

use stockalloc_core::Sku;
use thiserror::Error;

/// Result type returned by the allocation service.
pub type AllocationResult<T> = Result<T, OutOfStock>;

/// No batch in the supplied collection can satisfy an order line.
///
/// Either no batch carries the line's SKU, or every matching batch has less
/// available quantity than requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("out of stock: sku {sku} is not available in sufficient quantity")]
pub struct OutOfStock {
    pub sku: Sku,
}

impl OutOfStock {
    pub fn new(sku: impl Into<Sku>) -> Self {
        Self { sku: sku.into() }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }
}
