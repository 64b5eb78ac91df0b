use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockalloc_core::{Entity, Reference, Sku};

use crate::order_line::OrderLine;

/// Entity: a purchased quantity of one SKU, optionally still in transit.
///
/// A batch is identified by its [`Reference`] alone: equality and hashing
/// ignore the SKU, ETA and allocation state, so a batch stays at the same
/// place in a set or map while lines are allocated against it.
///
/// Quantities are always derived from the allocation set and never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BatchRecord")]
pub struct Batch {
    reference: Reference,
    sku: Sku,
    eta: Option<NaiveDate>,
    purchased_quantity: i64,
    allocations: HashSet<OrderLine>,
}

/// Persisted shape of a batch. Stored allocations are replayed through
/// [`Batch::allocate`] in record order, so lines that no longer fit (or carry
/// another SKU) are dropped rather than oversubscribing the batch.
#[derive(Debug, Deserialize)]
struct BatchRecord {
    reference: Reference,
    sku: Sku,
    #[serde(default)]
    eta: Option<NaiveDate>,
    purchased_quantity: i64,
    #[serde(default)]
    allocations: Vec<OrderLine>,
}

impl From<BatchRecord> for Batch {
    fn from(record: BatchRecord) -> Self {
        let mut batch = Batch::new(
            record.reference,
            record.sku,
            record.purchased_quantity,
            record.eta,
        );
        for line in &record.allocations {
            batch.allocate(line);
        }
        batch
    }
}

impl Batch {
    /// A batch with no allocations. `eta: None` means the stock is already in
    /// the warehouse.
    pub fn new(
        reference: impl Into<Reference>,
        sku: impl Into<Sku>,
        purchased_quantity: i64,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity,
            allocations: HashSet::new(),
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> i64 {
        self.purchased_quantity
    }

    /// Lines currently allocated to this batch, in no particular order.
    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> {
        self.allocations.iter()
    }

    pub fn is_allocated(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    pub fn allocated_quantity(&self) -> i64 {
        self.allocations.iter().map(OrderLine::quantity).sum()
    }

    pub fn available_quantity(&self) -> i64 {
        self.purchased_quantity - self.allocated_quantity()
    }

    /// Same SKU and enough available quantity.
    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == *line.sku() && self.available_quantity() >= line.quantity()
    }

    /// Reserve capacity for `line`.
    ///
    /// Does nothing when [`Batch::can_allocate`] is false. Allocating a line
    /// that is already allocated here is also a no-op.
    pub fn allocate(&mut self, line: &OrderLine) {
        if !self.can_allocate(line) {
            tracing::trace!(
                batch = %self.reference,
                order_id = %line.order_id(),
                sku = %line.sku(),
                quantity = line.quantity(),
                "batch cannot take order line; skipping"
            );
            return;
        }
        self.allocations.insert(line.clone());
    }

    /// Release `line` if it is allocated here; no-op otherwise.
    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.remove(line);
    }

    /// Allocation priority: batches without an ETA (in stock) come first,
    /// then by earliest ETA. Equal priorities compare `Equal`, so a stable
    /// sort keeps their input order.
    ///
    /// This is deliberately not `Ord`: batches are equal by reference, not by
    /// ETA.
    pub fn cmp_priority(&self, other: &Batch) -> Ordering {
        // `None < Some(_)` for `Option`, which is exactly "in stock first".
        self.eta.cmp(&other.eta)
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.same_entity(other)
    }
}

impl Eq for Batch {}

impl Hash for Batch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl Entity for Batch {
    type Id = Reference;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

impl core::fmt::Display for Batch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "<Batch {}>", self.reference)
    }
}
