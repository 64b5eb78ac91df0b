use serde::{Deserialize, Serialize};

use stockalloc_core::{OrderId, Sku, ValueObject};

/// A request for a quantity of a SKU on behalf of an order.
///
/// Equality and hashing cover all three fields, so two identical lines are
/// the same line as far as a batch's allocations are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    order_id: OrderId,
    sku: Sku,
    quantity: i64,
}

impl OrderLine {
    pub fn new(order_id: impl Into<OrderId>, sku: impl Into<Sku>, quantity: i64) -> Self {
        Self {
            order_id: order_id.into(),
            sku: sku.into(),
            quantity,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

impl ValueObject for OrderLine {}
