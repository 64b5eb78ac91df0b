//! Domain service: pick the batch that fulfils an order line.

use stockalloc_core::Reference;

use crate::batch::Batch;
use crate::error::{AllocationResult, OutOfStock};
use crate::order_line::OrderLine;

/// Allocate `line` to the highest-priority batch that can take it.
///
/// Batches already in the warehouse (no ETA) are used before shipments, and
/// shipments in order of ETA. Batches of equal priority are tried in the order
/// given; the caller's collection itself is not reordered.
///
/// On success exactly one batch is mutated and its reference returned. When no
/// batch can take the line, nothing is mutated and [`OutOfStock`] names the
/// line's SKU.
///
/// Taking `&mut Batch` keeps the eligibility check and the mutation under one
/// exclusive borrow; callers sharing batches across requests still have to
/// serialize access themselves.
pub fn allocate<'a, I>(line: &OrderLine, batches: I) -> AllocationResult<Reference>
where
    I: IntoIterator<Item = &'a mut Batch>,
{
    let mut candidates: Vec<&mut Batch> = batches.into_iter().collect();
    candidates.sort_by(|a, b| a.cmp_priority(b));

    let Some(batch) = candidates
        .into_iter()
        .find(|batch| batch.can_allocate(line))
    else {
        tracing::warn!(
            order_id = %line.order_id(),
            sku = %line.sku(),
            quantity = line.quantity(),
            "no batch can fulfil order line"
        );
        return Err(OutOfStock::new(line.sku().clone()));
    };

    batch.allocate(line);
    tracing::debug!(
        order_id = %line.order_id(),
        sku = %line.sku(),
        quantity = line.quantity(),
        batch = %batch.reference(),
        available = batch.available_quantity(),
        "order line allocated"
    );
    Ok(batch.reference().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        today() + Days::new(1)
    }

    fn later() -> NaiveDate {
        today() + Days::new(10)
    }

    #[test]
    fn prefers_current_stock_batches_to_shipments() {
        let mut in_stock = Batch::new("in-stock-batch", "RETRO-CLOCK", 100, None);
        let mut shipment = Batch::new("shipment-batch", "RETRO-CLOCK", 100, Some(tomorrow()));
        let line = OrderLine::new("oref", "RETRO-CLOCK", 10);

        allocate(&line, [&mut in_stock, &mut shipment]).unwrap();

        assert_eq!(in_stock.available_quantity(), 90);
        assert_eq!(shipment.available_quantity(), 100);
    }

    #[test]
    fn prefers_earlier_batches() {
        let mut batches = vec![
            Batch::new("slow-batch", "MINIMALIST-SPOON", 100, Some(later())),
            Batch::new("medium-batch", "MINIMALIST-SPOON", 100, Some(tomorrow())),
            Batch::new("speedy-batch", "MINIMALIST-SPOON", 100, Some(today())),
        ];
        let line = OrderLine::new("order1", "MINIMALIST-SPOON", 10);

        let reference = allocate(&line, batches.iter_mut()).unwrap();

        assert_eq!(reference, "speedy-batch");
        assert_eq!(batches[0].available_quantity(), 100);
        assert_eq!(batches[1].available_quantity(), 100);
        assert_eq!(batches[2].available_quantity(), 90);
    }

    #[test]
    fn returns_allocated_batch_ref() {
        let mut in_stock = Batch::new("in-stock-batch-ref", "HIGHBROW-POSTER", 100, None);
        let mut shipment = Batch::new("shipment-batch-ref", "HIGHBROW-POSTER", 100, Some(tomorrow()));
        let line = OrderLine::new("oref", "HIGHBROW-POSTER", 10);

        let reference = allocate(&line, [&mut in_stock, &mut shipment]).unwrap();

        assert_eq!(&reference, in_stock.reference());
    }

    #[test]
    fn skips_ineligible_batches() {
        let mut small = Batch::new("small", "LAMP", 1, None);
        let mut wrong_sku = Batch::new("wrong-sku", "CHAIR", 100, None);
        let mut shipment = Batch::new("shipment", "LAMP", 100, Some(later()));
        let line = OrderLine::new("o-1", "LAMP", 5);

        let reference = allocate(&line, [&mut small, &mut wrong_sku, &mut shipment]).unwrap();

        assert_eq!(reference, "shipment");
        assert_eq!(small.available_quantity(), 1);
        assert_eq!(wrong_sku.available_quantity(), 100);
        assert_eq!(shipment.available_quantity(), 95);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut batches = vec![
            Batch::new("first", "LAMP", 10, None),
            Batch::new("second", "LAMP", 10, None),
        ];
        let line = OrderLine::new("o-1", "LAMP", 1);

        assert_eq!(allocate(&line, batches.iter_mut()).unwrap(), "first");
        assert_eq!(batches[0].reference(), "first");
    }

    #[test]
    fn shipments_with_the_same_eta_keep_input_order() {
        let mut batches = vec![
            Batch::new("second", "LAMP", 10, Some(tomorrow())),
            Batch::new("first", "LAMP", 10, Some(tomorrow())),
            Batch::new("third", "LAMP", 10, Some(later())),
        ];
        let line = OrderLine::new("o-1", "LAMP", 1);

        assert_eq!(allocate(&line, batches.iter_mut()).unwrap(), "second");
        assert_eq!(batches[0].available_quantity(), 9);
        assert_eq!(batches[1].available_quantity(), 10);
    }

    #[test]
    fn raises_out_of_stock_exception_if_cannot_allocate() {
        let mut batch = Batch::new("batch1", "SMALL-FORK", 10, Some(today()));
        allocate(&OrderLine::new("order1", "SMALL-FORK", 10), [&mut batch]).unwrap();

        let err = allocate(&OrderLine::new("order2", "SMALL-FORK", 1), [&mut batch]).unwrap_err();

        assert_eq!(err, OutOfStock::new("SMALL-FORK"));
        assert_eq!(batch.available_quantity(), 0);
    }

    #[test]
    fn out_of_stock_when_no_batch_carries_the_sku() {
        let mut batches = vec![
            Batch::new("chairs", "CHAIR", 1_000, None),
            Batch::new("vases", "VASE", 1_000, Some(today())),
        ];
        let line = OrderLine::new("o-1", "LAMP", 1);

        let err = allocate(&line, batches.iter_mut()).unwrap_err();

        assert_eq!(err, OutOfStock::new("LAMP"));
        for batch in &batches {
            assert_eq!(batch.available_quantity(), 1_000);
            assert_eq!(batch.allocations().count(), 0);
        }
    }

    #[test]
    fn out_of_stock_with_no_batches() {
        let line = OrderLine::new("o-1", "LAMP", 1);
        let err = allocate(&line, Vec::<&mut Batch>::new()).unwrap_err();
        assert_eq!(err.sku(), line.sku());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: an eligible in-stock batch always wins over any shipment.
        #[test]
        fn in_stock_always_wins(offset in 0u64..3650, qty in 1i64..100) {
            let mut shipment = Batch::new("shipment", "LAMP", 100, Some(today() + Days::new(offset)));
            let mut in_stock = Batch::new("in-stock", "LAMP", 100, None);
            let line = OrderLine::new("o-1", "LAMP", qty);

            let reference = allocate(&line, [&mut shipment, &mut in_stock]).unwrap();

            prop_assert_eq!(reference, Reference::new("in-stock"));
            prop_assert_eq!(shipment.available_quantity(), 100);
        }

        /// Property: between two eligible shipments the earlier ETA wins.
        #[test]
        fn earliest_eta_wins(a in 0u64..3650, b in 0u64..3650) {
            prop_assume!(a != b);
            let mut first = Batch::new("a", "LAMP", 100, Some(today() + Days::new(a)));
            let mut second = Batch::new("b", "LAMP", 100, Some(today() + Days::new(b)));
            let line = OrderLine::new("o-1", "LAMP", 1);

            let reference = allocate(&line, [&mut first, &mut second]).unwrap();

            let expected = if a < b { "a" } else { "b" };
            prop_assert_eq!(reference.as_str(), expected);
        }

        /// Property: when nothing is eligible the error names the SKU and no
        /// batch changes.
        #[test]
        fn exhaustion_mutates_nothing(
            capacities in prop::collection::vec(0i64..50, 0..8),
            extra in 1i64..50,
        ) {
            let requested = capacities.iter().copied().max().unwrap_or(0) + extra;
            let mut batches: Vec<Batch> = capacities
                .iter()
                .enumerate()
                .map(|(i, qty)| Batch::new(format!("batch-{i}"), "LAMP", *qty, None))
                .collect();
            let line = OrderLine::new("o-1", "LAMP", requested);

            let err = allocate(&line, batches.iter_mut()).unwrap_err();

            prop_assert_eq!(err.sku(), line.sku());
            for (batch, qty) in batches.iter().zip(capacities) {
                prop_assert_eq!(batch.available_quantity(), qty);
            }
        }
    }
}
