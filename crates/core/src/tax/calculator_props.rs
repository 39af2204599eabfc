//! Property-based tests for TaxCalculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::document::LineItem;
use crate::tax::calculator::TaxCalculator;
use crate::tax::types::{TaxSettings, TaxType};

/// Strategy for amounts with two decimal places, 0.00 to 10,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for rates with two decimal places, 0.00% to 100.00%.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..10_000).prop_map(|basis| Decimal::new(basis, 2))
}

fn arb_tax_type() -> impl Strategy<Value = TaxType> {
    prop_oneof![
        Just(TaxType::Exclusive),
        Just(TaxType::Inclusive),
        Just(TaxType::PerItem),
        Just(TaxType::Overall),
    ]
}

fn arb_item() -> impl Strategy<Value = LineItem> {
    (
        1i64..1_000,
        arb_amount(),
        proptest::option::of(arb_rate()),
    )
        .prop_map(|(quantity, price, rate)| {
            let mut item = LineItem::new("Item", Decimal::from(quantity), price);
            item.tax_rate = rate;
            item
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Exclusive: total − tax equals the subtotal exactly.
    #[test]
    fn prop_exclusive_round_trip(subtotal in arb_amount(), rate in arb_rate()) {
        let settings = TaxSettings::new(TaxType::Exclusive, rate);
        let items = vec![LineItem::new("Item", Decimal::ONE, subtotal)];

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.total - totals.tax_amount, subtotal);
    }

    /// Inclusive: total equals the subtotal and tax equals S − S/(1+R/100).
    #[test]
    fn prop_inclusive_round_trip(subtotal in arb_amount(), rate in arb_rate()) {
        let settings = TaxSettings::new(TaxType::Inclusive, rate);
        let items = vec![LineItem::new("Item", Decimal::ONE, subtotal)];

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        prop_assert_eq!(totals.total, subtotal);
        let net = subtotal / (Decimal::ONE + rate / Decimal::ONE_HUNDRED);
        prop_assert_eq!(totals.tax_amount.round_dp(10), (subtotal - net).round_dp(10));
    }

    /// Recomputing the same items yields identical output.
    #[test]
    fn prop_recompute_is_idempotent(
        items in proptest::collection::vec(arb_item(), 0..12),
        tax_type in arb_tax_type(),
        rate in arb_rate(),
    ) {
        let settings = TaxSettings::new(tax_type, rate);

        let first = TaxCalculator::compute_document_totals(&items, &settings);
        let second = TaxCalculator::compute_document_totals(&items, &settings);

        prop_assert_eq!(first, second);
    }

    /// Per-item totals are the sums of the line computations.
    #[test]
    fn prop_per_item_totals_are_line_sums(
        items in proptest::collection::vec(arb_item(), 1..12),
        rate in arb_rate(),
    ) {
        let settings = TaxSettings::new(TaxType::PerItem, rate);

        let totals = TaxCalculator::compute_document_totals(&items, &settings);
        let lines: Vec<_> = items
            .iter()
            .map(|item| TaxCalculator::compute_item(item, &settings))
            .collect();

        prop_assert_eq!(totals.tax_amount, lines.iter().map(|l| l.tax_amount).sum::<Decimal>());
        prop_assert_eq!(totals.total, lines.iter().map(|l| l.total).sum::<Decimal>());
    }
}
