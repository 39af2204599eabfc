//! Pure tax computation.
//!
//! Nothing here performs I/O or keeps state, and nothing here fails: a
//! computation that would overflow or divide by zero yields zero tax rather
//! than an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::document::LineItem;
use crate::tax::types::{TaxSettings, TaxType};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computed amounts for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    /// Line total (includes tax only in per-item mode).
    pub total: Decimal,
    /// Tax attributable to the line.
    pub tax_amount: Decimal,
}

/// Computed document totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    /// Sum of quantity × unit price.
    pub subtotal: Decimal,
    /// Document tax.
    pub tax_amount: Decimal,
    /// Document total before any discount.
    pub total: Decimal,
}

/// Stateless tax calculator.
pub struct TaxCalculator;

impl TaxCalculator {
    /// Computes the total and tax of a single line.
    ///
    /// # Arguments
    /// * `quantity` - Line quantity
    /// * `unit_price` - Price per unit
    /// * `tax_rate` - Explicit line rate; `None` uses `settings.default_rate`
    /// * `settings` - Document tax settings
    ///
    /// # Returns
    /// Line amounts under the document's tax mode:
    /// - exclusive: tax = base × rate / 100, total = base
    /// - inclusive: tax = base × rate / (100 + rate), total = base
    /// - per-item: tax = base × rate / 100, total = base + tax
    /// - overall: no line tax, total = base
    #[must_use]
    pub fn compute_line_item(
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Option<Decimal>,
        settings: &TaxSettings,
    ) -> LineAmounts {
        let rate = tax_rate.unwrap_or(settings.default_rate);
        Self::line_amounts(Self::base(quantity, unit_price), rate, settings.tax_type)
    }

    /// Computes the amounts of a stored line item, honouring category rates.
    #[must_use]
    pub fn compute_item(item: &LineItem, settings: &TaxSettings) -> LineAmounts {
        let rate = settings.rate_for(item.tax_rate, item.category.as_deref());
        Self::line_amounts(
            Self::base(item.quantity, item.unit_price),
            rate,
            settings.tax_type,
        )
    }

    /// Computes document subtotal, tax and total.
    ///
    /// Line totals stored on the items are ignored; every line is computed
    /// afresh from quantity, price and rate.
    #[must_use]
    pub fn compute_document_totals(items: &[LineItem], settings: &TaxSettings) -> DocumentTotals {
        let subtotal = items
            .iter()
            .map(|item| Self::base(item.quantity, item.unit_price))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let rate = settings.default_rate;

        match settings.tax_type {
            TaxType::Exclusive | TaxType::Overall => {
                let tax_amount = Self::added_tax(subtotal, rate);
                DocumentTotals {
                    subtotal,
                    tax_amount,
                    total: subtotal.saturating_add(tax_amount),
                }
            }
            TaxType::Inclusive => DocumentTotals {
                subtotal,
                tax_amount: Self::carved_tax(subtotal, rate),
                total: subtotal,
            },
            TaxType::PerItem => {
                let (tax_amount, total) = items
                    .iter()
                    .map(|item| Self::compute_item(item, settings))
                    .fold((Decimal::ZERO, Decimal::ZERO), |(tax, total), line| {
                        (
                            tax.saturating_add(line.tax_amount),
                            total.saturating_add(line.total),
                        )
                    });
                DocumentTotals {
                    subtotal,
                    tax_amount,
                    total,
                }
            }
        }
    }

    fn line_amounts(base: Decimal, rate: Decimal, tax_type: TaxType) -> LineAmounts {
        match tax_type {
            TaxType::Exclusive => LineAmounts {
                total: base,
                tax_amount: Self::added_tax(base, rate),
            },
            TaxType::Inclusive => LineAmounts {
                total: base,
                tax_amount: Self::carved_tax(base, rate),
            },
            TaxType::PerItem => {
                let tax_amount = Self::added_tax(base, rate);
                LineAmounts {
                    total: base.saturating_add(tax_amount),
                    tax_amount,
                }
            }
            TaxType::Overall => LineAmounts {
                total: base,
                tax_amount: Decimal::ZERO,
            },
        }
    }

    fn base(quantity: Decimal, unit_price: Decimal) -> Decimal {
        quantity.checked_mul(unit_price).unwrap_or(Decimal::ZERO)
    }

    /// amount × rate / 100
    fn added_tax(amount: Decimal, rate: Decimal) -> Decimal {
        amount
            .checked_mul(rate)
            .and_then(|v| v.checked_div(HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// amount × rate / (100 + rate)
    fn carved_tax(amount: Decimal, rate: Decimal) -> Decimal {
        HUNDRED
            .checked_add(rate)
            .filter(|divisor| !divisor.is_zero())
            .and_then(|divisor| amount.checked_mul(rate)?.checked_div(divisor))
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal) -> LineItem {
        LineItem::new("Widget", quantity, unit_price)
    }

    #[test]
    fn test_exclusive_example_totals() {
        let items = vec![item(dec!(2), dec!(100)), item(dec!(1), dec!(50))];
        let settings = TaxSettings::new(TaxType::Exclusive, dec!(16));

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        assert_eq!(totals.subtotal, dec!(250));
        assert_eq!(totals.tax_amount, dec!(40));
        assert_eq!(totals.total, dec!(290));
    }

    #[test]
    fn test_inclusive_carves_tax() {
        let items = vec![item(dec!(1), dec!(116))];
        let settings = TaxSettings::new(TaxType::Inclusive, dec!(16));

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        assert_eq!(totals.subtotal, dec!(116));
        assert_eq!(totals.tax_amount, dec!(16));
        assert_eq!(totals.total, dec!(116));
    }

    #[test]
    fn test_per_item_sums_lines() {
        let mut zero_rated = item(dec!(1), dec!(100));
        zero_rated.tax_rate = Some(dec!(0));
        let mut food = item(dec!(2), dec!(50));
        food.category = Some("food".to_string());
        let items = vec![zero_rated, food, item(dec!(1), dec!(10))];
        let settings = TaxSettings::new(TaxType::PerItem, dec!(16)).with_custom_rate("food", dec!(8));

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        assert_eq!(totals.subtotal, dec!(210));
        // 0 + 8 + 1.6
        assert_eq!(totals.tax_amount, dec!(9.6));
        assert_eq!(totals.total, dec!(219.6));
    }

    #[test]
    fn test_overall_ignores_line_rates() {
        let mut high = item(dec!(1), dec!(100));
        high.tax_rate = Some(dec!(30));
        let items = vec![high, item(dec!(1), dec!(100))];
        let settings = TaxSettings::new(TaxType::Overall, dec!(10));

        let totals = TaxCalculator::compute_document_totals(&items, &settings);

        assert_eq!(totals.tax_amount, dec!(20));
        assert_eq!(totals.total, dec!(220));

        let line = TaxCalculator::compute_item(&items[0], &settings);
        assert_eq!(line.tax_amount, Decimal::ZERO);
        assert_eq!(line.total, dec!(100));
    }

    #[rstest]
    #[case(TaxType::Exclusive, dec!(200), dec!(32))]
    #[case(TaxType::Inclusive, dec!(200), dec!(27.5862068966))]
    #[case(TaxType::PerItem, dec!(232), dec!(32))]
    #[case(TaxType::Overall, dec!(200), dec!(0))]
    fn test_line_item_by_mode(
        #[case] tax_type: TaxType,
        #[case] expected_total: Decimal,
        #[case] expected_tax: Decimal,
    ) {
        let settings = TaxSettings::new(tax_type, dec!(16));
        let line = TaxCalculator::compute_line_item(dec!(2), dec!(100), None, &settings);
        assert_eq!(line.total, expected_total);
        assert_eq!(line.tax_amount.round_dp(10), expected_tax);
    }

    #[test]
    fn test_missing_values_default_to_zero() {
        let settings = TaxSettings::default();
        let line = TaxCalculator::compute_line_item(Decimal::ZERO, dec!(100), None, &settings);
        assert_eq!(line.total, Decimal::ZERO);
        assert_eq!(line.tax_amount, Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_inclusive_rate_is_not_fatal() {
        let settings = TaxSettings::new(TaxType::Inclusive, dec!(-100));
        let totals = TaxCalculator::compute_document_totals(&[item(dec!(1), dec!(10))], &settings);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, dec!(10));
    }

    #[test]
    fn test_empty_items() {
        let totals = TaxCalculator::compute_document_totals(&[], &TaxSettings::default());
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }
}
