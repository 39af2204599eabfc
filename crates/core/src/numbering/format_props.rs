//! Property-based tests for number formatting and counters.

use chrono::NaiveDate;
use proptest::prelude::*;

use docket_shared::config::CounterConfig;
use docket_shared::types::ResetPeriod;

use crate::numbering::counter::Counter;
use crate::numbering::format::format_number;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

fn arb_reset_period() -> impl Strategy<Value = ResetPeriod> {
    prop_oneof![
        Just(ResetPeriod::Never),
        Just(ResetPeriod::Yearly),
        Just(ResetPeriod::Monthly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Without a reset boundary, successive numbers strictly increase.
    #[test]
    fn prop_numbers_strictly_increase(
        start_from in 1u64..100_000,
        calls in 2usize..50,
        period in arb_reset_period(),
        today in arb_date(),
    ) {
        let rule = CounterConfig {
            prefix: "INV".into(),
            format: "{prefix}-{number}".into(),
            start_from,
            reset_period: period,
        };
        let mut counter = Counter::from_rule(&rule, today);

        let numbers: Vec<u64> = (0..calls).map(|_| counter.advance(today).number).collect();

        prop_assert_eq!(numbers[0], start_from);
        prop_assert!(numbers.windows(2).all(|pair| pair[1] > pair[0]));
    }

    /// `{number:0…0}` pads to exactly the zero-run width, never truncating.
    #[test]
    fn prop_padding_width(number in 0u64..10_000_000, width in 1usize..10, date in arb_date()) {
        let format = format!("{{number:{}}}", "0".repeat(width));

        let formatted = format_number(&format, "X", number, date);

        prop_assert_eq!(formatted.len(), width.max(number.to_string().len()));
        prop_assert_eq!(formatted.parse::<u64>().ok(), Some(number));
    }
}
