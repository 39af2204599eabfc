//! Property tests for the numbering service.

use chrono::NaiveDate;
use proptest::prelude::*;

use docket_shared::config::{CounterConfig, NumberingConfig};
use docket_shared::types::ResetPeriod;
use docket_store::{MemoryStore, NumberingService};

fn number_part(formatted: &str) -> u64 {
    formatted
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Successive numbers within one period strictly increase.
    #[test]
    fn prop_numbers_increase_within_period(
        calls in 2usize..40,
        key in prop::sample::select(vec!["quote", "sales_order", "invoice", "purchase_order", "customer"]),
    ) {
        let numbering = NumberingService::new(MemoryStore::new(), &NumberingConfig::default());
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let numbers: Vec<u64> = (0..calls)
            .map(|_| number_part(&numbering.next_on(key, today).unwrap().value))
            .collect();

        prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(numbers[0], 1);
    }

    /// The first number issued is the configured start.
    #[test]
    fn prop_first_number_is_start_from(start in 1u64..100_000) {
        let mut config = NumberingConfig::default();
        config.counters.insert(
            "invoice".to_string(),
            CounterConfig {
                prefix: "INV".to_string(),
                format: "{prefix}-{number}".to_string(),
                start_from: start,
                reset_period: ResetPeriod::Monthly,
            },
        );
        let numbering = NumberingService::new(MemoryStore::new(), &config);
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();

        let first = numbering.next_on("invoice", today).unwrap();
        prop_assert_eq!(first.value, format!("INV-{start}"));

        let next_month = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        numbering.next_on("invoice", today).unwrap();
        let after_reset = numbering.next_on("invoice", next_month).unwrap();
        prop_assert_eq!(after_reset.value, format!("INV-{start}"));
    }
}
