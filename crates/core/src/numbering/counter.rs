//! Counter state machine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use docket_shared::config::{CounterConfig, NumberingConfig};
use docket_shared::types::ResetPeriod;

use crate::document::DocumentType;
use crate::numbering::format::{format_number, needs_reset};

/// Format used by built-in document counters.
pub const DEFAULT_DOCUMENT_FORMAT: &str = "{prefix}-{year}-{number:0000}";

/// Format used by built-in entity counters.
pub const DEFAULT_ENTITY_FORMAT: &str = "{prefix}-{number:0000}";

/// Entity counters that exist alongside document counters.
pub const ENTITY_KEYS: [(&str, &str); 3] = [("customer", "CUS"), ("vendor", "VEN"), ("item", "ITM")];

/// A number handed out by the numbering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedNumber {
    /// The formatted number.
    pub value: String,
    /// False when the number came from the timestamp fallback and is not
    /// guaranteed unique.
    pub authoritative: bool,
}

impl GeneratedNumber {
    /// A number issued from a real counter.
    #[must_use]
    pub fn issued(value: String) -> Self {
        Self {
            value,
            authoritative: true,
        }
    }

    /// A number produced by the fallback path.
    #[must_use]
    pub fn fallback(value: String) -> Self {
        Self {
            value,
            authoritative: false,
        }
    }
}

/// Persisted state of one counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    /// Last number issued; `start_from - 1` before the first issue.
    pub current: u64,
    /// Value substituted for `{prefix}`.
    pub prefix: String,
    /// Format string.
    pub format: String,
    /// First number after creation or reset.
    #[serde(default = "one")]
    pub start_from: u64,
    /// When the counter starts over.
    #[serde(default)]
    pub reset_period: ResetPeriod,
    /// Date of creation or the last reset.
    #[serde(default)]
    pub last_reset: Option<NaiveDate>,
}

const fn one() -> u64 {
    1
}

/// Outcome of advancing a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// The numeric component issued.
    pub number: u64,
    /// The formatted number.
    pub formatted: String,
    /// Whether a reset boundary was crossed first.
    pub was_reset: bool,
}

impl Counter {
    /// Creates a counter from a rule, as of `today`.
    #[must_use]
    pub fn from_rule(rule: &CounterConfig, today: NaiveDate) -> Self {
        Self {
            current: rule.start_from.saturating_sub(1),
            prefix: rule.prefix.clone(),
            format: rule.format.clone(),
            start_from: rule.start_from,
            reset_period: rule.reset_period,
            last_reset: Some(today),
        }
    }

    /// Adopts a new rule while keeping the issued position.
    pub fn apply_rule(&mut self, rule: &CounterConfig) {
        self.prefix.clone_from(&rule.prefix);
        self.format.clone_from(&rule.format);
        self.start_from = rule.start_from;
        self.reset_period = rule.reset_period;
    }

    /// Starts the counter over so the next issue is `start_from`.
    pub fn reset(&mut self, today: NaiveDate) {
        self.current = self.start_from.saturating_sub(1);
        self.last_reset = Some(today);
    }

    /// Issues the next number, resetting first if a boundary was crossed.
    pub fn advance(&mut self, today: NaiveDate) -> Advance {
        let was_reset = needs_reset(self.reset_period, self.last_reset, today);
        if was_reset {
            self.reset(today);
        } else if self.last_reset.is_none() {
            self.last_reset = Some(today);
        }
        self.current = self.current.saturating_add(1);
        Advance {
            number: self.current,
            formatted: format_number(&self.format, &self.prefix, self.current, today),
            was_reset,
        }
    }

    /// The number the next [`advance`](Self::advance) would issue.
    #[must_use]
    pub fn preview(&self, today: NaiveDate) -> String {
        self.clone().advance(today).formatted
    }
}

/// Counter rules by key: built-in defaults overlaid with configuration and
/// runtime `configure` calls.
#[derive(Debug, Clone, Default)]
pub struct NumberingRules {
    rules: BTreeMap<String, CounterConfig>,
}

impl NumberingRules {
    /// Default rules for every document type and entity type.
    #[must_use]
    pub fn builtin() -> Self {
        let documents = DocumentType::ALL.iter().map(|document_type| {
            (
                document_type.as_str().to_string(),
                CounterConfig {
                    prefix: document_type.default_prefix().to_string(),
                    format: DEFAULT_DOCUMENT_FORMAT.to_string(),
                    start_from: 1,
                    reset_period: ResetPeriod::Never,
                },
            )
        });
        let entities = ENTITY_KEYS.iter().map(|(key, prefix)| {
            (
                (*key).to_string(),
                CounterConfig {
                    prefix: (*prefix).to_string(),
                    format: DEFAULT_ENTITY_FORMAT.to_string(),
                    start_from: 1,
                    reset_period: ResetPeriod::Never,
                },
            )
        });
        Self {
            rules: documents.chain(entities).collect(),
        }
    }

    /// Built-in rules overlaid with configured counters.
    #[must_use]
    pub fn from_config(config: &NumberingConfig) -> Self {
        let mut rules = Self::builtin();
        for (key, rule) in &config.counters {
            rules.set(key, rule.clone());
        }
        rules
    }

    /// An empty rule set; every key falls back.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Looks up the rule for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CounterConfig> {
        self.rules.get(&normalize_key(key))
    }

    /// Inserts or replaces the rule for a key.
    pub fn set(&mut self, key: &str, rule: CounterConfig) {
        self.rules.insert(normalize_key(key), rule);
    }
}

/// Normalizes a counter key (`"Sales Order"` → `"sales_order"`).
#[must_use]
pub fn normalize_key(key: &str) -> String {
    DocumentType::parse(key).map_or_else(
        || key.trim().to_lowercase().replace(['-', ' '], "_"),
        |document_type| document_type.as_str().to_string(),
    )
}

/// All persisted counters, keyed by normalized key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterBook {
    counters: BTreeMap<String, Counter>,
}

impl CounterBook {
    /// Returns the counter for a key, if one was ever created.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Counter> {
        self.counters.get(&normalize_key(key))
    }

    /// Returns the counter for a key, creating it from `rules` if absent.
    ///
    /// Returns `None` when the key has neither a counter nor a rule.
    pub fn counter_mut(
        &mut self,
        key: &str,
        rules: &NumberingRules,
        today: NaiveDate,
    ) -> Option<(&mut Counter, bool)> {
        let key = normalize_key(key);
        if self.counters.contains_key(&key) {
            return self.counters.get_mut(&key).map(|counter| (counter, false));
        }
        let rule = rules.get(&key)?;
        let counter = self
            .counters
            .entry(key)
            .or_insert_with(|| Counter::from_rule(rule, today));
        Some((counter, true))
    }

    /// Number of counters held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns true if no counter was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
