//! Numbering service: issues sequential document and entity numbers.
//!
//! Counter state is read from storage once per process and written back on
//! every mutation. The read-increment-write sequence runs under one lock, so
//! concurrent callers never receive the same number.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use docket_core::numbering::{Counter, CounterBook, GeneratedNumber, NumberingRules, fallback_number};
use docket_shared::config::{CounterConfig, NumberingConfig};

use crate::error::StoreError;
use crate::kv::{KeyValueStore, load_json, save_json};

/// Storage key holding every counter.
pub const COUNTERS_KEY: &str = "numbering.counters";

#[derive(Debug)]
struct State {
    rules: NumberingRules,
    book: Option<CounterBook>,
}

/// Issues numbers from persisted counters.
#[derive(Debug)]
pub struct NumberingService<S> {
    kv: S,
    state: Mutex<State>,
}

impl<S: KeyValueStore> NumberingService<S> {
    /// Creates a service with the built-in rules overlaid by `config`.
    #[must_use]
    pub fn new(kv: S, config: &NumberingConfig) -> Self {
        Self::with_rules(kv, NumberingRules::from_config(config))
    }

    /// Creates a service with explicit rules.
    #[must_use]
    pub const fn with_rules(kv: S, rules: NumberingRules) -> Self {
        Self {
            kv,
            state: Mutex::new(State { rules, book: None }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn book<'a>(kv: &S, book: &'a mut Option<CounterBook>) -> &'a mut CounterBook {
        book.get_or_insert_with(|| {
            let loaded = load_json::<_, CounterBook>(kv, COUNTERS_KEY);
            debug!(counters = loaded.value.len(), origin = ?loaded.origin, "Counters loaded");
            loaded.value
        })
    }

    /// Issues the next number for a document type or entity key.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated counter cannot be persisted; the
    /// counter is left unchanged.
    pub fn next(&self, key: &str) -> Result<GeneratedNumber, StoreError> {
        self.next_on(key, Utc::now().date_naive())
    }

    /// Issues the next number as of `today`.
    ///
    /// A key with no counter and no rule gets a non-authoritative
    /// `{KEY}-{unix_millis}` number instead of an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated counter cannot be persisted; the
    /// counter is left unchanged.
    pub fn next_on(&self, key: &str, today: NaiveDate) -> Result<GeneratedNumber, StoreError> {
        let mut state = self.lock();
        let State { rules, book } = &mut *state;
        let book = Self::book(&self.kv, book);
        let snapshot = book.clone();

        let Some((counter, created)) = book.counter_mut(key, rules, today) else {
            let number = fallback_number(key, Utc::now().timestamp_millis());
            warn!(counter = key, number = %number, "No numbering rule, using timestamp fallback");
            return Ok(GeneratedNumber::fallback(number));
        };
        if created {
            info!(counter = key, start_from = counter.start_from, "Counter created");
        }

        let advance = counter.advance(today);
        if advance.was_reset {
            info!(counter = key, period = ?counter.reset_period, "Counter reset");
        }

        if let Err(err) = save_json(&self.kv, COUNTERS_KEY, &*book) {
            *book = snapshot;
            return Err(err.into());
        }
        info!(counter = key, number = %advance.formatted, "Counter incremented");
        Ok(GeneratedNumber::issued(advance.formatted))
    }

    /// The number [`next`](Self::next) would issue, without consuming it.
    #[must_use]
    pub fn peek(&self, key: &str) -> GeneratedNumber {
        self.peek_on(key, Utc::now().date_naive())
    }

    /// The number [`next_on`](Self::next_on) would issue, without consuming it.
    #[must_use]
    pub fn peek_on(&self, key: &str, today: NaiveDate) -> GeneratedNumber {
        let mut state = self.lock();
        let State { rules, book } = &mut *state;
        let book = Self::book(&self.kv, book);

        if let Some(counter) = book.get(key) {
            return GeneratedNumber::issued(counter.preview(today));
        }
        match rules.get(key) {
            Some(rule) => GeneratedNumber::issued(Counter::from_rule(rule, today).preview(today)),
            None => GeneratedNumber::fallback(fallback_number(key, Utc::now().timestamp_millis())),
        }
    }

    /// The stored counter for a key, if one was created.
    #[must_use]
    pub fn counter(&self, key: &str) -> Option<Counter> {
        let mut state = self.lock();
        Self::book(&self.kv, &mut state.book).get(key).cloned()
    }

    /// Installs a rule for a key. An existing counter adopts the new prefix,
    /// format, start and reset period but keeps its position.
    ///
    /// # Errors
    ///
    /// Returns an error if an updated counter cannot be persisted.
    pub fn configure(&self, key: &str, rule: CounterConfig) -> Result<(), StoreError> {
        let mut state = self.lock();
        let State { rules, book } = &mut *state;
        rules.set(key, rule.clone());

        let book = Self::book(&self.kv, book);
        if book.get(key).is_some() {
            let snapshot = book.clone();
            if let Some((counter, _)) = book.counter_mut(key, rules, Utc::now().date_naive()) {
                counter.apply_rule(&rule);
            }
            if let Err(err) = save_json(&self.kv, COUNTERS_KEY, &*book) {
                *book = snapshot;
                return Err(err.into());
            }
        }
        info!(counter = key, format = %rule.format, prefix = %rule.prefix, "Counter configured");
        Ok(())
    }

    /// Starts a counter over so its next number is its `start_from`.
    ///
    /// # Returns
    ///
    /// `false` if the key has no counter yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be persisted.
    pub fn reset(&self, key: &str) -> Result<bool, StoreError> {
        self.reset_on(key, Utc::now().date_naive())
    }

    /// Starts a counter over as of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be persisted.
    pub fn reset_on(&self, key: &str, today: NaiveDate) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let State { rules, book } = &mut *state;
        let book = Self::book(&self.kv, book);
        if book.get(key).is_none() {
            return Ok(false);
        }

        let snapshot = book.clone();
        if let Some((counter, _)) = book.counter_mut(key, rules, today) {
            counter.reset(today);
        }
        if let Err(err) = save_json(&self.kv, COUNTERS_KEY, &*book) {
            *book = snapshot;
            return Err(err.into());
        }
        info!(counter = key, "Counter reset");
        Ok(true)
    }

    /// Drops the in-memory counters so the next call reads storage again.
    pub fn reload(&self) {
        self.lock().book = None;
    }
}
