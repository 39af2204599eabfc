//! Tax domain types.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How tax is derived from line prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Prices exclude tax; tax is added on the subtotal.
    #[default]
    Exclusive,
    /// Prices include tax; tax is carved out of the subtotal.
    Inclusive,
    /// Each line carries its own rate; totals are line sums.
    PerItem,
    /// One rate applied once to the aggregate subtotal.
    Overall,
}

impl TaxType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Inclusive => "inclusive",
            Self::PerItem => "per_item",
            Self::Overall => "overall",
        }
    }

    /// Parses a tax type, accepting `per-item` and mixed case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "exclusive" => Some(Self::Exclusive),
            "inclusive" => Some(Self::Inclusive),
            "per_item" => Some(Self::PerItem),
            "overall" => Some(Self::Overall),
            _ => None,
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax settings attached to a document when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    /// Tax mode.
    #[serde(rename = "type", default)]
    pub tax_type: TaxType,
    /// Rate in percent used when a line has none of its own.
    #[serde(default)]
    pub default_rate: Decimal,
    /// Rates by item category, consulted in per-item mode.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_rates: BTreeMap<String, Decimal>,
}

impl TaxSettings {
    /// Creates settings with no category overrides.
    #[must_use]
    pub fn new(tax_type: TaxType, default_rate: Decimal) -> Self {
        Self {
            tax_type,
            default_rate,
            custom_rates: BTreeMap::new(),
        }
    }

    /// Adds a category rate.
    #[must_use]
    pub fn with_custom_rate(mut self, category: impl Into<String>, rate: Decimal) -> Self {
        self.custom_rates.insert(category.into(), rate);
        self
    }

    /// Resolves the rate for one line.
    ///
    /// An explicit line rate wins. In per-item mode a category rate is used
    /// next; everything else falls back to `default_rate`.
    #[must_use]
    pub fn rate_for(&self, line_rate: Option<Decimal>, category: Option<&str>) -> Decimal {
        if let Some(rate) = line_rate {
            return rate;
        }
        if self.tax_type == TaxType::PerItem
            && let Some(rate) = category.and_then(|c| self.custom_rates.get(c))
        {
            return *rate;
        }
        self.default_rate
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self::new(TaxType::Exclusive, Decimal::from(16))
    }
}
