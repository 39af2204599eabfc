//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. 12.50).
    pub amount: Decimal,
    /// ISO 4217 currency.
    pub currency: Currency,
}

/// ISO 4217 currency codes with known display symbols.
///
/// Documents store their currency as a free-form code; codes outside this
/// list are displayed verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Kenyan Shilling
    Kes,
    /// Ugandan Shilling
    Ugx,
    /// Tanzanian Shilling
    Tzs,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// South African Rand
    Zar,
    /// Nigerian Naira
    Ngn,
    /// Indian Rupee
    Inr,
}

impl Currency {
    /// Returns the ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Kes => "KES",
            Self::Ugx => "UGX",
            Self::Tzs => "TZS",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Zar => "ZAR",
            Self::Ngn => "NGN",
            Self::Inr => "INR",
        }
    }

    /// Returns the display symbol printed before amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Kes => "KSh",
            Self::Ugx => "USh",
            Self::Tzs => "TSh",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Zar => "R",
            Self::Ngn => "₦",
            Self::Inr => "₹",
        }
    }

    /// Returns the symbol for a free-form currency code, or the trimmed code
    /// itself when it is not a known currency.
    #[must_use]
    pub fn symbol_for(code: &str) -> String {
        code.parse::<Self>().map_or_else(
            |_| code.trim().to_uppercase(),
            |currency| currency.symbol().to_string(),
        )
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    /// Formats an amount with exactly two decimal places and comma thousands
    /// separators, rounding half away from zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_shared::types::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::format_amount(Decimal::new(1_234_567_891, 3)), "1,234,567.89");
    /// ```
    #[must_use]
    pub fn format_amount(amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out.push('.');
        out.push_str(fraction);
        out
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.currency.symbol(),
            Self::format_amount(self.amount)
        )
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KES" => Ok(Self::Kes),
            "UGX" => Ok(Self::Ugx),
            "TZS" => Ok(Self::Tzs),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "ZAR" => Ok(Self::Zar),
            "NGN" => Ok(Self::Ngn),
            "INR" => Ok(Self::Inr),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
