//! Counter reset periods.

use serde::{Deserialize, Serialize};

/// When a number counter starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPeriod {
    /// The counter only ever grows.
    #[default]
    Never,
    /// Reset when the calendar year advances.
    Yearly,
    /// Reset when the calendar month (or year) advances.
    Monthly,
}

impl ResetPeriod {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
        }
    }

    /// Parses from string, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" => Some(Self::Never),
            "yearly" => Some(Self::Yearly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(ResetPeriod::parse("Yearly"), Some(ResetPeriod::Yearly));
        assert_eq!(ResetPeriod::parse(" monthly "), Some(ResetPeriod::Monthly));
        assert_eq!(ResetPeriod::parse("weekly"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ResetPeriod::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let parsed: ResetPeriod = serde_json::from_str("\"never\"").unwrap();
        assert_eq!(parsed, ResetPeriod::Never);
    }
}
