//! Number format strings and reset-period checks.

use chrono::{Datelike, NaiveDate};

use docket_shared::types::ResetPeriod;

/// Expands a number format string.
///
/// Supported placeholders:
/// - `{prefix}` - the counter prefix
/// - `{year}` - four-digit year of `date`
/// - `{month}` - two-digit month of `date`
/// - `{day}` - two-digit day of `date`
/// - `{number}` - the number, unpadded
/// - `{number:0000}` - the number zero-padded to the width of the zero run
///
/// Unknown placeholders and unbalanced braces are copied through verbatim.
/// A number wider than the pad width is printed in full, never truncated.
#[must_use]
pub fn format_number(format: &str, prefix: &str, number: u64, date: NaiveDate) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let token = &after[..close];
        if let Some(expanded) = expand(token, prefix, number, date) {
            out.push_str(&expanded);
        } else {
            out.push('{');
            out.push_str(token);
            out.push('}');
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

fn expand(token: &str, prefix: &str, number: u64, date: NaiveDate) -> Option<String> {
    match token {
        "prefix" => Some(prefix.to_string()),
        "year" => Some(date.year().to_string()),
        "month" => Some(format!("{:02}", date.month())),
        "day" => Some(format!("{:02}", date.day())),
        "number" => Some(number.to_string()),
        _ => {
            let pad = token.strip_prefix("number:")?;
            if pad.is_empty() || !pad.bytes().all(|b| b == b'0') {
                return None;
            }
            Some(format!("{number:0width$}", width = pad.len()))
        }
    }
}

/// Returns true if the counter must start over before issuing on `today`.
///
/// A counter that has never recorded a reset date does not reset; the
/// caller stamps `today` as its reset date instead.
#[must_use]
pub fn needs_reset(period: ResetPeriod, last_reset: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(last) = last_reset else {
        return false;
    };
    match period {
        ResetPeriod::Never => false,
        ResetPeriod::Yearly => today.year() > last.year(),
        ResetPeriod::Monthly => (today.year(), today.month()) > (last.year(), last.month()),
    }
}

/// Number handed out when no counter is configured for a key:
/// `{KEY}-{unix_millis}`.
#[must_use]
pub fn fallback_number(key: &str, unix_millis: i64) -> String {
    format!("{}-{unix_millis}", key.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("INV-{year}-{number:0000}", 1, "INV-2024-0001")]
    #[case("{prefix}-{number:0000}", 42, "QT-0042")]
    #[case("{prefix}/{year}/{month}/{number}", 7, "QT/2024/03/7")]
    #[case("{prefix}{day}-{number:00}", 123, "QT15-123")]
    #[case("{prefix}-{unknown}-{number}", 5, "QT-{unknown}-5")]
    #[case("{prefix}-{number:0x0}", 5, "QT-{number:0x0}")]
    #[case("PLAIN", 9, "PLAIN")]
    #[case("{prefix}-{number", 9, "QT-{number")]
    fn test_format_number(#[case] format: &str, #[case] number: u64, #[case] expected: &str) {
        assert_eq!(format_number(format, "QT", number, date(2024, 3, 15)), expected);
    }

    #[rstest]
    #[case(ResetPeriod::Never, date(2020, 1, 1), date(2024, 1, 1), false)]
    #[case(ResetPeriod::Yearly, date(2023, 12, 31), date(2024, 1, 1), true)]
    #[case(ResetPeriod::Yearly, date(2024, 1, 1), date(2024, 12, 31), false)]
    #[case(ResetPeriod::Monthly, date(2024, 1, 31), date(2024, 2, 1), true)]
    #[case(ResetPeriod::Monthly, date(2023, 3, 10), date(2024, 2, 1), true)]
    #[case(ResetPeriod::Monthly, date(2024, 2, 1), date(2024, 2, 29), false)]
    fn test_needs_reset(
        #[case] period: ResetPeriod,
        #[case] last: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: bool,
    ) {
        assert_eq!(needs_reset(period, Some(last), today), expected);
    }

    #[test]
    fn test_never_reset_counter_without_date() {
        assert!(!needs_reset(ResetPeriod::Yearly, None, date(2024, 1, 1)));
    }

    #[test]
    fn test_fallback_number() {
        assert_eq!(fallback_number(" invoice ", 1_700_000_000_000), "INVOICE-1700000000000");
    }
}
