//! Markup helpers shared by the section builders.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use docket_shared::types::{Currency, Money};

/// Escapes text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Day-first date, as printed on East African paperwork.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Currency symbol followed by the amount to two places.
///
/// # Examples
///
/// ```
/// use docket_core::render::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(1_500_000, 2), "KES"), "KSh 15,000.00");
/// ```
#[must_use]
pub fn format_money(amount: Decimal, currency: &str) -> String {
    format!(
        "{} {}",
        Currency::symbol_for(currency),
        Money::format_amount(amount)
    )
}

/// Quantity without trailing zeros.
#[must_use]
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Rate in percent without trailing zeros.
#[must_use]
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

/// A labelled line (`<div class="meta"><span>Label</span> value</div>`).
/// `value` must already be escaped.
pub(crate) fn meta_line(label: &str, value: &str) -> String {
    format!(
        r#"<div class="meta"><span class="meta-label">{}</span> <span class="meta-value">{value}</span></div>"#,
        escape_html(label)
    )
}

/// An optional text line; absent or blank values produce nothing.
pub(crate) fn text_line(class: &str, value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| format!(r#"<div class="{class}">{}</div>"#, escape_html(v)))
        .unwrap_or_default()
}
