//! Section builders. Each returns a markup fragment, empty when the section
//! is disabled or has nothing to show.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::html::{
    escape_html, format_date, format_money, format_percent, format_quantity, meta_line, text_line,
};
use crate::customization::CustomizationSettings;
use crate::document::{Document, DocumentDetails, DocumentType, ReportRow};
use crate::tax::TaxType;

fn money(document: &Document, amount: Decimal) -> String {
    escape_html(&format_money(amount, &document.currency))
}

/// Type-specific header lines.
fn detail_lines(document: &Document) -> Vec<(&'static str, String)> {
    let date = |d: Option<NaiveDate>| d.map(format_date);
    let text = |t: Option<&str>| t.map(str::trim).filter(|t| !t.is_empty()).map(escape_html);

    let lines: Vec<(&'static str, Option<String>)> = match &document.details {
        DocumentDetails::Quote { valid_until } => vec![("Valid Until", date(*valid_until))],
        DocumentDetails::SalesOrder {
            expected_delivery,
            shipping_address,
        } => vec![
            ("Expected Delivery", date(*expected_delivery)),
            ("Ship To", text(shipping_address.as_deref())),
        ],
        DocumentDetails::Invoice { due_date, .. } => vec![("Due Date", date(*due_date))],
        DocumentDetails::PurchaseOrder {
            expected_delivery,
            approved_by,
        } => vec![
            ("Expected Delivery", date(*expected_delivery)),
            ("Approved By", text(approved_by.as_deref())),
        ],
        DocumentDetails::DeliveryNote {
            delivery_date,
            delivery_address,
            delivered_by,
        } => vec![
            ("Delivery Date", date(*delivery_date)),
            ("Delivery Address", text(delivery_address.as_deref())),
            ("Delivered By", text(delivered_by.as_deref())),
        ],
        DocumentDetails::PaymentReceipt {
            payment_method,
            reference,
            ..
        } => vec![
            ("Payment Method", text(payment_method.as_deref())),
            ("Reference", text(reference.as_deref())),
        ],
        DocumentDetails::GoodsReceivingVoucher {
            received_date,
            received_by,
        } => vec![
            ("Received Date", date(*received_date)),
            ("Received By", text(received_by.as_deref())),
        ],
        DocumentDetails::FinancialReport {
            period_start,
            period_end,
            ..
        } => {
            let period = match (period_start, period_end) {
                (Some(start), Some(end)) => {
                    Some(format!("{} to {}", format_date(*start), format_date(*end)))
                }
                (Some(start), None) => Some(format!("From {}", format_date(*start))),
                (None, Some(end)) => Some(format!("Up to {}", format_date(*end))),
                (None, None) => None,
            };
            vec![("Period", period)]
        }
    };

    lines
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
}

pub(crate) fn header(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.header;
    if !element.enabled {
        return String::new();
    }
    let document_type = document.document_type();
    let company = &document.company;

    let logo = company
        .logo_url
        .as_deref()
        .filter(|url| element.show_logo && !url.trim().is_empty())
        .map(|url| {
            format!(
                r#"<img class="company-logo" src="{}" alt="{}">"#,
                escape_html(url),
                escape_html(&company.name)
            )
        })
        .unwrap_or_default();

    let details = if element.show_company_details {
        let tax_id = company
            .tax_id
            .as_deref()
            .map(|id| format!("PIN: {id}"));
        [
            text_line("company-address", company.address.as_deref()),
            text_line("company-city", company.city.as_deref()),
            text_line("company-country", company.country.as_deref()),
            text_line("company-phone", company.phone.as_deref()),
            text_line("company-email", company.email.as_deref()),
            text_line("company-website", company.website.as_deref()),
            text_line("company-tax-id", tax_id.as_deref()),
        ]
        .concat()
    } else {
        String::new()
    };

    let mut meta = vec![
        meta_line("No.", &escape_html(&document.document_number)),
        meta_line("Date", &format_date(document.date)),
    ];
    meta.extend(
        detail_lines(document)
            .into_iter()
            .map(|(label, value)| meta_line(label, &value)),
    );
    if let Some(source) = &document.source {
        meta.push(meta_line(
            &format!("{} Ref", source.document_type.label()),
            &escape_html(&source.document_number),
        ));
    }
    let status = if document.status.trim().is_empty() {
        String::new()
    } else {
        let shown = document
            .status()
            .map_or_else(|| document.status.trim().to_string(), |s| s.as_str().replace('_', " "));
        format!(r#"<div class="status-badge">{}</div>"#, escape_html(&shown))
    };

    format!(
        r#"<header class="doc-header align-{align}"><div class="company">{logo}<div class="company-name">{name}</div><div class="company-details">{details}</div></div><div class="doc-info"><h1 class="doc-title">{title}</h1>{meta}{status}</div></header>"#,
        align = element.alignment.as_str(),
        name = escape_html(&company.name),
        title = document_type.title(),
        meta = meta.concat(),
    )
}

pub(crate) fn party(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.party;
    let document_type = document.document_type();
    let (true, Some(_), Some(party)) = (
        element.enabled,
        document_type.party_role(),
        document.party.as_ref(),
    ) else {
        return String::new();
    };

    let contact = if element.show_contact {
        [
            text_line("party-contact", party.contact_person.as_deref()),
            text_line("party-phone", party.phone.as_deref()),
            text_line("party-email", party.email.as_deref()),
        ]
        .concat()
    } else {
        String::new()
    };
    let tax_id = if element.show_tax_id {
        let line = party.tax_id.as_deref().map(|id| format!("PIN: {id}"));
        text_line("party-tax-id", line.as_deref())
    } else {
        String::new()
    };

    format!(
        r#"<section class="party"><h3>{label}</h3><div class="party-name">{name}</div>{address}{city}{country}{contact}{tax_id}</section>"#,
        label = document_type.party_label(),
        name = escape_html(&party.name),
        address = text_line("party-address", party.address.as_deref()),
        city = text_line("party-city", party.city.as_deref()),
        country = text_line("party-country", party.country.as_deref()),
    )
}

pub(crate) fn items_table(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.items_table;
    let document_type = document.document_type();
    if !element.enabled || !document_type.has_line_items() {
        return String::new();
    }
    let priced = document_type.prints_amounts();
    // Line tax only adds up to the document tax in per-item mode; the other
    // modes tax the subtotal once at the default rate.
    let show_tax = priced && element.show_tax && document.tax_settings.tax_type == TaxType::PerItem;

    let mut head = String::from(r#"<th class="num">#</th>"#);
    if element.show_item_code {
        head.push_str("<th>Code</th>");
    }
    head.push_str("<th>Description</th>");
    if element.show_unit {
        head.push_str("<th>Unit</th>");
    }
    head.push_str(r#"<th class="num">Qty</th>"#);
    if priced {
        head.push_str(r#"<th class="num">Unit Price</th>"#);
    }
    if show_tax {
        head.push_str(r#"<th class="num">Tax</th>"#);
    }
    if priced {
        head.push_str(r#"<th class="num">Amount</th>"#);
    }

    let rows: String = document
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut row = format!(r#"<tr class="line-item"><td class="num">{}</td>"#, index + 1);
            if element.show_item_code {
                row.push_str(&format!("<td>{}</td>", escape_html(&item.item_code)));
            }
            row.push_str(&format!("<td>{}</td>", escape_html(&item.description)));
            if element.show_unit {
                row.push_str(&format!(
                    "<td>{}</td>",
                    escape_html(item.unit.as_deref().unwrap_or_default())
                ));
            }
            row.push_str(&format!(
                r#"<td class="num">{}</td>"#,
                format_quantity(item.quantity)
            ));
            if priced {
                row.push_str(&format!(
                    r#"<td class="num">{}</td>"#,
                    money(document, item.unit_price)
                ));
            }
            if show_tax {
                let rate = document
                    .tax_settings
                    .rate_for(item.tax_rate, item.category.as_deref());
                row.push_str(&format!(
                    r#"<td class="num">{} ({})</td>"#,
                    money(document, item.tax_amount.unwrap_or_default()),
                    format_percent(rate)
                ));
            }
            if priced {
                row.push_str(&format!(
                    r#"<td class="num">{}</td>"#,
                    money(document, item.total)
                ));
            }
            row.push_str("</tr>");
            row
        })
        .collect();

    format!(r#"<table class="items"><thead><tr>{head}</tr></thead><tbody>{rows}</tbody></table>"#)
}

fn report_row(document: &Document, row: &ReportRow) -> String {
    let budget = row
        .budget
        .map(|b| money(document, b))
        .unwrap_or_default();
    let variance = row
        .variance()
        .map(|v| {
            let class = if v < Decimal::ZERO { "num negative" } else { "num" };
            format!(r#"<td class="{class}">{}</td>"#, money(document, v))
        })
        .unwrap_or_else(|| r#"<td class="num"></td>"#.to_string());
    format!(
        r#"<tr class="report-row"><td>{}</td><td class="num">{}</td><td class="num">{budget}</td>{variance}</tr>"#,
        escape_html(&row.label),
        money(document, row.amount),
    )
}

/// Aggregated rows of a financial report, in place of the item table.
pub(crate) fn report_rows(document: &Document) -> String {
    let DocumentDetails::FinancialReport { rows, .. } = &document.details else {
        return String::new();
    };

    let body: String = rows.iter().map(|row| report_row(document, row)).collect();
    let budget_total: Option<Decimal> = rows
        .iter()
        .map(|r| r.budget)
        .try_fold(Decimal::ZERO, |acc, b| b.map(|b| acc.saturating_add(b)));
    let budget_cell = budget_total
        .filter(|_| !rows.is_empty())
        .map(|b| money(document, b))
        .unwrap_or_default();

    format!(
        r#"<table class="report-rows"><thead><tr><th>Item</th><th class="num">Actual</th><th class="num">Budget</th><th class="num">Variance</th></tr></thead><tbody>{body}</tbody><tfoot><tr class="grand-total"><td>Total</td><td class="num">{total}</td><td class="num">{budget_cell}</td><td></td></tr></tfoot></table>"#,
        total = money(document, document.total),
    )
}

fn tax_label(document: &Document) -> String {
    let settings = &document.tax_settings;
    let rate = format_percent(settings.default_rate);
    match settings.tax_type {
        TaxType::Exclusive => format!("VAT ({rate})"),
        TaxType::Inclusive => format!("VAT included ({rate})"),
        TaxType::Overall => format!("Tax ({rate})"),
        TaxType::PerItem => "Tax".to_string(),
    }
}

fn total_row(class: &str, label: &str, value: &str) -> String {
    format!(
        r#"<tr class="{class}"><td>{}</td><td class="num">{value}</td></tr>"#,
        escape_html(label)
    )
}

pub(crate) fn totals(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.totals;
    let document_type = document.document_type();
    if !element.enabled
        || !document_type.has_line_items()
        || !document_type.prints_amounts()
    {
        return String::new();
    }

    let mut rows = Vec::new();
    if element.show_subtotal {
        rows.push(total_row(
            "subtotal",
            "Subtotal",
            &money(document, document.subtotal),
        ));
    }
    if element.show_tax {
        rows.push(total_row(
            "tax",
            &tax_label(document),
            &money(document, document.tax_amount),
        ));
    }
    if !document.discount.is_zero() {
        rows.push(total_row(
            "discount",
            "Discount",
            &format!("-{}", money(document, document.discount)),
        ));
    }
    rows.push(total_row(
        "grand-total",
        "Total",
        &money(document, document.total),
    ));

    match &document.details {
        DocumentDetails::Invoice { amount_paid, .. } if !amount_paid.is_zero() => {
            rows.push(total_row(
                "amount-paid",
                "Amount Paid",
                &money(document, *amount_paid),
            ));
            rows.push(total_row(
                "balance-due",
                "Balance Due",
                &money(document, document.total.saturating_sub(*amount_paid)),
            ));
        }
        DocumentDetails::PaymentReceipt { amount_paid, .. } => {
            rows.push(total_row(
                "amount-received",
                "Amount Received",
                &money(document, *amount_paid),
            ));
        }
        _ => {}
    }

    format!(r#"<table class="totals"><tbody>{}</tbody></table>"#, rows.concat())
}

pub(crate) fn payment(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.payment;
    if !element.enabled {
        return String::new();
    }
    let details = &settings.payment;
    let mut parts = Vec::new();

    if element.show_bank
        && let Some(bank) = details.bank.as_ref().filter(|b| b.is_configured())
    {
        let mut lines = vec![
            meta_line("Bank", &escape_html(&bank.bank_name)),
            meta_line("Account Name", &escape_html(&bank.account_name)),
            meta_line("Account No.", &escape_html(&bank.account_number)),
        ];
        if let Some(branch) = bank.branch.as_deref().filter(|b| !b.trim().is_empty()) {
            lines.push(meta_line("Branch", &escape_html(branch)));
        }
        if let Some(swift) = bank.swift_code.as_deref().filter(|s| !s.trim().is_empty()) {
            lines.push(meta_line("SWIFT", &escape_html(swift)));
        }
        parts.push(format!(
            r#"<div class="bank-details"><h4>Bank Transfer</h4>{}</div>"#,
            lines.concat()
        ));
    }

    if element.show_mobile_money
        && let Some(mobile) = details.mobile_money.as_ref().filter(|m| m.is_configured())
    {
        let account = mobile
            .account_reference
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(|a| meta_line("Account", &escape_html(a)))
            .unwrap_or_default();
        parts.push(format!(
            r#"<div class="mobile-money"><h4>{}</h4>{}{account}</div>"#,
            escape_html(&mobile.provider),
            meta_line("Business No.", &escape_html(&mobile.business_number)),
        ));
    }

    if element.show_terms {
        let terms = document
            .terms
            .as_deref()
            .or(details.default_terms.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(terms) = terms {
            parts.push(format!(
                r#"<div class="terms"><h4>Terms &amp; Conditions</h4><p>{}</p></div>"#,
                escape_html(terms)
            ));
        }
    }

    if parts.is_empty() {
        return String::new();
    }
    format!(
        r#"<section class="payment"><h3>Payment Details</h3>{}</section>"#,
        parts.concat()
    )
}

pub(crate) fn notes(document: &Document, settings: &CustomizationSettings) -> String {
    if !settings.elements.notes.enabled {
        return String::new();
    }
    document
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| {
            format!(
                r#"<section class="notes"><h4>Notes</h4><p>{}</p></section>"#,
                escape_html(n)
            )
        })
        .unwrap_or_default()
}

pub(crate) fn signature(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.signature;
    let document_enabled = document.signature.as_ref().is_none_or(|s| s.enabled);
    if !element.enabled || !document_enabled {
        return String::new();
    }
    let signer_type: DocumentType = document
        .signature
        .as_ref()
        .map_or_else(|| document.document_type(), |s| s.document_type);
    let date = if element.show_date {
        r#"<div class="signature-date">Date: ______________</div>"#
    } else {
        ""
    };

    format!(
        r#"<section class="signature"><div class="signature-line">{title}</div><div class="muted">{department} Department</div>{date}</section>"#,
        title = signer_type.signer_title(),
        department = signer_type.department(),
    )
}

pub(crate) fn qr_code(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.qr_code;
    if !element.enabled {
        return String::new();
    }
    let payload = format!(
        "{}|{}|{}|{}",
        document.document_type().as_str(),
        document.document_number,
        document.total,
        document.currency
    );
    format!(
        r#"<div class="qr-code align-{}" data-content="{}"></div>"#,
        element.alignment.as_str(),
        escape_html(&payload)
    )
}

pub(crate) fn watermark(settings: &CustomizationSettings) -> String {
    let element = &settings.elements.watermark;
    if !element.enabled || element.text.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="watermark">{}</div>"#,
        escape_html(element.text.trim())
    )
}

pub(crate) fn footer(document: &Document, settings: &CustomizationSettings) -> String {
    let element = &settings.elements.footer;
    if !element.enabled {
        return String::new();
    }
    let text = if element.text.trim().is_empty() {
        document.company.name.trim()
    } else {
        element.text.trim()
    };
    format!(
        r#"<footer class="doc-footer">{}</footer>"#,
        escape_html(text)
    )
}
