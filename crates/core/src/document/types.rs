//! Document domain types.
//!
//! Documents own snapshots of their company and party: both are copied in at
//! creation so later edits to a customer record never rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use docket_shared::types::{DocumentId, LineItemId};

use crate::document::error::ValidationError;
use crate::document::kind::DocumentType;
use crate::document::status::DocumentStatus;
use crate::tax::{TaxCalculator, TaxSettings};

/// Issuing company snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    /// Trading name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Tax registration number.
    pub tax_id: Option<String>,
    /// Logo image URL.
    pub logo_url: Option<String>,
}

/// Customer or vendor snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    /// Display name.
    pub name: String,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Tax registration number.
    pub tax_id: Option<String>,
    /// Industry, used by conditional styling rules.
    pub industry: Option<String>,
}

impl Party {
    /// Creates a party with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A single priced row on a document.
///
/// `total` and `tax_amount` are derived; they are overwritten by
/// [`Document::recalculate`] and never trusted as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line id.
    #[serde(default = "LineItemId::generate")]
    pub id: LineItemId,
    /// Catalogue product reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Item or SKU code.
    #[serde(default)]
    pub item_code: String,
    /// Description (required).
    #[serde(default)]
    pub description: String,
    /// Quantity.
    #[serde(default)]
    pub quantity: Decimal,
    /// Price per unit.
    #[serde(default)]
    pub unit_price: Decimal,
    /// Derived line total.
    #[serde(default)]
    pub total: Decimal,
    /// Explicit tax rate in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    /// Derived line tax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Category, for category tax rates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LineItem {
    /// Creates a line with a fresh id and derived fields unset.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: LineItemId::generate(),
            product_id: None,
            item_code: String::new(),
            description: description.into(),
            quantity,
            unit_price,
            total: Decimal::ZERO,
            tax_rate: None,
            tax_amount: None,
            unit: None,
            category: None,
        }
    }

    /// Sets the item code.
    #[must_use]
    pub fn with_code(mut self, item_code: impl Into<String>) -> Self {
        self.item_code = item_code.into();
        self
    }
}

/// Signature block settings carried on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSettings {
    /// Whether a signature is printed.
    pub enabled: bool,
    /// Stored signature image reference.
    #[serde(default)]
    pub signature_id: Option<String>,
    /// Type whose signer title applies.
    pub document_type: DocumentType,
}

/// Where a converted document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    /// Source document type.
    pub document_type: DocumentType,
    /// Source document id; absent for unsaved sources.
    #[serde(default)]
    pub id: Option<DocumentId>,
    /// Source document number.
    pub document_number: String,
}

/// Record of the conversions a document has taken part in as a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionHistory {
    /// Raw status the document held before its first conversion.
    pub prior_status: String,
    /// Target types already produced, in conversion order.
    #[serde(default)]
    pub targets: Vec<DocumentType>,
}

impl ConversionHistory {
    /// Returns true if a document of `target` type was already produced.
    #[must_use]
    pub fn produced(&self, target: DocumentType) -> bool {
        self.targets.contains(&target)
    }
}

/// One aggregated row of a financial report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Row label (account, category or period).
    pub label: String,
    /// Actual amount.
    #[serde(default)]
    pub amount: Decimal,
    /// Budgeted amount, if budgeted.
    #[serde(default)]
    pub budget: Option<Decimal>,
}

impl ReportRow {
    /// Budget minus actual; positive is under budget.
    #[must_use]
    pub fn variance(&self) -> Option<Decimal> {
        self.budget.map(|budget| budget.saturating_sub(self.amount))
    }
}

/// Type-specific document fields.
///
/// The variant is the document's type: a document cannot claim to be an
/// invoice while carrying quote fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DocumentDetails {
    /// Quote fields.
    Quote {
        /// Last day the quoted prices hold.
        valid_until: Option<NaiveDate>,
    },
    /// Sales order fields.
    SalesOrder {
        /// Promised delivery date.
        expected_delivery: Option<NaiveDate>,
        /// Ship-to address, when different from the customer address.
        shipping_address: Option<String>,
    },
    /// Invoice fields.
    Invoice {
        /// Payment due date.
        due_date: Option<NaiveDate>,
        /// Amount received so far.
        #[serde(default)]
        amount_paid: Decimal,
    },
    /// Purchase order fields.
    PurchaseOrder {
        /// Requested delivery date.
        expected_delivery: Option<NaiveDate>,
        /// Approver name once approved.
        approved_by: Option<String>,
    },
    /// Delivery note fields.
    DeliveryNote {
        /// Dispatch or delivery date.
        delivery_date: Option<NaiveDate>,
        /// Delivery address.
        delivery_address: Option<String>,
        /// Driver or courier.
        delivered_by: Option<String>,
    },
    /// Payment receipt fields.
    PaymentReceipt {
        /// Cash, bank transfer, mobile money, card.
        payment_method: Option<String>,
        /// Transaction reference.
        reference: Option<String>,
        /// Amount received.
        #[serde(default)]
        amount_paid: Decimal,
    },
    /// Goods receiving voucher fields.
    GoodsReceivingVoucher {
        /// Date goods arrived.
        received_date: Option<NaiveDate>,
        /// Storekeeper who received the goods.
        received_by: Option<String>,
    },
    /// Financial report fields.
    FinancialReport {
        /// Period start.
        period_start: Option<NaiveDate>,
        /// Period end.
        period_end: Option<NaiveDate>,
        /// Aggregated rows.
        #[serde(default)]
        rows: Vec<ReportRow>,
    },
}

impl DocumentDetails {
    /// Returns empty details for a type.
    #[must_use]
    pub fn empty(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Quote => Self::Quote { valid_until: None },
            DocumentType::SalesOrder => Self::SalesOrder {
                expected_delivery: None,
                shipping_address: None,
            },
            DocumentType::Invoice => Self::Invoice {
                due_date: None,
                amount_paid: Decimal::ZERO,
            },
            DocumentType::PurchaseOrder => Self::PurchaseOrder {
                expected_delivery: None,
                approved_by: None,
            },
            DocumentType::DeliveryNote => Self::DeliveryNote {
                delivery_date: None,
                delivery_address: None,
                delivered_by: None,
            },
            DocumentType::PaymentReceipt => Self::PaymentReceipt {
                payment_method: None,
                reference: None,
                amount_paid: Decimal::ZERO,
            },
            DocumentType::GoodsReceivingVoucher => Self::GoodsReceivingVoucher {
                received_date: None,
                received_by: None,
            },
            DocumentType::FinancialReport => Self::FinancialReport {
                period_start: None,
                period_end: None,
                rows: Vec::new(),
            },
        }
    }

    /// The document type these details describe.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        match self {
            Self::Quote { .. } => DocumentType::Quote,
            Self::SalesOrder { .. } => DocumentType::SalesOrder,
            Self::Invoice { .. } => DocumentType::Invoice,
            Self::PurchaseOrder { .. } => DocumentType::PurchaseOrder,
            Self::DeliveryNote { .. } => DocumentType::DeliveryNote,
            Self::PaymentReceipt { .. } => DocumentType::PaymentReceipt,
            Self::GoodsReceivingVoucher { .. } => DocumentType::GoodsReceivingVoucher,
            Self::FinancialReport { .. } => DocumentType::FinancialReport,
        }
    }
}

fn default_currency() -> String {
    "KES".to_string()
}

/// A commercial document of any type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Opaque id; `None` until first saved.
    #[serde(default)]
    pub id: Option<DocumentId>,
    /// Formatted sequential number, unique within the type.
    #[serde(default)]
    pub document_number: String,
    /// Document date.
    pub date: NaiveDate,
    /// Issuing company snapshot.
    #[serde(default)]
    pub company: Company,
    /// Customer or vendor snapshot.
    #[serde(default)]
    pub party: Option<Party>,
    /// Priced lines.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Σ quantity × unit price.
    #[serde(default)]
    pub subtotal: Decimal,
    /// Document tax.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Amount due after tax and discount.
    #[serde(default)]
    pub total: Decimal,
    /// Post-tax discount amount.
    #[serde(default)]
    pub discount: Decimal,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Tax settings fixed at creation.
    #[serde(default)]
    pub tax_settings: TaxSettings,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Terms and conditions.
    #[serde(default)]
    pub terms: Option<String>,
    /// Signature block settings.
    #[serde(default)]
    pub signature: Option<SignatureSettings>,
    /// Raw lifecycle status.
    #[serde(default)]
    pub status: String,
    /// Conversion provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceReference>,
    /// Conversions performed from this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionHistory>,
    /// Set on first save.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set on every update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Type-specific fields.
    pub details: DocumentDetails,
}

impl Document {
    /// Creates an unsaved document of the given type in its initial status.
    #[must_use]
    pub fn new(
        document_type: DocumentType,
        document_number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            document_number: document_number.into(),
            date,
            company: Company::default(),
            party: None,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            discount: Decimal::ZERO,
            currency: default_currency(),
            tax_settings: TaxSettings::default(),
            notes: None,
            terms: None,
            signature: None,
            status: DocumentStatus::initial(document_type).as_str().to_string(),
            source: None,
            conversion: None,
            created_at: None,
            updated_at: None,
            details: DocumentDetails::empty(document_type),
        }
    }

    /// Sets the company snapshot.
    #[must_use]
    pub fn with_company(mut self, company: Company) -> Self {
        self.company = company;
        self
    }

    /// Sets the party snapshot.
    #[must_use]
    pub fn with_party(mut self, party: Party) -> Self {
        self.party = Some(party);
        self
    }

    /// Sets the items and recalculates.
    #[must_use]
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self.recalculate();
        self
    }

    /// Sets the tax settings and recalculates.
    #[must_use]
    pub fn with_tax_settings(mut self, tax_settings: TaxSettings) -> Self {
        self.tax_settings = tax_settings;
        self.recalculate();
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.set_status(status);
        self
    }

    /// The document's type, taken from its details.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        self.details.document_type()
    }

    /// The parsed status, or `None` when the stored string is unrecognised.
    #[must_use]
    pub fn status(&self) -> Option<DocumentStatus> {
        DocumentStatus::parse(&self.status)
    }

    /// Replaces the status.
    pub fn set_status(&mut self, status: DocumentStatus) {
        self.status = status.as_str().to_string();
    }

    /// Marks the document `converted` after producing a `target` document.
    ///
    /// The status held before the first conversion is kept so later
    /// conversions to other targets are still checked against it.
    pub fn mark_converted(&mut self, target: DocumentType) {
        if self.conversion.is_none() {
            let prior_status = self.status.clone();
            self.conversion = Some(ConversionHistory {
                prior_status,
                targets: Vec::new(),
            });
        }
        if let Some(history) = self.conversion.as_mut()
            && !history.produced(target)
        {
            history.targets.push(target);
        }
        self.set_status(DocumentStatus::Converted);
    }

    /// Name of the embedded party, if any.
    #[must_use]
    pub fn party_name(&self) -> Option<&str> {
        self.party.as_ref().map(|p| p.name.as_str())
    }

    /// Recomputes line and document amounts from quantities, prices and
    /// rates. The discount is subtracted after tax.
    pub fn recalculate(&mut self) {
        if let DocumentDetails::FinancialReport { rows, .. } = &self.details {
            let subtotal = rows
                .iter()
                .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.amount));
            self.subtotal = subtotal;
            self.tax_amount = Decimal::ZERO;
            self.total = subtotal;
            return;
        }

        for item in &mut self.items {
            let amounts = TaxCalculator::compute_item(item, &self.tax_settings);
            item.total = amounts.total;
            item.tax_amount = Some(amounts.tax_amount);
        }

        let totals = TaxCalculator::compute_document_totals(&self.items, &self.tax_settings);
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total.saturating_sub(self.discount);
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.document_number.trim().is_empty() {
            return Err(ValidationError::MissingField("documentNumber"));
        }
        if self.discount < Decimal::ZERO {
            return Err(ValidationError::NegativeDiscount(self.discount));
        }
        for (index, item) in self.items.iter().enumerate() {
            let line = index + 1;
            if item.description.trim().is_empty() {
                return Err(ValidationError::MissingDescription { line });
            }
            if item.quantity <= Decimal::ZERO {
                return Err(ValidationError::NonPositiveQuantity {
                    line,
                    quantity: item.quantity,
                });
            }
            if item.unit_price < Decimal::ZERO {
                return Err(ValidationError::NegativePrice {
                    line,
                    unit_price: item.unit_price,
                });
            }
        }
        Ok(())
    }

    /// Case-insensitive substring match over number, notes and party name.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        hit(&self.document_number)
            || self.notes.as_deref().is_some_and(hit)
            || self.party_name().is_some_and(hit)
    }
}
