//! Document type discriminant.
//!
//! Every per-type lookup (titles, storage keys, signer titles, party labels)
//! is an exhaustive match here, so adding a document type fails to compile
//! until each lookup handles it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the trade the embedded party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    /// A buyer of goods or services.
    Customer,
    /// A supplier of goods or services.
    Vendor,
}

/// The fixed set of commercial document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Price quotation to a customer.
    Quote,
    /// Customer order.
    SalesOrder,
    /// Bill to a customer.
    Invoice,
    /// Order placed with a vendor.
    PurchaseOrder,
    /// Proof of dispatch to a customer.
    DeliveryNote,
    /// Acknowledgement of payment received.
    PaymentReceipt,
    /// Record of goods received from a vendor.
    GoodsReceivingVoucher,
    /// Aggregated transaction and budget figures.
    FinancialReport,
}

impl DocumentType {
    /// Every document type, in display order.
    pub const ALL: [Self; 8] = [
        Self::Quote,
        Self::SalesOrder,
        Self::Invoice,
        Self::PurchaseOrder,
        Self::DeliveryNote,
        Self::PaymentReceipt,
        Self::GoodsReceivingVoucher,
        Self::FinancialReport,
    ];

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::SalesOrder => "sales_order",
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
            Self::DeliveryNote => "delivery_note",
            Self::PaymentReceipt => "payment_receipt",
            Self::GoodsReceivingVoucher => "goods_receiving_voucher",
            Self::FinancialReport => "financial_report",
        }
    }

    /// Parses a document type, tolerating case, spaces and hyphens.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "quote" | "quotation" => Some(Self::Quote),
            "sales_order" => Some(Self::SalesOrder),
            "invoice" => Some(Self::Invoice),
            "purchase_order" => Some(Self::PurchaseOrder),
            "delivery_note" => Some(Self::DeliveryNote),
            "payment_receipt" | "receipt" => Some(Self::PaymentReceipt),
            "goods_receiving_voucher" | "goods_received_voucher" | "grv" => {
                Some(Self::GoodsReceivingVoucher)
            }
            "financial_report" => Some(Self::FinancialReport),
            _ => None,
        }
    }

    /// Key under which this type's document collection is persisted.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("documents.{}", self.as_str())
    }

    /// Heading printed at the top of a rendered document.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Quote => "QUOTATION",
            Self::SalesOrder => "SALES ORDER",
            Self::Invoice => "INVOICE",
            Self::PurchaseOrder => "PURCHASE ORDER",
            Self::DeliveryNote => "DELIVERY NOTE",
            Self::PaymentReceipt => "PAYMENT RECEIPT",
            Self::GoodsReceivingVoucher => "GOODS RECEIVED VOUCHER",
            Self::FinancialReport => "FINANCIAL REPORT",
        }
    }

    /// Short human label, used in action labels and log messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Quote => "Quote",
            Self::SalesOrder => "Sales Order",
            Self::Invoice => "Invoice",
            Self::PurchaseOrder => "Purchase Order",
            Self::DeliveryNote => "Delivery Note",
            Self::PaymentReceipt => "Payment Receipt",
            Self::GoodsReceivingVoucher => "Goods Received Voucher",
            Self::FinancialReport => "Financial Report",
        }
    }

    /// Default number prefix for this type's counter.
    #[must_use]
    pub const fn default_prefix(&self) -> &'static str {
        match self {
            Self::Quote => "QT",
            Self::SalesOrder => "SO",
            Self::Invoice => "INV",
            Self::PurchaseOrder => "PO",
            Self::DeliveryNote => "DN",
            Self::PaymentReceipt => "RCT",
            Self::GoodsReceivingVoucher => "GRV",
            Self::FinancialReport => "FR",
        }
    }

    /// Department responsible for signing this type.
    #[must_use]
    pub const fn department(&self) -> &'static str {
        match self {
            Self::Quote | Self::SalesOrder => "Sales",
            Self::Invoice | Self::PaymentReceipt | Self::FinancialReport => "Finance",
            Self::PurchaseOrder => "Procurement",
            Self::DeliveryNote => "Logistics",
            Self::GoodsReceivingVoucher => "Stores",
        }
    }

    /// Signer title printed under the signature line.
    #[must_use]
    pub const fn signer_title(&self) -> &'static str {
        match self {
            Self::Quote | Self::SalesOrder => "Sales Manager",
            Self::Invoice | Self::PaymentReceipt | Self::FinancialReport => "Finance Manager",
            Self::PurchaseOrder => "Procurement Officer",
            Self::DeliveryNote => "Dispatch Supervisor",
            Self::GoodsReceivingVoucher => "Stores Controller",
        }
    }

    /// Which party the document is addressed to, if any.
    #[must_use]
    pub const fn party_role(&self) -> Option<PartyRole> {
        match self {
            Self::Quote
            | Self::SalesOrder
            | Self::Invoice
            | Self::DeliveryNote
            | Self::PaymentReceipt => Some(PartyRole::Customer),
            Self::PurchaseOrder | Self::GoodsReceivingVoucher => Some(PartyRole::Vendor),
            Self::FinancialReport => None,
        }
    }

    /// Heading of the party block.
    #[must_use]
    pub const fn party_label(&self) -> &'static str {
        match self {
            Self::Quote => "Prepared For",
            Self::SalesOrder => "Customer",
            Self::Invoice => "Bill To",
            Self::DeliveryNote => "Deliver To",
            Self::PaymentReceipt => "Received From",
            Self::PurchaseOrder => "Vendor",
            Self::GoodsReceivingVoucher => "Supplier",
            Self::FinancialReport => "Prepared For",
        }
    }

    /// Whether documents of this type carry priced line items.
    #[must_use]
    pub const fn has_line_items(&self) -> bool {
        !matches!(self, Self::FinancialReport)
    }

    /// Whether rendered documents of this type print prices and totals.
    /// Delivery paperwork records quantities only.
    #[must_use]
    pub const fn prints_amounts(&self) -> bool {
        !matches!(self, Self::DeliveryNote | Self::GoodsReceivingVoucher)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
