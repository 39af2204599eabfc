//! Document lifecycle statuses.
//!
//! Stored documents keep their status as a raw string because upstream data
//! is not guaranteed clean (`" Accepted "`, `"ACCEPTED"`). Everything that
//! compares statuses goes through [`DocumentStatus::parse`], which trims and
//! lowercases first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::kind::DocumentType;

/// Union of every status any document type can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being prepared.
    Draft,
    /// Sent to the party.
    Sent,
    /// Accepted by the customer.
    Accepted,
    /// Rejected by the customer or approver.
    Rejected,
    /// Validity period lapsed.
    Expired,
    /// Awaiting confirmation or dispatch.
    Pending,
    /// Confirmed by the business.
    Confirmed,
    /// Goods shipped.
    Shipped,
    /// Goods delivered.
    Delivered,
    /// Fully paid.
    Paid,
    /// Past its due date.
    Overdue,
    /// Submitted for purchase approval.
    PendingApproval,
    /// Approved for purchase.
    Approved,
    /// Left the warehouse.
    Dispatched,
    /// Goods received into stores.
    Received,
    /// Payment recorded.
    Completed,
    /// Cancelled.
    Cancelled,
    /// Report finalised.
    Final,
    /// Used as the source of a conversion.
    Converted,
}

const QUOTE: &[DocumentStatus] = &[
    DocumentStatus::Draft,
    DocumentStatus::Sent,
    DocumentStatus::Accepted,
    DocumentStatus::Rejected,
    DocumentStatus::Expired,
    DocumentStatus::Converted,
];
const SALES_ORDER: &[DocumentStatus] = &[
    DocumentStatus::Pending,
    DocumentStatus::Confirmed,
    DocumentStatus::Shipped,
    DocumentStatus::Delivered,
    DocumentStatus::Cancelled,
    DocumentStatus::Converted,
];
const INVOICE: &[DocumentStatus] = &[
    DocumentStatus::Draft,
    DocumentStatus::Sent,
    DocumentStatus::Paid,
    DocumentStatus::Overdue,
    DocumentStatus::Cancelled,
    DocumentStatus::Converted,
];
const PURCHASE_ORDER: &[DocumentStatus] = &[
    DocumentStatus::Draft,
    DocumentStatus::PendingApproval,
    DocumentStatus::Approved,
    DocumentStatus::Rejected,
    DocumentStatus::Cancelled,
    DocumentStatus::Converted,
];
const DELIVERY_NOTE: &[DocumentStatus] = &[
    DocumentStatus::Pending,
    DocumentStatus::Dispatched,
    DocumentStatus::Delivered,
];
const PAYMENT_RECEIPT: &[DocumentStatus] = &[DocumentStatus::Completed, DocumentStatus::Cancelled];
const GOODS_RECEIVING_VOUCHER: &[DocumentStatus] =
    &[DocumentStatus::Pending, DocumentStatus::Received];
const FINANCIAL_REPORT: &[DocumentStatus] = &[DocumentStatus::Draft, DocumentStatus::Final];

impl DocumentStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Dispatched => "dispatched",
            Self::Received => "received",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Final => "final",
            Self::Converted => "converted",
        }
    }

    /// Parses a status from a possibly unclean string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "pending_approval" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "dispatched" => Some(Self::Dispatched),
            "received" => Some(Self::Received),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "final" => Some(Self::Final),
            "converted" => Some(Self::Converted),
            _ => None,
        }
    }

    /// Statuses a document of the given type can be in.
    #[must_use]
    pub const fn lifecycle(document_type: DocumentType) -> &'static [Self] {
        match document_type {
            DocumentType::Quote => QUOTE,
            DocumentType::SalesOrder => SALES_ORDER,
            DocumentType::Invoice => INVOICE,
            DocumentType::PurchaseOrder => PURCHASE_ORDER,
            DocumentType::DeliveryNote => DELIVERY_NOTE,
            DocumentType::PaymentReceipt => PAYMENT_RECEIPT,
            DocumentType::GoodsReceivingVoucher => GOODS_RECEIVING_VOUCHER,
            DocumentType::FinancialReport => FINANCIAL_REPORT,
        }
    }

    /// Status a newly created document of the given type starts in.
    #[must_use]
    pub const fn initial(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Quote
            | DocumentType::Invoice
            | DocumentType::PurchaseOrder
            | DocumentType::FinancialReport => Self::Draft,
            DocumentType::SalesOrder
            | DocumentType::DeliveryNote
            | DocumentType::GoodsReceivingVoucher => Self::Pending,
            DocumentType::PaymentReceipt => Self::Completed,
        }
    }

    /// Returns true if the status belongs to the type's lifecycle.
    #[must_use]
    pub fn applies_to(&self, document_type: DocumentType) -> bool {
        Self::lifecycle(document_type).contains(self)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
