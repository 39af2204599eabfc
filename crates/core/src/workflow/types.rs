//! Workflow transition tables.
//!
//! Two fixed tables drive every lifecycle decision:
//! - [`CONVERSIONS`]: which statuses allow a document to be converted into
//!   another type, and the status the new document starts in.
//! - [`STATUS_ACTIONS`]: in-place status changes (send, accept, ship, ...).

use serde::{Deserialize, Serialize};

use crate::document::{DocumentStatus, DocumentType};

/// A legal type-to-type conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRule {
    /// Source type.
    pub from: DocumentType,
    /// Target type.
    pub to: DocumentType,
    /// Source statuses that allow the conversion.
    pub allowed: &'static [DocumentStatus],
    /// Status of the newly created target.
    pub target_status: DocumentStatus,
}

/// An in-place status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    /// Type the action applies to.
    pub document_type: DocumentType,
    /// Action name passed by the caller.
    pub action: &'static str,
    /// Button label.
    pub label: &'static str,
    /// Statuses the action is available from.
    pub from: &'static [DocumentStatus],
    /// Resulting status.
    pub to: DocumentStatus,
}

use DocumentStatus as S;
use DocumentType as T;

/// Conversion table. Sales orders fan out to both invoices and delivery
/// notes.
pub const CONVERSIONS: &[ConversionRule] = &[
    ConversionRule {
        from: T::Quote,
        to: T::SalesOrder,
        allowed: &[S::Accepted],
        target_status: S::Pending,
    },
    ConversionRule {
        from: T::SalesOrder,
        to: T::Invoice,
        allowed: &[S::Confirmed, S::Shipped, S::Delivered],
        target_status: S::Draft,
    },
    ConversionRule {
        from: T::SalesOrder,
        to: T::DeliveryNote,
        allowed: &[S::Confirmed, S::Shipped],
        target_status: S::Pending,
    },
    ConversionRule {
        from: T::Invoice,
        to: T::PaymentReceipt,
        allowed: &[S::Sent, S::Overdue, S::Paid],
        target_status: S::Completed,
    },
    ConversionRule {
        from: T::PurchaseOrder,
        to: T::GoodsReceivingVoucher,
        allowed: &[S::Approved],
        target_status: S::Pending,
    },
];

/// Status action table.
pub const STATUS_ACTIONS: &[StatusAction] = &[
    // Quote
    StatusAction {
        document_type: T::Quote,
        action: "send",
        label: "Send to Customer",
        from: &[S::Draft],
        to: S::Sent,
    },
    StatusAction {
        document_type: T::Quote,
        action: "accept",
        label: "Mark as Accepted",
        from: &[S::Sent],
        to: S::Accepted,
    },
    StatusAction {
        document_type: T::Quote,
        action: "reject",
        label: "Mark as Rejected",
        from: &[S::Sent],
        to: S::Rejected,
    },
    StatusAction {
        document_type: T::Quote,
        action: "expire",
        label: "Mark as Expired",
        from: &[S::Draft, S::Sent],
        to: S::Expired,
    },
    // Sales order
    StatusAction {
        document_type: T::SalesOrder,
        action: "confirm",
        label: "Confirm Order",
        from: &[S::Pending],
        to: S::Confirmed,
    },
    StatusAction {
        document_type: T::SalesOrder,
        action: "ship",
        label: "Mark as Shipped",
        from: &[S::Confirmed],
        to: S::Shipped,
    },
    StatusAction {
        document_type: T::SalesOrder,
        action: "deliver",
        label: "Mark as Delivered",
        from: &[S::Shipped],
        to: S::Delivered,
    },
    StatusAction {
        document_type: T::SalesOrder,
        action: "cancel",
        label: "Cancel Order",
        from: &[S::Pending, S::Confirmed],
        to: S::Cancelled,
    },
    // Invoice
    StatusAction {
        document_type: T::Invoice,
        action: "send",
        label: "Send to Customer",
        from: &[S::Draft],
        to: S::Sent,
    },
    StatusAction {
        document_type: T::Invoice,
        action: "mark_paid",
        label: "Mark as Paid",
        from: &[S::Sent, S::Overdue],
        to: S::Paid,
    },
    StatusAction {
        document_type: T::Invoice,
        action: "mark_overdue",
        label: "Mark as Overdue",
        from: &[S::Sent],
        to: S::Overdue,
    },
    StatusAction {
        document_type: T::Invoice,
        action: "cancel",
        label: "Cancel Invoice",
        from: &[S::Draft, S::Sent],
        to: S::Cancelled,
    },
    // Purchase order
    StatusAction {
        document_type: T::PurchaseOrder,
        action: "submit",
        label: "Submit for Approval",
        from: &[S::Draft],
        to: S::PendingApproval,
    },
    StatusAction {
        document_type: T::PurchaseOrder,
        action: "approve",
        label: "Approve",
        from: &[S::PendingApproval],
        to: S::Approved,
    },
    StatusAction {
        document_type: T::PurchaseOrder,
        action: "reject",
        label: "Reject",
        from: &[S::PendingApproval],
        to: S::Rejected,
    },
    StatusAction {
        document_type: T::PurchaseOrder,
        action: "cancel",
        label: "Cancel Order",
        from: &[S::Draft, S::PendingApproval],
        to: S::Cancelled,
    },
    // Delivery note
    StatusAction {
        document_type: T::DeliveryNote,
        action: "dispatch",
        label: "Mark as Dispatched",
        from: &[S::Pending],
        to: S::Dispatched,
    },
    StatusAction {
        document_type: T::DeliveryNote,
        action: "deliver",
        label: "Mark as Delivered",
        from: &[S::Dispatched],
        to: S::Delivered,
    },
    // Payment receipt
    StatusAction {
        document_type: T::PaymentReceipt,
        action: "cancel",
        label: "Cancel Receipt",
        from: &[S::Completed],
        to: S::Cancelled,
    },
    // Goods receiving voucher
    StatusAction {
        document_type: T::GoodsReceivingVoucher,
        action: "receive",
        label: "Confirm Receipt",
        from: &[S::Pending],
        to: S::Received,
    },
    // Financial report
    StatusAction {
        document_type: T::FinancialReport,
        action: "finalize",
        label: "Finalize Report",
        from: &[S::Draft],
        to: S::Final,
    },
];

/// What an available action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Changes the document's status in place.
    Status,
    /// Creates a new document of another type.
    Convert,
}

/// An action the calling UI may offer for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableAction {
    /// Action name (`send`, `convert_to_invoice`, ...).
    pub action: String,
    /// Button label.
    pub label: String,
    /// Action kind.
    pub kind: ActionKind,
    /// Target type for conversions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<DocumentType>,
}

impl AvailableAction {
    pub(crate) fn status(action: &StatusAction) -> Self {
        Self {
            action: action.action.to_string(),
            label: action.label.to_string(),
            kind: ActionKind::Status,
            target: None,
        }
    }

    pub(crate) fn convert(rule: &ConversionRule) -> Self {
        Self {
            action: format!("convert_to_{}", rule.to.as_str()),
            label: format!("Convert to {}", rule.to.label()),
            kind: ActionKind::Convert,
            target: Some(rule.to),
        }
    }
}
