//! Workflow service for document transitions and conversions.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use docket_shared::config::{ReconversionPolicy, WorkflowConfig};
use docket_shared::types::LineItemId;

use crate::document::{
    Document, DocumentDetails, DocumentStatus, DocumentType, LineItem, SignatureSettings,
    SourceReference,
};
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{AvailableAction, CONVERSIONS, ConversionRule, STATUS_ACTIONS};

/// Outcome of a successful conversion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionCheck {
    /// The source is in an allowed status.
    Allowed(ConversionRule),
    /// The source was already converted and the policy tolerates it.
    Reconversion(ConversionRule),
}

impl ConversionCheck {
    /// The matched conversion rule.
    #[must_use]
    pub const fn rule(&self) -> &ConversionRule {
        match self {
            Self::Allowed(rule) | Self::Reconversion(rule) => rule,
        }
    }
}

/// Stateless service over the workflow tables.
///
/// All methods are associated functions; persistence of the results is the
/// caller's concern.
pub struct WorkflowService;

impl WorkflowService {
    /// Finds the conversion rule between two types.
    #[must_use]
    pub fn conversion_rule(from: DocumentType, to: DocumentType) -> Option<&'static ConversionRule> {
        CONVERSIONS
            .iter()
            .find(|rule| rule.from == from && rule.to == to)
    }

    /// Returns true if a document of `from` type in `status` may be converted
    /// to `to`. The status is compared trimmed and case-insensitively.
    #[must_use]
    pub fn can_convert(from: DocumentType, to: DocumentType, status: &str) -> bool {
        let Some(status) = DocumentStatus::parse(status) else {
            return false;
        };
        Self::conversion_rule(from, to).is_some_and(|rule| rule.allowed.contains(&status))
    }

    /// Validates a conversion request.
    ///
    /// # Arguments
    /// * `from` - Source document type
    /// * `to` - Requested target type
    /// * `status` - The source's raw status string
    /// * `policy` - What to do when the source was already converted
    ///
    /// # Returns
    /// * `Ok(ConversionCheck::Allowed)` if the status is in the allowed set
    /// * `Ok(ConversionCheck::Reconversion)` if the source is `converted` and
    ///   the policy is `Warn`
    /// * `Err(WorkflowError::UnsupportedConversion)` if no rule links the types
    /// * `Err(WorkflowError::InvalidState)` otherwise
    pub fn check_conversion(
        from: DocumentType,
        to: DocumentType,
        status: &str,
        policy: ReconversionPolicy,
    ) -> Result<ConversionCheck, WorkflowError> {
        let rule = Self::conversion_rule(from, to)
            .ok_or(WorkflowError::UnsupportedConversion { from, to })?;

        let invalid = || WorkflowError::InvalidState {
            document_type: from,
            status: status.to_string(),
            attempted: format!("convert to {to}"),
        };

        match DocumentStatus::parse(status) {
            Some(parsed) if rule.allowed.contains(&parsed) => Ok(ConversionCheck::Allowed(*rule)),
            Some(DocumentStatus::Converted) => match policy {
                ReconversionPolicy::Warn => Ok(ConversionCheck::Reconversion(*rule)),
                ReconversionPolicy::Reject => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }

    /// Validates converting a stored document, taking its conversion history
    /// into account.
    ///
    /// A converted document is checked against the status it held before
    /// its first conversion, so a sales order can still fan out to both an
    /// invoice and a delivery note. The reconversion policy applies only
    /// when the same target type is requested again. A document marked
    /// `converted` with no recorded history is checked by
    /// [`check_conversion`](Self::check_conversion).
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::UnsupportedConversion` if no rule links the
    /// types and `WorkflowError::InvalidState` if the prior status does not
    /// allow the conversion or the policy refuses a repeat.
    pub fn check_document(
        source: &Document,
        to: DocumentType,
        policy: ReconversionPolicy,
    ) -> Result<ConversionCheck, WorkflowError> {
        let from = source.document_type();
        let history = source.conversion.as_ref().filter(|history| {
            DocumentStatus::parse(&history.prior_status) != Some(DocumentStatus::Converted)
        });
        let Some(history) = history else {
            return Self::check_conversion(from, to, &source.status, policy);
        };

        let rule = Self::conversion_rule(from, to)
            .ok_or(WorkflowError::UnsupportedConversion { from, to })?;
        let invalid = |status: &str| WorkflowError::InvalidState {
            document_type: from,
            status: status.to_string(),
            attempted: format!("convert to {to}"),
        };

        let prior_allowed = DocumentStatus::parse(&history.prior_status)
            .is_some_and(|prior| rule.allowed.contains(&prior));
        if !prior_allowed {
            return Err(invalid(&history.prior_status));
        }
        if !history.produced(to) {
            return Ok(ConversionCheck::Allowed(*rule));
        }
        match policy {
            ReconversionPolicy::Warn => Ok(ConversionCheck::Reconversion(*rule)),
            ReconversionPolicy::Reject => Err(invalid(&source.status)),
        }
    }

    /// Resolves an in-place status action.
    ///
    /// # Returns
    /// * `Ok(status)` - the status the document moves to
    /// * `Err(WorkflowError::UnknownAction)` if the type has no such action
    /// * `Err(WorkflowError::InvalidState)` if the current status does not
    ///   allow it
    pub fn apply_action(
        document_type: DocumentType,
        status: &str,
        action: &str,
    ) -> Result<DocumentStatus, WorkflowError> {
        let wanted = action.trim().to_lowercase();
        let entry = STATUS_ACTIONS
            .iter()
            .find(|a| a.document_type == document_type && a.action == wanted)
            .ok_or_else(|| WorkflowError::UnknownAction {
                document_type,
                action: action.to_string(),
            })?;

        match DocumentStatus::parse(status) {
            Some(current) if entry.from.contains(&current) => Ok(entry.to),
            _ => Err(WorkflowError::InvalidState {
                document_type,
                status: status.to_string(),
                attempted: entry.action.to_string(),
            }),
        }
    }

    /// Lists the status and conversion actions open to a document.
    #[must_use]
    pub fn available_actions(document_type: DocumentType, status: &str) -> Vec<AvailableAction> {
        let Some(status) = DocumentStatus::parse(status) else {
            return Vec::new();
        };

        let status_actions = STATUS_ACTIONS
            .iter()
            .filter(|a| a.document_type == document_type && a.from.contains(&status))
            .map(AvailableAction::status);
        let conversions = CONVERSIONS
            .iter()
            .filter(|rule| rule.from == document_type && rule.allowed.contains(&status))
            .map(AvailableAction::convert);

        status_actions.chain(conversions).collect()
    }

    /// Builds the target document of a conversion.
    ///
    /// Party, company, items, tax settings, currency, notes, terms and
    /// discount are copied; lines get fresh ids and derived amounts are
    /// recomputed. Type-specific payment and shipping fields start empty,
    /// except that invoices get a due date and receipts record the source's
    /// outstanding balance as the amount paid.
    #[must_use]
    pub fn build_conversion(
        source: &Document,
        rule: &ConversionRule,
        document_number: String,
        today: NaiveDate,
        config: &WorkflowConfig,
    ) -> Document {
        let mut target = Document::new(rule.to, document_number, today);

        target.company = source.company.clone();
        target.party.clone_from(&source.party);
        target.items = source.items.iter().map(Self::copy_item).collect();
        target.tax_settings = source.tax_settings.clone();
        target.currency.clone_from(&source.currency);
        target.notes.clone_from(&source.notes);
        target.terms.clone_from(&source.terms);
        target.discount = source.discount;
        target.signature = source.signature.as_ref().map(|signature| SignatureSettings {
            enabled: signature.enabled,
            signature_id: signature.signature_id.clone(),
            document_type: rule.to,
        });
        target.set_status(rule.target_status);
        target.source = Some(SourceReference {
            document_type: source.document_type(),
            id: source.id.clone(),
            document_number: source.document_number.clone(),
        });
        target.details = Self::target_details(source, rule.to, today, config);
        target.recalculate();
        target
    }

    fn copy_item(item: &LineItem) -> LineItem {
        LineItem {
            id: LineItemId::generate(),
            tax_amount: None,
            total: Decimal::ZERO,
            ..item.clone()
        }
    }

    fn target_details(
        source: &Document,
        to: DocumentType,
        today: NaiveDate,
        config: &WorkflowConfig,
    ) -> DocumentDetails {
        let after = |days: u32| today.checked_add_days(Days::new(u64::from(days)));
        match to {
            DocumentType::Quote => DocumentDetails::Quote {
                valid_until: after(config.quote_validity_days),
            },
            DocumentType::Invoice => DocumentDetails::Invoice {
                due_date: after(config.invoice_due_days),
                amount_paid: Decimal::ZERO,
            },
            DocumentType::PaymentReceipt => {
                let already_paid = match &source.details {
                    DocumentDetails::Invoice { amount_paid, .. } => *amount_paid,
                    _ => Decimal::ZERO,
                };
                DocumentDetails::PaymentReceipt {
                    payment_method: None,
                    reference: None,
                    amount_paid: source.total.saturating_sub(already_paid).max(Decimal::ZERO),
                }
            }
            DocumentType::GoodsReceivingVoucher => DocumentDetails::GoodsReceivingVoucher {
                received_date: Some(today),
                received_by: None,
            },
            other => DocumentDetails::empty(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Party;
    use crate::tax::{TaxSettings, TaxType};
    use crate::workflow::types::ActionKind;
    use docket_shared::types::DocumentId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn accepted_quote() -> Document {
        let mut quote = Document::new(DocumentType::Quote, "QT-2024-0001", today())
            .with_party(Party::named("Acme Traders"))
            .with_tax_settings(TaxSettings::new(TaxType::Exclusive, dec!(16)))
            .with_items(vec![
                LineItem::new("Cement bag", dec!(2), dec!(100)).with_code("CEM-50"),
                LineItem::new("Delivery", dec!(1), dec!(50)),
            ])
            .with_status(DocumentStatus::Accepted);
        quote.id = Some(DocumentId::new("quote-1"));
        quote.signature = Some(SignatureSettings {
            enabled: true,
            signature_id: Some("sig-9".into()),
            document_type: DocumentType::Quote,
        });
        quote
    }

    #[rstest]
    #[case(DocumentType::Quote, DocumentType::SalesOrder, "accepted", true)]
    #[case(DocumentType::Quote, DocumentType::SalesOrder, " ACCEPTED ", true)]
    #[case(DocumentType::Quote, DocumentType::SalesOrder, "draft", false)]
    #[case(DocumentType::SalesOrder, DocumentType::Invoice, "confirmed", true)]
    #[case(DocumentType::SalesOrder, DocumentType::Invoice, "pending", false)]
    #[case(DocumentType::SalesOrder, DocumentType::DeliveryNote, "shipped", true)]
    #[case(DocumentType::SalesOrder, DocumentType::DeliveryNote, "delivered", false)]
    #[case(DocumentType::Invoice, DocumentType::PaymentReceipt, "Overdue", true)]
    #[case(DocumentType::PurchaseOrder, DocumentType::GoodsReceivingVoucher, "approved", true)]
    #[case(DocumentType::Quote, DocumentType::Invoice, "accepted", false)]
    #[case(DocumentType::Quote, DocumentType::SalesOrder, "garbage", false)]
    fn test_can_convert(
        #[case] from: DocumentType,
        #[case] to: DocumentType,
        #[case] status: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(WorkflowService::can_convert(from, to, status), expected);
    }

    #[test]
    fn test_check_conversion_rejects_with_raw_status() {
        let err = WorkflowService::check_conversion(
            DocumentType::Quote,
            DocumentType::SalesOrder,
            " Draft",
            ReconversionPolicy::Warn,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidState {
                document_type: DocumentType::Quote,
                status: " Draft".into(),
                attempted: "convert to sales_order".into(),
            }
        );
    }

    #[test]
    fn test_check_conversion_unsupported_pair() {
        let err = WorkflowService::check_conversion(
            DocumentType::Invoice,
            DocumentType::Quote,
            "sent",
            ReconversionPolicy::Warn,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONVERSION");
    }

    #[test]
    fn test_reconversion_policy() {
        let warn = WorkflowService::check_conversion(
            DocumentType::SalesOrder,
            DocumentType::DeliveryNote,
            "converted",
            ReconversionPolicy::Warn,
        )
        .unwrap();
        assert!(matches!(warn, ConversionCheck::Reconversion(_)));
        assert_eq!(warn.rule().to, DocumentType::DeliveryNote);

        let reject = WorkflowService::check_conversion(
            DocumentType::SalesOrder,
            DocumentType::DeliveryNote,
            "Converted",
            ReconversionPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(reject, WorkflowError::InvalidState { ref status, .. } if status == "Converted"));
    }

    fn converted_order(prior: DocumentStatus, targets: &[DocumentType]) -> Document {
        let mut order = Document::new(DocumentType::SalesOrder, "SO-2024-0001", today())
            .with_status(prior);
        for target in targets {
            order.mark_converted(*target);
        }
        order
    }

    #[test]
    fn test_mark_converted_keeps_first_status() {
        let order = converted_order(
            DocumentStatus::Confirmed,
            &[DocumentType::Invoice, DocumentType::DeliveryNote, DocumentType::Invoice],
        );

        assert_eq!(order.status(), Some(DocumentStatus::Converted));
        let history = order.conversion.unwrap();
        assert_eq!(history.prior_status, "confirmed");
        assert_eq!(
            history.targets,
            vec![DocumentType::Invoice, DocumentType::DeliveryNote]
        );
    }

    #[rstest]
    #[case(ReconversionPolicy::Warn)]
    #[case(ReconversionPolicy::Reject)]
    fn test_fan_out_is_not_a_reconversion(#[case] policy: ReconversionPolicy) {
        let order = converted_order(DocumentStatus::Confirmed, &[DocumentType::Invoice]);

        let check =
            WorkflowService::check_document(&order, DocumentType::DeliveryNote, policy).unwrap();

        assert!(matches!(check, ConversionCheck::Allowed(_)));
    }

    #[test]
    fn test_repeat_target_follows_policy() {
        let order = converted_order(DocumentStatus::Confirmed, &[DocumentType::Invoice]);

        let warn =
            WorkflowService::check_document(&order, DocumentType::Invoice, ReconversionPolicy::Warn)
                .unwrap();
        assert!(matches!(warn, ConversionCheck::Reconversion(_)));

        let reject = WorkflowService::check_document(
            &order,
            DocumentType::Invoice,
            ReconversionPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(reject, WorkflowError::InvalidState { ref status, .. } if status == "converted"));
    }

    #[test]
    fn test_converted_source_checked_against_prior_status() {
        let order = converted_order(DocumentStatus::Delivered, &[DocumentType::Invoice]);

        let err = WorkflowService::check_document(
            &order,
            DocumentType::DeliveryNote,
            ReconversionPolicy::Warn,
        )
        .unwrap_err();

        assert_eq!(
            err,
            WorkflowError::InvalidState {
                document_type: DocumentType::SalesOrder,
                status: "delivered".into(),
                attempted: "convert to delivery_note".into(),
            }
        );
    }

    #[test]
    fn test_unconverted_document_uses_its_status() {
        let order = Document::new(DocumentType::SalesOrder, "SO-1", today())
            .with_status(DocumentStatus::Shipped);
        assert!(matches!(
            WorkflowService::check_document(&order, DocumentType::DeliveryNote, ReconversionPolicy::Reject),
            Ok(ConversionCheck::Allowed(_))
        ));

        let pending = Document::new(DocumentType::SalesOrder, "SO-2", today());
        assert!(WorkflowService::check_document(
            &pending,
            DocumentType::Invoice,
            ReconversionPolicy::Warn
        )
        .is_err());
    }

    #[test]
    fn test_apply_action() {
        assert_eq!(
            WorkflowService::apply_action(DocumentType::Quote, "draft", "send"),
            Ok(DocumentStatus::Sent)
        );
        assert_eq!(
            WorkflowService::apply_action(DocumentType::Invoice, " OVERDUE", "Mark_Paid"),
            Ok(DocumentStatus::Paid)
        );
        assert!(matches!(
            WorkflowService::apply_action(DocumentType::Quote, "accepted", "send"),
            Err(WorkflowError::InvalidState { .. })
        ));
        assert!(matches!(
            WorkflowService::apply_action(DocumentType::Quote, "draft", "ship"),
            Err(WorkflowError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_available_actions_for_confirmed_order() {
        let actions = WorkflowService::available_actions(DocumentType::SalesOrder, "Confirmed");
        let names: Vec<_> = actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(
            names,
            ["ship", "cancel", "convert_to_invoice", "convert_to_delivery_note"]
        );
        let convert = actions.iter().find(|a| a.kind == ActionKind::Convert).unwrap();
        assert_eq!(convert.label, "Convert to Invoice");
        assert_eq!(convert.target, Some(DocumentType::Invoice));
    }

    #[test]
    fn test_available_actions_for_unknown_status() {
        assert!(WorkflowService::available_actions(DocumentType::Quote, "archived").is_empty());
    }

    #[test]
    fn test_build_sales_order_from_quote() {
        let quote = accepted_quote();
        let rule = WorkflowService::conversion_rule(DocumentType::Quote, DocumentType::SalesOrder)
            .unwrap();

        let order = WorkflowService::build_conversion(
            &quote,
            rule,
            "SO-2024-0001".into(),
            today(),
            &WorkflowConfig::default(),
        );

        assert_eq!(order.document_type(), DocumentType::SalesOrder);
        assert_eq!(order.status(), Some(DocumentStatus::Pending));
        assert_eq!(order.document_number, "SO-2024-0001");
        assert!(order.id.is_none());
        assert_eq!(order.party_name(), Some("Acme Traders"));
        assert_eq!(order.total, dec!(290));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].description, "Cement bag");
        assert_eq!(order.items[0].item_code, "CEM-50");
        assert_eq!(order.items[0].quantity, dec!(2));
        assert_ne!(order.items[0].id, quote.items[0].id);
        assert_eq!(
            order.signature.as_ref().map(|s| s.document_type),
            Some(DocumentType::SalesOrder)
        );
        let source = order.source.unwrap();
        assert_eq!(source.document_type, DocumentType::Quote);
        assert_eq!(source.id, Some(DocumentId::new("quote-1")));
        assert_eq!(source.document_number, "QT-2024-0001");
    }

    #[test]
    fn test_build_invoice_sets_due_date() {
        let mut order = accepted_quote();
        order.details = DocumentDetails::SalesOrder {
            expected_delivery: Some(today()),
            shipping_address: Some("Plot 4, Industrial Area".into()),
        };
        let rule = WorkflowService::conversion_rule(DocumentType::SalesOrder, DocumentType::Invoice)
            .unwrap();
        let config = WorkflowConfig {
            invoice_due_days: 14,
            ..WorkflowConfig::default()
        };

        let invoice =
            WorkflowService::build_conversion(&order, rule, "INV-1".into(), today(), &config);

        assert_eq!(
            invoice.details,
            DocumentDetails::Invoice {
                due_date: NaiveDate::from_ymd_opt(2024, 5, 24),
                amount_paid: Decimal::ZERO,
            }
        );
        assert_eq!(invoice.status(), Some(DocumentStatus::Draft));
    }

    #[test]
    fn test_build_receipt_records_outstanding_balance() {
        let mut invoice = accepted_quote();
        invoice.details = DocumentDetails::Invoice {
            due_date: None,
            amount_paid: dec!(90),
        };
        let rule =
            WorkflowService::conversion_rule(DocumentType::Invoice, DocumentType::PaymentReceipt)
                .unwrap();

        let receipt = WorkflowService::build_conversion(
            &invoice,
            rule,
            "RCT-1".into(),
            today(),
            &WorkflowConfig::default(),
        );

        assert!(matches!(
            receipt.details,
            DocumentDetails::PaymentReceipt { amount_paid, ref payment_method, .. }
                if amount_paid == dec!(200) && payment_method.is_none()
        ));
        assert_eq!(receipt.status(), Some(DocumentStatus::Completed));
    }
}
