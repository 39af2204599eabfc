//! Property-based tests for WorkflowService.

use proptest::prelude::*;

use docket_shared::config::ReconversionPolicy;

use chrono::NaiveDate;

use crate::document::{Document, DocumentStatus, DocumentType};
use crate::workflow::error::WorkflowError;
use crate::workflow::service::{ConversionCheck, WorkflowService};
use crate::workflow::types::CONVERSIONS;

fn arb_type() -> impl Strategy<Value = DocumentType> {
    proptest::sample::select(DocumentType::ALL.to_vec())
}

/// Any non-converted status in any of the documented lifecycles.
fn arb_status() -> impl Strategy<Value = DocumentStatus> {
    let statuses: Vec<DocumentStatus> = DocumentType::ALL
        .iter()
        .flat_map(|t| DocumentStatus::lifecycle(*t).iter().copied())
        .filter(|s| *s != DocumentStatus::Converted)
        .collect();
    proptest::sample::select(statuses)
}

/// A status string as unclean upstream data might carry it.
fn arb_unclean(status: DocumentStatus) -> impl Strategy<Value = String> {
    (any::<bool>(), 0usize..3, 0usize..3).prop_map(move |(upper, lead, trail)| {
        let text = if upper {
            status.as_str().to_uppercase()
        } else {
            status.as_str().to_string()
        };
        format!("{}{text}{}", " ".repeat(lead), " ".repeat(trail))
    })
}

fn arb_policy() -> impl Strategy<Value = ReconversionPolicy> {
    prop_oneof![Just(ReconversionPolicy::Warn), Just(ReconversionPolicy::Reject)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A conversion is accepted exactly when the table lists the pair and
    /// the status, whatever the status casing or padding.
    #[test]
    fn prop_conversion_legality(
        (status, raw) in arb_status().prop_flat_map(|s| (Just(s), arb_unclean(s))),
        from in arb_type(),
        to in arb_type(),
        policy in arb_policy(),
    ) {
        let rule = CONVERSIONS.iter().find(|r| r.from == from && r.to == to);
        let result = WorkflowService::check_conversion(from, to, &raw, policy);

        match rule {
            None => {
                let is_unsupported = matches!(result, Err(WorkflowError::UnsupportedConversion { .. }));
                prop_assert!(is_unsupported);
            }
            Some(rule) if rule.allowed.contains(&status) => {
                prop_assert!(matches!(result, Ok(ConversionCheck::Allowed(_))));
                prop_assert!(WorkflowService::can_convert(from, to, &raw));
            }
            Some(_) => {
                match result {
                    Err(WorkflowError::InvalidState { status: reported, .. }) => {
                        prop_assert_eq!(reported, raw.clone());
                    }
                    other => prop_assert!(false, "expected InvalidState, got {:?}", other),
                }
                prop_assert!(!WorkflowService::can_convert(from, to, &raw));
            }
        }
    }

    /// After a document has been converted, further conversions are judged
    /// by the status it held before, and only a repeated target counts as a
    /// reconversion.
    #[test]
    fn prop_legality_survives_conversion(
        source_type in arb_type(),
        prior in arb_status(),
        produced in proptest::collection::vec(arb_type(), 1..3),
        to in arb_type(),
    ) {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut source = Document::new(source_type, "DOC-1", date).with_status(prior);
        for target in &produced {
            source.mark_converted(*target);
        }

        let rule = CONVERSIONS.iter().find(|r| r.from == source_type && r.to == to);
        let result = WorkflowService::check_document(&source, to, ReconversionPolicy::Reject);

        match rule {
            None => {
                let is_unsupported = matches!(result, Err(WorkflowError::UnsupportedConversion { .. }));
                prop_assert!(is_unsupported);
            }
            Some(rule) if rule.allowed.contains(&prior) && !produced.contains(&to) => {
                prop_assert!(matches!(result, Ok(ConversionCheck::Allowed(_))));
            }
            Some(_) => {
                let is_invalid = matches!(result, Err(WorkflowError::InvalidState { .. }));
                prop_assert!(is_invalid);
            }
        }
    }

    /// Every status action offered for a status can be applied from it.
    #[test]
    fn prop_available_status_actions_apply(
        document_type in arb_type(),
        status in arb_status(),
    ) {
        for action in WorkflowService::available_actions(document_type, status.as_str()) {
            match action.target {
                None => {
                    let applied = WorkflowService::apply_action(document_type, status.as_str(), &action.action);
                    prop_assert!(applied.is_ok());
                }
                Some(target) => {
                    prop_assert!(WorkflowService::can_convert(document_type, target, status.as_str()));
                }
            }
        }
    }
}
