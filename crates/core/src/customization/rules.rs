//! Conditional styling rules.
//!
//! A rule pairs a condition over [`DocumentFacts`] with a [`SettingsPatch`]
//! applied when it matches. Rules see only the facts, never the resolver's
//! intermediate state, so their outcome does not depend on evaluation
//! order; only the merge order (by priority) does.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use docket_shared::config::CustomizationConfig;

use super::types::SettingsPatch;
use crate::document::{Document, DocumentStatus, DocumentType};

/// What rules may look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFacts {
    /// Document type.
    pub document_type: DocumentType,
    /// Document total.
    pub total: Decimal,
    /// Parsed status, if recognised.
    pub status: Option<DocumentStatus>,
    /// Party industry, lowercased.
    pub industry: Option<String>,
}

impl DocumentFacts {
    /// Extracts the facts from a document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            document_type: document.document_type(),
            total: document.total,
            status: document.status(),
            industry: document
                .party
                .as_ref()
                .and_then(|p| p.industry.as_deref())
                .map(|i| i.trim().to_lowercase())
                .filter(|i| !i.is_empty()),
        }
    }
}

/// Rule condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Total strictly above the amount.
    TotalAbove {
        /// Threshold.
        amount: Decimal,
    },
    /// Status is one of the listed statuses.
    StatusIn {
        /// Matching statuses.
        statuses: Vec<DocumentStatus>,
    },
    /// Party industry is one of the listed industries (lowercase).
    IndustryIs {
        /// Matching industries.
        industries: Vec<String>,
    },
    /// Document type is one of the listed types.
    DocumentTypeIs {
        /// Matching types.
        types: Vec<DocumentType>,
    },
}

impl RuleCondition {
    /// Evaluates the condition.
    #[must_use]
    pub fn matches(&self, facts: &DocumentFacts) -> bool {
        match self {
            Self::TotalAbove { amount } => facts.total > *amount,
            Self::StatusIn { statuses } => facts.status.is_some_and(|s| statuses.contains(&s)),
            Self::IndustryIs { industries } => facts
                .industry
                .as_ref()
                .is_some_and(|industry| industries.iter().any(|i| i.eq_ignore_ascii_case(industry))),
            Self::DocumentTypeIs { types } => types.contains(&facts.document_type),
        }
    }
}

/// A named conditional rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    /// Rule name, for logs.
    pub name: String,
    /// Merge order; higher priorities are applied later and win.
    pub priority: i16,
    /// When the rule applies.
    pub condition: RuleCondition,
    /// What it changes.
    pub effect: SettingsPatch,
}

impl ConditionalRule {
    /// Premium styling above the configured threshold.
    #[must_use]
    pub fn high_value(config: &CustomizationConfig) -> Self {
        let mut effect = SettingsPatch::default();
        effect.colors.primary = Some(config.premium_color.clone());
        effect.colors.table_header_background = Some(config.premium_color.clone());
        effect.elements.watermark.enabled = Some(true);
        effect.elements.watermark.text = Some("PREMIUM".to_string());
        Self {
            name: "high_value".to_string(),
            priority: 10,
            condition: RuleCondition::TotalAbove {
                amount: config.high_value_threshold,
            },
            effect,
        }
    }

    /// Watermark for a set of statuses.
    #[must_use]
    pub fn status_watermark(name: &str, statuses: Vec<DocumentStatus>, text: &str) -> Self {
        let mut effect = SettingsPatch::default();
        effect.elements.watermark.enabled = Some(true);
        effect.elements.watermark.text = Some(text.to_string());
        Self {
            name: name.to_string(),
            priority: 20,
            condition: RuleCondition::StatusIn { statuses },
            effect,
        }
    }

    /// Accent colour for one industry.
    #[must_use]
    pub fn industry_accent(industry: &str, color: &str) -> Self {
        let mut effect = SettingsPatch::default();
        effect.colors.accent = Some(color.to_string());
        Self {
            name: format!("industry_{industry}"),
            priority: 30,
            condition: RuleCondition::IndustryIs {
                industries: vec![industry.to_lowercase()],
            },
            effect,
        }
    }

    /// The built-in rule set.
    #[must_use]
    pub fn builtin(config: &CustomizationConfig) -> Vec<Self> {
        let mut rules = vec![
            Self::high_value(config),
            Self::status_watermark("draft", vec![DocumentStatus::Draft], "DRAFT"),
            Self::status_watermark("overdue", vec![DocumentStatus::Overdue], "OVERDUE"),
            Self::status_watermark(
                "cancelled",
                vec![DocumentStatus::Cancelled],
                "CANCELLED",
            ),
        ];
        rules.extend(
            config
                .industry_accents
                .iter()
                .map(|(industry, color)| Self::industry_accent(industry, color)),
        );
        rules
    }
}

/// Merges the effects of every matching rule, lowest priority first. Rules
/// of equal priority keep their list order.
#[must_use]
pub fn evaluate(rules: &[ConditionalRule], facts: &DocumentFacts) -> (SettingsPatch, Vec<String>) {
    let mut matched: Vec<&ConditionalRule> =
        rules.iter().filter(|r| r.condition.matches(facts)).collect();
    matched.sort_by_key(|r| r.priority);

    let mut patch = SettingsPatch::default();
    for rule in &matched {
        patch.merge(&rule.effect);
    }
    (patch, matched.iter().map(|r| r.name.clone()).collect())
}
