//! Customization resolution.

use tracing::{debug, warn};

use docket_shared::config::CustomizationConfig;

use super::rules::{self, ConditionalRule, DocumentFacts};
use super::template::{Preset, builtin_template};
use super::types::{Branding, CustomizationSettings, PaymentDetails, RenderFormat, SettingsPatch};
use crate::document::{Document, DocumentType};

/// Points removed from font sizes when printing.
pub const PRINT_FONT_DELTA: u8 = 1;

/// Smallest font size printing may shrink to.
pub const PRINT_MIN_FONT_SIZE: u8 = 8;

/// Points added to font sizes on mobile.
pub const MOBILE_FONT_DELTA: u8 = 2;

/// Millimetres added to each margin on mobile.
pub const MOBILE_MARGIN_DELTA_MM: u16 = 5;

/// Where and how the resolved settings will be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Target format.
    pub format: RenderFormat,
    /// In-app preview: QR code and signature are hidden.
    pub is_preview: bool,
    /// Small screen: larger margins and fonts.
    pub is_mobile: bool,
    /// Document facts for conditional rules; `None` skips rules.
    pub facts: Option<DocumentFacts>,
    /// Presets applied after the configured defaults, in order.
    pub presets: Vec<Preset>,
}

impl ResolveContext {
    /// A context carrying the document's facts.
    #[must_use]
    pub fn for_document(document: &Document) -> Self {
        Self {
            facts: Some(DocumentFacts::from_document(document)),
            ..Self::default()
        }
    }

    /// Sets the target format.
    #[must_use]
    pub const fn with_format(mut self, format: RenderFormat) -> Self {
        self.format = format;
        self
    }

    /// Marks the context as a preview.
    #[must_use]
    pub const fn preview(mut self) -> Self {
        self.is_preview = true;
        self
    }

    /// Marks the context as mobile.
    #[must_use]
    pub const fn mobile(mut self) -> Self {
        self.is_mobile = true;
        self
    }

    /// Adds a preset.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }
}

/// Layers a base template, branding, presets, rules, a caller override and
/// context flags into fully concrete settings.
#[derive(Debug, Clone)]
pub struct CustomizationResolver {
    default_presets: Vec<Preset>,
    rules: Vec<ConditionalRule>,
    branding: Branding,
    payment: PaymentDetails,
}

impl CustomizationResolver {
    /// Creates a resolver with the built-in rules derived from `config`.
    ///
    /// Unknown names in `default_presets` are logged and skipped.
    #[must_use]
    pub fn new(config: &CustomizationConfig) -> Self {
        let default_presets = config
            .default_presets
            .iter()
            .filter_map(|name| {
                let preset = Preset::parse(name);
                if preset.is_none() {
                    warn!(preset = %name, "Unknown customization preset, skipping");
                }
                preset
            })
            .collect();

        Self {
            default_presets,
            rules: ConditionalRule::builtin(config),
            branding: Branding::default(),
            payment: PaymentDetails::default(),
        }
    }

    /// Sets organisation branding.
    #[must_use]
    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Sets the payment instruction values copied into resolved settings.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentDetails) -> Self {
        self.payment = payment;
        self
    }

    /// Replaces the rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<ConditionalRule>) -> Self {
        self.rules = rules;
        self
    }

    /// The active rules.
    #[must_use]
    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    /// Resolves settings starting from the built-in template for the type.
    ///
    /// # Arguments
    ///
    /// * `document_type` - Type being rendered
    /// * `overrides` - Caller's partial override, applied after rules
    /// * `context` - Format, flags, facts and extra presets
    ///
    /// # Returns
    ///
    /// Settings with every field populated.
    #[must_use]
    pub fn resolve(
        &self,
        document_type: DocumentType,
        overrides: Option<&SettingsPatch>,
        context: &ResolveContext,
    ) -> CustomizationSettings {
        self.resolve_from(builtin_template(document_type), overrides, context)
    }

    /// Resolves settings starting from a stored base, such as the type's
    /// default customization record.
    #[must_use]
    pub fn resolve_from(
        &self,
        base: CustomizationSettings,
        overrides: Option<&SettingsPatch>,
        context: &ResolveContext,
    ) -> CustomizationSettings {
        let mut settings = base;

        settings.apply(&self.branding.to_patch());

        for preset in self.default_presets.iter().chain(&context.presets) {
            settings.apply(&preset.patch());
        }

        if let Some(facts) = &context.facts {
            let (patch, matched) = rules::evaluate(&self.rules, facts);
            if !matched.is_empty() {
                debug!(
                    document_type = %settings.document_type,
                    rules = ?matched,
                    "Applied customization rules"
                );
            }
            settings.apply(&patch);
        }

        if let Some(overrides) = overrides {
            settings.apply(overrides);
        }

        settings.payment = merge_payment(&settings.payment, &self.payment);
        apply_context(&mut settings, context);
        settings
    }
}

/// Resolver-level payment values fill whatever the base leaves unset.
fn merge_payment(base: &PaymentDetails, profile: &PaymentDetails) -> PaymentDetails {
    PaymentDetails {
        bank: profile.bank.clone().or_else(|| base.bank.clone()),
        mobile_money: profile
            .mobile_money
            .clone()
            .or_else(|| base.mobile_money.clone()),
        default_terms: profile
            .default_terms
            .clone()
            .or_else(|| base.default_terms.clone()),
    }
}

fn apply_context(settings: &mut CustomizationSettings, context: &ResolveContext) {
    settings.format = context.format;

    if context.is_preview {
        settings.elements.qr_code.enabled = false;
        settings.elements.signature.enabled = false;
    }

    if context.format == RenderFormat::Print {
        settings.layout.opaque_background = true;
        let background = settings.colors.background.trim();
        if background.is_empty() || background.eq_ignore_ascii_case("transparent") {
            settings.colors.background = "#ffffff".to_string();
        }
        let typography = &mut settings.typography;
        typography.base_font_size = typography
            .base_font_size
            .saturating_sub(PRINT_FONT_DELTA)
            .max(PRINT_MIN_FONT_SIZE);
        typography.title_font_size = typography
            .title_font_size
            .saturating_sub(PRINT_FONT_DELTA)
            .max(PRINT_MIN_FONT_SIZE);
    }

    if context.is_mobile {
        let layout = &mut settings.layout;
        layout.margin_top_mm = layout.margin_top_mm.saturating_add(MOBILE_MARGIN_DELTA_MM);
        layout.margin_right_mm = layout.margin_right_mm.saturating_add(MOBILE_MARGIN_DELTA_MM);
        layout.margin_bottom_mm = layout
            .margin_bottom_mm
            .saturating_add(MOBILE_MARGIN_DELTA_MM);
        layout.margin_left_mm = layout.margin_left_mm.saturating_add(MOBILE_MARGIN_DELTA_MM);
        let typography = &mut settings.typography;
        typography.base_font_size = typography.base_font_size.saturating_add(MOBILE_FONT_DELTA);
        typography.title_font_size = typography.title_font_size.saturating_add(MOBILE_FONT_DELTA);
    }
}
