//! Customization settings types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docket_shared::types::CustomizationId;

use super::template::builtin_template;
use crate::document::DocumentType;

/// Horizontal placement of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Right aligned.
    Right,
}

impl Alignment {
    /// CSS keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Paper size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A4.
    #[default]
    A4,
    /// ISO A5.
    A5,
    /// US Letter.
    Letter,
}

impl PageSize {
    /// CSS `@page size` keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::Letter => "letter",
        }
    }
}

/// Target the settings are resolved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// On-screen display.
    #[default]
    Screen,
    /// Printing or print-to-PDF.
    Print,
    /// Archival web page or word-processor file.
    Archival,
}

patchable! {
    /// Colour palette. Values are CSS colours.
    pub struct ColorPalette / ColorPalettePatch {
        /// Headings, rules and the totals row.
        pub primary: String,
        /// Secondary text and borders of emphasis.
        pub secondary: String,
        /// Highlights.
        pub accent: String,
        /// Body text.
        pub text: String,
        /// Muted captions.
        pub muted: String,
        /// Page background.
        pub background: String,
        /// Table and block borders.
        pub border: String,
        /// Items table header fill.
        pub table_header_background: String,
        /// Items table header text.
        pub table_header_text: String,
    }
}

patchable! {
    /// Fonts and sizes.
    pub struct TypographyConfig / TypographyPatch {
        /// Body font stack.
        pub font_family: String,
        /// Heading font stack.
        pub heading_font_family: String,
        /// Body size in points.
        pub base_font_size: u8,
        /// Document title size in points.
        pub title_font_size: u8,
        /// Line height in percent of the font size.
        pub line_height_percent: u16,
    }
}

patchable! {
    /// Page layout.
    pub struct LayoutConfig / LayoutPatch {
        /// Paper size.
        pub page_size: PageSize,
        /// Landscape instead of portrait.
        pub landscape: bool,
        /// Top margin in millimetres.
        pub margin_top_mm: u16,
        /// Right margin in millimetres.
        pub margin_right_mm: u16,
        /// Bottom margin in millimetres.
        pub margin_bottom_mm: u16,
        /// Left margin in millimetres.
        pub margin_left_mm: u16,
        /// Paint background colours even where a printer would drop them.
        pub opaque_background: bool,
    }
}

patchable! {
    /// Company header.
    pub struct HeaderElement / HeaderPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Show the company logo.
        pub show_logo: bool,
        /// Show address and contact lines.
        pub show_company_details: bool,
        /// Placement.
        pub alignment: Alignment,
    }
}

patchable! {
    /// Customer or vendor block.
    pub struct PartyElement / PartyPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Show phone and email.
        pub show_contact: bool,
        /// Show the party's tax number.
        pub show_tax_id: bool,
    }
}

patchable! {
    /// Line-item table.
    pub struct ItemsTableElement / ItemsTablePatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Include the item code column.
        pub show_item_code: bool,
        /// Include the tax column.
        pub show_tax: bool,
        /// Include the unit column.
        pub show_unit: bool,
        /// Alternate row shading.
        pub striped: bool,
    }
}

patchable! {
    /// Totals block.
    pub struct TotalsElement / TotalsPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Show the subtotal row.
        pub show_subtotal: bool,
        /// Show the tax row.
        pub show_tax: bool,
    }
}

patchable! {
    /// Payment instructions block.
    pub struct PaymentElement / PaymentPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Show bank transfer details.
        pub show_bank: bool,
        /// Show mobile money details.
        pub show_mobile_money: bool,
        /// Show terms and conditions.
        pub show_terms: bool,
    }
}

patchable! {
    /// Signature block.
    pub struct SignatureElement / SignaturePatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Show a date line.
        pub show_date: bool,
    }
}

patchable! {
    /// Notes block.
    pub struct NotesElement / NotesPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
    }
}

patchable! {
    /// Footer.
    pub struct FooterElement / FooterPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Footer text; empty prints the company name only.
        pub text: String,
    }
}

patchable! {
    /// QR code placeholder.
    pub struct QrCodeElement / QrCodePatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Placement.
        pub alignment: Alignment,
    }
}

patchable! {
    /// Diagonal watermark.
    pub struct WatermarkElement / WatermarkPatch {
        /// Whether the block is rendered.
        pub enabled: bool,
        /// Watermark text.
        pub text: String,
        /// Opacity in percent.
        pub opacity_percent: u8,
    }
}

/// Per-element configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsConfig {
    /// Company header.
    pub header: HeaderElement,
    /// Party block.
    pub party: PartyElement,
    /// Line-item table.
    pub items_table: ItemsTableElement,
    /// Totals block.
    pub totals: TotalsElement,
    /// Payment instructions.
    pub payment: PaymentElement,
    /// Notes block.
    pub notes: NotesElement,
    /// Signature block.
    pub signature: SignatureElement,
    /// Footer.
    pub footer: FooterElement,
    /// QR code.
    pub qr_code: QrCodeElement,
    /// Watermark.
    pub watermark: WatermarkElement,
}

/// Partial [`ElementsConfig`]; each element merges field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementsPatch {
    /// Company header.
    pub header: HeaderPatch,
    /// Party block.
    pub party: PartyPatch,
    /// Line-item table.
    pub items_table: ItemsTablePatch,
    /// Totals block.
    pub totals: TotalsPatch,
    /// Payment instructions.
    pub payment: PaymentPatch,
    /// Notes block.
    pub notes: NotesPatch,
    /// Signature block.
    pub signature: SignaturePatch,
    /// Footer.
    pub footer: FooterPatch,
    /// QR code.
    pub qr_code: QrCodePatch,
    /// Watermark.
    pub watermark: WatermarkPatch,
}

impl ElementsConfig {
    /// Overlays a patch one level deep.
    pub fn apply(&mut self, patch: &ElementsPatch) {
        self.header.apply(&patch.header);
        self.party.apply(&patch.party);
        self.items_table.apply(&patch.items_table);
        self.totals.apply(&patch.totals);
        self.payment.apply(&patch.payment);
        self.notes.apply(&patch.notes);
        self.signature.apply(&patch.signature);
        self.footer.apply(&patch.footer);
        self.qr_code.apply(&patch.qr_code);
        self.watermark.apply(&patch.watermark);
    }
}

impl ElementsPatch {
    /// Folds another patch into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Self) {
        self.header.merge(&other.header);
        self.party.merge(&other.party);
        self.items_table.merge(&other.items_table);
        self.totals.merge(&other.totals);
        self.payment.merge(&other.payment);
        self.notes.merge(&other.notes);
        self.signature.merge(&other.signature);
        self.footer.merge(&other.footer);
        self.qr_code.merge(&other.qr_code);
        self.watermark.merge(&other.watermark);
    }
}

/// A partial settings overlay: a preset, branding, a rule effect or a user
/// override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    /// Colour overrides.
    pub colors: ColorPalettePatch,
    /// Typography overrides.
    pub typography: TypographyPatch,
    /// Layout overrides.
    pub layout: LayoutPatch,
    /// Element overrides.
    pub elements: ElementsPatch,
}

impl SettingsPatch {
    /// Folds another patch into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Self) {
        self.colors.merge(&other.colors);
        self.typography.merge(&other.typography);
        self.layout.merge(&other.layout);
        self.elements.merge(&other.elements);
    }
}

/// Bank transfer details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankDetails {
    /// Bank name.
    pub bank_name: String,
    /// Account holder.
    pub account_name: String,
    /// Account number.
    pub account_number: String,
    /// Branch.
    pub branch: Option<String>,
    /// SWIFT/BIC code.
    pub swift_code: Option<String>,
}

/// Mobile money details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileMoneyDetails {
    /// Provider, e.g. M-Pesa.
    pub provider: String,
    /// Paybill or till number.
    pub business_number: String,
    /// Account reference to quote.
    pub account_reference: Option<String>,
}

/// True when a configured value is real: non-empty and not a placeholder
/// such as "Not configured" or "N/A".
#[must_use]
pub fn is_real_value(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    !normalized.is_empty()
        && !matches!(
            normalized.as_str(),
            "not configured" | "not set" | "n/a" | "na" | "none" | "-" | "tbd"
        )
}

impl BankDetails {
    /// True when bank name and account number are both real values.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        is_real_value(&self.bank_name) && is_real_value(&self.account_number)
    }
}

impl MobileMoneyDetails {
    /// True when provider and business number are both real values.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        is_real_value(&self.provider) && is_real_value(&self.business_number)
    }
}

/// Payment instruction values printed by the payment block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentDetails {
    /// Bank transfer details.
    pub bank: Option<BankDetails>,
    /// Mobile money details.
    pub mobile_money: Option<MobileMoneyDetails>,
    /// Terms printed when the document has none of its own.
    pub default_terms: Option<String>,
}

/// Organisation-wide branding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branding {
    /// Brand primary colour.
    pub primary_color: Option<String>,
    /// Brand secondary colour.
    pub secondary_color: Option<String>,
    /// Brand accent colour.
    pub accent_color: Option<String>,
    /// Brand font stack.
    pub font_family: Option<String>,
    /// Whether the logo is printed in headers.
    pub show_logo: Option<bool>,
}

impl Branding {
    /// Branding as a settings overlay.
    #[must_use]
    pub fn to_patch(&self) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        patch.colors.primary.clone_from(&self.primary_color);
        patch.colors.secondary.clone_from(&self.secondary_color);
        patch.colors.accent.clone_from(&self.accent_color);
        patch.typography.font_family.clone_from(&self.font_family);
        patch.typography.heading_font_family.clone_from(&self.font_family);
        patch.elements.header.show_logo = self.show_logo;
        patch
    }
}

/// Fully resolved settings: everything the renderer needs, with no field
/// left to default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationSettings {
    /// Type the settings were resolved for.
    pub document_type: DocumentType,
    /// Target format.
    pub format: RenderFormat,
    /// Colours.
    pub colors: ColorPalette,
    /// Typography.
    pub typography: TypographyConfig,
    /// Layout.
    pub layout: LayoutConfig,
    /// Elements.
    pub elements: ElementsConfig,
    /// Payment instruction values.
    pub payment: PaymentDetails,
}

impl CustomizationSettings {
    /// Overlays a patch on all four sections.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        self.colors.apply(&patch.colors);
        self.typography.apply(&patch.typography);
        self.layout.apply(&patch.layout);
        self.elements.apply(&patch.elements);
    }
}

/// A stored customization: full settings for one document type.
///
/// Exactly one record per type carries `is_default`; that record is the
/// base the resolver starts from and it cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationRecord {
    /// Record id.
    pub id: CustomizationId,
    /// Display name.
    pub name: String,
    /// Type the record styles.
    pub document_type: DocumentType,
    /// Whether this is the type's default record.
    #[serde(default)]
    pub is_default: bool,
    /// The settings.
    pub settings: CustomizationSettings,
    /// Last save.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomizationRecord {
    /// The default record for a type, built from the built-in template.
    #[must_use]
    pub fn default_for(document_type: DocumentType) -> Self {
        Self {
            id: CustomizationId::new(format!("default-{}", document_type.as_str())),
            name: format!("{} (default)", document_type.label()),
            document_type,
            is_default: true,
            settings: builtin_template(document_type),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_merge_is_field_wise() {
        let mut settings = builtin_template(DocumentType::Invoice);
        let font = settings.typography.font_family.clone();

        let mut patch = SettingsPatch::default();
        patch.colors.primary = Some("#ff0000".into());
        patch.typography.base_font_size = Some(12);
        settings.apply(&patch);

        assert_eq!(settings.colors.primary, "#ff0000");
        assert_eq!(settings.typography.base_font_size, 12);
        assert_eq!(settings.typography.font_family, font);
    }

    #[test]
    fn test_elements_merge_one_level_deep() {
        let mut settings = builtin_template(DocumentType::Invoice);
        assert!(settings.elements.payment.show_bank);

        let patch: SettingsPatch =
            serde_json::from_str(r#"{"elements": {"payment": {"showMobileMoney": false}}}"#)
                .unwrap();
        settings.apply(&patch);

        assert!(!settings.elements.payment.show_mobile_money);
        assert!(settings.elements.payment.show_bank);
        assert!(settings.elements.payment.enabled);
    }

    #[test]
    fn test_patch_merge_later_wins() {
        let mut first = SettingsPatch::default();
        first.colors.primary = Some("#111111".into());
        first.colors.accent = Some("#222222".into());
        let mut second = SettingsPatch::default();
        second.colors.primary = Some("#333333".into());

        first.merge(&second);

        assert_eq!(first.colors.primary.as_deref(), Some("#333333"));
        assert_eq!(first.colors.accent.as_deref(), Some("#222222"));
        assert!(!first.colors.is_empty());
        assert!(first.layout.is_empty());
    }

    #[test]
    fn test_placeholder_values_are_not_configured() {
        let bank = BankDetails {
            bank_name: "Not configured".into(),
            account_number: "0123456789".into(),
            ..BankDetails::default()
        };
        assert!(!bank.is_configured());

        let mobile = MobileMoneyDetails {
            provider: "M-Pesa".into(),
            business_number: "522522".into(),
            account_reference: None,
        };
        assert!(mobile.is_configured());
        assert!(!is_real_value("  n/a "));
    }

    #[test]
    fn test_branding_patch() {
        let branding = Branding {
            primary_color: Some("#0055aa".into()),
            font_family: Some("Lato, sans-serif".into()),
            show_logo: Some(false),
            ..Branding::default()
        };
        let patch = branding.to_patch();
        assert_eq!(patch.colors.primary.as_deref(), Some("#0055aa"));
        assert!(patch.colors.secondary.is_none());
        assert_eq!(patch.elements.header.show_logo, Some(false));
    }
}
