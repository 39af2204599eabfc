//! Built-in templates and named presets.

use serde::{Deserialize, Serialize};

use super::types::{
    Alignment, ColorPalette, CustomizationSettings, ElementsConfig, FooterElement, HeaderElement,
    ItemsTableElement, LayoutConfig, NotesElement, PageSize, PartyElement, PaymentDetails,
    PaymentElement, QrCodeElement, RenderFormat, SettingsPatch, SignatureElement, TotalsElement,
    TypographyConfig, WatermarkElement,
};
use crate::document::DocumentType;

fn base_colors() -> ColorPalette {
    ColorPalette {
        primary: "#1f3a5f".into(),
        secondary: "#4a6fa5".into(),
        accent: "#2e8b57".into(),
        text: "#222222".into(),
        muted: "#6b7280".into(),
        background: "#ffffff".into(),
        border: "#d1d5db".into(),
        table_header_background: "#1f3a5f".into(),
        table_header_text: "#ffffff".into(),
    }
}

fn base_typography() -> TypographyConfig {
    TypographyConfig {
        font_family: "'Segoe UI', Arial, sans-serif".into(),
        heading_font_family: "'Segoe UI', Arial, sans-serif".into(),
        base_font_size: 10,
        title_font_size: 20,
        line_height_percent: 140,
    }
}

const fn base_layout() -> LayoutConfig {
    LayoutConfig {
        page_size: PageSize::A4,
        landscape: false,
        margin_top_mm: 15,
        margin_right_mm: 15,
        margin_bottom_mm: 15,
        margin_left_mm: 15,
        opaque_background: false,
    }
}

fn base_elements() -> ElementsConfig {
    ElementsConfig {
        header: HeaderElement {
            enabled: true,
            show_logo: true,
            show_company_details: true,
            alignment: Alignment::Left,
        },
        party: PartyElement {
            enabled: true,
            show_contact: true,
            show_tax_id: true,
        },
        items_table: ItemsTableElement {
            enabled: true,
            show_item_code: false,
            show_tax: false,
            show_unit: false,
            striped: true,
        },
        totals: TotalsElement {
            enabled: true,
            show_subtotal: true,
            show_tax: true,
        },
        payment: PaymentElement {
            enabled: false,
            show_bank: true,
            show_mobile_money: true,
            show_terms: true,
        },
        notes: NotesElement { enabled: true },
        signature: SignatureElement {
            enabled: true,
            show_date: true,
        },
        footer: FooterElement {
            enabled: true,
            text: String::new(),
        },
        qr_code: QrCodeElement {
            enabled: false,
            alignment: Alignment::Right,
        },
        watermark: WatermarkElement {
            enabled: false,
            text: String::new(),
            opacity_percent: 8,
        },
    }
}

/// The built-in template for a document type.
///
/// Every type starts from the same base; types then switch blocks on or off
/// according to what they print: invoices carry payment instructions and a
/// QR code, delivery paperwork prints no money, and reports print rows
/// instead of a party and item table.
#[must_use]
pub fn builtin_template(document_type: DocumentType) -> CustomizationSettings {
    let mut settings = CustomizationSettings {
        document_type,
        format: RenderFormat::Screen,
        colors: base_colors(),
        typography: base_typography(),
        layout: base_layout(),
        elements: base_elements(),
        payment: PaymentDetails::default(),
    };

    let elements = &mut settings.elements;
    match document_type {
        DocumentType::Invoice => {
            elements.payment.enabled = true;
            elements.qr_code.enabled = true;
            elements.items_table.show_tax = true;
        }
        DocumentType::Quote | DocumentType::SalesOrder => {
            elements.payment.enabled = true;
            elements.payment.show_bank = false;
            elements.payment.show_mobile_money = false;
        }
        DocumentType::PurchaseOrder => {
            elements.items_table.show_item_code = true;
        }
        DocumentType::DeliveryNote | DocumentType::GoodsReceivingVoucher => {
            elements.totals.enabled = false;
            elements.items_table.show_item_code = true;
            elements.items_table.show_unit = true;
        }
        DocumentType::PaymentReceipt => {
            elements.qr_code.enabled = true;
            elements.items_table.striped = false;
            settings.colors.primary = "#2e7d32".into();
            settings.colors.table_header_background = "#2e7d32".into();
        }
        DocumentType::FinancialReport => {
            elements.party.enabled = false;
            elements.items_table.enabled = false;
            elements.signature.show_date = false;
        }
    }
    settings
}

/// Named style presets a caller can stack on top of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Navy headings, the house default look.
    Professional,
    /// Black on white, no stripes, no logo.
    Minimal,
    /// Bright accent and larger title.
    Modern,
    /// Serif fonts and centred header.
    Classic,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 4] = [Self::Professional, Self::Minimal, Self::Modern, Self::Classic];

    /// Preset name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Minimal => "minimal",
            Self::Modern => "modern",
            Self::Classic => "classic",
        }
    }

    /// Parses a preset name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Some(Self::Professional),
            "minimal" => Some(Self::Minimal),
            "modern" => Some(Self::Modern),
            "classic" => Some(Self::Classic),
            _ => None,
        }
    }

    /// The preset as a settings overlay.
    #[must_use]
    pub fn patch(&self) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        match self {
            Self::Professional => {
                patch.colors.primary = Some("#1f3a5f".into());
                patch.colors.table_header_background = Some("#1f3a5f".into());
            }
            Self::Minimal => {
                patch.colors.primary = Some("#111111".into());
                patch.colors.secondary = Some("#444444".into());
                patch.colors.accent = Some("#111111".into());
                patch.colors.table_header_background = Some("#f3f4f6".into());
                patch.colors.table_header_text = Some("#111111".into());
                patch.elements.items_table.striped = Some(false);
                patch.elements.header.show_logo = Some(false);
            }
            Self::Modern => {
                patch.colors.primary = Some("#0f766e".into());
                patch.colors.accent = Some("#f59e0b".into());
                patch.colors.table_header_background = Some("#0f766e".into());
                patch.typography.font_family = Some("Inter, 'Helvetica Neue', sans-serif".into());
                patch.typography.heading_font_family =
                    Some("Inter, 'Helvetica Neue', sans-serif".into());
                patch.typography.title_font_size = Some(24);
            }
            Self::Classic => {
                patch.typography.font_family = Some("Georgia, 'Times New Roman', serif".into());
                patch.typography.heading_font_family =
                    Some("Georgia, 'Times New Roman', serif".into());
                patch.elements.header.alignment = Some(Alignment::Center);
                patch.colors.primary = Some("#3b2f2f".into());
                patch.colors.table_header_background = Some("#3b2f2f".into());
            }
        }
        patch
    }
}
