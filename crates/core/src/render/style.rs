//! Stylesheet generation.

use crate::customization::{CustomizationSettings, RenderFormat};

/// CSS opacity for a percentage (`8` -> `0.08`).
fn opacity(percent: u8) -> String {
    if percent >= 100 {
        "1".to_string()
    } else {
        format!("0.{percent:02}")
    }
}

/// Builds the stylesheet matching the markup produced for `settings`.
#[must_use]
pub fn stylesheet(settings: &CustomizationSettings) -> String {
    let colors = &settings.colors;
    let typography = &settings.typography;
    let layout = &settings.layout;
    let elements = &settings.elements;

    let orientation = if layout.landscape { " landscape" } else { "" };
    let mut css = format!(
        "@page {{ size: {size}{orientation}; margin: {top}mm {right}mm {bottom}mm {left}mm; }}
body {{ font-family: {font}; font-size: {base}pt; line-height: {line}%; color: {text}; background: {background}; margin: 0; }}
h1, h2, h3 {{ font-family: {heading}; color: {primary}; margin: 0 0 4pt 0; }}
.doc-title {{ font-size: {title}pt; letter-spacing: 1px; }}
.document {{ position: relative; padding: 12pt; }}
.doc-header {{ display: flex; justify-content: space-between; border-bottom: 2px solid {primary}; padding-bottom: 8pt; margin-bottom: 12pt; text-align: {header_align}; }}
.company-logo {{ max-height: 60pt; }}
.company-name {{ font-size: {company}pt; font-weight: bold; color: {primary}; }}
.company-details, .meta-label, .muted {{ color: {muted}; }}
.status-badge {{ display: inline-block; padding: 2pt 6pt; border: 1px solid {accent}; color: {accent}; text-transform: uppercase; font-size: {small}pt; }}
.party {{ margin-bottom: 12pt; }}
.party-name {{ font-weight: bold; }}
table {{ width: 100%; border-collapse: collapse; margin-bottom: 12pt; }}
th {{ background: {th_bg}; color: {th_text}; text-align: left; padding: 4pt; }}
td {{ border-bottom: 1px solid {border}; padding: 4pt; }}
.num {{ text-align: right; white-space: nowrap; }}
.totals {{ width: 45%; margin-left: auto; }}
.totals td {{ border: none; }}
.grand-total td {{ font-weight: bold; color: {primary}; border-top: 2px solid {primary}; }}
.negative {{ color: #b91c1c; }}
.payment, .notes, .terms {{ border: 1px solid {border}; padding: 8pt; margin-bottom: 12pt; }}
.signature {{ margin-top: 24pt; width: 40%; }}
.signature-line {{ border-top: 1px solid {text}; margin-top: 36pt; padding-top: 2pt; }}
.doc-footer {{ margin-top: 24pt; border-top: 1px solid {border}; color: {muted}; font-size: {small}pt; text-align: center; }}
.qr-code {{ width: 72pt; height: 72pt; border: 1px dashed {border}; text-align: {qr_align}; }}
.watermark {{ position: absolute; top: 40%; left: 0; right: 0; text-align: center; font-size: 72pt; font-weight: bold; color: {primary}; opacity: {watermark_opacity}; transform: rotate(-30deg); pointer-events: none; }}
",
        size = layout.page_size.as_str(),
        top = layout.margin_top_mm,
        right = layout.margin_right_mm,
        bottom = layout.margin_bottom_mm,
        left = layout.margin_left_mm,
        font = typography.font_family,
        heading = typography.heading_font_family,
        base = typography.base_font_size,
        title = typography.title_font_size,
        company = typography.base_font_size.saturating_add(4),
        small = typography.base_font_size.saturating_sub(1),
        line = typography.line_height_percent,
        text = colors.text,
        muted = colors.muted,
        background = colors.background,
        primary = colors.primary,
        accent = colors.accent,
        border = colors.border,
        th_bg = colors.table_header_background,
        th_text = colors.table_header_text,
        header_align = elements.header.alignment.as_str(),
        qr_align = elements.qr_code.alignment.as_str(),
        watermark_opacity = opacity(elements.watermark.opacity_percent),
    );

    if elements.items_table.striped {
        css.push_str(&format!(
            ".line-item:nth-child(even) td {{ background: {}; }}\n",
            colors.border
        ));
    }

    if layout.opaque_background {
        css.push_str(
            "* { -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n",
        );
    }

    if settings.format == RenderFormat::Print {
        css.push_str(
            "@media print { .no-print { display: none; } table { page-break-inside: auto; } tr { page-break-inside: avoid; } }\n",
        );
    }

    css
}
