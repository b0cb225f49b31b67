//! Single-label layout: one bordered frame with text and a QR code.
//!
//! ```text
//!  ┌──────────────────────────────┐  ← anchor (top-left)
//!  │ NAME (bold, truncated)       │
//!  │ Código: CODE                 │
//!  │ Categoria: CATEGORY          │
//!  │ description, wrapped  ┌────┐ │
//!  │                       │ QR │ │
//!  │ R$ 19.90 (bold)       └────┘ │
//!  └──────────────────────────────┘
//! ```

use crate::config::RenderConfig;
use crate::error::LabelPdfError;
use crate::label::Label;
use crate::pipeline::layout::{DocumentLayout, PageLayout};
use crate::pipeline::qr::QrEncoder;
use crate::pipeline::text::{truncate_chars, wrap_text, FontFace};
use tracing::debug;

/// Line spacing for wrapped description text, as a multiple of font size.
const DESCRIPTION_LEADING: f32 = 1.2;

/// Lay out `label` on a single page.
pub fn layout_single(
    label: &Label,
    config: &RenderConfig,
    encoder: &QrEncoder,
) -> Result<DocumentLayout, LabelPdfError> {
    label.validate()?;

    let geo = &config.single;
    let footprint = label.size.footprint();
    let width = footprint.width_pt();
    let height = footprint.height_pt();

    let left = geo.anchor_x;
    let top = geo.anchor_y;
    let bottom = top - height;
    let right = left + width;
    let text_x = left + geo.padding;
    let text_top = top - geo.padding;

    let mut doc = DocumentLayout::new(config.page);
    let mut page = PageLayout::default();

    page.rect(left, bottom, width, height, geo.border_width);

    page.text(
        text_x,
        text_top - geo.name_offset,
        FontFace::Bold,
        geo.name_font_size,
        truncate_chars(&label.name, config.name_max_chars),
    );

    let mut last_baseline = text_top - geo.code_offset;
    page.text(
        text_x,
        last_baseline,
        FontFace::Regular,
        geo.body_font_size,
        format!("Código: {}", label.code),
    );

    if let Some(category) = label.printable_category() {
        last_baseline = text_top - geo.category_offset;
        page.text(
            text_x,
            last_baseline,
            FontFace::Regular,
            geo.body_font_size,
            format!("Categoria: {category}"),
        );
    }

    let qr_size = height * geo.qr_ratio;
    let qr_x = right - qr_size - geo.padding;
    let qr_y = bottom + geo.padding;

    let price = label.printable_price();
    let price_baseline = bottom + geo.price_baseline;

    if config.render_description {
        if let Some(description) = label.printable_description() {
            let floor = match price {
                Some(_) => price_baseline + geo.price_font_size,
                None => bottom + geo.padding,
            };
            let column = qr_x - geo.padding - text_x;
            let leading = geo.description_font_size * DESCRIPTION_LEADING;
            let text = truncate_chars(description, config.description_max_chars);
            let mut y = last_baseline - geo.description_gap - leading;
            let mut drawn = 0usize;
            for line in wrap_text(text, FontFace::Regular, geo.description_font_size, column) {
                if y < floor {
                    break;
                }
                page.text(text_x, y, FontFace::Regular, geo.description_font_size, line);
                y -= leading;
                drawn += 1;
            }
            debug!("Label {}: {} description line(s) drawn", label.id, drawn);
        }
    }

    if let Some(amount) = price {
        page.text(
            text_x,
            price_baseline,
            FontFace::Bold,
            geo.price_font_size,
            config.currency.format(amount),
        );
    }

    let qr = encoder.encode_label(label)?;
    let image = doc.add_image(qr);
    page.image(qr_x, qr_y, qr_size, image);

    doc.pages.push(page);
    Ok(doc)
}
