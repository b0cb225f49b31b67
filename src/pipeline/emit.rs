//! PDF emission: display list → PDF bytes via `pdf-writer`.
//!
//! Object layout of every document:
//!
//! | Ref | Object |
//! |-----|--------|
//! | 1 | catalog |
//! | 2 | page tree |
//! | 3, 4 | Helvetica, Helvetica-Bold (`WinAnsiEncoding`) |
//! | 5 | document info |
//! | 6… | QR image XObjects, then one page + content stream pair per page |
//!
//! Streams are left uncompressed; a label sheet is a few kilobytes.

use crate::pipeline::layout::{DocumentLayout, DrawOp, PageLayout};
use crate::pipeline::qr::QrImage;
use crate::pipeline::text::{encode_winansi, FontFace};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");
const PRODUCER: &str = concat!("label-pdf ", env!("CARGO_PKG_VERSION"));

/// Serialise `layout` into a complete PDF file.
pub fn emit_pdf(layout: &DocumentLayout, title: &str) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    for (id, face) in [(regular_id, FontFace::Regular), (bold_id, FontFace::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let image_ids: Vec<Ref> = layout
        .images
        .iter()
        .map(|qr| {
            let id = alloc.bump();
            write_image(&mut pdf, id, qr);
            id
        })
        .collect();

    let mut page_ids = Vec::with_capacity(layout.pages.len());
    for page_layout in &layout.pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let (content, used_images) = page_content(page_layout);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(
            0.0,
            0.0,
            layout.page.width_pt,
            layout.page.height_pt,
        ));
        page.parent(page_tree_id);
        page.contents(content_id);

        let mut resources = page.resources();
        resources
            .fonts()
            .pair(FONT_REGULAR, regular_id)
            .pair(FONT_BOLD, bold_id);
        if !used_images.is_empty() {
            let mut x_objects = resources.x_objects();
            for index in used_images {
                let name = image_name(index);
                x_objects.pair(Name(name.as_bytes()), image_ids[index]);
            }
        }
        resources.finish();
        page.finish();

        pdf.stream(content_id, &content);
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let bytes = pdf.finish();
    debug!(
        "Emitted PDF: {} page(s), {} image(s), {} bytes",
        layout.pages.len(),
        layout.images.len(),
        bytes.len()
    );
    bytes
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

fn font_name(face: FontFace) -> Name<'static> {
    match face {
        FontFace::Regular => FONT_REGULAR,
        FontFace::Bold => FONT_BOLD,
    }
}

/// 8-bit DeviceGray image XObject holding the raw raster.
fn write_image(pdf: &mut Pdf, id: Ref, qr: &QrImage) {
    let mut image = pdf.image_xobject(id, qr.image.as_raw());
    image.width(qr.image.width() as i32);
    image.height(qr.image.height() as i32);
    image.color_space().device_gray();
    image.bits_per_component(8);
    image.finish();
}

/// Content stream for one page, plus the image indices it references.
fn page_content(page: &PageLayout) -> (Vec<u8>, Vec<usize>) {
    let mut content = Content::new();
    let mut images = Vec::new();

    content.set_stroke_gray(0.0);
    content.set_fill_gray(0.0);

    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                line_width,
            } => {
                content.set_line_width(*line_width);
                content.rect(*x, *y, *width, *height);
                content.stroke();
            }
            DrawOp::Text {
                x,
                y,
                face,
                size,
                text,
            } => {
                let encoded = encode_winansi(text);
                content.begin_text();
                content.set_font(font_name(*face), *size);
                content.next_line(*x, *y);
                content.show(Str(&encoded));
                content.end_text();
            }
            DrawOp::Image { x, y, size, image } => {
                let name = image_name(*image);
                content.save_state();
                content.transform([*size, 0.0, 0.0, *size, *x, *y]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
                if !images.contains(image) {
                    images.push(*image);
                }
            }
        }
    }

    (content.finish(), images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn empty_page_document_is_well_formed() {
        let mut layout = DocumentLayout::new(PageSize::A4);
        layout.pages.push(PageLayout::default());
        let bytes = emit_pdf(&layout, "Test");
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
    }

    #[test]
    fn ascii_text_is_a_literal_string() {
        let mut page = PageLayout::default();
        page.text(10.0, 20.0, FontFace::Bold, 14.0, "R$ 19.90");
        let (content, images) = page_content(&page);
        assert!(contains(&content, b"(R$ 19.90) Tj"));
        assert!(contains(&content, b"/F2 14 Tf"));
        assert!(images.is_empty());
    }

    #[test]
    fn images_are_listed_once_per_page() {
        let mut page = PageLayout::default();
        page.image(0.0, 0.0, 10.0, 0);
        page.image(20.0, 0.0, 10.0, 0);
        let (content, images) = page_content(&page);
        assert_eq!(images, vec![0]);
        assert!(contains(&content, b"/Im0 Do"));
    }

    #[test]
    fn media_box_uses_page_size() {
        let mut layout = DocumentLayout::new(PageSize::LETTER);
        layout.pages.push(PageLayout::default());
        let bytes = emit_pdf(&layout, "Letter");
        assert!(contains(&bytes, b"/MediaBox [0 0 612 792]"));
    }
}
