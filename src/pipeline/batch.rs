//! Batch layout: one fixed-height band per label, paginated.
//!
//! Bands are stacked from `batch.top` downwards. Before a band is drawn the
//! cursor is checked against the bottom margin; if the band would cross it a
//! new page is started, so a band is never split across pages. No QR codes
//! are drawn here: the batch sheet is a dense listing, not a print sheet.

use crate::config::RenderConfig;
use crate::error::LabelPdfError;
use crate::label::Label;
use crate::pipeline::layout::{DocumentLayout, PageLayout};
use crate::pipeline::text::FontFace;
use tracing::debug;

/// Lay out `labels` as bands, in the order given.
pub fn layout_batch(
    labels: &[Label],
    config: &RenderConfig,
) -> Result<DocumentLayout, LabelPdfError> {
    if labels.is_empty() {
        return Err(LabelPdfError::EmptyInput);
    }
    for label in labels {
        label.validate()?;
    }

    let geo = &config.batch;
    let progress = config.progress_callback.as_ref();
    if let Some(cb) = progress {
        cb.on_render_start(labels.len());
    }

    let mut doc = DocumentLayout::new(config.page);
    let mut page = PageLayout::default();
    let mut cursor = geo.top;
    let text_x = geo.margin_x + geo.text_inset;

    for (index, label) in labels.iter().enumerate() {
        if cursor - geo.band_height < geo.bottom_margin {
            doc.pages.push(std::mem::take(&mut page));
            cursor = geo.top;
            let page_num = doc.page_count() + 1;
            debug!("Band {} starts page {}", index, page_num);
            if let Some(cb) = progress {
                cb.on_page_break(page_num);
            }
        }

        if let Some(line_width) = geo.border_width {
            page.rect(
                geo.margin_x,
                cursor - geo.band_height,
                geo.band_width,
                geo.band_height,
                line_width,
            );
        }

        page.text(
            text_x,
            cursor - geo.name_offset,
            FontFace::Bold,
            geo.name_font_size,
            label.name.as_str(),
        );
        page.text(
            text_x,
            cursor - geo.code_offset,
            FontFace::Regular,
            geo.body_font_size,
            format!("Código: {}", label.code),
        );
        if let Some(category) = label.printable_category() {
            page.text(
                text_x,
                cursor - geo.category_offset,
                FontFace::Regular,
                geo.body_font_size,
                format!("Categoria: {category}"),
            );
        }
        if let Some(amount) = label.printable_price() {
            page.text(
                text_x,
                cursor - geo.price_offset,
                FontFace::Bold,
                geo.price_font_size,
                config.currency.format(amount),
            );
        }

        cursor -= geo.band_height + geo.band_gap;
        if let Some(cb) = progress {
            cb.on_label_placed(index, doc.page_count() + 1);
        }
    }

    doc.pages.push(page);
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchLayout;
    use crate::pipeline::layout::DrawOp;
    use crate::progress::RenderProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn labels(n: usize) -> Vec<Label> {
        (0..n)
            .map(|i| Label::new(i as u64, format!("Item {i:03}"), format!("C-{i}")))
            .collect()
    }

    fn band_rects(doc: &DocumentLayout) -> Vec<(usize, f32, f32)> {
        doc.pages
            .iter()
            .enumerate()
            .flat_map(|(p, page)| {
                page.rects().filter_map(move |op| match op {
                    DrawOp::Rect { y, height, .. } => Some((p, *y, *height)),
                    _ => None,
                })
            })
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = layout_batch(&[], &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, LabelPdfError::EmptyInput));
    }

    #[test]
    fn page_count_is_ceil_of_bands_per_page() {
        let config = RenderConfig::default();
        let per_page = config.batch.bands_per_page();
        for n in [1, 5, 6, 7, 12, 13, 40] {
            let doc = layout_batch(&labels(n), &config).unwrap();
            assert_eq!(doc.page_count(), n.div_ceil(per_page), "n = {n}");
        }
    }

    #[test]
    fn bands_stay_inside_margins() {
        let config = RenderConfig::default();
        let doc = layout_batch(&labels(20), &config).unwrap();
        let rects = band_rects(&doc);
        assert_eq!(rects.len(), 20);
        for (page, y, height) in rects {
            assert!(y >= config.batch.bottom_margin, "page {page}: band bottom {y}");
            assert!(
                y + height <= config.batch.top + 1e-3,
                "page {page}: band top {}",
                y + height
            );
        }
    }

    #[test]
    fn batch_never_has_images() {
        let doc = layout_batch(&labels(9), &RenderConfig::default()).unwrap();
        assert!(doc.images.is_empty());
        assert!(doc.pages.iter().all(|p| p.image_count() == 0));
    }

    #[test]
    fn names_are_not_truncated() {
        let long = "N".repeat(45);
        let input = [Label::new(1, long.clone(), "C")];
        let doc = layout_batch(&input, &RenderConfig::default()).unwrap();
        assert_eq!(doc.pages[0].texts().next(), Some(long.as_str()));
    }

    #[test]
    fn band_texts_in_order_and_description_omitted() {
        let label = Label::new(1, "Widget X", "W-001")
            .with_category("Tools")
            .with_price(19.9)
            .with_description("not in batch");
        let doc = layout_batch(&[label], &RenderConfig::default()).unwrap();
        let texts: Vec<_> = doc.pages[0].texts().collect();
        assert_eq!(
            texts,
            ["Widget X", "Código: W-001", "Categoria: Tools", "R$ 19.90"]
        );
    }

    #[test]
    fn band_border_can_be_disabled() {
        let config = RenderConfig::builder().band_border(None).build().unwrap();
        let doc = layout_batch(&labels(3), &config).unwrap();
        assert_eq!(doc.pages[0].rects().count(), 0);
    }

    #[test]
    fn input_order_is_kept() {
        let input = vec![Label::new(1, "Zeta", "Z"), Label::new(2, "Alpha", "A")];
        let doc = layout_batch(&input, &RenderConfig::default()).unwrap();
        let names: Vec<_> = doc.pages[0]
            .texts()
            .filter(|t| !t.starts_with("Código"))
            .collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }

    #[test]
    fn invalid_label_fails_whole_batch() {
        let mut input = labels(3);
        input[1].code.clear();
        let err = layout_batch(&input, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, LabelPdfError::InvalidLabel { id: 1, .. }));
    }

    #[test]
    fn custom_geometry_changes_capacity() {
        let config = RenderConfig::builder()
            .batch(BatchLayout {
                band_height: 50.0,
                ..BatchLayout::default()
            })
            .build()
            .unwrap();
        let per_page = config.batch.bands_per_page();
        assert!(per_page > 6);
        let doc = layout_batch(&labels(per_page + 1), &config).unwrap();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn progress_events_follow_pagination() {
        #[derive(Default)]
        struct Counter {
            placed: AtomicUsize,
            breaks: AtomicUsize,
        }
        impl RenderProgressCallback for Counter {
            fn on_label_placed(&self, _index: usize, _page_num: usize) {
                self.placed.fetch_add(1, Ordering::SeqCst);
            }
            fn on_page_break(&self, _page_num: usize) {
                self.breaks.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter::default());
        let config = RenderConfig::builder()
            .progress_callback(counter.clone())
            .build()
            .unwrap();
        layout_batch(&labels(13), &config).unwrap();
        assert_eq!(counter.placed.load(Ordering::SeqCst), 13);
        assert_eq!(counter.breaks.load(Ordering::SeqCst), 2);
    }
}
