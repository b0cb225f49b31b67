//! Display list shared by the layouts and the emitter.
//!
//! Layouts decide *where* everything goes and record it as [`DrawOp`]s;
//! [`crate::pipeline::emit`] only serialises what it is given. Coordinates are
//! PDF points with the origin at the bottom-left of the page.

use crate::config::PageSize;
use crate::pipeline::qr::QrImage;
use crate::pipeline::text::FontFace;

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Stroked rectangle; `(x, y)` is the bottom-left corner.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
    /// A single line of text; `(x, y)` is the start of the baseline.
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        text: String,
    },
    /// A square image; `image` indexes [`DocumentLayout::images`].
    Image {
        x: f32,
        y: f32,
        size: f32,
        image: usize,
    },
}

/// Everything drawn on one page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            line_width,
        });
    }

    pub fn text(&mut self, x: f32, y: f32, face: FontFace, size: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            face,
            size,
            text: text.into(),
        });
    }

    pub fn image(&mut self, x: f32, y: f32, size: f32, image: usize) {
        self.ops.push(DrawOp::Image { x, y, size, image });
    }

    /// Text of every text op, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. }))
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

/// A laid-out document: pages plus the rasters they reference.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub page: PageSize,
    pub pages: Vec<PageLayout>,
    pub images: Vec<QrImage>,
}

impl DocumentLayout {
    pub fn new(page: PageSize) -> Self {
        Self {
            page,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Register a raster and return the index draw ops use to refer to it.
    pub fn add_image(&mut self, image: QrImage) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_helpers_record_ops_in_order() {
        let mut page = PageLayout::default();
        page.rect(0.0, 0.0, 10.0, 10.0, 1.0);
        page.text(1.0, 2.0, FontFace::Bold, 12.0, "Name");
        page.image(3.0, 4.0, 5.0, 0);
        page.text(1.0, 1.0, FontFace::Regular, 9.0, "Code");

        assert_eq!(page.texts().collect::<Vec<_>>(), ["Name", "Code"]);
        assert_eq!(page.rects().count(), 1);
        assert_eq!(page.image_count(), 1);
    }
}
