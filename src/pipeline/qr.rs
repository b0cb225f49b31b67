//! QR encoding: label identity text → grayscale raster.
//!
//! The symbol version is never fixed: `qrcode` picks the smallest version
//! that holds the payload at the configured error-correction level. The
//! raster stays in memory and is handed straight to the emitter, so a render
//! call never leaves a file behind.

use crate::config::{QrErrorCorrection, QrSettings};
use crate::error::LabelPdfError;
use crate::label::Label;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use tracing::debug;

/// Text encoded into a label's QR code: code first, then the full name.
pub fn qr_payload(label: &Label) -> String {
    format!("Código: {}\nNome: {}", label.code, label.name)
}

/// A rendered QR symbol.
#[derive(Debug, Clone)]
pub struct QrImage {
    /// Modules per side, excluding the quiet zone.
    pub modules: usize,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet-zone width in modules.
    pub border: u32,
    /// Black-on-white raster, `(modules + 2·border) · box_size` pixels square.
    pub image: GrayImage,
}

impl QrImage {
    /// Side length in pixels.
    pub fn side_px(&self) -> u32 {
        self.image.width()
    }

    /// Encode the raster as PNG, e.g. for an HTML preview.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(self.image.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}

/// Builds QR rasters with fixed settings.
#[derive(Debug, Clone)]
pub struct QrEncoder {
    settings: QrSettings,
}

impl QrEncoder {
    pub fn new(settings: QrSettings) -> Self {
        Self { settings }
    }

    /// Encode `payload`. Fails only when it exceeds version-40 capacity.
    pub fn encode(&self, payload: &str) -> Result<QrImage, qrcode::types::QrError> {
        let level = ec_level(self.settings.error_correction);
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level)?;
        let modules = code.width();
        let box_size = self.settings.box_size.max(1);
        let border = self.settings.border;
        let side = (modules as u32 + 2 * border) * box_size;

        let mut image = GrayImage::from_pixel(side, side, Luma([255u8]));
        for (i, color) in code.to_colors().iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let mx = (i % modules) as u32 + border;
            let my = (i / modules) as u32 + border;
            for dy in 0..box_size {
                for dx in 0..box_size {
                    image.put_pixel(mx * box_size + dx, my * box_size + dy, Luma([0u8]));
                }
            }
        }

        debug!(
            "QR {:?}: {} modules, {}x{} px for {} payload bytes",
            code.version(),
            modules,
            side,
            side,
            payload.len()
        );

        Ok(QrImage {
            modules,
            box_size,
            border,
            image,
        })
    }

    /// Encode the QR code for `label`.
    pub fn encode_label(&self, label: &Label) -> Result<QrImage, LabelPdfError> {
        self.encode(&qr_payload(label)).map_err(|e| LabelPdfError::Encoding {
            code: label.code.clone(),
            detail: e.to_string(),
        })
    }
}

fn ec_level(level: QrErrorCorrection) -> EcLevel {
    match level {
        QrErrorCorrection::L => EcLevel::L,
        QrErrorCorrection::M => EcLevel::M,
        QrErrorCorrection::Q => EcLevel::Q,
        QrErrorCorrection::H => EcLevel::H,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> QrEncoder {
        QrEncoder::new(QrSettings::default())
    }

    #[test]
    fn payload_is_code_then_name() {
        let label = Label::new(1, "Widget X", "W-001");
        assert_eq!(qr_payload(&label), "Código: W-001\nNome: Widget X");
    }

    #[test]
    fn payload_uses_full_name() {
        let long = "N".repeat(45);
        let label = Label::new(1, long.clone(), "C");
        assert!(qr_payload(&label).ends_with(&long));
    }

    #[test]
    fn image_is_square_and_sized_from_modules() {
        let qr = encoder().encode("Código: W-001\nNome: Widget X").unwrap();
        assert_eq!(qr.image.width(), qr.image.height());
        assert_eq!(qr.side_px(), (qr.modules as u32 + 2) * 2);
    }

    #[test]
    fn picks_smallest_version_that_fits() {
        let short = encoder().encode("A").unwrap();
        let long = encoder().encode(&"x".repeat(300)).unwrap();
        assert_eq!(short.modules, 21, "version 1 is 21 modules");
        assert!(long.modules > short.modules);
    }

    #[test]
    fn pixels_match_module_matrix() {
        let payload = "Código: W-001\nNome: Widget X";
        let qr = encoder().encode(payload).unwrap();
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M).unwrap();
        let colors = code.to_colors();
        for (i, color) in colors.iter().enumerate() {
            let x = ((i % qr.modules) as u32 + qr.border) * qr.box_size;
            let y = ((i / qr.modules) as u32 + qr.border) * qr.box_size;
            let dark = qr.image.get_pixel(x, y)[0] == 0;
            assert_eq!(dark, *color == Color::Dark, "module {i}");
        }
        // Quiet zone stays white.
        assert_eq!(qr.image.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn oversized_payload_is_an_encoding_error() {
        let label = Label::new(1, "x".repeat(8000), "BIG");
        let err = encoder().encode_label(&label).unwrap_err();
        assert!(matches!(err, LabelPdfError::Encoding { ref code, .. } if code == "BIG"));
    }

    #[test]
    fn png_export_has_signature() {
        let png = encoder().encode("hello").unwrap().to_png_bytes().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
