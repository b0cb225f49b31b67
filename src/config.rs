//! Configuration types for label rendering.
//!
//! Every geometry and formatting constant the layouts use lives in
//! [`RenderConfig`], built via [`RenderConfigBuilder`] or deserialised from a
//! JSON file. The renderer receives it at construction time; there is no
//! process-wide state.
//!
//! All lengths are PDF points (1/72 in) unless the field name says `mm`.
//! Vertical positions grow upwards from the bottom of the page, as in PDF.

use crate::error::LabelPdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Configuration for single-label and batch rendering.
///
/// # Example
/// ```rust
/// use label_pdf::{CurrencyFormat, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .currency(CurrencyFormat::new("€ {amount}", ','))
///     .name_max_chars(24)
///     .build()
///     .unwrap();
/// assert_eq!(config.currency.format(3.5), "€ 3,50");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page size for every page of every document. Default: A4.
    pub page: PageSize,

    /// Geometry of the single-label layout.
    pub single: SingleLayout,

    /// Geometry of the batch (band) layout.
    pub batch: BatchLayout,

    /// QR symbol settings.
    pub qr: QrSettings,

    /// Price formatting. Default: `"R$ {amount}"` with `.` as decimal separator.
    pub currency: CurrencyFormat,

    /// Name is cut to this many characters in the single layout. Default: 30.
    pub name_max_chars: usize,

    /// Description is cut to this many characters in the single layout. Default: 100.
    pub description_max_chars: usize,

    /// Draw the description in the single layout when present. Default: true.
    pub render_description: bool,

    /// Document title written to the PDF info dictionary.
    pub document_title: String,

    /// Receives batch progress events. Not serialised.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            single: SingleLayout::default(),
            batch: BatchLayout::default(),
            qr: QrSettings::default(),
            currency: CurrencyFormat::default(),
            name_max_chars: 30,
            description_max_chars: 100,
            render_description: true,
            document_title: "Labels".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("page", &self.page)
            .field("single", &self.single)
            .field("batch", &self.batch)
            .field("qr", &self.qr)
            .field("currency", &self.currency)
            .field("name_max_chars", &self.name_max_chars)
            .field("description_max_chars", &self.description_max_chars)
            .field("render_description", &self.render_description)
            .field("document_title", &self.document_title)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RenderProgressCallback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LabelPdfError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LabelPdfError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: RenderConfig =
            serde_json::from_str(&text).map_err(|e| LabelPdfError::ConfigParse {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), LabelPdfError> {
        if self.page.width_pt <= 0.0 || self.page.height_pt <= 0.0 {
            return Err(LabelPdfError::InvalidConfig(format!(
                "page size must be positive, got {}x{}",
                self.page.width_pt, self.page.height_pt
            )));
        }
        if !(self.single.qr_ratio > 0.0 && self.single.qr_ratio <= 1.0) {
            return Err(LabelPdfError::InvalidConfig(format!(
                "qr_ratio must be in (0, 1], got {}",
                self.single.qr_ratio
            )));
        }
        if self.qr.box_size == 0 {
            return Err(LabelPdfError::InvalidConfig(
                "QR box size must be ≥ 1".into(),
            ));
        }
        if self.batch.band_height <= 0.0 || self.batch.band_gap < 0.0 {
            return Err(LabelPdfError::InvalidConfig(format!(
                "band height must be positive and gap non-negative, got {} / {}",
                self.batch.band_height, self.batch.band_gap
            )));
        }
        if self.batch.bands_per_page() == 0 {
            return Err(LabelPdfError::InvalidConfig(format!(
                "a {}pt band does not fit between top {} and bottom margin {}",
                self.batch.band_height, self.batch.top, self.batch.bottom_margin
            )));
        }
        if self.batch.top > self.page.height_pt || self.single.anchor_y > self.page.height_pt {
            return Err(LabelPdfError::InvalidConfig(
                "layout starts above the top of the page".into(),
            ));
        }
        if self.name_max_chars == 0 {
            return Err(LabelPdfError::InvalidConfig(
                "name_max_chars must be ≥ 1".into(),
            ));
        }
        if !self.currency.template.contains(AMOUNT_PLACEHOLDER) {
            return Err(LabelPdfError::InvalidConfig(format!(
                "currency template '{}' has no {} placeholder",
                self.currency.template, AMOUNT_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn page(mut self, page: PageSize) -> Self {
        self.config.page = page;
        self
    }

    pub fn single(mut self, layout: SingleLayout) -> Self {
        self.config.single = layout;
        self
    }

    pub fn batch(mut self, layout: BatchLayout) -> Self {
        self.config.batch = layout;
        self
    }

    pub fn qr(mut self, qr: QrSettings) -> Self {
        self.config.qr = qr;
        self
    }

    pub fn currency(mut self, currency: CurrencyFormat) -> Self {
        self.config.currency = currency;
        self
    }

    pub fn name_max_chars(mut self, n: usize) -> Self {
        self.config.name_max_chars = n;
        self
    }

    pub fn description_max_chars(mut self, n: usize) -> Self {
        self.config.description_max_chars = n;
        self
    }

    pub fn render_description(mut self, v: bool) -> Self {
        self.config.render_description = v;
        self
    }

    pub fn band_border(mut self, width: Option<f32>) -> Self {
        self.config.batch.border_width = width;
        self
    }

    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.config.document_title = title.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, LabelPdfError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────

/// Page media box size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    /// ISO A4, 210 mm × 297 mm.
    pub const A4: PageSize = PageSize {
        width_pt: 595.2756,
        height_pt: 841.8898,
    };

    /// US Letter, 8.5 in × 11 in.
    pub const LETTER: PageSize = PageSize {
        width_pt: 612.0,
        height_pt: 792.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Single-label layout: one bordered frame with a QR code.
///
/// Text offsets are measured downwards from `frame top − padding` to each
/// baseline; the price baseline is measured upwards from the frame bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleLayout {
    /// Left edge of the frame.
    pub anchor_x: f32,
    /// Top edge of the frame.
    pub anchor_y: f32,
    pub padding: f32,
    pub border_width: f32,
    pub name_font_size: f32,
    pub body_font_size: f32,
    pub price_font_size: f32,
    pub description_font_size: f32,
    pub name_offset: f32,
    pub code_offset: f32,
    pub category_offset: f32,
    /// Extra space between the last body line and the first description line.
    pub description_gap: f32,
    pub price_baseline: f32,
    /// QR side as a fraction of the frame height.
    pub qr_ratio: f32,
}

impl Default for SingleLayout {
    fn default() -> Self {
        Self {
            anchor_x: 50.0,
            anchor_y: 750.0,
            padding: 8.0,
            border_width: 1.0,
            name_font_size: 12.0,
            body_font_size: 9.0,
            price_font_size: 14.0,
            description_font_size: 7.0,
            name_offset: 10.0,
            code_offset: 25.0,
            category_offset: 38.0,
            description_gap: 2.0,
            price_baseline: 20.0,
            qr_ratio: 0.6,
        }
    }
}

/// Batch layout: fixed-height bands stacked down the page.
///
/// Text offsets are measured downwards from the band top to each baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLayout {
    pub margin_x: f32,
    /// Top edge of the first band on every page.
    pub top: f32,
    /// No band may extend below this line.
    pub bottom_margin: f32,
    pub band_width: f32,
    pub band_height: f32,
    pub band_gap: f32,
    /// Band outline stroke; `None` draws no outline.
    pub border_width: Option<f32>,
    pub text_inset: f32,
    pub name_font_size: f32,
    pub body_font_size: f32,
    pub price_font_size: f32,
    pub name_offset: f32,
    pub code_offset: f32,
    pub category_offset: f32,
    pub price_offset: f32,
}

impl Default for BatchLayout {
    fn default() -> Self {
        Self {
            margin_x: 50.0,
            top: 750.0,
            bottom_margin: 50.0,
            band_width: 500.0,
            band_height: 100.0,
            band_gap: 10.0,
            border_width: Some(0.5),
            text_inset: 10.0,
            name_font_size: 12.0,
            body_font_size: 9.0,
            price_font_size: 14.0,
            name_offset: 25.0,
            code_offset: 45.0,
            category_offset: 60.0,
            price_offset: 85.0,
        }
    }
}

impl BatchLayout {
    /// How many bands fit on one page.
    pub fn bands_per_page(&self) -> usize {
        let usable = self.top - self.bottom_margin;
        if usable < self.band_height {
            return 0;
        }
        let pitch = self.band_height + self.band_gap;
        ((usable - self.band_height) / pitch).floor() as usize + 1
    }
}

// ── QR ───────────────────────────────────────────────────────────────────

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorCorrection {
    /// ~7 % recovery.
    L,
    /// ~15 % recovery. (default)
    #[default]
    M,
    /// ~25 % recovery.
    Q,
    /// ~30 % recovery.
    H,
}

/// QR raster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub error_correction: QrErrorCorrection,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet-zone width in modules.
    pub border: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            error_correction: QrErrorCorrection::M,
            box_size: 2,
            border: 1,
        }
    }
}

// ── Currency ─────────────────────────────────────────────────────────────

/// Placeholder replaced by the formatted amount in [`CurrencyFormat::template`].
pub const AMOUNT_PLACEHOLDER: &str = "{amount}";

/// How prices are printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Text with an `{amount}` placeholder, e.g. `"R$ {amount}"`.
    pub template: String,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            template: "R$ {amount}".to_string(),
            decimal_separator: '.',
        }
    }
}

impl CurrencyFormat {
    pub fn new(template: impl Into<String>, decimal_separator: char) -> Self {
        Self {
            template: template.into(),
            decimal_separator,
        }
    }

    /// Format `amount` with exactly two fractional digits.
    pub fn format(&self, amount: f64) -> String {
        let mut digits = format!("{:.2}", amount);
        if self.decimal_separator != '.' {
            digits = digits.replace('.', &self.decimal_separator.to_string());
        }
        self.template.replace(AMOUNT_PLACEHOLDER, &digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
        assert!(RenderConfig::builder().build().is_ok());
    }

    #[test]
    fn default_bands_per_page_is_six() {
        assert_eq!(BatchLayout::default().bands_per_page(), 6);
    }

    #[test]
    fn bands_per_page_exact_fit() {
        let layout = BatchLayout {
            top: 300.0,
            bottom_margin: 0.0,
            band_height: 100.0,
            band_gap: 0.0,
            ..BatchLayout::default()
        };
        assert_eq!(layout.bands_per_page(), 3);
    }

    #[test]
    fn currency_two_decimals() {
        let c = CurrencyFormat::default();
        assert_eq!(c.format(19.9), "R$ 19.90");
        assert_eq!(c.format(5.0), "R$ 5.00");
        assert_eq!(c.format(1234.567), "R$ 1234.57");
    }

    #[test]
    fn currency_custom_separator_and_template() {
        let c = CurrencyFormat::new("{amount} EUR", ',');
        assert_eq!(c.format(19.9), "19,90 EUR");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = RenderConfig::builder()
            .currency(CurrencyFormat::new("R$", '.'))
            .build()
            .unwrap_err();
        assert!(matches!(err, LabelPdfError::InvalidConfig(_)));
    }

    #[test]
    fn band_taller_than_page_is_rejected() {
        let err = RenderConfig::builder()
            .batch(BatchLayout {
                band_height: 800.0,
                ..BatchLayout::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("does not fit"), "got: {err}");
    }

    #[test]
    fn qr_ratio_out_of_range_is_rejected() {
        let single = SingleLayout {
            qr_ratio: 1.5,
            ..SingleLayout::default()
        };
        assert!(RenderConfig::builder().single(single).build().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "name_max_chars": 20, "batch": { "border_width": null } }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name_max_chars, 20);
        assert_eq!(config.batch.border_width, None);
        assert_eq!(config.batch.band_height, 100.0);
        assert_eq!(config.page, PageSize::A4);
        assert_eq!(config.currency, CurrencyFormat::default());
    }

    #[test]
    fn from_json_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = RenderConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, LabelPdfError::ConfigParse { .. }));

        let missing = RenderConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, LabelPdfError::ConfigRead { .. }));
    }
}
