//! Rendering entry points.
//!
//! [`LabelRenderer`] is the library's front door: it owns a validated
//! [`RenderConfig`] and turns labels into [`RenderedDocument`]s. Rendering is
//! synchronous and CPU-bound; async callers use the `*_async` variants, which
//! run the same code on tokio's blocking pool.

use crate::config::RenderConfig;
use crate::error::LabelPdfError;
use crate::label::Label;
use crate::output::{
    single_filename, DocumentKind, RenderedDocument, BATCH_FILENAME, PDF_MEDIA_TYPE,
};
use crate::pipeline::{batch, emit, qr::QrEncoder, single};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Renders labels to PDF with a fixed configuration.
///
/// Cheap to clone and safe to share between threads; it holds no state
/// besides its configuration.
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    config: RenderConfig,
    encoder: QrEncoder,
}

impl Default for LabelRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl LabelRenderer {
    /// Create a renderer. The config is assumed valid; use
    /// [`LabelRenderer::try_new`] for configs from untrusted sources.
    pub fn new(config: RenderConfig) -> Self {
        let encoder = QrEncoder::new(config.qr.clone());
        Self { config, encoder }
    }

    /// Validate `config`, then create a renderer.
    pub fn try_new(config: RenderConfig) -> Result<Self, LabelPdfError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one label on one page, with its QR code.
    ///
    /// # Errors
    /// * [`LabelPdfError::InvalidLabel`]: empty code or name
    /// * [`LabelPdfError::Encoding`]: QR payload too large
    pub fn render_one(&self, label: &Label) -> Result<RenderedDocument, LabelPdfError> {
        let start = Instant::now();
        let layout = single::layout_single(label, &self.config, &self.encoder)?;
        let bytes = emit::emit_pdf(&layout, &self.config.document_title);

        info!(
            "Rendered label {} ({}, {}) → {} bytes in {}ms",
            label.id,
            label.code,
            label.size,
            bytes.len(),
            start.elapsed().as_millis()
        );

        Ok(RenderedDocument {
            bytes,
            filename: single_filename(&label.code),
            media_type: PDF_MEDIA_TYPE.to_string(),
            page_count: layout.page_count(),
            label_count: 1,
            kind: DocumentKind::Single,
        })
    }

    /// Render every label as a band, paginating as needed. Labels are drawn
    /// in the order given; sort them first if order matters.
    ///
    /// # Errors
    /// * [`LabelPdfError::EmptyInput`]: `labels` is empty; no document is produced
    /// * [`LabelPdfError::InvalidLabel`]: any label has an empty code or name
    pub fn render_many(&self, labels: &[Label]) -> Result<RenderedDocument, LabelPdfError> {
        let start = Instant::now();
        let layout = batch::layout_batch(labels, &self.config)?;
        let bytes = emit::emit_pdf(&layout, &self.config.document_title);
        let page_count = layout.page_count();

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_render_complete(labels.len(), page_count);
        }
        info!(
            "Rendered {} labels on {} page(s) → {} bytes in {}ms",
            labels.len(),
            page_count,
            bytes.len(),
            start.elapsed().as_millis()
        );

        Ok(RenderedDocument {
            bytes,
            filename: BATCH_FILENAME.to_string(),
            media_type: PDF_MEDIA_TYPE.to_string(),
            page_count,
            label_count: labels.len(),
            kind: DocumentKind::Batch,
        })
    }

    /// Write `doc` to `dest`.
    ///
    /// If `dest` is an existing directory the document's suggested filename is
    /// used inside it. The bytes go to a temp file in the same directory which is
    /// then renamed over the target, so readers never see a partial PDF; on any
    /// error the temp file is removed when it is dropped.
    pub fn render_to_file(
        &self,
        doc: &RenderedDocument,
        dest: impl AsRef<Path>,
    ) -> Result<PathBuf, LabelPdfError> {
        let dest = dest.as_ref();
        let path = if dest.is_dir() {
            dest.join(&doc.filename)
        } else {
            dest.to_path_buf()
        };
        let write_err = |e: std::io::Error| LabelPdfError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(&doc.bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} bytes to {}", doc.bytes.len(), path.display());
        Ok(path)
    }

    /// [`render_one`](Self::render_one) on tokio's blocking pool.
    pub async fn render_one_async(&self, label: Label) -> Result<RenderedDocument, LabelPdfError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render_one(&label))
            .await
            .map_err(|e| LabelPdfError::Internal(format!("Render task panicked: {}", e)))?
    }

    /// [`render_many`](Self::render_many) on tokio's blocking pool.
    pub async fn render_many_async(
        &self,
        labels: Vec<Label>,
    ) -> Result<RenderedDocument, LabelPdfError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render_many(&labels))
            .await
            .map_err(|e| LabelPdfError::Internal(format!("Render task panicked: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Label {
        Label::new(1, "Widget X", "W-001")
            .with_category("Tools")
            .with_price(19.90)
    }

    #[test]
    fn render_one_metadata() {
        let doc = LabelRenderer::default().render_one(&widget()).unwrap();
        assert_eq!(doc.filename, "label_W-001.pdf");
        assert_eq!(doc.media_type, "application/pdf");
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.kind, DocumentKind::Single);
        assert!(doc.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn render_many_metadata() {
        let labels: Vec<_> = (0..8)
            .map(|i| Label::new(i, format!("L{i}"), format!("C{i}")))
            .collect();
        let doc = LabelRenderer::default().render_many(&labels).unwrap();
        assert_eq!(doc.filename, "all_labels.pdf");
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.label_count, 8);
        assert_eq!(doc.kind, DocumentKind::Batch);
    }

    #[test]
    fn render_many_empty_produces_no_document() {
        let result = LabelRenderer::default().render_many(&[]);
        assert!(matches!(result, Err(LabelPdfError::EmptyInput)));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = LabelRenderer::default();
        let a = renderer.render_one(&widget()).unwrap();
        let b = renderer.render_one(&widget()).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let mut config = RenderConfig::default();
        config.name_max_chars = 0;
        assert!(LabelRenderer::try_new(config).is_err());
    }

    #[test]
    fn render_to_file_into_directory_uses_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = LabelRenderer::default();
        let doc = renderer.render_one(&widget()).unwrap();
        let path = renderer.render_to_file(&doc, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("label_W-001.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp file left behind");
    }

    #[test]
    fn render_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports/2024/labels.pdf");
        let renderer = LabelRenderer::default();
        let doc = renderer.render_one(&widget()).unwrap();
        let path = renderer.render_to_file(&doc, &target).unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[tokio::test]
    async fn async_wrappers_match_sync_output() {
        let renderer = LabelRenderer::default();
        let sync = renderer.render_one(&widget()).unwrap();
        let async_doc = renderer.render_one_async(widget()).await.unwrap();
        assert_eq!(sync.bytes, async_doc.bytes);

        let err = renderer.render_many_async(Vec::new()).await.unwrap_err();
        assert!(matches!(err, LabelPdfError::EmptyInput));
    }
}
