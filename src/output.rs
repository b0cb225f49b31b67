//! Output types returned by the renderer.

use serde::{Deserialize, Serialize};

/// Media type of every rendered document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Suggested filename for a batch export.
pub const BATCH_FILENAME: &str = "all_labels.pdf";

/// Which entry point produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Single,
    Batch,
}

/// A finished PDF plus the metadata a transport layer attaches to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Complete PDF file.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Suggested download name: `label_{code}.pdf` or `all_labels.pdf`.
    pub filename: String,
    /// Always [`PDF_MEDIA_TYPE`].
    pub media_type: String,
    pub page_count: usize,
    /// Labels drawn into the document.
    pub label_count: usize,
    pub kind: DocumentKind,
}

impl RenderedDocument {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Suggested filename for a single-label export.
///
/// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so the name is
/// safe in a `Content-Disposition` header and on every file system.
pub fn single_filename(code: &str) -> String {
    let safe: String = code
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("label_{safe}.pdf")
}
