//! Error types for the label-pdf library.
//!
//! Everything the core can fail with is a [`LabelPdfError`]. The variants fall
//! into three groups:
//!
//! * **Caller conditions**: [`LabelPdfError::EmptyInput`] and
//!   [`LabelPdfError::LabelNotFound`] are expected outcomes that a web layer
//!   turns into a user-facing message ("nothing to export") rather than a
//!   500 page.
//! * **Contract breaches**: [`LabelPdfError::InvalidLabel`] means a record
//!   reached the renderer without passing validation (e.g. an empty `code`).
//!   These are fatal and not worth retrying.
//! * **Encoding / I/O**: QR capacity overflow, config files, output files.
//!
//! QR rasters never touch the file system, so there is no cleanup-warning
//! variant: nothing transient can be left behind by a render call.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the label-pdf library.
#[derive(Debug, Error)]
pub enum LabelPdfError {
    // ── Caller conditions ─────────────────────────────────────────────────
    /// Batch render was called with no labels.
    #[error("No labels to export")]
    EmptyInput,

    /// The requested label does not exist or belongs to another owner.
    #[error("Label {id} not found")]
    LabelNotFound { id: u64 },

    // ── Contract breaches ─────────────────────────────────────────────────
    /// A label violates a field invariant (empty code, empty name).
    #[error("Label {id} is invalid: {reason}")]
    InvalidLabel { id: u64, reason: String },

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The QR payload does not fit the largest symbol version at the
    /// configured error-correction level.
    #[error("QR encoding failed for code '{code}': {detail}")]
    Encoding { code: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::RenderConfig`].
    #[error("Failed to parse config file '{path}': {detail}")]
    ConfigParse { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LabelPdfError {
    /// True for conditions a caller should present as a message rather than
    /// treat as a failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            LabelPdfError::EmptyInput | LabelPdfError::LabelNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_display() {
        assert_eq!(LabelPdfError::EmptyInput.to_string(), "No labels to export");
    }

    #[test]
    fn encoding_display_names_code() {
        let e = LabelPdfError::Encoding {
            code: "W-001".into(),
            detail: "data too long".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("W-001"), "got: {msg}");
        assert!(msg.contains("data too long"), "got: {msg}");
    }

    #[test]
    fn invalid_label_display() {
        let e = LabelPdfError::InvalidLabel {
            id: 7,
            reason: "code is empty".into(),
        };
        assert!(e.to_string().contains("Label 7"));
    }

    #[test]
    fn user_facing_classification() {
        assert!(LabelPdfError::EmptyInput.is_user_facing());
        assert!(LabelPdfError::LabelNotFound { id: 1 }.is_user_facing());
        assert!(!LabelPdfError::Internal("boom".into()).is_user_facing());
    }
}
