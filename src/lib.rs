//! # label-pdf
//!
//! Render product labels to PDF: one framed label with a QR code, or a
//! paginated sheet listing many labels.
//!
//! The crate is the document core of a small label-management application.
//! It holds no state and does no I/O during rendering: it takes label
//! records, returns PDF bytes plus a suggested filename, and leaves storage,
//! sessions and HTTP to the caller.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Label / [Label]
//!  │
//!  ├─ 1. Select  owner, active flag, search term, name order   (catalog)
//!  ├─ 2. QR      "Código: …\nNome: …" → grayscale raster       (single only)
//!  ├─ 3. Layout  framed label, or bands paginated down the page
//!  ├─ 4. Emit    display list → PDF via pdf-writer
//!  └─ 5. Output  RenderedDocument { bytes, filename, page_count, … }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use label_pdf::{Label, LabelRenderer, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = LabelRenderer::new(RenderConfig::default());
//!
//!     let label = Label::new(1, "Widget X", "W-001")
//!         .with_category("Tools")
//!         .with_price(19.90);
//!     let doc = renderer.render_one(&label)?;
//!     renderer.render_to_file(&doc, ".")?; // ./label_W-001.pdf
//!
//!     let sheet = renderer.render_many(&[label])?;
//!     eprintln!("{} page(s), {} bytes", sheet.page_count, sheet.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `labelpdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! label-pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod error;
pub mod label;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::{find_label, select_labels, sort_by_name, LabelQuery};
pub use config::{
    BatchLayout, CurrencyFormat, PageSize, QrErrorCorrection, QrSettings, RenderConfig,
    RenderConfigBuilder, SingleLayout,
};
pub use error::LabelPdfError;
pub use label::{Footprint, Label, LabelSize};
pub use output::{DocumentKind, RenderedDocument};
pub use pipeline::qr::{qr_payload, QrEncoder, QrImage};
pub use progress::{NoopProgressCallback, ProgressCallback, RenderProgressCallback};
pub use render::LabelRenderer;
