//! Pipeline stages for label rendering.
//!
//! Each submodule implements one step. Layouts produce a device-independent
//! display list, so geometry is tested without parsing PDF and the emitter
//! can change without touching layout rules.
//!
//! ## Data Flow
//!
//! ```text
//! Label ──▶ qr ──▶ single ─┐
//!                          ├──▶ layout::DocumentLayout ──▶ emit ──▶ PDF bytes
//! [Label] ──────▶ batch ───┘
//! ```
//!
//! 1. [`qr`]: payload text → grayscale raster (single layout only)
//! 2. [`single`]: one framed label with its QR code on one page
//! 3. [`batch`]: one band per label, paginated, no QR codes
//! 4. [`emit`]: serialise the display list with `pdf-writer`
//!
//! [`text`] holds the shared truncation, encoding and measuring helpers.

pub mod batch;
pub mod emit;
pub mod layout;
pub mod qr;
pub mod single;
pub mod text;
