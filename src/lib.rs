//! # pdfimg
//!
//! Convert between raster images and PDF documents.
//!
//! Two independent, synchronous pipelines:
//!
//! ```text
//! Image→PDF
//!  ├─ 1. Collect  recursive walk, jpg/jpeg/png/bmp/tiff, sorted by stem
//!  ├─ 2. Encode   one page per image, page sized to the image (printpdf)
//!  └─ 3. Write    single PDF, default <image_dir>/combined_images.pdf
//!
//! PDF→Document
//!  ├─ 1. Render   every page → pdf_pages/page_<n>.png via pdfium
//!  ├─ 2. Assemble title + per-page heading + image (OOXML over zip)
//!  └─ 3. Write    <output_dir>/output_document.docx
//! ```
//!
//! A toolkit-free model of the two-panel front end lives in [`shell`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfimg::{images_to_pdf, pdf_to_docx, ImagesToPdfJob, PdfToDocxConfig};
//! use std::path::PathBuf;
//!
//! // Image→PDF never returns an error; branch on the outcome instead.
//! let job = ImagesToPdfJob::with_defaults(Some(PathBuf::from("scans")), None).unwrap();
//! let outcome = images_to_pdf(&job);
//! println!("{}: {}", outcome.success, outcome.message);
//!
//! // PDF→Document, output next to the input PDF.
//! let outcome = pdf_to_docx("report.pdf", None, PdfToDocxConfig::default());
//! if let Some(path) = outcome.output_path {
//!     println!("wrote {}", path.display());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfimg` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfimg = { version = "0.1", default-features = false }
//! ```
//!
//! ## Native library
//!
//! PDF rasterisation binds the pdfium shared library at runtime; see
//! [`pipeline::render::bind_pdfium`] for the lookup order.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod shell;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ImagesToPdfJob, PdfToDocxConfig, PdfToDocxConfigBuilder, PdfToDocxJob, DEFAULT_PDF_NAME,
    DOCX_FILE_NAME, PAGE_IMAGE_DIR,
};
pub use convert::{images_to_pdf, images_to_pdf_with, pdf_to_docx};
pub use error::ConvertError;
pub use output::{
    ConversionOutcome, ConversionStats, DocxConversionOutput, ImageFileSet, RenderedPage,
};
pub use pipeline::collect::collect_images;
pub use pipeline::docx::{assemble_document, DocxLayout};
pub use pipeline::pdf_encode::{ImagePdfEncoder, PrintPdfEncoder};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
