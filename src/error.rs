//! Error types for the pdfimg library.
//!
//! [`ConvertError`] covers every way a single conversion attempt can fail.
//! None of them are fatal to the process: a caller (the CLI, the terminal
//! shell, or an embedding application) reports the error and stays usable
//! for a retry with corrected input.
//!
//! The two pipelines surface errors differently:
//!
//! * Image→PDF catches everything at its boundary and returns a
//!   [`crate::output::ConversionOutcome`] with `success = false`.
//! * PDF→Document propagates `Err(ConvertError)` from
//!   [`crate::config::PdfToDocxJob::new`] and
//!   [`crate::config::PdfToDocxJob::convert`]; callers that prefer data over
//!   propagation use [`crate::convert::pdf_to_docx`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfimg library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory was not found at the given path.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The image directory contains no file with a supported extension.
    #[error("No supported image files (.jpg, .jpeg, .png, .bmp, .tiff) found under '{dir}'")]
    NoMatchingFiles { dir: PathBuf },

    /// The input exists but could not be read (permissions, not a regular file).
    #[error("Cannot read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Codec errors ──────────────────────────────────────────────────────
    /// An input image could not be decoded.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    /// The image→PDF encoder gave up.
    #[error("PDF encoding failed: {detail}")]
    EncodingFailed { detail: String },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A rendered page could not be saved as PNG.
    #[error("Failed to write page image '{path}': {detail}")]
    ImageWriteFailed { path: PathBuf, detail: String },

    /// The word-processing document could not be assembled or written.
    #[error("Failed to write document '{path}': {detail}")]
    DocumentWriteFailed { path: PathBuf, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create an output directory.
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or form validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
The PDF→Document conversion needs the pdfium shared library.\n\
  • Place libpdfium next to the executable, or install it system-wide.\n\
  • Or point PDFIUM_LIB_PATH / --pdfium-lib at an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Whether the error means the user pointed at something that isn't there.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, ConvertError::FileNotFound { .. })
    }
}
