//! Pipeline stages for the two conversions.
//!
//! Each submodule implements exactly one step and can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! Image → PDF:       collect ──▶ pdf_encode ──▶ write
//!                    (walk dir)   (printpdf)
//!
//! PDF → Document:    render ──▶ docx
//!                    (pdfium)   (zip + OOXML)
//! ```
//!
//! 1. [`collect`]    — find allow-listed images under a directory, ordered by stem
//! 2. [`pdf_encode`] — one PDF page per image, sized to the image
//! 3. [`render`]     — rasterise every page to `page_<n>.png`
//! 4. [`docx`]       — title + one heading/image block per page in a `.docx`

pub mod collect;
pub mod docx;
pub mod pdf_encode;
pub mod render;
