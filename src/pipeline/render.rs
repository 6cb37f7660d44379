//! PDF rasterisation: render every page to `page_<n>.png` via pdfium.
//!
//! Rendering is synchronous and walks pages in order; the returned list is
//! in page order and that order carries into the assembled document.
//!
//! The render size is derived from the page's own size in points: a scale of
//! 2 turns a 612 × 792 pt Letter page into a 1224 × 1584 px bitmap.

use crate::error::ConvertError;
use crate::output::RenderedPage;
use crate::progress::ConversionProgressCallback;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library to bind.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium shared library.
///
/// Resolution order (first success wins):
/// 1. `explicit`, when given
/// 2. `$PDFIUM_LIB_PATH`
/// 3. the platform library name in the current directory
/// 4. the system library search path
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, ConvertError> {
    let env_path = std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from);
    if let Some(path) = explicit.map(Path::to_path_buf).or(env_path) {
        debug!("Binding pdfium from {}", path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| {
                ConvertError::PdfiumBindingFailed(format!("'{}': {:?}", path.display(), e))
            });
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| ConvertError::PdfiumBindingFailed(format!("{:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

/// How far into the file the `%PDF-` header may start. Leading whitespace or
/// junk before the header is tolerated by pdfium within this window.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

/// Reject files with no `%PDF-` header in their first
/// [`HEADER_SEARCH_WINDOW`] bytes.
pub fn check_pdf_magic(pdf_path: &Path) -> Result<(), ConvertError> {
    let file = std::fs::File::open(pdf_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::FileNotFound {
            path: pdf_path.to_path_buf(),
        },
        _ => ConvertError::InputReadFailed {
            path: pdf_path.to_path_buf(),
            source: e,
        },
    })?;

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(|source| ConvertError::InputReadFailed {
            path: pdf_path.to_path_buf(),
            source,
        })?;

    if head.windows(5).any(|w| w == b"%PDF-") {
        return Ok(());
    }

    let mut magic = [0u8; 4];
    let n = head.len().min(4);
    magic[..n].copy_from_slice(&head[..n]);
    Err(ConvertError::NotAPdf {
        path: pdf_path.to_path_buf(),
        magic,
    })
}

fn open_document<'a>(pdfium: &'a Pdfium, pdf_path: &Path) -> Result<PdfDocument<'a>, ConvertError> {
    pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| ConvertError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        })
}

/// Number of pages in the PDF.
pub fn page_count(pdfium: &Pdfium, pdf_path: &Path) -> Result<usize, ConvertError> {
    let document = open_document(pdfium, pdf_path)?;
    Ok(document.pages().len() as usize)
}

/// Pixel size of a page of `width_pt × height_pt` rendered at `scale`.
pub fn target_size(width_pt: f32, height_pt: f32, scale: f32) -> (i32, i32) {
    (
        ((width_pt * scale).round() as i32).max(1),
        ((height_pt * scale).round() as i32).max(1),
    )
}

/// Rasterise every page of `pdf_path` into `image_dir/page_<n>.png`.
///
/// Files already present under the same names are overwritten. Pages
/// written before a failure are left on disk.
pub fn render_pages(
    pdfium: &Pdfium,
    pdf_path: &Path,
    image_dir: &Path,
    scale: f32,
    progress: &dyn ConversionProgressCallback,
) -> Result<Vec<RenderedPage>, ConvertError> {
    info!("Processing PDF: {}", pdf_path.display());
    let document = open_document(pdfium, pdf_path)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);
    progress.on_conversion_start(total_pages);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let (width_px, height_px) = target_size(page.width().value, page.height().value, scale);

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_maximum_height(height_px);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ConvertError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        let image_path = image_dir.join(RenderedPage::file_name(page_num));
        image
            .save_with_format(&image_path, ImageFormat::Png)
            .map_err(|e| ConvertError::ImageWriteFailed {
                path: image_path.clone(),
                detail: e.to_string(),
            })?;

        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );
        info!("Wrote {}", image_path.display());
        progress.on_page_complete(page_num, total_pages, &image_path);

        results.push(RenderedPage {
            page_num,
            image_path,
        });
    }

    info!("Saved {} page image(s) to {}", results.len(), image_dir.display());
    Ok(results)
}
