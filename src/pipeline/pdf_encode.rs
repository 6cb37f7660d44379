//! Image → PDF encoding: one page per image, page sized to the image.
//!
//! printpdf 0.8 uses a data-oriented API: a document is a list of
//! `PdfPage`s, each holding a `Vec<Op>`, serialised by `PdfDocument::save()`.
//! Each image becomes an XObject drawn at the page origin at
//! [`DEFAULT_DPI`], so the page is exactly as large as the image at that
//! resolution and no scaling or margins are applied.

use crate::error::ConvertError;
use crate::output::ImageFileSet;
use crate::progress::ConversionProgressCallback;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Resolution assumed for every image when sizing its page.
pub const DEFAULT_DPI: f32 = 96.0;

const MM_PER_INCH: f32 = 25.4;

/// Title written to the PDF /Info dictionary.
const PDF_TITLE: &str = "Combined images";

/// Turns an ordered set of images into the bytes of a single PDF.
///
/// The pipeline only depends on this trait, so tests and embedders can swap
/// in another encoder.
pub trait ImagePdfEncoder {
    fn encode(
        &self,
        images: &ImageFileSet,
        progress: &dyn ConversionProgressCallback,
    ) -> Result<Vec<u8>, ConvertError>;
}

/// Default encoder backed by `printpdf`.
#[derive(Debug, Clone)]
pub struct PrintPdfEncoder {
    dpi: f32,
}

impl Default for PrintPdfEncoder {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
        }
    }
}

impl PrintPdfEncoder {
    /// Page size in millimetres for an image of `width_px × height_px`.
    pub fn page_size_mm(&self, width_px: u32, height_px: u32) -> (Mm, Mm) {
        (
            Mm(width_px as f32 / self.dpi * MM_PER_INCH),
            Mm(height_px as f32 / self.dpi * MM_PER_INCH),
        )
    }

    fn load_raw(path: &Path) -> Result<RawImage, ConvertError> {
        let decoded = image::open(path).map_err(|e| ConvertError::ImageDecodeFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let width = decoded.width() as usize;
        let height = decoded.height() as usize;
        if width == 0 || height == 0 {
            return Err(ConvertError::ImageDecodeFailed {
                path: path.to_path_buf(),
                detail: "image has zero width or height".into(),
            });
        }

        // printpdf takes RGB8; alpha is dropped.
        let rgb = decoded.to_rgb8();
        Ok(RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        })
    }
}

impl ImagePdfEncoder for PrintPdfEncoder {
    fn encode(
        &self,
        images: &ImageFileSet,
        progress: &dyn ConversionProgressCallback,
    ) -> Result<Vec<u8>, ConvertError> {
        if images.is_empty() {
            return Err(ConvertError::EncodingFailed {
                detail: "no images to encode".into(),
            });
        }

        let total = images.len();
        let mut doc = PdfDocument::new(PDF_TITLE);
        let mut pages = Vec::with_capacity(total);

        for (i, path) in images.iter().enumerate() {
            let raw = Self::load_raw(path)?;
            let (page_w, page_h) = self.page_size_mm(raw.width as u32, raw.height as u32);
            debug!(
                "Page {}: {} ({}x{} px)",
                i + 1,
                path.display(),
                raw.width,
                raw.height
            );

            let xobject_id = doc.add_image(&raw);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));
            progress.on_page_complete(i + 1, total, path);
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        for w in &warnings {
            warn!("printpdf: {:?}", w);
        }
        info!("Encoded {} page(s) → {} bytes", total, bytes.len());

        Ok(bytes)
    }
}
