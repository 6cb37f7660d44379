//! Conversion entry points.
//!
//! Two independent pipelines with no state shared between runs:
//!
//! * **Image→PDF** — [`images_to_pdf`] / [`ImagesToPdfJob::convert`].
//!   Every failure is caught here and reported as a
//!   [`ConversionOutcome`] with `success = false`.
//! * **PDF→Document** — [`PdfToDocxJob::convert`] propagates errors;
//!   [`pdf_to_docx`] wraps construction and conversion into an outcome.
//!
//! Output files are written directly to their destination. A failure during
//! the write can leave a partial file behind; nothing is cleaned up.

use crate::config::{create_dir, ImagesToPdfJob, PdfToDocxConfig, PdfToDocxJob};
use crate::error::ConvertError;
use crate::output::{ConversionOutcome, ConversionStats, DocxConversionOutput};
use crate::pipeline::pdf_encode::{ImagePdfEncoder, PrintPdfEncoder};
use crate::pipeline::{collect, docx, render};
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

// ── Image → PDF ──────────────────────────────────────────────────────────

/// Combine the job's images into one PDF using the default encoder.
pub fn images_to_pdf(job: &ImagesToPdfJob) -> ConversionOutcome {
    images_to_pdf_with(job, &PrintPdfEncoder::default(), &NoopProgressCallback)
}

/// [`images_to_pdf`] with an injected encoder and progress callback.
pub fn images_to_pdf_with(
    job: &ImagesToPdfJob,
    encoder: &dyn ImagePdfEncoder,
    progress: &dyn ConversionProgressCallback,
) -> ConversionOutcome {
    match run_images_to_pdf(job, encoder, progress) {
        Ok(stats) => {
            let message = format!(
                "Created PDF {} with {} image(s)",
                job.pdf_path().display(),
                stats.pages
            );
            info!("{} in {}ms", message, stats.total_duration_ms);
            ConversionOutcome::succeeded(message, job.pdf_path())
        }
        Err(e) => {
            error!("Image→PDF conversion failed: {}", e);
            ConversionOutcome::failed(e.to_string())
        }
    }
}

fn run_images_to_pdf(
    job: &ImagesToPdfJob,
    encoder: &dyn ImagePdfEncoder,
    progress: &dyn ConversionProgressCallback,
) -> Result<ConversionStats, ConvertError> {
    let start = Instant::now();
    info!(
        "Starting Image→PDF: {} → {}",
        job.image_dir().display(),
        job.pdf_path().display()
    );

    // ── Step 1: Collect images ───────────────────────────────────────────
    let images = collect::collect_images(job.image_dir())?;
    if images.is_empty() {
        return Err(ConvertError::NoMatchingFiles {
            dir: job.image_dir().to_path_buf(),
        });
    }
    progress.on_conversion_start(images.len());

    // ── Step 2: Ensure destination directory ─────────────────────────────
    if let Some(parent) = job.pdf_path().parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }

    // ── Step 3: Encode in memory ─────────────────────────────────────────
    let bytes = encoder.encode(&images, progress)?;

    // ── Step 4: Write ────────────────────────────────────────────────────
    std::fs::write(job.pdf_path(), &bytes).map_err(|source| ConvertError::OutputWriteFailed {
        path: job.pdf_path().to_path_buf(),
        source,
    })?;

    info!("PDF contains {} image(s)", images.len());
    progress.on_conversion_complete(images.len(), job.pdf_path());

    Ok(ConversionStats {
        pages: images.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    })
}

impl ImagesToPdfJob {
    /// Run the Image→PDF pipeline for this job.
    pub fn convert(&self) -> ConversionOutcome {
        images_to_pdf(self)
    }
}

// ── PDF → Document ───────────────────────────────────────────────────────

impl PdfToDocxJob {
    /// Rasterise every page and assemble the document.
    ///
    /// # Errors
    /// * [`ConvertError::NotAPdf`] / [`ConvertError::CorruptPdf`] if the
    ///   input cannot be opened as a PDF.
    /// * [`ConvertError::PdfiumBindingFailed`] if no pdfium library is found.
    /// * Any render, image-write or document-write failure.
    ///
    /// Page images written before a failure stay on disk.
    pub fn convert(&self) -> Result<DocxConversionOutput, ConvertError> {
        let start = Instant::now();
        let noop = NoopProgressCallback;
        let progress: &dyn ConversionProgressCallback = match self.config.progress_callback {
            Some(ref cb) => cb.as_ref(),
            None => &noop,
        };

        // ── Step 1: Validate input ───────────────────────────────────────
        render::check_pdf_magic(&self.pdf_path)?;

        // ── Step 2: Rasterise pages ──────────────────────────────────────
        let pdfium = render::bind_pdfium(self.config.pdfium_library.as_deref())?;
        let pages = render::render_pages(
            &pdfium,
            &self.pdf_path,
            &self.image_dir,
            self.config.scale,
            progress,
        )?;

        // ── Step 3: Assemble document ────────────────────────────────────
        docx::assemble_document(&pages, &self.docx_path, &self.config.layout())?;
        progress.on_conversion_complete(pages.len(), &self.docx_path);

        let stats = ConversionStats {
            pages: pages.len(),
            total_duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Conversion complete: {} page(s), {}ms",
            stats.pages, stats.total_duration_ms
        );

        Ok(DocxConversionOutput {
            docx_path: self.docx_path.clone(),
            image_dir: self.image_dir.clone(),
            pages,
            stats,
        })
    }
}

/// Construct and run a PDF→Document job, reporting the result as data.
pub fn pdf_to_docx(
    pdf_path: impl AsRef<Path>,
    output_dir: Option<&Path>,
    config: PdfToDocxConfig,
) -> ConversionOutcome {
    let result = PdfToDocxJob::new(pdf_path, output_dir, config).and_then(|job| job.convert());
    match result {
        Ok(output) => ConversionOutcome::succeeded(
            format!(
                "Created Word document {} ({} page(s))",
                output.docx_path.display(),
                output.stats.pages
            ),
            &output.docx_path,
        ),
        Err(e) => {
            error!("PDF→Document conversion failed: {}", e);
            ConversionOutcome::failed(e.to_string())
        }
    }
}
