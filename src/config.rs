//! Job and configuration types for the two conversions.
//!
//! Every job is fully specified before a pipeline runs: defaults for blank
//! paths are resolved here (or in [`crate::shell`] form resolution), never
//! inside the pipelines themselves.
//!
//! * [`ImagesToPdfJob`] — `{image_dir, pdf_path}`.
//! * [`PdfToDocxJob`] — `{pdf_path, output_dir, scale, …}`; constructing it
//!   validates the input PDF and creates the output directories.

use crate::error::ConvertError;
use crate::pipeline::docx::DocxLayout;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used when no PDF output path is given.
pub const DEFAULT_PDF_NAME: &str = "combined_images.pdf";

/// Subdirectory of the output directory that receives `page_<n>.png`.
pub const PAGE_IMAGE_DIR: &str = "pdf_pages";

/// File name of the assembled document inside the output directory.
pub const DOCX_FILE_NAME: &str = "output_document.docx";

/// Default rendering scale: 200 % of the PDF's native page size.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Default display width of each embedded page image, in inches.
pub const DEFAULT_IMAGE_WIDTH_INCHES: f32 = 6.0;

/// Default top-level title of the assembled document.
pub const DEFAULT_TITLE: &str = "PDF to Word conversion result";

// ── Image → PDF ──────────────────────────────────────────────────────────

/// Combine every supported image under `image_dir` into one PDF at `pdf_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagesToPdfJob {
    image_dir: PathBuf,
    pdf_path: PathBuf,
}

impl ImagesToPdfJob {
    /// Fully specified job.
    pub fn new(image_dir: impl Into<PathBuf>, pdf_path: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            pdf_path: pdf_path.into(),
        }
    }

    /// Job with documented defaults for missing paths.
    ///
    /// * `image_dir`: current working directory.
    /// * `pdf_path`: `<image_dir>/combined_images.pdf`.
    pub fn with_defaults(
        image_dir: Option<PathBuf>,
        pdf_path: Option<PathBuf>,
    ) -> Result<Self, ConvertError> {
        let image_dir = match image_dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| ConvertError::Internal(format!("current directory: {e}")))?,
        };
        let pdf_path = pdf_path.unwrap_or_else(|| default_pdf_path(&image_dir));
        Ok(Self::new(image_dir, pdf_path))
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    /// Point the job at a different image directory.
    pub fn set_image_dir(&mut self, image_dir: impl Into<PathBuf>) {
        self.image_dir = image_dir.into();
    }

    /// Point the job at a different destination file.
    pub fn set_pdf_path(&mut self, pdf_path: impl Into<PathBuf>) {
        self.pdf_path = pdf_path.into();
    }
}

/// `<image_dir>/combined_images.pdf`.
pub fn default_pdf_path(image_dir: &Path) -> PathBuf {
    image_dir.join(DEFAULT_PDF_NAME)
}

// ── PDF → Document ───────────────────────────────────────────────────────

/// Knobs for the PDF→Document conversion.
///
/// Built via [`PdfToDocxConfig::builder()`] or [`PdfToDocxConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfimg::PdfToDocxConfig;
///
/// let config = PdfToDocxConfig::builder()
///     .scale(3.0)
///     .image_width_inches(5.5)
///     .build()
///     .unwrap();
/// assert_eq!(config.scale, 3.0);
/// ```
#[derive(Clone)]
pub struct PdfToDocxConfig {
    /// Linear render scale relative to the page's native size. Default: 2.0.
    ///
    /// Any positive finite value is accepted; 1–3 is the practical range.
    /// Pixel count, and roughly file size, grow with the square of the scale.
    pub scale: f32,

    /// Display width of each page image in the document, in inches. Default: 6.0.
    pub image_width_inches: f32,

    /// Top-level title paragraph of the document.
    pub title: String,

    /// Explicit pdfium shared library to bind. Default: look next to the
    /// executable, then system-wide.
    pub pdfium_library: Option<PathBuf>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PdfToDocxConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            image_width_inches: DEFAULT_IMAGE_WIDTH_INCHES,
            title: DEFAULT_TITLE.to_string(),
            pdfium_library: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PdfToDocxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfToDocxConfig")
            .field("scale", &self.scale)
            .field("image_width_inches", &self.image_width_inches)
            .field("title", &self.title)
            .field("pdfium_library", &self.pdfium_library)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PdfToDocxConfig {
    /// Create a new builder for `PdfToDocxConfig`.
    pub fn builder() -> PdfToDocxConfigBuilder {
        PdfToDocxConfigBuilder {
            config: Self::default(),
        }
    }

    /// Layout handed to the document assembler.
    pub fn layout(&self) -> DocxLayout {
        DocxLayout {
            title: self.title.clone(),
            image_width_inches: self.image_width_inches,
        }
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !self.image_width_inches.is_finite() || self.image_width_inches <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "image width must be a positive number of inches, got {}",
                self.image_width_inches
            )));
        }
        Ok(())
    }
}

/// Builder for [`PdfToDocxConfig`].
pub struct PdfToDocxConfigBuilder {
    config: PdfToDocxConfig,
}

impl PdfToDocxConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn image_width_inches(mut self, inches: f32) -> Self {
        self.config.image_width_inches = inches;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfToDocxConfig, ConvertError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Rasterise a PDF and assemble its pages into a `.docx`.
///
/// Construction checks that the PDF exists and then creates
/// `output_dir` and `output_dir/pdf_pages`.
#[derive(Debug, Clone)]
pub struct PdfToDocxJob {
    pub(crate) pdf_path: PathBuf,
    pub(crate) output_dir: PathBuf,
    pub(crate) image_dir: PathBuf,
    pub(crate) docx_path: PathBuf,
    pub(crate) config: PdfToDocxConfig,
}

impl PdfToDocxJob {
    /// Validate the input and prepare output directories.
    ///
    /// `output_dir` defaults to the PDF's parent directory. Both paths are
    /// made absolute.
    ///
    /// # Errors
    /// * [`ConvertError::FileNotFound`] if `pdf_path` is not an existing
    ///   file; nothing is created on disk in that case.
    /// * [`ConvertError::InvalidConfig`] if `config` has a non-positive scale
    ///   or image width.
    /// * [`ConvertError::DirectoryCreationFailed`] if an output directory
    ///   cannot be created.
    pub fn new(
        pdf_path: impl AsRef<Path>,
        output_dir: Option<&Path>,
        config: PdfToDocxConfig,
    ) -> Result<Self, ConvertError> {
        config.validate()?;

        let pdf_path = absolutize(pdf_path.as_ref())?;
        if !pdf_path.is_file() {
            return Err(ConvertError::FileNotFound { path: pdf_path });
        }

        let output_dir = match output_dir {
            Some(dir) => absolutize(dir)?,
            None => pdf_path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| ConvertError::Internal("PDF path has no parent".into()))?,
        };
        let image_dir = output_dir.join(PAGE_IMAGE_DIR);
        let docx_path = output_dir.join(DOCX_FILE_NAME);

        create_dir(&image_dir)?;
        create_dir(&output_dir)?;

        debug!(
            "Prepared PDF→Document job: {} → {}",
            pdf_path.display(),
            docx_path.display()
        );

        Ok(Self {
            pdf_path,
            output_dir,
            image_dir,
            docx_path,
            config,
        })
    }

    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where `page_<n>.png` files are written.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Where the assembled document is written.
    pub fn docx_path(&self) -> &Path {
        &self.docx_path
    }

    pub fn config(&self) -> &PdfToDocxConfig {
        &self.config
    }
}

/// Make `path` absolute against the current directory, resolving symlinks
/// and `..` when the path exists.
fn absolutize(path: &Path) -> Result<PathBuf, ConvertError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ConvertError::Internal(format!("current directory: {e}")))?
            .join(path)
    };
    Ok(joined.canonicalize().unwrap_or(joined))
}

pub(crate) fn create_dir(dir: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(dir).map_err(|source| ConvertError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn images_job_defaults_to_combined_pdf_in_image_dir() {
        let job = ImagesToPdfJob::with_defaults(Some(PathBuf::from("/photos")), None).unwrap();
        assert_eq!(job.pdf_path(), Path::new("/photos/combined_images.pdf"));
    }

    #[test]
    fn images_job_default_dir_is_cwd() {
        let job = ImagesToPdfJob::with_defaults(None, None).unwrap();
        assert_eq!(job.image_dir(), std::env::current_dir().unwrap());
    }

    #[test]
    fn images_job_setters_retarget() {
        let mut job = ImagesToPdfJob::new("/a", "/a/out.pdf");
        job.set_image_dir("/b");
        job.set_pdf_path("/c/out.pdf");
        assert_eq!(job.image_dir(), Path::new("/b"));
        assert_eq!(job.pdf_path(), Path::new("/c/out.pdf"));
    }

    #[test]
    fn builder_rejects_non_positive_scale() {
        assert!(PdfToDocxConfig::builder().scale(0.0).build().is_err());
        assert!(PdfToDocxConfig::builder().scale(-1.0).build().is_err());
        assert!(PdfToDocxConfig::builder().scale(f32::NAN).build().is_err());
        assert!(PdfToDocxConfig::builder().scale(0.5).build().is_ok());
    }

    #[test]
    fn builder_rejects_zero_width() {
        let err = PdfToDocxConfig::builder()
            .image_width_inches(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn default_config_values() {
        let c = PdfToDocxConfig::default();
        assert_eq!(c.scale, 2.0);
        assert_eq!(c.image_width_inches, 6.0);
        assert_eq!(c.layout().title, DEFAULT_TITLE);
    }

    #[test]
    fn pdf_job_missing_input_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let err = PdfToDocxJob::new(
            tmp.path().join("nope.pdf"),
            Some(&out),
            PdfToDocxConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_input_not_found());
        assert!(!out.exists());
    }

    #[test]
    fn pdf_job_creates_dirs_eagerly() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("in.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        let out = tmp.path().join("nested/out");

        let job = PdfToDocxJob::new(&pdf, Some(&out), PdfToDocxConfig::default()).unwrap();
        assert!(job.image_dir().is_dir());
        assert!(job.image_dir().ends_with(PAGE_IMAGE_DIR));
        assert!(job.docx_path().ends_with(DOCX_FILE_NAME));
        assert!(job.output_dir().is_absolute());
    }

    #[test]
    fn pdf_job_output_defaults_to_pdf_parent() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("in.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();

        let job = PdfToDocxJob::new(&pdf, None, PdfToDocxConfig::default()).unwrap();
        assert_eq!(job.output_dir(), tmp.path().canonicalize().unwrap());
    }
}
