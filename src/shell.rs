//! Toolkit-free model of the two-panel converter UI.
//!
//! The state machine is:
//!
//! ```text
//!            SelectPanel(ImagesToPdf)
//!   ┌───────────┐ ───────────────▶ ┌─────────────┐
//!   │ PdfToDocx │                  │ ImagesToPdf │
//!   └───────────┘ ◀─────────────── └─────────────┘
//!     (initial)   SelectPanel(PdfToDocx)
//! ```
//!
//! Exactly one panel is visible. `StartConversion` resolves the visible
//! panel's form into a fully specified request, hands it to a
//! [`ConversionRunner`] and shows the outcome as a [`Dialog`]. The runner
//! blocks until the conversion is done.
//!
//! Any front end (terminal loop, GUI toolkit, tests) feeds [`ShellEvent`]s
//! into [`AppState::handle`] and draws [`render_view`].

use crate::config::{ImagesToPdfJob, PdfToDocxConfig, DEFAULT_SCALE};
use crate::convert;
use crate::error::ConvertError;
use crate::output::ConversionOutcome;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Text of the about dialog.
pub const ABOUT_TEXT: &str = concat!(
    "PDF / Image Converter\n",
    "Author: John Rain <com.rainjohn.ch@gmail.com>\n",
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Formats: PDF in → DOCX out; JPG/JPEG/PNG/BMP/TIFF in → PDF out"
);

/// Which converter panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Panel {
    /// PDF → page images → Word document. (initial)
    #[default]
    PdfToDocx,
    /// Image directory → single PDF.
    ImagesToPdf,
}

/// Editable path fields across both panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// PdfToDocx: input PDF file.
    PdfPath,
    /// PdfToDocx: output directory.
    OutputDir,
    /// ImagesToPdf: image directory.
    ImageDir,
    /// ImagesToPdf: destination PDF file.
    PdfOutput,
}

impl Field {
    /// Panel the field lives on.
    pub fn panel(self) -> Panel {
        match self {
            Field::PdfPath | Field::OutputDir => Panel::PdfToDocx,
            Field::ImageDir | Field::PdfOutput => Panel::ImagesToPdf,
        }
    }

    /// Whether a browse dialog for this field picks a directory (vs a file).
    pub fn is_directory(self) -> bool {
        matches!(self, Field::OutputDir | Field::ImageDir)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::PdfPath => "PDF file",
            Field::OutputDir => "Output directory",
            Field::ImageDir => "Image folder",
            Field::PdfOutput => "Output PDF",
        }
    }
}

/// Modal dialog currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialog {
    Info { title: String, message: String },
    Error { message: String },
    About,
}

/// Field values of the PDF→Document panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfToDocxForm {
    pub pdf_path: String,
    pub output_dir: String,
    pub scale: f32,
}

impl Default for PdfToDocxForm {
    fn default() -> Self {
        Self {
            pdf_path: String::new(),
            output_dir: String::new(),
            scale: DEFAULT_SCALE,
        }
    }
}

/// Fully specified PDF→Document request.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfToDocxRequest {
    pub pdf_path: PathBuf,
    pub output_dir: PathBuf,
    pub scale: f32,
}

impl PdfToDocxForm {
    /// Apply defaults: a blank output directory becomes the PDF's directory.
    pub fn resolve(&self) -> Result<PdfToDocxRequest, ConvertError> {
        let pdf = self.pdf_path.trim();
        if pdf.is_empty() {
            return Err(ConvertError::InvalidConfig("choose a PDF file first".into()));
        }
        let pdf_path = PathBuf::from(pdf);
        let output_dir = match self.output_dir.trim() {
            "" => pdf_path
                .parent()
                .map(Path::to_path_buf)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(".")),
            dir => PathBuf::from(dir),
        };
        Ok(PdfToDocxRequest {
            pdf_path,
            output_dir,
            scale: self.scale,
        })
    }
}

/// Field values of the Image→PDF panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesToPdfForm {
    pub image_dir: String,
    pub pdf_output: String,
}

impl ImagesToPdfForm {
    /// Apply defaults: blank image folder → current directory, blank output →
    /// `<image folder>/combined_images.pdf`.
    pub fn resolve(&self) -> Result<ImagesToPdfJob, ConvertError> {
        let image_dir = match self.image_dir.trim() {
            "" => None,
            dir => Some(PathBuf::from(dir)),
        };
        let pdf_path = match self.pdf_output.trim() {
            "" => None,
            out => Some(PathBuf::from(out)),
        };
        ImagesToPdfJob::with_defaults(image_dir, pdf_path)
    }
}

/// Executes resolved requests. The default runs the real pipelines.
pub trait ConversionRunner {
    fn run_pdf_to_docx(&self, request: &PdfToDocxRequest) -> ConversionOutcome;
    fn run_images_to_pdf(&self, job: &ImagesToPdfJob) -> ConversionOutcome;
}

/// [`ConversionRunner`] backed by [`crate::convert`].
#[derive(Default, Clone)]
pub struct PipelineRunner {
    pub pdfium_library: Option<PathBuf>,
    pub progress_callback: Option<ProgressCallback>,
}

impl ConversionRunner for PipelineRunner {
    fn run_pdf_to_docx(&self, request: &PdfToDocxRequest) -> ConversionOutcome {
        let mut builder = PdfToDocxConfig::builder().scale(request.scale);
        if let Some(ref lib) = self.pdfium_library {
            builder = builder.pdfium_library(lib);
        }
        if let Some(ref cb) = self.progress_callback {
            builder = builder.progress_callback(cb.clone());
        }
        match builder.build() {
            Ok(config) => convert::pdf_to_docx(&request.pdf_path, Some(&request.output_dir), config),
            Err(e) => ConversionOutcome::failed(e.to_string()),
        }
    }

    fn run_images_to_pdf(&self, job: &ImagesToPdfJob) -> ConversionOutcome {
        match self.progress_callback {
            Some(ref cb) => convert::images_to_pdf_with(
                job,
                &crate::pipeline::pdf_encode::PrintPdfEncoder::default(),
                cb.as_ref(),
            ),
            None => convert::images_to_pdf(job),
        }
    }
}

/// User actions, one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// Menu "converter selection".
    SelectPanel(Panel),
    /// Typed into a path field.
    EditField(Field, String),
    /// Render scale of the PDF→Document panel.
    SetScale(f32),
    /// A browse dialog closed; `None` means cancelled.
    BrowseResult(Field, Option<PathBuf>),
    /// Start button of the visible panel.
    StartConversion,
    /// Menu "settings → about".
    ShowAbout,
    /// Close the modal dialog.
    DismissDialog,
    /// Menu "settings → quit".
    Quit,
}

/// Everything the view needs; owned by the front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub panel: Panel,
    pub pdf_form: PdfToDocxForm,
    pub images_form: ImagesToPdfForm,
    pub dialog: Option<Dialog>,
    pub quit_requested: bool,
    /// Outcome of the most recent conversion, if any.
    pub last_outcome: Option<ConversionOutcome>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::PdfPath => &self.pdf_form.pdf_path,
            Field::OutputDir => &self.pdf_form.output_dir,
            Field::ImageDir => &self.images_form.image_dir,
            Field::PdfOutput => &self.images_form.pdf_output,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::PdfPath => &mut self.pdf_form.pdf_path,
            Field::OutputDir => &mut self.pdf_form.output_dir,
            Field::ImageDir => &mut self.images_form.image_dir,
            Field::PdfOutput => &mut self.images_form.pdf_output,
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: ShellEvent, runner: &dyn ConversionRunner) {
        debug!("Shell event: {:?}", event);
        match event {
            ShellEvent::SelectPanel(panel) => self.panel = panel,
            ShellEvent::EditField(field, value) => *self.field_mut(field) = value,
            ShellEvent::BrowseResult(field, Some(path)) => {
                *self.field_mut(field) = path.to_string_lossy().into_owned();
            }
            ShellEvent::BrowseResult(_, None) => {}
            ShellEvent::SetScale(scale) if scale.is_finite() && scale > 0.0 => {
                self.pdf_form.scale = scale;
            }
            ShellEvent::SetScale(scale) => {
                self.dialog = Some(Dialog::Error {
                    message: format!("scale must be a positive number, got {scale}"),
                });
            }
            // Modal: the start button is unreachable until the dialog closes.
            ShellEvent::StartConversion if self.dialog.is_some() => {
                debug!("Ignoring start while a dialog is open");
            }
            ShellEvent::StartConversion => {
                let outcome = self.start_conversion(runner);
                self.dialog = Some(if outcome.success {
                    Dialog::Info {
                        title: "Done".into(),
                        message: outcome.message.clone(),
                    }
                } else {
                    Dialog::Error {
                        message: outcome.message.clone(),
                    }
                });
                self.last_outcome = Some(outcome);
            }
            ShellEvent::ShowAbout => self.dialog = Some(Dialog::About),
            ShellEvent::DismissDialog => self.dialog = None,
            ShellEvent::Quit => self.quit_requested = true,
        }
    }

    fn start_conversion(&self, runner: &dyn ConversionRunner) -> ConversionOutcome {
        match self.panel {
            Panel::PdfToDocx => match self.pdf_form.resolve() {
                Ok(request) => runner.run_pdf_to_docx(&request),
                Err(e) => ConversionOutcome::failed(e.to_string()),
            },
            Panel::ImagesToPdf => match self.images_form.resolve() {
                Ok(job) => runner.run_images_to_pdf(&job),
                Err(e) => ConversionOutcome::failed(e.to_string()),
            },
        }
    }
}

/// Fields shown on `panel`, in display order.
pub fn panel_fields(panel: Panel) -> [Field; 2] {
    match panel {
        Panel::PdfToDocx => [Field::PdfPath, Field::OutputDir],
        Panel::ImagesToPdf => [Field::ImageDir, Field::PdfOutput],
    }
}

/// Plain-text rendering of the current state.
pub fn render_view(state: &AppState) -> String {
    let mut out = String::new();
    let title = match state.panel {
        Panel::PdfToDocx => "PDF → Word",
        Panel::ImagesToPdf => "Images → PDF",
    };
    let _ = writeln!(out, "== {title} ==");
    for field in panel_fields(state.panel) {
        let value = state.field(field);
        let shown = if value.is_empty() { "(default)" } else { value };
        let _ = writeln!(out, "  {:<17} {}", format!("{}:", field.label()), shown);
    }
    if state.panel == Panel::PdfToDocx {
        let _ = writeln!(out, "  {:<17} {}", "Scale:", state.pdf_form.scale);
    }

    match &state.dialog {
        Some(Dialog::Info { title, message }) => {
            let _ = writeln!(out, "[{title}] {message}");
        }
        Some(Dialog::Error { message }) => {
            let _ = writeln!(out, "[Error] {message}");
        }
        Some(Dialog::About) => {
            let _ = writeln!(out, "[About]\n{ABOUT_TEXT}");
        }
        None => {}
    }
    out
}
