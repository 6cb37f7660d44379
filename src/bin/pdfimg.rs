//! CLI binary for pdfimg.
//!
//! A thin shim over the library crate: one-shot subcommands map flags onto
//! jobs and print the outcome; `shell` (the default) drives the two-panel
//! [`AppState`] from stdin.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfimg::pipeline::render;
use pdfimg::shell::{
    render_view, AppState, Field, Panel, PipelineRunner, ShellEvent, ABOUT_TEXT,
};
use pdfimg::{
    images_to_pdf_with, pdf_to_docx, ConversionOutcome, ConversionProgressCallback,
    ImagesToPdfJob, PdfToDocxConfig, PrintPdfEncoder, ProgressCallback,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// "pages" or "images", used in the bar template.
    unit: &'static str,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` reports the total.
    fn new_dynamic(unit: &'static str) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar, unit })
    }

    fn activate_bar(&self, total: usize) {
        let template = format!(
            "{{spinner:.cyan}} {{prefix:.bold}}  \
             [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {}  \
             ⏱ {{elapsed_precise}}",
            self.unit
        );
        let progress_style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting conversion of {total_pages} {}…", self.unit))
        ));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&name),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, output: &Path) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} {} → {}",
            green("✔"),
            bold(&total_pages.to_string()),
            self.unit,
            bold(&output.display().to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Combine every image under ./scans into ./scans/combined_images.pdf
  pdfimg images-to-pdf scans

  # Explicit destination
  pdfimg images-to-pdf scans -o out/scans.pdf

  # PDF → page PNGs + Word document next to the PDF
  pdfimg pdf-to-docx report.pdf

  # Higher resolution, narrower images, different output directory
  pdfimg pdf-to-docx report.pdf -o out --scale 3 --width 5.5

  # Page count only
  pdfimg inspect report.pdf

  # Interactive two-panel shell (also the default with no subcommand)
  pdfimg shell

OUTPUT LAYOUT (pdf-to-docx):
  <output_dir>/pdf_pages/page_1.png … page_N.png
  <output_dir>/output_document.docx

SUPPORTED IMAGE EXTENSIONS (lowercase only):
  jpg  jpeg  png  bmp  tiff

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium (same as --pdfium-lib)
  RUST_LOG          Full tracing filter override
"#;

/// Convert image folders to PDF and PDFs to Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdfimg",
    version,
    about = "Convert image folders to PDF and PDFs to Word documents",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the pdfium shared library.
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the outcome as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine every supported image under a directory into one PDF.
    ImagesToPdf {
        /// Image directory (default: current directory).
        dir: Option<PathBuf>,

        /// Destination PDF (default: <DIR>/combined_images.pdf).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render each PDF page to PNG and assemble a Word document.
    PdfToDocx {
        /// Input PDF file.
        pdf: PathBuf,

        /// Output directory (default: the PDF's directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render scale relative to the page size in points.
        #[arg(long, default_value_t = pdfimg::config::DEFAULT_SCALE)]
        scale: f32,

        /// Width of each embedded page image, in inches.
        #[arg(long, default_value_t = pdfimg::config::DEFAULT_IMAGE_WIDTH_INCHES)]
        width: f32,
    },

    /// Print the page count of a PDF.
    Inspect {
        /// Input PDF file.
        pdf: PathBuf,
    },

    /// Show author, version and supported formats.
    About,

    /// Interactive two-panel shell on stdin.
    Shell,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Shell));

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || interactive {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let outcome = match cli.command {
        None | Some(Command::Shell) => return run_shell(&cli, show_progress),
        Some(Command::About) => {
            println!("{ABOUT_TEXT}");
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Inspect { ref pdf }) => return inspect(&cli, pdf),
        Some(Command::ImagesToPdf {
            ref dir,
            ref output,
        }) => {
            let job = ImagesToPdfJob::with_defaults(dir.clone(), output.clone())
                .context("Failed to resolve image directory")?;
            let progress = progress_callback(show_progress, "images");
            match progress {
                Some(cb) => images_to_pdf_with(&job, &PrintPdfEncoder::default(), cb.as_ref()),
                None => images_to_pdf_with(
                    &job,
                    &PrintPdfEncoder::default(),
                    &pdfimg::NoopProgressCallback,
                ),
            }
        }
        Some(Command::PdfToDocx {
            ref pdf,
            ref output,
            scale,
            width,
        }) => {
            let mut builder = PdfToDocxConfig::builder()
                .scale(scale)
                .image_width_inches(width);
            if let Some(ref lib) = cli.pdfium_lib {
                builder = builder.pdfium_library(lib.clone());
            }
            if let Some(cb) = progress_callback(show_progress, "pages") {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;
            pdf_to_docx(pdf, output.as_deref(), config)
        }
    };

    report(&cli, &outcome)?;
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn progress_callback(show: bool, unit: &'static str) -> Option<ProgressCallback> {
    show.then(|| CliProgressCallback::new_dynamic(unit) as Arc<dyn ConversionProgressCallback>)
}

/// Print an outcome as JSON or as a one-line summary.
fn report(cli: &Cli, outcome: &ConversionOutcome) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(outcome).context("Failed to serialise outcome")?;
        println!("{json}");
    } else if outcome.success {
        if !cli.quiet {
            eprintln!("{}  {}", green("✔"), outcome.message);
        }
    } else {
        eprintln!("{}  {}", red("✘"), outcome.message);
    }
    Ok(())
}

fn inspect(cli: &Cli, pdf: &Path) -> Result<ExitCode> {
    render::check_pdf_magic(pdf).with_context(|| format!("Cannot inspect {}", pdf.display()))?;
    let pdfium =
        render::bind_pdfium(cli.pdfium_lib.as_deref()).context("Failed to load pdfium")?;
    let pages = render::page_count(&pdfium, pdf).context("Failed to open PDF")?;

    if cli.json {
        let meta = serde_json::json!({ "file": pdf, "pages": pages });
        println!(
            "{}",
            serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
        );
    } else {
        println!("File:   {}", pdf.display());
        println!("Pages:  {}", pages);
    }
    Ok(ExitCode::SUCCESS)
}

// ── Interactive shell ────────────────────────────────────────────────────────

const SHELL_HELP: &str = "\
commands:
  panel pdf|images        switch converter
  set <field> <value>     edit a field (fields: pdf, out, images, dest)
  browse <field> [path]   simulate a browse dialog; no path = cancelled
  scale <value>           render scale for PDF → Word (default 2)
  start                   run the visible converter (close any dialog first)
  about                   show the about dialog
  ok                      dismiss the dialog
  help                    this text
  quit                    exit";

fn parse_field(name: &str) -> Result<Field> {
    Ok(match name {
        "pdf" => Field::PdfPath,
        "out" => Field::OutputDir,
        "images" => Field::ImageDir,
        "dest" => Field::PdfOutput,
        other => bail!("unknown field '{other}' (pdf, out, images, dest)"),
    })
}

/// A browse dialog only offers directories for directory fields and files
/// for file fields. Paths that don't exist yet are accepted either way.
fn check_browse_kind(field: Field, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    match (field.is_directory(), path.is_dir()) {
        (true, false) => bail!("{} expects a directory: {}", field.label(), path.display()),
        (false, true) => bail!("{} expects a file: {}", field.label(), path.display()),
        _ => Ok(()),
    }
}

/// Map one input line to a shell event. `Ok(None)` means "no event" (blank
/// line or `help`).
fn parse_command(line: &str) -> Result<Option<ShellEvent>> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let event = match cmd {
        "" | "help" | "?" => return Ok(None),
        "panel" => match rest {
            "pdf" | "docx" => ShellEvent::SelectPanel(Panel::PdfToDocx),
            "images" | "img" => ShellEvent::SelectPanel(Panel::ImagesToPdf),
            other => bail!("unknown panel '{other}' (pdf, images)"),
        },
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            ShellEvent::EditField(parse_field(field)?, value.trim().to_string())
        }
        "browse" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let value = value.trim();
            let field = parse_field(field)?;
            let picked = (!value.is_empty()).then(|| PathBuf::from(value));
            if let Some(ref path) = picked {
                check_browse_kind(field, path)?;
            }
            ShellEvent::BrowseResult(field, picked)
        }
        "scale" => {
            let scale: f32 = rest
                .parse()
                .with_context(|| format!("invalid scale '{rest}'"))?;
            ShellEvent::SetScale(scale)
        }
        "start" | "run" => ShellEvent::StartConversion,
        "about" => ShellEvent::ShowAbout,
        "ok" | "dismiss" => ShellEvent::DismissDialog,
        "quit" | "exit" | "q" => ShellEvent::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(event))
}

fn run_shell(cli: &Cli, show_progress: bool) -> Result<ExitCode> {
    let runner = PipelineRunner {
        pdfium_library: cli.pdfium_lib.clone(),
        progress_callback: None,
    };
    let mut state = AppState::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", dim("type 'help' for commands"));
    print!("{}{} ", render_view(&state), cyan(">"));
    stdout.flush().context("Failed to flush stdout")?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match parse_command(&line) {
            Ok(Some(event)) => {
                // A fresh bar per run; the old one is finished.
                let runner = if show_progress && event == ShellEvent::StartConversion {
                    let unit = match state.panel {
                        Panel::PdfToDocx => "pages",
                        Panel::ImagesToPdf => "images",
                    };
                    PipelineRunner {
                        progress_callback: progress_callback(true, unit),
                        ..runner.clone()
                    }
                } else {
                    runner.clone()
                };
                state.handle(event, &runner);
                if state.quit_requested {
                    break;
                }
                print!("{}", render_view(&state));
            }
            Ok(None) if !line.trim().is_empty() => println!("{SHELL_HELP}"),
            Ok(None) => {}
            Err(e) => eprintln!("{} {e}", red("✘")),
        }
        print!("{} ", cyan(">"));
        stdout.flush().context("Failed to flush stdout")?;
    }

    Ok(ExitCode::SUCCESS)
}
