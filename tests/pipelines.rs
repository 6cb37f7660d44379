//! Integration tests for both pipelines.
//!
//! Image→PDF tests run everywhere: produced PDFs are checked with `lopdf`.
//! PDF→Document tests need the native pdfium library and skip themselves
//! when it cannot be bound.
//!
//! Run the pdfium-backed tests with:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test pipelines -- --nocapture

use image::{Rgb, RgbImage};
use pdfimg::pipeline::render::bind_pdfium;
use pdfimg::{
    collect_images, images_to_pdf, pdf_to_docx, ConvertError, ImagesToPdfJob, PdfToDocxConfig,
    PdfToDocxJob, RenderedPage, DOCX_FILE_NAME, PAGE_IMAGE_DIR,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn write_image(path: &Path, w: u32, h: u32, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(w, h, Rgb(rgb)).save(path).unwrap();
}

fn pdf_page_count(path: &Path) -> usize {
    lopdf::Document::load(path)
        .expect("output should be a valid PDF")
        .get_pages()
        .len()
}

fn number(obj: &lopdf::Object) -> f32 {
    match obj {
        lopdf::Object::Integer(i) => *i as f32,
        lopdf::Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

/// MediaBox width of every page, in page order.
fn pdf_page_widths(path: &Path) -> Vec<f32> {
    let doc = lopdf::Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let mediabox = page.get(b"MediaBox").unwrap().as_array().unwrap();
            number(&mediabox[2]) - number(&mediabox[0])
        })
        .collect()
}

/// Build a PDF with one page per `(w, h)` pixel size via the Image→PDF
/// pipeline. Pages come out at 96 DPI: 96 px = 72 pt.
fn make_pdf(dir: &Path, sizes: &[(u32, u32)]) -> PathBuf {
    let src = dir.join("src_images");
    for (i, &(w, h)) in sizes.iter().enumerate() {
        write_image(&src.join(format!("{:02}.png", i + 1)), w, h, [200, 30, 30]);
    }
    let pdf = dir.join("input.pdf");
    let outcome = images_to_pdf(&ImagesToPdfJob::new(&src, &pdf));
    assert!(outcome.success, "{}", outcome.message);
    pdf
}

/// Skip the test when no pdfium library can be bound.
macro_rules! skip_unless_pdfium {
    () => {{
        if let Err(e) = bind_pdfium(None) {
            println!("SKIP — pdfium not available: {e}");
            println!("       Set PDFIUM_LIB_PATH to run this test");
            return;
        }
    }};
}

fn read_zip_part(docx: &Path, name: &str) -> String {
    let file = std::fs::File::open(docx).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut out = String::new();
    part.read_to_string(&mut out).unwrap();
    out
}

// ── ImageCollector ───────────────────────────────────────────────────────────

#[test]
fn collector_finds_only_supported_lowercase_extensions() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_image(&root.join("a.png"), 4, 4, [0, 0, 0]);
    write_image(&root.join("nested/deeper/b.jpg"), 4, 4, [0, 0, 0]);
    write_image(&root.join("c.bmp"), 4, 4, [0, 0, 0]);
    std::fs::write(root.join("notes.txt"), b"hello").unwrap();
    std::fs::write(root.join("SHOUT.PNG"), b"not matched").unwrap();
    std::fs::write(root.join("photo.gif"), b"gif").unwrap();

    let set = collect_images(root).unwrap();
    let names: Vec<String> = set
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.jpg", "c.bmp"]);
}

#[test]
fn collector_sorts_by_stem_not_by_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_image(&root.join("z_dir/01.png"), 4, 4, [0, 0, 0]);
    write_image(&root.join("a_dir/03.png"), 4, 4, [0, 0, 0]);
    write_image(&root.join("02.jpg"), 4, 4, [0, 0, 0]);

    let set = collect_images(root).unwrap();
    let stems: Vec<String> = set
        .iter()
        .map(|p| p.file_stem().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(stems, vec!["01", "02", "03"]);
}

#[test]
fn collector_empty_dir_is_empty_set() {
    let tmp = TempDir::new().unwrap();
    let set = collect_images(tmp.path()).unwrap();
    assert!(set.is_empty());
}

// ── Image → PDF ──────────────────────────────────────────────────────────────

#[test]
fn images_to_pdf_one_page_per_image_in_stem_order() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    // Distinct widths identify the pages: 96 px → 72 pt, 192 px → 144 pt, …
    write_image(&root.join("b/2.png"), 192, 10, [0, 255, 0]);
    write_image(&root.join("a/3.jpg"), 288, 10, [0, 0, 255]);
    write_image(&root.join("1.bmp"), 96, 10, [255, 0, 0]);

    let job = ImagesToPdfJob::with_defaults(Some(root.to_path_buf()), None).unwrap();
    let outcome = job.convert();

    assert!(outcome.success, "{}", outcome.message);
    let pdf = root.join("combined_images.pdf");
    assert_eq!(outcome.output_path.as_deref(), Some(pdf.as_path()));
    assert_eq!(pdf_page_count(&pdf), 3);

    let widths = pdf_page_widths(&pdf);
    let expected = [72.0, 144.0, 216.0];
    for (got, want) in widths.iter().zip(expected) {
        assert!((got - want).abs() < 1.0, "page widths {widths:?}");
    }
}

#[test]
fn images_to_pdf_without_images_is_failure_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("readme.txt"), b"no images here").unwrap();
    let dest = tmp.path().join("out.pdf");

    let outcome = images_to_pdf(&ImagesToPdfJob::new(tmp.path(), &dest));
    assert!(!outcome.success);
    assert!(outcome.output_path.is_none());
    assert!(!dest.exists());
}

#[test]
fn images_to_pdf_unwritable_destination_is_failure() {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("a.png"), 8, 8, [1, 2, 3]);

    // Destination is an existing directory.
    let dest_dir = tmp.path().join("taken");
    std::fs::create_dir(&dest_dir).unwrap();
    let outcome = images_to_pdf(&ImagesToPdfJob::new(tmp.path(), &dest_dir));
    assert!(!outcome.success);
    assert!(outcome.message.contains("taken"));

    // Destination's parent is a regular file.
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let outcome = images_to_pdf(&ImagesToPdfJob::new(tmp.path(), blocker.join("out.pdf")));
    assert!(!outcome.success);
}

#[test]
fn images_to_pdf_missing_dir_is_failure() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let outcome = images_to_pdf(&ImagesToPdfJob::new(&missing, tmp.path().join("o.pdf")));
    assert!(!outcome.success);
    assert!(outcome.message.contains("nope"));
}

#[test]
fn images_to_pdf_job_can_be_retargeted() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    write_image(&first.join("a.png"), 8, 8, [0, 0, 0]);
    write_image(&second.join("a.png"), 8, 8, [0, 0, 0]);
    write_image(&second.join("b.png"), 8, 8, [0, 0, 0]);

    let mut job = ImagesToPdfJob::new(&first, tmp.path().join("one.pdf"));
    assert!(job.convert().success);
    assert_eq!(pdf_page_count(&tmp.path().join("one.pdf")), 1);

    job.set_image_dir(&second);
    job.set_pdf_path(tmp.path().join("two.pdf"));
    assert!(job.convert().success);
    assert_eq!(pdf_page_count(&tmp.path().join("two.pdf")), 2);
}

// ── PDF → Document (no pdfium needed) ────────────────────────────────────────

#[test]
fn missing_pdf_fails_before_creating_directories() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");

    let err = PdfToDocxJob::new(
        tmp.path().join("ghost.pdf"),
        Some(&out),
        PdfToDocxConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ConvertError::FileNotFound { .. }));
    assert!(err.is_input_not_found());
    assert!(!out.exists());
}

#[test]
fn non_pdf_input_is_failure_outcome() {
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.pdf");
    std::fs::write(&fake, b"GIF89a not a pdf").unwrap();

    let outcome = pdf_to_docx(&fake, None, PdfToDocxConfig::default());
    assert!(!outcome.success);
    assert!(!tmp.path().join(DOCX_FILE_NAME).exists());
}

// ── PDF → Document (pdfium) ──────────────────────────────────────────────────

#[test]
fn pdf_to_docx_renders_every_page_and_assembles_document() {
    skip_unless_pdfium!();
    let tmp = TempDir::new().unwrap();
    let pdf = make_pdf(tmp.path(), &[(96, 192), (192, 96), (96, 96)]);
    let out = tmp.path().join("out");

    let job = PdfToDocxJob::new(&pdf, Some(&out), PdfToDocxConfig::default()).unwrap();
    let output = job.convert().unwrap();

    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.stats.pages, 3);
    for (i, page) in output.pages.iter().enumerate() {
        assert_eq!(page.page_num, i + 1);
        assert_eq!(
            page.image_path.file_name().unwrap().to_string_lossy(),
            RenderedPage::file_name(i + 1)
        );
        assert!(page.image_path.starts_with(job.image_dir()));
        assert!(page.image_path.is_file(), "page images are kept");
    }

    let xml = read_zip_part(&output.docx_path, "word/document.xml");
    assert_eq!(xml.matches(r#"w:val="Heading1""#).count(), 3);
    assert_eq!(xml.matches("<w:drawing>").count(), 3);
    let p1 = xml.find("Page 1").unwrap();
    let p2 = xml.find("Page 2").unwrap();
    let p3 = xml.find("Page 3").unwrap();
    assert!(p1 < p2 && p2 < p3);
}

#[test]
fn rendered_pages_are_scale_times_point_size() {
    skip_unless_pdfium!();
    let tmp = TempDir::new().unwrap();
    // 96 × 192 px at 96 DPI → 72 × 144 pt page.
    let pdf = make_pdf(tmp.path(), &[(96, 192)]);

    let config = PdfToDocxConfig::builder().scale(2.0).build().unwrap();
    let output = PdfToDocxJob::new(&pdf, None, config).unwrap().convert().unwrap();

    let (w, h) = image::image_dimensions(&output.pages[0].image_path).unwrap();
    assert!((w as i64 - 144).abs() <= 1, "width {w}");
    assert!((h as i64 - 288).abs() <= 1, "height {h}");
}

#[test]
fn pdf_to_docx_defaults_output_to_pdf_directory() {
    skip_unless_pdfium!();
    let tmp = TempDir::new().unwrap();
    let pdf = make_pdf(tmp.path(), &[(96, 96), (96, 96)]);

    let outcome = pdf_to_docx(&pdf, None, PdfToDocxConfig::default());
    assert!(outcome.success, "{}", outcome.message);

    let dir = pdf.parent().unwrap().canonicalize().unwrap();
    assert_eq!(
        outcome.output_path.unwrap().canonicalize().unwrap(),
        dir.join(DOCX_FILE_NAME)
    );
    assert!(dir.join(PAGE_IMAGE_DIR).join("page_1.png").is_file());
    assert!(dir.join(PAGE_IMAGE_DIR).join("page_2.png").is_file());
    assert!(!dir.join(PAGE_IMAGE_DIR).join("page_3.png").exists());
}

#[test]
fn images_roundtrip_through_pdf_and_docx() {
    skip_unless_pdfium!();
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("scans");
    // Written out of stem order, each with a distinct size:
    // 01 → 96×192 px, 02 → 96×96 px, 03 → 192×96 px, 04 → 48×144 px.
    write_image(&src.join("02.png"), 96, 96, [10, 10, 10]);
    write_image(&src.join("nested/04.jpg"), 48, 144, [40, 40, 40]);
    write_image(&src.join("03.bmp"), 192, 96, [30, 30, 30]);
    write_image(&src.join("01.png"), 96, 192, [20, 20, 20]);

    let pdf = tmp.path().join("combined.pdf");
    let outcome = images_to_pdf(&ImagesToPdfJob::new(&src, &pdf));
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(pdf_page_count(&pdf), 4);

    let output = PdfToDocxJob::new(&pdf, Some(&tmp.path().join("docx")), PdfToDocxConfig::default())
        .unwrap()
        .convert()
        .unwrap();
    assert_eq!(output.pages.len(), 4);

    // 96 DPI pages rendered at scale 2: every pixel size comes back as
    // 1.5× the source image.
    let expected = [(144, 288), (144, 144), (288, 144), (72, 216)];
    for (page, (want_w, want_h)) in output.pages.iter().zip(expected) {
        assert_eq!(
            page.image_path.file_name().unwrap().to_string_lossy(),
            RenderedPage::file_name(page.page_num)
        );
        let (w, h) = image::image_dimensions(&page.image_path).unwrap();
        assert!(
            (w as i64 - want_w).abs() <= 1 && (h as i64 - want_h).abs() <= 1,
            "page {} is {w}x{h}, expected {want_w}x{want_h}",
            page.page_num
        );
    }

    let file = std::fs::File::open(&output.docx_path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let media = archive
        .file_names()
        .filter(|n| n.starts_with("word/media/"))
        .count();
    assert_eq!(media, 4);
}
