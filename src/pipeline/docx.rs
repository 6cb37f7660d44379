//! Page document assembly: rendered page images → `.docx`.
//!
//! A `.docx` is a zip archive of XML parts tied together by relationship
//! files. We write the smallest package Word and LibreOffice open cleanly:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml
//! word/document.xml
//! word/styles.xml
//! word/_rels/document.xml.rels
//! word/media/image<n>.png
//! ```
//!
//! The body is a `Title` paragraph followed by, for each page, a `Heading1`
//! paragraph `Page <n>`, a paragraph holding the inline picture, and an empty
//! paragraph. Page breaks are left to the word processor.

use crate::error::ConvertError;
use crate::output::RenderedPage;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// English Metric Units per inch (DrawingML length unit).
pub const EMU_PER_INCH: i64 = 914_400;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Text and sizing of the assembled document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocxLayout {
    pub title: String,
    /// Display width of every page image, in inches. Height follows the
    /// image's aspect ratio.
    pub image_width_inches: f32,
}

/// Heading text for page `page_num` (1-indexed).
pub fn page_heading(page_num: usize) -> String {
    format!("Page {page_num}")
}

/// One page ready to be placed: relationship id, media name and extent.
struct PlacedImage {
    page_num: usize,
    rel_id: String,
    media_name: String,
    source: PathBuf,
    width_emu: i64,
    height_emu: i64,
}

/// Build the document and write it to `docx_path`.
///
/// The file is written in place; a failure midway leaves a truncated file.
pub fn assemble_document(
    pages: &[RenderedPage],
    docx_path: &Path,
    layout: &DocxLayout,
) -> Result<(), ConvertError> {
    info!("Generating document with {} page(s)", pages.len());

    let placed = place_images(pages, layout)?;

    let write_err = |detail: String| ConvertError::DocumentWriteFailed {
        path: docx_path.to_path_buf(),
        detail,
    };

    let file = File::create(docx_path).map_err(|e| write_err(e.to_string()))?;
    DocxPackage::new(file)
        .write_all_parts(&placed, layout)
        .map_err(|e| write_err(e.to_string()))?;

    info!("Document saved: {}", docx_path.display());
    Ok(())
}

fn place_images(pages: &[RenderedPage], layout: &DocxLayout) -> Result<Vec<PlacedImage>, ConvertError> {
    let width_emu = (layout.image_width_inches as f64 * EMU_PER_INCH as f64).round() as i64;

    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let (w, h) = image::image_dimensions(&page.image_path).map_err(|e| {
                ConvertError::ImageDecodeFailed {
                    path: page.image_path.clone(),
                    detail: e.to_string(),
                }
            })?;
            let height_emu = if w == 0 {
                0
            } else {
                (width_emu as f64 * h as f64 / w as f64).round() as i64
            };
            Ok(PlacedImage {
                page_num: page.page_num,
                // rId1 is reserved for styles.xml.
                rel_id: format!("rId{}", i + 2),
                media_name: format!("image{}.png", i + 1),
                source: page.image_path.clone(),
                width_emu,
                height_emu,
            })
        })
        .collect()
}

/// Zip writer wrapper that knows the package layout.
struct DocxPackage<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> DocxPackage<W> {
    fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    /// Write every part and finish the archive.
    fn write_all_parts(
        mut self,
        placed: &[PlacedImage],
        layout: &DocxLayout,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write_text("[Content_Types].xml", &content_types_xml())?;
        self.write_text("_rels/.rels", &root_rels_xml())?;
        self.write_text("docProps/core.xml", &core_xml(&layout.title))?;
        self.write_text("word/styles.xml", STYLES_XML)?;
        self.write_text("word/_rels/document.xml.rels", &document_rels_xml(placed))?;
        self.write_text("word/document.xml", &document_xml(placed, layout))?;

        for img in placed {
            let bytes = std::fs::read(&img.source)?;
            self.write_binary(&format!("word/media/{}", img.media_name), &bytes)?;
            debug!("Embedded {} as {}", img.source.display(), img.media_name);
        }

        self.zip.finish()?;
        Ok(())
    }

    fn write_text(&mut self, name: &str, content: &str) -> zip::result::ZipResult<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(name, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_binary(&mut self, name: &str, data: &[u8]) -> zip::result::ZipResult<()> {
        // PNG is already compressed.
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip.start_file(name, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }
}

// ── XML parts ────────────────────────────────────────────────────────────

fn content_types_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#
        .to_string()
}

fn root_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="{REL_OFFICE_DOCUMENT}" Target="word/document.xml"/>
<Relationship Id="rId2" Type="{REL_CORE_PROPERTIES}" Target="docProps/core.xml"/>
</Relationships>"#
    )
}

fn core_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>{}</dc:title>
<dc:creator>pdfimg</dc:creator>
</cp:coreProperties>"#,
        escape_xml(title)
    )
}

fn document_rels_xml(placed: &[PlacedImage]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{REL_STYLES}" Target="styles.xml"/>"#
    ));
    xml.push('\n');
    for img in placed {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{REL_IMAGE}" Target="media/{}"/>"#,
            img.rel_id, img.media_name
        ));
        xml.push('\n');
    }
    xml.push_str("</Relationships>");
    xml
}

fn document_xml(placed: &[PlacedImage], layout: &DocxLayout) -> String {
    let mut body = String::new();
    body.push_str(&styled_paragraph("Title", &layout.title));

    for (i, img) in placed.iter().enumerate() {
        body.push_str(&styled_paragraph("Heading1", &page_heading(img.page_num)));
        body.push_str("<w:p><w:r>");
        body.push_str(&inline_drawing(img, i + 1));
        body.push_str("</w:r></w:p>");
        body.push_str("<w:p/>");
    }

    // Letter portrait with 1" margins leaves 6.5" of text width.
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
<w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body>
</w:document>"#
    )
}

fn styled_paragraph(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml(text)
    )
}

/// `<w:drawing>` for one inline picture. `doc_pr_id` must be unique in the document.
fn inline_drawing(img: &PlacedImage, doc_pr_id: usize) -> String {
    format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="{name}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        cx = img.width_emu,
        cy = img.height_emu,
        id = doc_pr_id,
        name = escape_xml(&img.media_name),
        rel = img.rel_id,
    )
}

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:sz w:val="56"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
</w:styles>"#;

/// Escape XML special characters for text and attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
