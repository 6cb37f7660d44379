//! Data produced by the conversion pipelines.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordered set of image files feeding the Image→PDF pipeline.
///
/// Built by [`crate::pipeline::collect::collect_images`], which guarantees
/// the allow-list filter and stem ordering. May be empty; the pipeline
/// refuses to encode an empty set. Serialise-only: a set cannot be built
/// from outside the collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageFileSet {
    files: Vec<PathBuf>,
}

impl ImageFileSet {
    pub(crate) fn from_sorted(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a ImageFileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// One rasterised PDF page on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Path of the written `page_<n>.png`.
    pub image_path: PathBuf,
}

impl RenderedPage {
    /// File name used for page `page_num` (1-indexed, no zero padding).
    pub fn file_name(page_num: usize) -> String {
        format!("page_{page_num}.png")
    }
}

/// Timing and counts for a finished conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Images combined (Image→PDF) or pages rendered (PDF→Document).
    pub pages: usize,
    pub total_duration_ms: u64,
}

/// Result of a successful PDF→Document conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocxConversionOutput {
    pub docx_path: PathBuf,
    /// Directory holding the intermediate `page_<n>.png` files. Not cleaned up.
    pub image_dir: PathBuf,
    pub pages: Vec<RenderedPage>,
    pub stats: ConversionStats,
}

/// Data-only verdict of one conversion attempt.
///
/// This is what the shell and CLI branch on: no error propagation crosses
/// this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub success: bool,
    pub message: String,
    /// Set on success; the artifact the user should open.
    pub output_path: Option<PathBuf>,
}

impl ConversionOutcome {
    pub fn succeeded(message: impl Into<String>, output_path: impl AsRef<Path>) -> Self {
        Self {
            success: true,
            message: message.into(),
            output_path: Some(output_path.as_ref().to_path_buf()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            output_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_file_name_is_not_padded() {
        assert_eq!(RenderedPage::file_name(1), "page_1.png");
        assert_eq!(RenderedPage::file_name(12), "page_12.png");
    }

    #[test]
    fn outcome_constructors() {
        let ok = ConversionOutcome::succeeded("done", "/tmp/out.pdf");
        assert!(ok.success);
        assert_eq!(ok.output_path.as_deref(), Some(Path::new("/tmp/out.pdf")));

        let bad = ConversionOutcome::failed("nope");
        assert!(!bad.success);
        assert!(bad.output_path.is_none());
    }

    #[test]
    fn outcome_serialises_to_json() {
        let ok = ConversionOutcome::succeeded("done", "/tmp/out.pdf");
        let json = serde_json::to_string(&ok).expect("serialise");
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("out.pdf"));
    }

    #[test]
    fn image_file_set_serialises_in_collected_order() {
        let set = ImageFileSet::from_sorted(vec![PathBuf::from("b/01.png"), PathBuf::from("a/02.jpg")]);
        let json = serde_json::to_string(&set).expect("serialise");
        assert_eq!(json, r#"{"files":["b/01.png","a/02.jpg"]}"#);
    }
}
