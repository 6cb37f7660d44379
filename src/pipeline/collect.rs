//! Image discovery: recursively list allow-listed images under a directory.
//!
//! Extension matching is exact and case-sensitive: `photo.JPG` and
//! `scan.tif` are not picked up. Results are ordered by file stem so that
//! `001.png, 002.jpg, 010.bmp` land in the PDF in that order regardless of
//! extension or subdirectory.

use crate::error::ConvertError;
use crate::output::ImageFileSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extensions (without the dot) accepted by the collector.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// Whether the file name ends in `.` plus one of the
/// [`SUPPORTED_EXTENSIONS`], exact case.
///
/// Matches on the name suffix rather than [`Path::extension`], so a file
/// named just `.png` counts as a PNG.
pub fn is_supported_image(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Collect every supported image under `root`, recursively.
///
/// Symlinked directories are not followed. Subdirectories that cannot be
/// read are skipped with a warning; a missing or unreadable `root` is an
/// error.
pub fn collect_images(root: &Path) -> Result<ImageFileSet, ConvertError> {
    if !root.is_dir() {
        return Err(ConvertError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    walk(root, &mut files, true)?;

    // Full-path order first so equal stems keep a deterministic order.
    files.sort();
    files.sort_by(|a, b| a.file_stem().cmp(&b.file_stem()));

    info!("Found {} image(s) under {}", files.len(), root.display());
    Ok(ImageFileSet::from_sorted(files))
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>, is_root: bool) -> Result<(), ConvertError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if is_root => {
            return Err(ConvertError::Internal(format!(
                "cannot read '{}': {e}",
                dir.display()
            )))
        }
        Err(e) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return Ok(());
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            walk(&path, out, false)?;
        } else if is_supported_image(&path) && path.is_file() {
            debug!("Matched image {}", path.display());
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let p = dir.join(rel);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(p, b"x").unwrap();
    }

    fn names(set: &ImageFileSet) -> Vec<String> {
        set.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn extension_match_is_exact_case() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.tiff")));
        assert!(!is_supported_image(Path::new("a.JPG")));
        assert!(!is_supported_image(Path::new("a.tif")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("jpg")));
        assert!(!is_supported_image(Path::new("a.jpg.bak")));
    }

    #[test]
    fn bare_dot_extension_name_is_matched() {
        assert!(is_supported_image(Path::new(".png")));
        assert!(is_supported_image(Path::new("dir/.jpeg")));
        assert!(!is_supported_image(Path::new(".PNG")));
        assert!(!is_supported_image(Path::new(".hidden")));

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".png");
        touch(tmp.path(), "a.jpg");
        let set = collect_images(tmp.path()).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn filters_and_sorts_by_stem_across_subdirs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "c.png");
        touch(tmp.path(), "sub/a.jpeg");
        touch(tmp.path(), "b.bmp");
        touch(tmp.path(), "d.tiff");
        touch(tmp.path(), "e.JPG");
        touch(tmp.path(), "f.gif");
        touch(tmp.path(), "notes.txt");

        let set = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&set), vec!["a.jpeg", "b.bmp", "c.png", "d.tiff"]);
    }

    #[test]
    fn stem_order_ignores_extension() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "page10.jpg");
        touch(tmp.path(), "page02.png");
        touch(tmp.path(), "page1.bmp");

        let set = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&set), vec!["page02.png", "page1.bmp", "page10.jpg"]);
    }

    #[test]
    fn equal_stems_are_deterministic() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "x.png");
        touch(tmp.path(), "x.jpg");
        let first = collect_images(tmp.path()).unwrap();
        let second = collect_images(tmp.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["x.jpg", "x.png"]);
    }

    #[test]
    fn empty_dir_yields_empty_set() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "readme.md");
        let set = collect_images(tmp.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = collect_images(&tmp.path().join("nope")).unwrap_err();
        assert!(err.is_input_not_found());
    }
}
