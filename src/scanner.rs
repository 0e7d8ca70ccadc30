//! Input discovery for batch conversion.
//!
//! Expands directory arguments into the image files they contain.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File extensions accepted as input images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Check whether a path looks like a supported image by extension.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand inputs: files are kept as given, directories are walked
/// recursively for image files (sorted for stable output order).
pub fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut result = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| is_image_path(p))
                .collect();
            found.sort();
            result.extend(found);
        } else {
            result.push(input.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("cat.png")));
        assert!(is_image_path(Path::new("dir/cat.JPG")));
        assert!(is_image_path(Path::new("a.jpeg")));
        assert!(is_image_path(Path::new("a.gif")));
        assert!(is_image_path(Path::new("a.bmp")));
        assert!(!is_image_path(Path::new("a.txt")));
        assert!(!is_image_path(Path::new("noext")));
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("nested/c.gif"), b"").unwrap();

        let found = collect_inputs(&[dir.path().to_path_buf()]);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.png", "nested/c.gif"]);
    }

    #[test]
    fn test_collect_keeps_explicit_files() {
        // Explicit files pass through even with odd extensions; decoding decides
        let inputs = vec![PathBuf::from("photo.webp"), PathBuf::from("x.png")];
        assert_eq!(collect_inputs(&inputs), inputs);
    }
}
