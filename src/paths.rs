//! Output naming and path checks

use std::path::{Path, PathBuf};

use crate::config::{OPTIMIZED_SUFFIX, PART_SUFFIX};

/// Whether the path has a `.pdf` extension (any case)
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Default output path for an input: `<dir>/<stem>_optimized.pdf`
///
/// # Example
///
/// ```
/// use pdf_optimize::paths::default_output_path;
/// use std::path::Path;
///
/// let out = default_output_path(Path::new("docs/report.pdf"));
/// assert_eq!(out, Path::new("docs/report_optimized.pdf"));
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    parent_dir(input).join(format!("{}{}.pdf", file_stem(input), OPTIMIZED_SUFFIX))
}

/// Path of the `part`-th split output (1-based): `<dir>/<stem>_partK.pdf`
pub fn split_part_path(output_dir: &Path, input: &Path, part: usize) -> PathBuf {
    output_dir.join(format!("{}{}{}.pdf", file_stem(input), PART_SUFFIX, part))
}

/// Directory that receives split parts for a given output path
///
/// A path without a `.pdf` extension is taken to be the directory itself.
pub fn split_output_dir(output: &Path) -> PathBuf {
    if is_pdf_path(output) {
        parent_dir(output)
    } else {
        output.to_path_buf()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Whether two paths name the same file
pub fn same_file(a: &Path, b: &Path) -> bool {
    absolute(a) == absolute(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_path() {
        assert!(is_pdf_path(Path::new("a.pdf")));
        assert!(is_pdf_path(Path::new("dir/B.PDF")));
        assert!(!is_pdf_path(Path::new("notes.txt")));
        assert!(!is_pdf_path(Path::new("pdf")));
    }

    #[test]
    fn test_default_output_path_bare_filename() {
        assert_eq!(default_output_path(Path::new("scan.pdf")), Path::new("./scan_optimized.pdf"));
    }

    #[test]
    fn test_split_part_path() {
        let path = split_part_path(Path::new("out"), Path::new("in/book.pdf"), 3);
        assert_eq!(path, Path::new("out/book_part3.pdf"));
    }

    #[test]
    fn test_split_output_dir() {
        assert_eq!(split_output_dir(Path::new("out/book.pdf")), Path::new("out"));
        assert_eq!(split_output_dir(Path::new("parts")), Path::new("parts"));
    }

    #[test]
    fn test_same_file() {
        assert!(same_file(Path::new("missing.pdf"), Path::new("missing.pdf")));
        assert!(!same_file(Path::new("a.pdf"), Path::new("b.pdf")));
    }
}
