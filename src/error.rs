//! Error types for the PDF optimize library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF optimize library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input does not have a .pdf extension
    #[error("Not a PDF file: {}", .0.display())]
    NotPdf(PathBuf),

    /// No output path was given and none could be derived
    #[error("No output path selected")]
    OutputPathMissing,

    /// Output exists and overwriting was not allowed
    #[error("Output file already exists: {} (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    /// Split chunk size out of range
    #[error("Pages per file must be between 1 and 10000, got {0}")]
    InvalidPagesPerFile(usize),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Ghostscript could not be started
    #[error("Failed to run Ghostscript ({program}): {source}")]
    GhostscriptLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Ghostscript ran but exited with a failure status
    #[error("Ghostscript failed (exit code {}): {stderr}", exit_code_label(.code))]
    GhostscriptFailed { code: Option<i32>, stderr: String },

    /// Writing over the original failed and it could not be put back
    #[error("{cause}; the original file was preserved at {}", .path.display())]
    OriginalPreserved { path: PathBuf, cause: String },

    /// General error
    #[error("{0}")]
    General(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghostscript_failed_message_includes_code_and_stderr() {
        let err = Error::GhostscriptFailed {
            code: Some(1),
            stderr: "Unrecoverable error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Ghostscript failed (exit code 1): Unrecoverable error"
        );
    }

    #[test]
    fn test_ghostscript_failed_without_code() {
        let err = Error::GhostscriptFailed { code: None, stderr: String::new() };
        assert!(err.to_string().contains("exit code unknown"));
    }

    #[test]
    fn test_original_preserved_names_kept_copy() {
        let err = Error::OriginalPreserved {
            path: PathBuf::from("/tmp/pdf-optimize-1.pdf"),
            cause: "Ghostscript failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Ghostscript failed; the original file was preserved at /tmp/pdf-optimize-1.pdf"
        );
    }

    #[test]
    fn test_invalid_pages_message_mentions_limit() {
        let err = Error::InvalidPagesPerFile(0);
        assert_eq!(err.to_string(), "Pages per file must be between 1 and 10000, got 0");
    }
}
