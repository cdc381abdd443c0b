//! Default settings

/// Default number of pages in each split part
pub const DEFAULT_PAGES_PER_FILE: usize = 10;

/// Largest accepted pages-per-file value
pub const MAX_PAGES_PER_FILE: usize = 10_000;

/// Suffix appended to the input stem for the default output file
pub const OPTIMIZED_SUFFIX: &str = "_optimized";

/// Suffix (followed by the 1-based part number) for split outputs
pub const PART_SUFFIX: &str = "_part";

/// Environment variable that overrides the Ghostscript executable
pub const GHOSTSCRIPT_ENV: &str = "PDF_OPTIMIZE_GS";

/// Ghostscript console executable for this platform
#[cfg(target_os = "windows")]
pub const DEFAULT_GHOSTSCRIPT: &str = "gswin64c.exe";

/// Ghostscript console executable for this platform
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_GHOSTSCRIPT: &str = "gs";
