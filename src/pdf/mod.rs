//! PDF manipulation module

pub mod metadata;
pub mod optimize;
pub mod split;

// Re-export commonly used items
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
pub use optimize::{optimize_pdf, OptimizeStats};
pub use split::{part_ranges, split_pdf};
