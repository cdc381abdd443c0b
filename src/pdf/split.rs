//! Splitting a PDF into fixed-size parts

use std::path::{Path, PathBuf};
use crate::config::MAX_PAGES_PER_FILE;
use crate::error::{Error, Result};
use crate::paths::split_part_path;
use super::metadata::load_document;
use super::optimize::page_percent;

/// Page ranges (1-based, inclusive) for splitting `page_count` pages into
/// chunks of `pages_per_file`
///
/// The last range holds whatever is left over.
pub fn part_ranges(page_count: u32, pages_per_file: u32) -> Vec<(u32, u32)> {
    if pages_per_file == 0 {
        return Vec::new();
    }
    (1..=page_count)
        .step_by(pages_per_file as usize)
        .map(|first| (first, (first + pages_per_file - 1).min(page_count)))
        .collect()
}

/// Split `input` into files of `pages_per_file` pages inside `output_dir`
///
/// Parts are named `<stem>_partK.pdf` after the input, with K starting at 1.
/// Existing parts with the same names are replaced. Returns the written
/// paths in page order. `progress` receives a percentage after each part is
/// saved.
pub fn split_pdf(
    input: &Path,
    pages_per_file: usize,
    output_dir: &Path,
    progress: &mut dyn FnMut(u8),
) -> Result<Vec<PathBuf>> {
    if pages_per_file == 0 || pages_per_file > MAX_PAGES_PER_FILE {
        return Err(Error::InvalidPagesPerFile(pages_per_file));
    }

    let (doc, _) = load_document(input)?;
    let all_pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let page_count = all_pages.len() as u32;

    std::fs::create_dir_all(output_dir)?;

    let ranges = part_ranges(page_count, pages_per_file as u32);
    log::info!(
        "Splitting {} ({} pages) into {} parts",
        input.display(),
        page_count,
        ranges.len()
    );

    let mut outputs = Vec::with_capacity(ranges.len());
    for (index, &(first, last)) in ranges.iter().enumerate() {
        let delete: Vec<u32> = all_pages
            .iter()
            .copied()
            .filter(|p| *p < first || *p > last)
            .collect();

        let mut part = doc.clone();
        part.delete_pages(&delete);
        part.prune_objects();
        part.renumber_objects();
        part.compress();

        let path = split_part_path(output_dir, input, index + 1);
        part.save(&path)?;
        log::debug!("Wrote pages {}-{} to {}", first, last, path.display());

        outputs.push(path);
        progress(page_percent(index + 1, ranges.len()));
    }

    Ok(outputs)
}
