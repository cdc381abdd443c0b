//! In-process PDF optimization using lopdf

use std::path::Path;
use lopdf::Object;
use crate::error::Result;
use super::metadata::load_document;

/// What the in-process rewrite removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Pages visited
    pub page_count: usize,
    /// Empty streams dropped
    pub empty_streams_removed: usize,
    /// Objects no longer reachable from the trailer
    pub objects_pruned: usize,
}

/// Load `input`, rewrite it compactly and save it to `output`
///
/// `progress` receives a percentage after each page and a final 100.
/// Each page's content streams are deflated during the page pass; the
/// remaining cleanup (empty streams, unreachable objects, renumbering and
/// compressing everything else) runs once the pass is done.
///
/// # Example
///
/// ```no_run
/// use pdf_optimize::pdf::optimize_pdf;
/// use std::path::Path;
///
/// optimize_pdf(Path::new("in.pdf"), Path::new("out.pdf"), &mut |pct| {
///     eprint!("\r{pct}%");
/// }).expect("Failed to optimize");
/// ```
pub fn optimize_pdf(
    input: &Path,
    output: &Path,
    progress: &mut dyn FnMut(u8),
) -> Result<OptimizeStats> {
    let (mut doc, _) = load_document(input)?;

    let pages = doc.get_pages();
    let page_count = pages.len();
    log::info!("Optimizing {} ({} pages)", input.display(), page_count);

    for (index, page_id) in pages.values().enumerate() {
        for content_id in doc.get_page_contents(*page_id) {
            if let Ok(Object::Stream(stream)) = doc.get_object_mut(content_id) {
                if stream.allows_compression {
                    if let Err(e) = stream.compress() {
                        log::debug!("Leaving content stream {:?} as is: {}", content_id, e);
                    }
                }
            }
        }
        progress(page_percent(index + 1, page_count));
    }

    let empty_streams_removed = doc.delete_zero_length_streams().len();
    let objects_pruned = doc.prune_objects().len();
    doc.renumber_objects();
    doc.compress();

    doc.save(output)?;
    progress(100);

    log::debug!(
        "Removed {} empty streams and {} unreachable objects",
        empty_streams_removed,
        objects_pruned
    );

    Ok(OptimizeStats {
        page_count,
        empty_streams_removed,
        objects_pruned,
    })
}

/// Percentage after `done` of `total` steps, clamped to 0..=100
pub(crate) fn page_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}
