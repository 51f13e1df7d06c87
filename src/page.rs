use std::num::NonZeroUsize;

/// One page of a row sequence.
#[derive(Debug, PartialEq)]
pub struct Page<'s, T> {
    pub rows: &'s [T],
    pub index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Slices `[index * size, (index + 1) * size)` out of `rows`, clamped to
/// its length. An index past the end gives an empty page.
pub fn page<T>(rows: &[T], index: usize, size: NonZeroUsize) -> Page<'_, T> {
    let size = size.get();
    let start = index.saturating_mul(size).min(rows.len());
    let end = index
        .saturating_add(1)
        .saturating_mul(size)
        .min(rows.len());
    Page {
        rows: &rows[start..end],
        index,
        has_previous: index > 0,
        has_next: index.saturating_add(1).saturating_mul(size) < rows.len(),
    }
}

/// Number of pages needed for `len` rows; an empty sequence still has one
/// (empty) page.
pub fn page_count(len: usize, size: NonZeroUsize) -> usize {
    len.div_ceil(size.get()).max(1)
}

/// Pulls `index` back onto the last page when rows have shrunk.
pub fn clamp_page_index(index: usize, len: usize, size: NonZeroUsize) -> usize {
    index.min(page_count(len, size) - 1)
}
