//! Search over rendered document lines.
//!
//! Matching is a case-insensitive substring test against lines that have
//! already had their escape sequences stripped.

/// Indices of the lines containing `query`, in document order.
///
/// An empty query matches every line.
pub fn compute_matches<S: AsRef<str>>(lines: &[S], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_ref().to_lowercase().contains(&query))
        .map(|(idx, _)| idx)
        .collect()
}

/// Advance a match cursor by one, wrapping at `count`.
pub const fn next_match(index: usize, count: usize) -> usize {
    if count == 0 { 0 } else { (index + 1) % count }
}

/// Step a match cursor back by one, wrapping at zero.
pub const fn previous_match(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (index + count - 1) % count
    }
}
