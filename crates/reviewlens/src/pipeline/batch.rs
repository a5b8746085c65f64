use std::ops::Range;

/// Splits `len` rows into consecutive ranges of `batch_size`; the last range
/// may be shorter. A zero batch size yields no ranges.
pub fn batch_ranges(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    if batch_size == 0 {
        return Vec::new();
    }
    (0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect()
}
