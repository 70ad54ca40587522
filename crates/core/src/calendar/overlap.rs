/// Returns true when `[a_start, a_end)` and `[b_start, b_end)` intersect.
///
/// Intervals that only touch at an endpoint do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && a_end > b_start
}
