/// Rounds `x` to two decimal places, exact halves to even.
///
/// ```text
/// 0.125 -> 0.12, 0.375 -> 0.38, 0.994 -> 0.99, 1.0 -> 1.0
/// ```
///
/// Scores are compared after this rounding, so small differences
/// (e.g. `0.951` vs `0.949`) collapse into the same value.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Mutable borrow of `items[i]` together with a shared borrow of `items[j]`.
///
/// # Panics
///
/// Panics if `i == j` or either index is out of bounds.
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &T) {
    assert_ne!(i, j, "indices must be distinct");
    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &left[j])
    }
}
