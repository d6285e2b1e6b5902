//! Linear-interpolation quantiles.

/// Quantile by linear interpolation between order statistics (R type 7,
/// numpy's default). Returns `None` for an empty slice.
///
/// **Expects pre-sorted input** (caller's responsibility).
pub fn quantile_type7(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    Some(sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo]))
}

/// Sorts a copy of `data` ascending. NaNs must already be removed.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(f64::total_cmp);
    v
}
