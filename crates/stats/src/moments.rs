//! Null-aware moments, rounding and sums.

/// The present (non-null, non-NaN) values of a nullable column, in order.
pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().filter_map(|v| v.filter(|x| !x.is_nan())).collect()
}

/// Number of present values in a nullable column.
pub fn count_present(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_some_and(|x| !x.is_nan())).count()
}

/// Arithmetic mean. Returns `None` if empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance with N-1 denominator. Returns `None` if fewer than 2
/// elements.
pub fn variance(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let m = data.iter().sum::<f64>() / nf;
    Some(data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (nf - 1.0))
}

/// Sample standard deviation with N-1 denominator. Returns `None` if fewer
/// than 2 elements.
pub fn sd(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Rounds to `dp` decimal places, resolving exact halves to even.
pub fn round_dp(x: f64, dp: u32) -> f64 {
    let scale = 10f64.powi(dp as i32);
    (x * scale).round_ties_even() / scale
}

/// Sum that is `None` as soon as any term is `None` or NaN, and `None` for
/// an empty input.
pub fn strict_sum<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut total = None;
    for v in values {
        let x = v.filter(|x| !x.is_nan())?;
        total = Some(total.unwrap_or(0.0) + x);
    }
    total
}
