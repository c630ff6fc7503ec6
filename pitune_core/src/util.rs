//! Small numeric helpers shared by the advisor and replay.

/// Round to `places` decimal places.
///
/// Rounds the exact binary value of `x` (ties to even), so `14.585` gives
/// `14.59` because its stored value lies just above the tie.
#[inline]
pub fn round_dp(x: f64, places: usize) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{x:.places$}").parse().unwrap_or(x)
}

/// Mean of the absolute differences between consecutive values.
/// Returns 0.0 when fewer than two values are given.
pub fn mean_abs_delta<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut it = values.into_iter();
    let Some(mut prev) = it.next() else {
        return 0.0;
    };
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in it {
        sum += (v - prev).abs();
        prev = v;
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Arithmetic mean; 0.0 for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
