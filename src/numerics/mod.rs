use crate::Float;

pub mod gap_fill;
pub mod interpolation;
pub mod quaternion;

pub fn round(number: Float, dp: i32) -> Float {
    let n = (10.0 as Float).powi(dp);
    (number * n).round()/n
}

/// `value` is integral once rounded to `dp` decimals.
pub fn is_integral(value: Float, dp: i32) -> bool {
    round(value, dp) % 1.0 == 0.0
}

/// Sample positions `0, step, 2*step, ..` strictly below `n`, in units of input samples.
///
/// The quotient `n/step` is rounded to 10 decimals before taking the ceiling so that
/// e.g. `1000/0.4` yields exactly 2500 positions. Positions past `n-1` are clamped by the interpolators.
pub fn sample_positions(n: usize, step: Float) -> Vec<Float> {
    if n == 0 {
        return vec!();
    }
    let count = round(n as Float / step, 10).ceil() as usize;
    (0..count).map(|k| k as Float * step).collect()
}

/// Splits a fractional sample position into a bracketing index pair and blend weight.
/// Positions outside `[0, n-1]` are clamped.
pub fn bracket(t: Float, n: usize) -> (usize, usize, Float) {
    let last = (n - 1) as Float;
    let t = t.max(0.0).min(last);
    let i0 = t.floor() as usize;
    let i1 = (i0 + 1).min(n - 1);
    (i0, i1, t - i0 as Float)
}
