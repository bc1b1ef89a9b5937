use na::{DMatrix, DVector};
use crate::numerics::bracket;
use crate::Float;

/// Piecewise linear interpolation of every channel at fractional sample positions `ts_out`.
pub fn vec_interp(signal: &DMatrix<Float>, ts_out: &[Float]) -> DMatrix<Float> {
    let n = signal.nrows();
    let mut out = DMatrix::<Float>::zeros(ts_out.len(), signal.ncols());
    if n == 0 {
        return out;
    }
    for (row, &t) in ts_out.iter().enumerate() {
        let (i0, i1, w) = bracket(t, n);
        for c in 0..signal.ncols() {
            out[(row, c)] = (1.0 - w) * signal[(i0, c)] + w * signal[(i1, c)];
        }
    }
    out
}

/// Channel-wise natural cubic spline with the sample index as parameter.
pub fn cubic_interp(signal: &DMatrix<Float>, ts_out: &[Float]) -> DMatrix<Float> {
    let mut out = DMatrix::<Float>::zeros(ts_out.len(), signal.ncols());
    for c in 0..signal.ncols() {
        let spline = NaturalCubicSpline::new(signal.column(c).into_owned());
        for (row, &t) in ts_out.iter().enumerate() {
            out[(row, c)] = spline.evaluate(t);
        }
    }
    out
}

/// Natural cubic spline through `(i, y_i)` for `i = 0..n`.
pub struct NaturalCubicSpline {
    y: DVector<Float>,
    second_derivatives: DVector<Float>
}

impl NaturalCubicSpline {

    pub fn new(y: DVector<Float>) -> NaturalCubicSpline {
        let second_derivatives = natural_second_derivatives(&y);
        NaturalCubicSpline { y, second_derivatives }
    }

    /// Evaluates at `t`, clamped into the knot range.
    pub fn evaluate(&self, t: Float) -> Float {
        let n = self.y.len();
        match n {
            0 => Float::NAN,
            1 => self.y[0],
            _ => {
                let (i0, i1, w) = bracket(t, n);
                if i0 == i1 {
                    return self.y[i0];
                }
                let a = 1.0 - w;
                let m = &self.second_derivatives;
                a * self.y[i0] + w * self.y[i1] + ((a.powi(3) - a) * m[i0] + (w.powi(3) - w) * m[i1]) / 6.0
            }
        }
    }
}

// Unit knot spacing: m[i-1] + 4 m[i] + m[i+1] = 6 (y[i+1] - 2 y[i] + y[i-1]), m[0] = m[n-1] = 0.
// Solved with the Thomas algorithm.
fn natural_second_derivatives(y: &DVector<Float>) -> DVector<Float> {
    let n = y.len();
    let mut m = DVector::<Float>::zeros(n);
    if n < 3 {
        return m;
    }
    let interior = n - 2;
    let mut c_prime = vec!(0.0 as Float; interior);
    let mut d_prime = vec!(0.0 as Float; interior);

    for k in 0..interior {
        let i = k + 1;
        let rhs = 6.0 * (y[i + 1] - 2.0 * y[i] + y[i - 1]);
        match k {
            0 => {
                c_prime[k] = 1.0 / 4.0;
                d_prime[k] = rhs / 4.0;
            },
            _ => {
                let denom = 4.0 - c_prime[k - 1];
                c_prime[k] = 1.0 / denom;
                d_prime[k] = (rhs - d_prime[k - 1]) / denom;
            }
        }
    }

    for k in (0..interior).rev() {
        let next = match k + 1 < interior {
            true => m[k + 2],
            false => 0.0
        };
        m[k + 1] = d_prime[k] - c_prime[k] * next;
    }
    m
}
