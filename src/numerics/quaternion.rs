use na::{DMatrix, Quaternion, UnitQuaternion};
use crate::numerics::bracket;
use crate::Float;

const SLERP_EPS: Float = 1e-9;

/// Reads row `row` (w,x,y,z) as a unit quaternion. `None` if it is not finite or has zero norm.
pub fn row_as_unit_quaternion(signal: &DMatrix<Float>, row: usize) -> Option<UnitQuaternion<Float>> {
    let q = Quaternion::<Float>::new(signal[(row, 0)], signal[(row, 1)], signal[(row, 2)], signal[(row, 3)]);
    let norm = q.norm();
    match q.coords.iter().all(|v| v.is_finite()) && norm > 0.0 {
        true => Some(UnitQuaternion::new_normalize(q)),
        false => None
    }
}

pub fn write_row(out: &mut DMatrix<Float>, row: usize, q: &UnitQuaternion<Float>) {
    out[(row, 0)] = q.w;
    out[(row, 1)] = q.i;
    out[(row, 2)] = q.j;
    out[(row, 3)] = q.k;
}

/// Spherical interpolation along the shorter arc between `a` and `b`.
pub fn slerp_shortest(a: &UnitQuaternion<Float>, b: &UnitQuaternion<Float>, t: Float) -> UnitQuaternion<Float> {
    let b = match a.coords.dot(&b.coords) < 0.0 {
        true => UnitQuaternion::new_unchecked(-b.into_inner()),
        false => *b
    };
    // try_slerp gives up on (nearly) identical inputs, where nlerp is exact enough
    a.try_slerp(&b, t, SLERP_EPS).unwrap_or_else(|| {
        UnitQuaternion::new_normalize(a.into_inner() * (1.0 - t) + b.into_inner() * t)
    })
}

/// Quaternion interpolation of a (N × 4, w,x,y,z) signal at fractional sample positions `ts_out`.
///
/// Consecutive samples are joined along the shortest arc, so the output is unit-norm
/// and free of sign flips between neighbours. Non-finite rows must have been filled beforehand.
pub fn quat_interp(signal: &DMatrix<Float>, ts_out: &[Float]) -> DMatrix<Float> {
    let n = signal.nrows();
    let mut out = DMatrix::<Float>::zeros(ts_out.len(), 4);
    if n == 0 {
        return out;
    }
    let quats = (0..n).map(|i| row_as_unit_quaternion(signal, i)).collect::<Vec<Option<UnitQuaternion<Float>>>>();
    for (row, &t) in ts_out.iter().enumerate() {
        let (i0, i1, w) = bracket(t, n);
        let q = match (quats[i0], quats[i1]) {
            (Some(a), Some(b)) => slerp_shortest(&a, &b, w),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => {
                for c in 0..4 {
                    out[(row, c)] = Float::NAN;
                }
                continue;
            }
        };
        write_row(&mut out, row, &q);
    }
    out
}
