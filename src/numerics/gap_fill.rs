use na::DMatrix;
use crate::numerics::quaternion::{row_as_unit_quaternion, slerp_shortest, write_row};
use crate::Float;

/// Replaces non-finite entries channel by channel.
///
/// Gaps between finite samples are bridged linearly, leading and trailing gaps
/// take the nearest finite value. Channels without any finite sample stay untouched.
pub fn nan_interp(signal: &DMatrix<Float>) -> DMatrix<Float> {
    let mut out = signal.clone();
    for c in 0..signal.ncols() {
        let column = signal.column(c).iter().copied().collect::<Vec<Float>>();
        let valid = column.iter().map(|v| v.is_finite()).collect::<Vec<bool>>();
        fill_gaps(&valid, |row, i0, i1, w| {
            out[(row, c)] = match (i0, i1) {
                (Some(a), Some(b)) => (1.0 - w) * column[a] + w * column[b],
                (Some(a), None) => column[a],
                (None, Some(b)) => column[b],
                (None, None) => column[row]
            };
        });
    }
    out
}

/// Replaces rows of a (N × 4, w,x,y,z) signal that are not a finite, non-zero quaternion.
///
/// Gaps are bridged by shortest-arc interpolation between the enclosing valid rows.
pub fn nan_interp_quat(signal: &DMatrix<Float>) -> DMatrix<Float> {
    let mut out = signal.clone();
    let quats = (0..signal.nrows()).map(|i| row_as_unit_quaternion(signal, i)).collect::<Vec<_>>();
    let valid = quats.iter().map(|q| q.is_some()).collect::<Vec<bool>>();
    fill_gaps(&valid, |row, i0, i1, w| {
        let q = match (i0.and_then(|a| quats[a]), i1.and_then(|b| quats[b])) {
            (Some(a), Some(b)) => slerp_shortest(&a, &b, w),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return
        };
        write_row(&mut out, row, &q);
    });
    out
}

// Calls `fill(row, prev_valid, next_valid, weight)` for every invalid row.
fn fill_gaps<F>(valid: &[bool], mut fill: F) where F: FnMut(usize, Option<usize>, Option<usize>, Float) {
    let n = valid.len();
    let mut next_valid = vec!(None; n);
    let mut next = None;
    for i in (0..n).rev() {
        if valid[i] {
            next = Some(i);
        }
        next_valid[i] = next;
    }

    let mut prev = None;
    for row in 0..n {
        if valid[row] {
            prev = Some(row);
            continue;
        }
        let w = match (prev, next_valid[row]) {
            (Some(a), Some(b)) => (row - a) as Float / (b - a) as Float,
            _ => 0.0
        };
        fill(row, prev, next_valid[row], w);
    }
}
