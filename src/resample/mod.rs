use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DiodemError, Result};
use crate::numerics::{gap_fill, interpolation, quaternion, sample_positions};
use crate::rates::Rates;
use crate::signal::Signal;
use crate::tree::Tree;
use crate::Float;

/// Interpolation used for non-orientation signals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Linear,
    Cubic
}

impl FromStr for Interpolation {
    type Err = DiodemError;

    fn from_str(s: &str) -> Result<Interpolation> {
        match s {
            "linear" => Ok(Interpolation::Linear),
            "cubic" => Ok(Interpolation::Cubic),
            other => Err(DiodemError::UnsupportedInterpolationMethod(other.to_string()))
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "linear"),
            Interpolation::Cubic => write!(f, "cubic")
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ResampleOptions {
    /// Orientation leaves use quaternion interpolation. When off they are treated as plain vectors.
    pub quat_detect: bool,
    pub vec_interp: Interpolation
}

impl Default for ResampleOptions {
    fn default() -> ResampleOptions {
        ResampleOptions { quat_detect: true, vec_interp: Interpolation::Linear }
    }
}

/// Resamples every leaf of `signal` from its input rate to its output rate.
pub fn resample(signal: &Tree<Signal>, hz_in: &Rates, hz_out: &Rates, options: &ResampleOptions) -> Result<Tree<Signal>> {
    let hz_in = hz_in.resolve(signal)?;
    let hz_out = hz_out.resolve(signal)?;
    let hz = hz_in.zip_with(&hz_out, |&i, &o| Ok((i, o)))?;
    signal.zip_with(&hz, |leaf, &(hz_in, hz_out)| resample_signal(leaf, hz_in, hz_out, options))
}

pub fn resample_signal(signal: &Signal, hz_in: Float, hz_out: Float, options: &ResampleOptions) -> Result<Signal> {
    signal.check_rate(hz_in)?;
    signal.check_rate(hz_out)?;

    let ts_out = sample_positions(signal.len(), hz_in / hz_out);
    let as_quaternion = options.quat_detect && signal.is_orientation();

    let resampled = match (as_quaternion, options.vec_interp) {
        (true, _) => quaternion::quat_interp(&gap_fill::nan_interp_quat(signal.data()), &ts_out),
        (false, Interpolation::Linear) => interpolation::vec_interp(&gap_fill::nan_interp(signal.data()), &ts_out),
        (false, Interpolation::Cubic) => interpolation::cubic_interp(&gap_fill::nan_interp(signal.data()), &ts_out)
    };
    debug!(len_in = signal.len(), len_out = resampled.nrows(), hz_in, hz_out, "resampled leaf");

    Ok(signal.with_data(resampled))
}
