use na::{DMatrix, DVector};
use crate::error::{DiodemError, Result};
use crate::tree::Tree;
use crate::Float;

pub const QUATERNION_CHANNELS: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignalKind {
    /// Unit quaternion time series, channel order w,x,y,z.
    Orientation,
    Vector
}

/// A time series of fixed-width samples, stored samples × channels.
///
/// The kind is fixed at construction. `one_dimensional` remembers that the
/// caller handed in a flat sequence so that stages can restore that shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    kind: SignalKind,
    data: DMatrix<Float>,
    one_dimensional: bool
}

impl Signal {

    pub fn orientation(data: DMatrix<Float>) -> Result<Signal> {
        if data.ncols() != QUATERNION_CHANNELS {
            return Err(DiodemError::InvalidSignalShape {
                shape: vec!(data.nrows(), data.ncols()),
                reason: format!("orientation signals need {} channels (w,x,y,z)", QUATERNION_CHANNELS)
            });
        }
        Ok(Signal { kind: SignalKind::Orientation, data, one_dimensional: false })
    }

    pub fn vector(data: DMatrix<Float>) -> Signal {
        Signal { kind: SignalKind::Vector, data, one_dimensional: false }
    }

    pub fn vector_1d(values: Vec<Float>) -> Signal {
        let n = values.len();
        Signal { kind: SignalKind::Vector, data: DMatrix::from_vec(n, 1, values), one_dimensional: true }
    }

    /// Tags 4-channel matrices as orientation, everything else as vector.
    pub fn detect(data: DMatrix<Float>) -> Signal {
        let kind = match data.ncols() {
            QUATERNION_CHANNELS => SignalKind::Orientation,
            _ => SignalKind::Vector
        };
        Signal { kind, data, one_dimensional: false }
    }

    /// Builds a signal from a row-major buffer and an explicit shape.
    ///
    /// `shape` is `[samples]` or `[samples, channels]`.
    pub fn from_shape(kind: SignalKind, shape: &[usize], values: Vec<Float>) -> Result<Signal> {
        let invalid = |reason: String| DiodemError::InvalidSignalShape { shape: shape.to_vec(), reason };
        let (rows, cols, one_dimensional) = match shape {
            [rows] => (*rows, 1, true),
            [rows, cols] => (*rows, *cols, false),
            _ => return Err(invalid(format!("expected 1 or 2 axes, got {}", shape.len())))
        };
        if rows * cols != values.len() {
            return Err(invalid(format!("shape holds {} values, buffer has {}", rows * cols, values.len())));
        }
        if kind == SignalKind::Orientation && (one_dimensional || cols != QUATERNION_CHANNELS) {
            return Err(invalid(format!("orientation signals need {} channels (w,x,y,z)", QUATERNION_CHANNELS)));
        }
        Ok(Signal { kind, data: DMatrix::from_row_slice(rows, cols, &values), one_dimensional })
    }

    /// Same kind and dimensionality as `self`, new samples.
    pub fn with_data(&self, data: DMatrix<Float>) -> Signal {
        let one_dimensional = self.one_dimensional && data.ncols() == 1;
        Signal { kind: self.kind, data, one_dimensional }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn is_orientation(&self) -> bool {
        self.kind == SignalKind::Orientation
    }

    pub fn is_1d(&self) -> bool {
        self.one_dimensional
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn channels(&self) -> usize {
        self.data.ncols()
    }

    /// `[samples]` for flat signals, `[samples, channels]` otherwise.
    pub fn shape(&self) -> Vec<usize> {
        match self.one_dimensional {
            true => vec!(self.len()),
            false => vec!(self.len(), self.channels())
        }
    }

    pub fn data(&self) -> &DMatrix<Float> {
        &self.data
    }

    /// `InvalidSignalShape` unless `hz` is a positive sampling rate.
    pub fn check_rate(&self, hz: Float) -> Result<()> {
        match hz > 0.0 {
            true => Ok(()),
            false => Err(DiodemError::InvalidSignalShape {
                shape: self.shape(),
                reason: format!("sampling rates must be positive, got {} Hz", hz)
            })
        }
    }

    pub fn sample(&self, index: usize) -> Vec<Float> {
        self.data.row(index).iter().copied().collect()
    }

    pub fn channel(&self, index: usize) -> DVector<Float> {
        self.data.column(index).into_owned()
    }

    /// First `len` samples. Longer requests return the whole signal.
    pub fn truncated(&self, len: usize) -> Signal {
        let rows = len.min(self.len());
        Signal { kind: self.kind, data: self.data.rows(0, rows).into_owned(), one_dimensional: self.one_dimensional }
    }

    /// Stacks `signals` along the time axis. All parts must agree on kind and channel count.
    pub fn concat(signals: &[&Signal]) -> Result<Signal> {
        let first = match signals.first() {
            Some(first) => *first,
            None => return Err(DiodemError::InvalidSignalShape { shape: vec!(), reason: String::from("nothing to concatenate") })
        };
        if let Some(other) = signals.iter().find(|s| s.kind != first.kind || s.channels() != first.channels()) {
            return Err(DiodemError::InvalidSignalShape {
                shape: other.shape(),
                reason: format!("cannot concatenate with {:?} signal of shape {:?}", first.kind, first.shape())
            });
        }
        let rows = signals.iter().map(|s| s.len()).sum();
        let mut data = DMatrix::<Float>::zeros(rows, first.channels());
        let mut offset = 0;
        for s in signals {
            data.rows_mut(offset, s.len()).copy_from(&s.data);
            offset += s.len();
        }
        Ok(Signal { kind: first.kind, data, one_dimensional: first.one_dimensional })
    }
}

/// Stacks mirrored trees leaf by leaf along the time axis, in the given order.
pub fn concat_along_time(trees: &[Tree<Signal>]) -> Result<Tree<Signal>> {
    let (first, rest) = match trees.split_first() {
        Some(split) => split,
        None => return Ok(Tree::branch())
    };
    let mut stacked = first.clone();
    for tree in rest {
        stacked = stacked.zip_with(tree, |a, b| Signal::concat(&[a, b]))?;
    }
    Ok(stacked)
}
