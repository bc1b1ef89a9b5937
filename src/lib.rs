extern crate nalgebra as na;

pub mod error;
pub mod tree;
pub mod signal;
pub mod rates;
pub mod numerics;
pub mod resample;
pub mod crop;
pub mod io;
pub mod dataset;
pub mod runtime_conf;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

pub use error::{DiodemError, Result};
pub use tree::Tree;
pub use signal::{Signal, SignalKind};
pub use rates::{Rates, RateMapSchema, hz_helper};
pub use resample::{resample, Interpolation, ResampleOptions};
pub use crop::{crop_tail, apply_crop, CropReport};
pub use dataset::{Dataset, MotionRef, MotionStop, LoadOptions};
pub use runtime_conf::{RuntimeConf, load_runtime_conf};
