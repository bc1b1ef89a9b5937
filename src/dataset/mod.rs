use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::crop::crop_tail;
use crate::error::{DiodemError, Result};
use crate::io::{cache::LookupCache, diodem_loader::{self, RawMotion}, loading_parameters::LoadingParameters, provider::FileProvider};
use crate::io::diodem_loader::OMC_FILE;
use crate::rates::{Rates, RateMapSchema};
use crate::resample::{resample, Interpolation, ResampleOptions};
use crate::signal::{concat_along_time, Signal};
use crate::tree::Tree;
use crate::Float;

const EXPERIMENT_KINDS: [&str; 2] = ["arm", "gait"];
const MOTION_PREFIX: &str = "motion";
const TIMING_HZ: Float = 100.0;

/// A motion by its number (`motion03_...` is 3) or by its name (`motion03_pause1` is `pause1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionRef {
    Index(u32),
    Name(String)
}

impl fmt::Display for MotionRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MotionRef::Index(i) => write!(f, "{}", i),
            MotionRef::Name(name) => write!(f, "{}", name)
        }
    }
}

impl MotionRef {

    /// Numbers are indices, anything else is a motion name.
    pub fn parse(motion: &str) -> MotionRef {
        match motion.trim().parse::<u32>() {
            Ok(i) => MotionRef::Index(i),
            Err(_) => MotionRef::Name(motion.to_string())
        }
    }
}

impl From<u32> for MotionRef {
    fn from(i: u32) -> MotionRef {
        MotionRef::Index(i)
    }
}

impl From<&str> for MotionRef {
    fn from(name: &str) -> MotionRef {
        MotionRef::Name(name.to_string())
    }
}

/// Last motion of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionStop {
    /// Only the start motion.
    Only,
    /// Through the end of the trial.
    Last,
    Motion(MotionRef)
}

impl MotionStop {

    /// `last`, or a motion as in [`MotionRef::parse`].
    pub fn parse(motion: &str) -> MotionStop {
        match motion {
            "last" => MotionStop::Last,
            motion => MotionStop::Motion(MotionRef::parse(motion))
        }
    }
}

impl From<u32> for MotionStop {
    fn from(i: u32) -> MotionStop {
        MotionStop::Motion(MotionRef::Index(i))
    }
}

impl From<&str> for MotionStop {
    fn from(name: &str) -> MotionStop {
        match name {
            "last" => MotionStop::Last,
            name => MotionStop::Motion(MotionRef::Name(name.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub resample_to_hz: Float,
    pub interpolation: Interpolation,
    pub strict_crop: bool
}

impl Default for LoadOptions {
    fn default() -> LoadOptions {
        LoadOptions { resample_to_hz: 100.0, interpolation: Interpolation::Cubic, strict_crop: true }
    }
}

/// Loads experiments from a repository laid out as
/// `dataset/{arm,gait}/expNN/motionMM_<name>/expNN_motionMM_{omc,imu_rigid,imu_nonrigid}.csv`.
pub struct Dataset<P: FileProvider> {
    provider: P,
    cache: Arc<LookupCache>,
    parameters: LoadingParameters
}

impl<P: FileProvider> Dataset<P> {

    pub fn new(provider: P) -> Dataset<P> {
        Dataset::with_cache(provider, Arc::new(LookupCache::new()))
    }

    pub fn with_cache(provider: P, cache: Arc<LookupCache>) -> Dataset<P> {
        Dataset { provider, cache, parameters: LoadingParameters::default() }
    }

    pub fn with_parameters(mut self, parameters: LoadingParameters) -> Dataset<P> {
        self.parameters = parameters;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    /// `arm` or `gait`, whichever directory holds the experiment.
    pub fn arm_or_gait(&self, exp_id: u32) -> Result<String> {
        self.cache.arm_or_gait(exp_id, || {
            for kind in EXPERIMENT_KINDS {
                let prefix = format!("dataset/{}/{}/", kind, exp_name(exp_id));
                if !self.provider.list(Some(&prefix), None)?.is_empty() {
                    return Ok(kind.to_string());
                }
            }
            Err(DiodemError::UnknownExperiment(exp_id))
        })
    }

    fn path_up_to_motion(&self, exp_id: u32) -> Result<String> {
        Ok(format!("dataset/{}/{}", self.arm_or_gait(exp_id)?, exp_name(exp_id)))
    }

    /// Motion directories of an experiment (`motionNN_<name>`), ordered by `NN`.
    pub fn load_timings(&self, exp_id: u32) -> Result<Vec<String>> {
        self.cache.timings(exp_id, || {
            let prefix = format!("{}/", self.path_up_to_motion(exp_id)?);
            let omc_files = self.provider.list(Some(&prefix), Some(OMC_FILE))?;
            let mut motions = omc_files.iter()
                .filter_map(|file| file[prefix.len()..].split('/').next())
                .filter(|motion| motion_number(motion).is_some())
                .map(|motion| motion.to_string())
                .collect::<Vec<String>>();
            motions.sort_by_key(|motion| motion_number(motion));
            motions.dedup();
            match motions.is_empty() {
                true => Err(DiodemError::UnknownExperiment(exp_id)),
                false => Ok(motions)
            }
        })
    }

    fn convert_motion(&self, exp_id: u32, motion: &MotionRef) -> Result<String> {
        let timings = self.load_timings(exp_id)?;
        let found = timings.iter().find(|timing| match motion {
            MotionRef::Name(name) => motion_name(timing) == name.as_str(),
            MotionRef::Index(i) => motion_number(timing) == Some(*i)
        });
        found.cloned().ok_or_else(|| DiodemError::UnknownMotion { motion: motion.to_string(), known: timings.clone() })
    }

    /// Every valid motion name of a trial, without the `motionNN_` prefix.
    pub fn load_all_valid_motions_in_trial(&self, exp_id: u32) -> Result<Vec<String>> {
        Ok(self.load_timings(exp_id)?.iter().map(|s| motion_name(s).to_string()).collect())
    }

    /// Signals of a single motion as stored, before resampling.
    pub fn load_raw_motion(&self, exp_id: u32, motion: &str) -> Result<RawMotion> {
        self.cache.motion(exp_id, motion, || {
            let path = format!("{}/{}/{}_{}_", self.path_up_to_motion(exp_id)?, motion, exp_name(exp_id), motion_dir_prefix(motion));
            diodem_loader::load(&self.provider, &path, &self.parameters)
        })
    }

    pub fn load_data(&self, exp_id: u32, motion_start: MotionRef, motion_stop: MotionStop, resample_to_hz: Float) -> Result<Tree<Signal>> {
        let options = LoadOptions { resample_to_hz, ..LoadOptions::default() };
        self.load_data_with(exp_id, motion_start, motion_stop, &options)
    }

    /// Loads the motions `motion_start..=motion_stop`, concatenated in time, resampled to
    /// `options.resample_to_hz` and cropped to a common length.
    pub fn load_data_with(&self, exp_id: u32, motion_start: MotionRef, motion_stop: MotionStop, options: &LoadOptions) -> Result<Tree<Signal>> {
        let timings = self.load_timings(exp_id)?;
        let motion_start = self.convert_motion(exp_id, &motion_start)?;
        let motion_stop = match motion_stop {
            MotionStop::Only => motion_start.clone(),
            MotionStop::Last => timings[timings.len() - 1].clone(),
            MotionStop::Motion(motion) => self.convert_motion(exp_id, &motion)?
        };

        let motion_start_i = position(&timings, &motion_start);
        let motion_stop_i = position(&timings, &motion_stop);
        if motion_start_i > motion_stop_i {
            return Err(DiodemError::EmptyRange { start: motion_start, stop: motion_stop });
        }

        let motions = &timings[motion_start_i..=motion_stop_i];
        let raw = motions.iter().map(|motion| self.load_raw_motion(exp_id, motion)).collect::<Result<Vec<RawMotion>>>()?;
        let (hz_omc, hz_imu) = (raw[0].hz_omc, raw[0].hz_imu);
        for (motion, r) in motions.iter().zip(raw.iter()) {
            if r.hz_omc != hz_omc || r.hz_imu != hz_imu {
                let (expected, found) = match r.hz_omc != hz_omc {
                    true => (hz_omc, r.hz_omc),
                    false => (hz_imu, r.hz_imu)
                };
                return Err(DiodemError::InconsistentRates { what: format!("{} and {}", motions[0], motion), expected, found });
            }
        }
        info!(exp_id, first = %motions[0], last = %motions[motions.len() - 1], hz_omc, hz_imu, parameters = %self.parameters, "loading motions");

        let data = concat_along_time(&raw.into_iter().map(|r| r.data).collect::<Vec<Tree<Signal>>>())?;

        let schema = RateMapSchema { imus: self.parameters.imus.clone(), markers: self.parameters.markers.clone(), hz_imu, hz_omc };
        let hz_in = schema.build(&data.keys());
        let resample_options = ResampleOptions { quat_detect: true, vec_interp: options.interpolation };
        let hz_out = Rates::Scalar(options.resample_to_hz);
        let data = resample(&data, &Rates::Map(hz_in), &hz_out, &resample_options)?;

        Ok(crop_tail(&data, Some(&hz_out), options.strict_crop, false)?.signals)
    }

    /// Start and stop in seconds of `motion` within the complete trial, i.e. the data of
    /// `load_data(exp_id, Index(1), Last, ..)`.
    pub fn load_timing_relative_to_complete_trial(&self, exp_id: u32, motion: &str) -> Result<(Float, Float)> {
        self.cache.relative_timing(exp_id, motion, || {
            let data = self.load_data(exp_id, MotionRef::from(motion), MotionStop::Only, TIMING_HZ)?;
            let delta_t = data.leaves().first().map_or(0.0, |s| s.len() as Float / TIMING_HZ);

            let timings = self.load_all_valid_motions_in_trial(exp_id)?;
            let motion_i = timings.iter().position(|m| m == motion).ok_or_else(|| DiodemError::UnknownMotion { motion: motion.to_string(), known: timings.clone() })?;
            let t_start = match motion_i {
                0 => 0.0,
                _ => self.load_timing_relative_to_complete_trial(exp_id, &timings[motion_i - 1])?.1
            };
            Ok((t_start, t_start + delta_t))
        })
    }
}

pub fn exp_name(exp_id: u32) -> String {
    format!("exp{:02}", exp_id)
}

/// `NN` of `motionNN_<name>`.
pub fn motion_number(motion: &str) -> Option<u32> {
    motion_dir_prefix(motion).strip_prefix(MOTION_PREFIX)?.parse::<u32>().ok()
}

/// `<name>` of `motionNN_<name>`.
pub fn motion_name(motion: &str) -> &str {
    motion.split_once('_').map_or("", |(_, name)| name)
}

fn motion_dir_prefix(motion: &str) -> &str {
    motion.split_once('_').map_or(motion, |(prefix, _)| prefix)
}

fn position(timings: &[String], motion: &str) -> usize {
    timings.iter().position(|t| t == motion).unwrap_or(timings.len())
}
