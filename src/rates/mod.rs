use crate::error::Result;
use crate::tree::Tree;
use crate::Float;

pub const IMU_CHANNEL_GROUPS: [&str; 3] = ["acc", "gyr", "mag"];
pub const ORIENTATION_KEY: &str = "quat";

/// Sampling rates for a signal tree: one rate for every leaf, or a mirrored rate map.
#[derive(Debug, Clone, PartialEq)]
pub enum Rates {
    Scalar(Float),
    Map(Tree<Float>)
}

impl Rates {

    /// Rate map with the shape of `shape`. A scalar is broadcast to every leaf.
    pub fn resolve<T>(&self, shape: &Tree<T>) -> Result<Tree<Float>> {
        match self {
            Rates::Scalar(hz) => Ok(shape.broadcast(*hz)),
            Rates::Map(map) => shape.zip_with(map, |_, hz| Ok(*hz))
        }
    }
}

impl From<Float> for Rates {
    fn from(hz: Float) -> Rates {
        Rates::Scalar(hz)
    }
}

impl From<Tree<Float>> for Rates {
    fn from(map: Tree<Float>) -> Rates {
        Rates::Map(map)
    }
}

/// Declared per-modality layout of one segment.
#[derive(Debug, Clone)]
pub struct RateMapSchema {
    pub imus: Vec<String>,
    pub markers: Vec<u32>,
    pub hz_imu: Float,
    pub hz_omc: Float
}

impl Default for RateMapSchema {
    fn default() -> RateMapSchema {
        RateMapSchema {
            imus: vec!(String::from("imu_rigid"), String::from("imu_flex")),
            markers: vec!(1, 2, 3, 4),
            hz_imu: 40.0,
            hz_omc: 120.0
        }
    }
}

impl RateMapSchema {

    /// Every segment gets one rate per imu × {acc, gyr, mag}, one per marker and one for `quat`.
    pub fn build<S: AsRef<str>>(&self, segments: &[S]) -> Tree<Float> {
        let mut hz_in = Tree::branch();
        for seg in segments {
            let mut seg_rates = Tree::branch();
            for imu in &self.imus {
                let imu_rates = IMU_CHANNEL_GROUPS.iter().fold(Tree::branch(), |t, group| t.with(group, Tree::Leaf(self.hz_imu)));
                seg_rates.insert(imu, imu_rates);
            }
            for marker in &self.markers {
                seg_rates.insert(&format!("marker{}", marker), Tree::Leaf(self.hz_omc));
            }
            seg_rates.insert(ORIENTATION_KEY, Tree::Leaf(self.hz_omc));
            hz_in.insert(seg.as_ref(), seg_rates);
        }
        hz_in
    }
}

pub fn hz_helper<S: AsRef<str>>(segments: &[S], imus: &[&str], markers: &[u32], hz_imu: Float, hz_omc: Float) -> Tree<Float> {
    RateMapSchema {
        imus: imus.iter().map(|s| s.to_string()).collect(),
        markers: markers.to_vec(),
        hz_imu,
        hz_omc
    }.build(segments)
}
