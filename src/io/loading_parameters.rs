use std::fmt;

/// Layout of the recordings: which segments, markers and imu mounts the files carry.
#[derive(Debug, Clone)]
pub struct LoadingParameters {
    pub segments: Vec<String>,
    pub markers: Vec<u32>,
    pub imus: Vec<String>
}

impl Default for LoadingParameters {
    fn default() -> LoadingParameters {
        LoadingParameters {
            segments: (1..6).map(|seg| format!("seg{}", seg)).collect(),
            markers: vec!(1, 2, 3, 4),
            imus: vec!(String::from("imu_rigid"), String::from("imu_nonrigid"))
        }
    }
}

impl fmt::Display for LoadingParameters {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "segments_{}_markers_{}_imus_{}", self.segments.join("-"), self.markers.len(), self.imus.join("-"))
    }

}
