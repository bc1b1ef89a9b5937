use tracing::debug;

use crate::error::{DiodemError, Result};
use crate::io::{provider::FileProvider, loading_parameters::LoadingParameters, RecordingTable};
use crate::rates::{IMU_CHANNEL_GROUPS, ORIENTATION_KEY};
use crate::signal::Signal;
use crate::tree::Tree;
use crate::Float;

pub const OMC_FILE: &str = "omc.csv";

/// Signals of one motion as recorded, with the rates declared in the file headers.
#[derive(Debug, Clone)]
pub struct RawMotion {
    pub data: Tree<Signal>,
    pub hz_omc: Float,
    pub hz_imu: Float
}

/// Loads `{file_prefix}omc.csv` and `{file_prefix}{imu}.csv` for every imu in `parameters`.
///
/// Produces `seg -> {quat, markerM, imu -> {acc, gyr, mag}}`.
pub fn load<P: FileProvider>(provider: &P, file_prefix: &str, parameters: &LoadingParameters) -> Result<RawMotion> {
    let fetch = |file: &str| -> Result<RecordingTable> {
        let path_in_repo = format!("{}{}", file_prefix, file);
        RecordingTable::load(&provider.fetch(&path_in_repo)?)
    };

    let omc = fetch(OMC_FILE)?;
    let imus = parameters.imus.iter().map(|imu| Ok((imu.as_str(), fetch(&format!("{}.csv", imu))?))).collect::<Result<Vec<(&str, RecordingTable)>>>()?;

    let hz_imu = match imus.first() {
        Some((_, table)) => table.hz,
        None => omc.hz
    };
    if let Some((imu, table)) = imus.iter().find(|(_, table)| table.hz != hz_imu) {
        return Err(DiodemError::InconsistentRates { what: format!("{} and {}", imus[0].0, imu), expected: hz_imu, found: table.hz });
    }

    let mut data = Tree::branch();
    for seg in &parameters.segments {
        let mut data_seg = Tree::branch();

        data_seg.insert(ORIENTATION_KEY, Tree::Leaf(Signal::orientation(omc.stack(&format!("{}_quat_", seg), "wxyz")?)?));

        for marker in &parameters.markers {
            let marker = format!("marker{}", marker);
            data_seg.insert(&marker, Tree::Leaf(Signal::vector(omc.stack(&format!("{}_{}_", seg, marker), "xyz")?)));
        }

        for (imu_name, imu) in &imus {
            let mut data_seg_imu = Tree::branch();
            for group in IMU_CHANNEL_GROUPS {
                data_seg_imu.insert(group, Tree::Leaf(Signal::vector(imu.stack(&format!("{}_{}_", seg, group), "xyz")?)));
            }
            data_seg.insert(imu_name, data_seg_imu);
        }

        data.insert(seg, data_seg);
    }
    debug!(file_prefix, omc_samples = omc.len(), hz_omc = omc.hz, hz_imu, "loaded motion");

    Ok(RawMotion { data, hz_omc: omc.hz, hz_imu })
}
