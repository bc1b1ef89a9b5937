use tracing::{info, warn};

use crate::error::{DiodemError, Result};
use crate::numerics::{is_integral, round};
use crate::rates::Rates;
use crate::signal::Signal;
use crate::tree::Tree;
use crate::Float;

pub const MAX_CROP_SEARCH_ITERATIONS: usize = 100;
const CROP_DECIMALS: i32 = 10;

/// Result of [`crop_tail`].
#[derive(Debug, Clone)]
pub struct CropReport {
    pub signals: Tree<Signal>,
    /// Common length of all leaves, in seconds (in samples when no rates were given).
    pub shortest_length: Float,
    pub hz_of_shortest_length: Float,
    /// Search iterations spent reducing `shortest_length`.
    pub iterations: usize,
    /// The search gave up: leaves may not end on an exact sample boundary.
    pub degraded: bool,
    pub warnings: Vec<String>
}

/// Crops every leaf to the duration of the shortest one.
///
/// `hz = None` treats every leaf as sampled at 1 Hz, i.e. lengths are sample counts.
/// With `strict`, the crop length is reduced in steps of the shortest leaf's sample period
/// until it lands on an integer sample index for every rate in the tree.
pub fn crop_tail(signal: &Tree<Signal>, hz: Option<&Rates>, strict: bool, verbose: bool) -> Result<CropReport> {
    let index_mode = hz.is_none();
    let hz = match hz {
        Some(rates) => rates.resolve(signal)?,
        None => signal.broadcast(1.0)
    };

    let lengths = signal.zip_with(&hz, |s, &hz| {
        s.check_rate(hz)?;
        Ok(s.len() as Float / hz)
    })?;
    let flat_lengths = lengths.leaves();
    let flat_hz = hz.leaves();

    // first minimum in canonical order
    let argmin = match (0..flat_lengths.len()).reduce(|best, i| if flat_lengths[i] < flat_lengths[best] { i } else { best }) {
        Some(argmin) => argmin,
        None => return Ok(CropReport {
            signals: signal.clone(),
            shortest_length: 0.0,
            hz_of_shortest_length: 1.0,
            iterations: 0,
            degraded: false,
            warnings: vec!()
        })
    };
    let mut shortest_length = *flat_lengths[argmin];
    let hz_of_shortest_length = *flat_hz[argmin];

    let mut iterations = 0;
    let mut degraded = false;
    let mut warnings = Vec::<String>::new();
    if strict {
        let mut i = 0;
        loop {
            shortest_length -= i as Float / hz_of_shortest_length;
            let clean_crop = flat_hz.iter().all(|&&each_hz| is_integral(shortest_length * each_hz, CROP_DECIMALS));
            iterations = i;
            if clean_crop {
                break;
            }
            if i > hz_of_shortest_length as usize && warnings.is_empty() {
                let msg = format!("Must crop more than i={} and still no clean crop possible.", i);
                warn!("{}", msg);
                warnings.push(msg);
            }
            if i > MAX_CROP_SEARCH_ITERATIONS {
                degraded = true;
                break;
            }
            i += 1;
        }
        if degraded {
            let msg = format!("No clean crop found within {} iterations, cropping at {} without exact sample boundaries.", MAX_CROP_SEARCH_ITERATIONS, shortest_length.max(0.0));
            warn!("{}", msg);
            warnings.push(msg);
        }
    }
    shortest_length = shortest_length.max(0.0);

    if verbose {
        match index_mode {
            true => info!("`crop_tail`: Crop off at index i={}", shortest_length),
            false => info!("`crop_tail`: Crop off at t={}s", shortest_length)
        }
    }

    let signals = crop_to(signal, &hz, shortest_length, strict && !degraded)?;
    Ok(CropReport { signals, shortest_length, hz_of_shortest_length, iterations, degraded, warnings })
}

/// Truncates every leaf to `length` seconds at its own rate.
///
/// With `exact`, `length * hz` must land on an integer sample index (10 decimals) for
/// every leaf, otherwise `NonCleanCrop`. Without it the sample count is rounded up
/// (after rounding to 10 decimals, so float noise does not add a sample).
pub fn apply_crop(signal: &Tree<Signal>, hz: &Rates, length: Float, exact: bool) -> Result<Tree<Signal>> {
    let hz = hz.resolve(signal)?;
    crop_to(signal, &hz, length, exact)
}

fn crop_to(signal: &Tree<Signal>, hz: &Tree<Float>, length: Float, exact: bool) -> Result<Tree<Signal>> {
    signal.zip_with(hz, |arr, &hz| {
        arr.check_rate(hz)?;
        let crop_tail = match exact {
            true => {
                let crop_tail = round(length * hz, CROP_DECIMALS);
                if crop_tail % 1.0 != 0.0 || crop_tail < 0.0 {
                    return Err(DiodemError::NonCleanCrop { shortest_length: length, hz });
                }
                crop_tail as usize
            },
            false => round(length * hz, CROP_DECIMALS).ceil().max(0.0) as usize
        };
        Ok(arr.truncated(crop_tail))
    })
}
