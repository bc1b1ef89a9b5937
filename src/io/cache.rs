use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::error::Result;
use crate::io::diodem_loader::RawMotion;
use crate::Float;

/// Memo of dataset lookups, shared by everything that reads the same repository.
///
/// Locks are only held while reading or inserting, never while computing a value,
/// so lookups may recurse into the cache.
#[derive(Default)]
pub struct LookupCache {
    arm_or_gait: Mutex<HashMap<u32, String>>,
    timings: Mutex<HashMap<u32, Vec<String>>>,
    motions: Mutex<HashMap<(u32, String), RawMotion>>,
    relative_timings: Mutex<HashMap<(u32, String), (Float, Float)>>
}

impl LookupCache {

    pub fn new() -> LookupCache {
        LookupCache::default()
    }

    pub fn arm_or_gait<F>(&self, exp_id: u32, f: F) -> Result<String> where F: FnOnce() -> Result<String> {
        get_or_try_insert(&self.arm_or_gait, exp_id, f)
    }

    pub fn timings<F>(&self, exp_id: u32, f: F) -> Result<Vec<String>> where F: FnOnce() -> Result<Vec<String>> {
        get_or_try_insert(&self.timings, exp_id, f)
    }

    pub fn motion<F>(&self, exp_id: u32, motion: &str, f: F) -> Result<RawMotion> where F: FnOnce() -> Result<RawMotion> {
        get_or_try_insert(&self.motions, (exp_id, motion.to_string()), f)
    }

    pub fn relative_timing<F>(&self, exp_id: u32, motion: &str, f: F) -> Result<(Float, Float)> where F: FnOnce() -> Result<(Float, Float)> {
        get_or_try_insert(&self.relative_timings, (exp_id, motion.to_string()), f)
    }

    pub fn cached_motions(&self) -> usize {
        self.motions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn clear(&self) {
        self.arm_or_gait.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.timings.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.motions.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.relative_timings.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

// Errors are not cached.
fn get_or_try_insert<K, V, F>(map: &Mutex<HashMap<K, V>>, key: K, f: F) -> Result<V> where K: Eq + Hash, V: Clone, F: FnOnce() -> Result<V> {
    if let Some(value) = map.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
        return Ok(value.clone());
    }
    let value = f()?;
    map.lock().unwrap_or_else(|e| e.into_inner()).insert(key, value.clone());
    Ok(value)
}
