// Resource sampler
//
// Point-in-time resident memory of the calling process.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use sysinfo::{Pid, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of resident-memory snapshots, in megabytes
pub trait MemorySampler {
    fn resident_mb(&self) -> f64;
}

/// Reads this process's RSS through `sysinfo`.
///
/// Platforms without process introspection report 0.0 and log a single
/// warning, so deltas stay at zero rather than failing the benchmark.
#[derive(Debug, Default)]
pub struct ProcessMemorySampler {
    warned: AtomicBool,
}

impl ProcessMemorySampler {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_bytes() -> Option<u64> {
        let pid: Pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new();
        if !system.refresh_process(pid) {
            return None;
        }
        system.process(pid).map(|process| process.memory())
    }
}

impl MemorySampler for ProcessMemorySampler {
    fn resident_mb(&self) -> f64 {
        match Self::read_bytes() {
            Some(bytes) => bytes as f64 / BYTES_PER_MB,
            None => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    warn!("Resident memory unavailable on this platform; reporting 0 MB");
                }
                0.0
            }
        }
    }
}
