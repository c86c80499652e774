//! Cross-platform probe backed by the sysinfo crate.
//!
//! Native probe on platforms without a dedicated one (macOS, the BSDs), and
//! usable anywhere as a second opinion. Every call builds a fresh
//! `System` so nothing is shared between callers.

use sysinfo::System;

use super::{bytes_to_i64, HostProbe};
use crate::error::{ProbeError, Result};
use crate::hardware::CoreCount;

#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }

    fn cpus() -> System {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys
    }

    fn memory() -> System {
        let mut sys = System::new();
        sys.refresh_memory();
        sys
    }
}

impl HostProbe for SysinfoProbe {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn cpu_architecture(&self) -> Result<String> {
        let sys = Self::cpus();
        let brand = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .ok_or_else(|| ProbeError::source_unavailable("sysinfo", "no CPU detected"))?;

        if brand.is_empty() {
            tracing::debug!("sysinfo reported an empty CPU brand");
            return Err(ProbeError::pattern_mismatch("brand"));
        }
        Ok(brand)
    }

    fn cpu_total_cores(&self) -> Result<CoreCount> {
        let sys = Self::cpus();
        let logical = sys.cpus().len();
        if logical == 0 {
            tracing::debug!("sysinfo reported no CPUs");
            return Err(ProbeError::source_unavailable("sysinfo", "no CPU detected"));
        }

        let physical = sys.physical_core_count().ok_or_else(|| {
            tracing::debug!("sysinfo could not count physical cores");
            ProbeError::unsupported("physical_core_count")
        })?;

        Ok(CoreCount::new(
            i32::try_from(logical).unwrap_or(i32::MAX),
            i32::try_from(physical.min(logical)).unwrap_or(i32::MAX),
        ))
    }

    fn cpu_clock_speed_hz(&self) -> Result<i64> {
        let sys = Self::cpus();
        let mhz = sys
            .cpus()
            .first()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .ok_or_else(|| {
                tracing::debug!("sysinfo reported no CPU frequency");
                ProbeError::unsupported("cpu_clock_speed_hz")
            })?;

        Ok(i64::try_from(mhz.saturating_mul(1_000_000)).unwrap_or(i64::MAX))
    }

    fn ram_total_bytes(&self) -> Result<i64> {
        let total = Self::memory().total_memory();
        if total == 0 {
            tracing::debug!("sysinfo reported zero total memory");
            return Err(ProbeError::source_unavailable(
                "sysinfo",
                "no memory reported",
            ));
        }
        Ok(bytes_to_i64(total))
    }

    fn ram_free_bytes(&self) -> Result<i64> {
        let sys = Self::memory();
        if sys.total_memory() == 0 {
            tracing::debug!("sysinfo reported zero total memory");
            return Err(ProbeError::source_unavailable(
                "sysinfo",
                "no memory reported",
            ));
        }
        Ok(bytes_to_i64(sys.available_memory()))
    }
}
