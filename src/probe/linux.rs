//! Linux probe backed by procfs and libc.
//!
//! `sysconf(_SC_NPROCESSORS_ONLN)` only knows about online processors, not
//! how they map onto cores, so the physical count here is the logical count
//! and hyper-threading always reads false. That is a known approximation of
//! this source and is kept as-is.
//!
//! Clock speed comes from the nominal cpufreq value when the kernel exposes
//! one. `cpu MHz` in `/proc/cpuinfo` tracks the current scaled frequency, so
//! it is only used when cpufreq is absent (most VMs, where it is fixed).

use std::fs;
use std::path::{Path, PathBuf};

use super::{bytes_to_i64, HostProbe};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::hardware::cpu::{khz_to_hz, mhz_to_hz, parse_clock_mhz, parse_khz, parse_model_name};
use crate::hardware::CoreCount;

/// cpufreq files holding a fixed clock in kHz, most specific first
const NOMINAL_FREQUENCY_FILES: [&str; 2] = ["base_frequency", "cpuinfo_max_freq"];

/// Reads `/proc/cpuinfo` and asks the kernel directly for counts and memory
#[derive(Debug, Clone)]
pub struct ProcfsProbe {
    cpuinfo_path: PathBuf,
    cpufreq_dir: PathBuf,
}

impl ProcfsProbe {
    pub fn new() -> Self {
        Self::with_config(&ProbeConfig::default())
    }

    pub fn with_config(config: &ProbeConfig) -> Self {
        Self {
            cpuinfo_path: config.procfs.cpuinfo_path.clone(),
            cpufreq_dir: config.procfs.cpufreq_dir.clone(),
        }
    }

    pub fn cpuinfo_path(&self) -> &Path {
        &self.cpuinfo_path
    }

    fn read_cpuinfo(&self) -> Result<String> {
        fs::read_to_string(&self.cpuinfo_path).map_err(|err| {
            tracing::debug!(path = %self.cpuinfo_path.display(), error = %err, "cpuinfo unreadable");
            ProbeError::source_unavailable(self.cpuinfo_path.display().to_string(), err)
        })
    }

    /// Nominal clock in Hz from cpufreq, unaffected by frequency scaling
    fn nominal_clock_hz(&self) -> Option<i64> {
        NOMINAL_FREQUENCY_FILES.iter().find_map(|file| {
            let path = self.cpufreq_dir.join(file);
            let content = fs::read_to_string(&path).ok()?;
            match parse_khz(&content) {
                Ok(khz) => Some(khz_to_hz(khz)),
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "bad cpufreq value");
                    None
                }
            }
        })
    }
}

impl Default for ProcfsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for ProcfsProbe {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn cpu_architecture(&self) -> Result<String> {
        let cpuinfo = self.read_cpuinfo()?;
        parse_model_name(&cpuinfo).inspect_err(|err| {
            tracing::debug!(path = %self.cpuinfo_path.display(), error = %err, "no model name");
        })
    }

    fn cpu_total_cores(&self) -> Result<CoreCount> {
        // SAFETY: sysconf only reads a kernel-provided value.
        let online = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if online <= 0 {
            let err = std::io::Error::last_os_error();
            tracing::debug!(online, error = %err, "sysconf(_SC_NPROCESSORS_ONLN) failed");
            return Err(ProbeError::source_unavailable("sysconf", err));
        }

        let online = i32::try_from(online).unwrap_or(i32::MAX);
        Ok(CoreCount::uniform(online))
    }

    fn cpu_clock_speed_hz(&self) -> Result<i64> {
        if let Some(hz) = self.nominal_clock_hz() {
            return Ok(hz);
        }

        let cpuinfo = self.read_cpuinfo()?;
        let mhz = parse_clock_mhz(&cpuinfo).inspect_err(|err| {
            tracing::debug!(path = %self.cpuinfo_path.display(), error = %err, "no cpu MHz");
        })?;
        Ok(mhz_to_hz(mhz))
    }

    fn ram_total_bytes(&self) -> Result<i64> {
        let info = sysinfo()?;
        Ok(bytes_to_i64(
            (info.totalram as u64).saturating_mul(u64::from(info.mem_unit)),
        ))
    }

    fn ram_free_bytes(&self) -> Result<i64> {
        let info = sysinfo()?;
        Ok(bytes_to_i64(
            (info.freeram as u64).saturating_mul(u64::from(info.mem_unit)),
        ))
    }
}

fn sysinfo() -> Result<libc::sysinfo> {
    // SAFETY: sysinfo is plain old data; all-zero is a valid value.
    let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
    // SAFETY: the pointer is valid for writes for the duration of the call.
    if unsafe { libc::sysinfo(&mut info) } != 0 {
        let err = std::io::Error::last_os_error();
        tracing::debug!(error = %err, "sysinfo(2) failed");
        return Err(ProbeError::source_unavailable("sysinfo", err));
    }
    Ok(info)
}

pub(super) fn current_thread_id_impl() -> u64 {
    // SAFETY: gettid takes no arguments and always succeeds.
    unsafe { libc::syscall(libc::SYS_gettid) as u64 }
}
