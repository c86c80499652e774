//! Platform probes.
//!
//! One [`HostProbe`] implementation per platform family, chosen at build time
//! through [`NativeProbe`]. Probes report failures as [`ProbeError`]; turning
//! them into sentinels is the facade's job.

#[cfg(target_os = "linux")]
mod linux;
mod portable;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::ProcfsProbe;
pub use portable::SysinfoProbe;
#[cfg(target_os = "windows")]
pub use windows::RegistryProbe;

use crate::error::Result;
use crate::hardware::CoreCount;

/// Probe selected for the build target
#[cfg(target_os = "linux")]
pub type NativeProbe = ProcfsProbe;
#[cfg(target_os = "windows")]
pub type NativeProbe = RegistryProbe;
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub type NativeProbe = SysinfoProbe;

/// Source of host CPU, memory and thread facts
pub trait HostProbe: Send + Sync {
    /// Human-readable name of this probe
    fn name(&self) -> &'static str;

    /// Processor model string
    fn cpu_architecture(&self) -> Result<String>;

    /// Logical and physical core counts, all or nothing
    fn cpu_total_cores(&self) -> Result<CoreCount>;

    /// Clock speed in Hz
    fn cpu_clock_speed_hz(&self) -> Result<i64>;

    /// Installed physical memory in bytes
    fn ram_total_bytes(&self) -> Result<i64>;

    /// Free physical memory in bytes
    fn ram_free_bytes(&self) -> Result<i64>;

    /// OS identifier of the calling thread
    fn current_thread_id(&self) -> u64 {
        current_thread_id_impl()
    }
}

#[cfg(target_os = "linux")]
use linux::current_thread_id_impl;
#[cfg(target_os = "windows")]
use windows::current_thread_id_impl;

#[cfg(all(unix, not(target_os = "linux")))]
fn current_thread_id_impl() -> u64 {
    // SAFETY: pthread_self has no preconditions and cannot fail.
    unsafe { libc::pthread_self() as u64 }
}

#[cfg(not(any(unix, target_os = "windows")))]
fn current_thread_id_impl() -> u64 {
    hashed_thread_id()
}

/// Stable per-thread value for targets without an OS thread id call
#[cfg(any(test, not(any(unix, target_os = "windows"))))]
fn hashed_thread_id() -> u64 {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

/// Clamp an unsigned OS byte count into the signed range used by the surface
fn bytes_to_i64(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_probe_is_named() {
        assert!(!NativeProbe::default().name().is_empty());
    }

    #[test]
    fn thread_id_differs_between_live_threads() {
        let probe = NativeProbe::default();
        let here = probe.current_thread_id();
        let there = std::thread::spawn(|| NativeProbe::default().current_thread_id())
            .join()
            .unwrap();
        assert_ne!(here, there);
        assert_eq!(here, probe.current_thread_id());
    }

    #[test]
    fn oversized_byte_counts_saturate() {
        assert_eq!(bytes_to_i64(16 * 1024 * 1024 * 1024), 17_179_869_184);
        assert_eq!(bytes_to_i64(u64::MAX), i64::MAX);
    }

    #[test]
    fn hashed_thread_ids_separate_threads() {
        let here = hashed_thread_id();
        assert_eq!(hashed_thread_id(), here);

        let there = std::thread::spawn(hashed_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
