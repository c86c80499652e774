//! Sentinel facade over a [`HostProbe`].
//!
//! Every query here answers with a plain value. When the probe fails the
//! answer is [`UNKNOWN`] for text and [`FAILED`] (or a pair of them) for
//! numbers; callers must check for those explicitly. Nothing is retried and
//! nothing is cached: each call goes back to the OS.

use crate::hardware::{CoreCount, HostSnapshot};
use crate::probe::{HostProbe, NativeProbe};

/// Architecture string returned when the processor description is unavailable
pub const UNKNOWN: &str = "<unknown>";

/// Numeric value returned when a query fails
pub const FAILED: i64 = -1;

/// Host queries answered through one probe
#[derive(Debug, Clone, Default)]
pub struct HostInfo<P = NativeProbe> {
    probe: P,
}

impl HostInfo<NativeProbe> {
    /// Facade over the probe built for this platform, with default sources
    pub fn native() -> Self {
        Self::new(NativeProbe::default())
    }
}

impl<P: HostProbe> HostInfo<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Processor model string, or [`UNKNOWN`]. Never empty.
    pub fn cpu_architecture(&self) -> String {
        self.probe
            .cpu_architecture()
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Core counts, or [`CoreCount::FAILED`].
    ///
    /// A probe answer with a negative count or fewer logical than physical
    /// cores is treated as a failure rather than passed through.
    pub fn cores(&self) -> CoreCount {
        self.probe
            .cpu_total_cores()
            .ok()
            .filter(|cores| cores.physical >= 0 && cores.logical >= cores.physical)
            .unwrap_or(CoreCount::FAILED)
    }

    /// `(logical, physical)`, or `(-1, -1)`
    pub fn cpu_total_cores(&self) -> (i32, i32) {
        self.cores().as_pair()
    }

    pub fn cpu_logical_cores(&self) -> i32 {
        self.cores().logical
    }

    pub fn cpu_physical_cores(&self) -> i32 {
        self.cores().physical
    }

    /// True iff logical and physical counts differ. False on failure.
    pub fn cpu_hyper_threading(&self) -> bool {
        self.cores().hyper_threading()
    }

    /// Clock speed in Hz, or [`FAILED`]
    pub fn cpu_clock_speed_hz(&self) -> i64 {
        non_negative(self.probe.cpu_clock_speed_hz())
    }

    /// Installed physical memory in bytes, or [`FAILED`]
    pub fn ram_total_bytes(&self) -> i64 {
        non_negative(self.probe.ram_total_bytes())
    }

    /// Free physical memory in bytes, or [`FAILED`]
    pub fn ram_free_bytes(&self) -> i64 {
        non_negative(self.probe.ram_free_bytes())
    }

    pub fn current_thread_id(&self) -> u64 {
        self.probe.current_thread_id()
    }

    /// Every query taken once, stamped with the current time
    pub fn snapshot(&self) -> HostSnapshot {
        let cores = self.cores();
        HostSnapshot {
            probe: self.probe.name().to_string(),
            captured_at: chrono::Utc::now(),
            cpu_architecture: self.cpu_architecture(),
            cpu_logical_cores: cores.logical,
            cpu_physical_cores: cores.physical,
            cpu_hyper_threading: cores.hyper_threading(),
            cpu_clock_speed_hz: self.cpu_clock_speed_hz(),
            ram_total_bytes: self.ram_total_bytes(),
            ram_free_bytes: self.ram_free_bytes(),
        }
    }
}

fn non_negative(value: crate::Result<i64>) -> i64 {
    value.ok().filter(|v| *v >= 0).unwrap_or(FAILED)
}
