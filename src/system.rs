//! Free-function query surface over the native probe.
//!
//! Each function builds the platform probe with default sources, asks one
//! question and returns a plain value. Failures come back as
//! [`UNKNOWN`](crate::UNKNOWN) or `-1`; see [`HostInfo`] for the rules.
//!
//! On Linux the physical core count is the online processor count, so
//! [`cpu_hyper_threading`] is always false there.

use crate::hardware::HostSnapshot;
use crate::host::HostInfo;

/// Processor model string, or `"<unknown>"`
pub fn cpu_architecture() -> String {
    HostInfo::native().cpu_architecture()
}

pub fn cpu_logical_cores() -> i32 {
    HostInfo::native().cpu_logical_cores()
}

pub fn cpu_physical_cores() -> i32 {
    HostInfo::native().cpu_physical_cores()
}

/// `(logical, physical)`, or `(-1, -1)`
pub fn cpu_total_cores() -> (i32, i32) {
    HostInfo::native().cpu_total_cores()
}

/// Clock speed in Hz, or `-1`
pub fn cpu_clock_speed_hz() -> i64 {
    HostInfo::native().cpu_clock_speed_hz()
}

pub fn cpu_hyper_threading() -> bool {
    HostInfo::native().cpu_hyper_threading()
}

/// Installed physical memory in bytes, or `-1`
pub fn ram_total_bytes() -> i64 {
    HostInfo::native().ram_total_bytes()
}

/// Free physical memory in bytes, or `-1`
pub fn ram_free_bytes() -> i64 {
    HostInfo::native().ram_free_bytes()
}

/// OS identifier of the calling thread. Not comparable across platforms.
pub fn current_thread_id() -> u64 {
    HostInfo::native().current_thread_id()
}

/// Every query at once
pub fn snapshot() -> HostSnapshot {
    HostInfo::native().snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_counts_fail_together_or_hold_ordering() {
        let (logical, physical) = cpu_total_cores();
        if logical == -1 || physical == -1 {
            assert_eq!((logical, physical), (-1, -1));
        } else {
            assert!(logical >= physical);
            assert!(physical >= 0);
        }
        assert_eq!(cpu_logical_cores(), logical);
        assert_eq!(cpu_physical_cores(), physical);
        assert_eq!(cpu_hyper_threading(), logical != physical);
    }

    #[test]
    fn architecture_is_never_empty_and_stable() {
        let first = cpu_architecture();
        assert!(!first.is_empty());
        assert_eq!(first, cpu_architecture());
    }

    #[test]
    fn clock_is_hz_or_failed() {
        let hz = cpu_clock_speed_hz();
        assert!(hz == -1 || hz >= 0);
        assert_eq!(cpu_clock_speed_hz(), hz);
    }

    #[test]
    fn free_ram_never_exceeds_total() {
        let total = ram_total_bytes();
        let free = ram_free_bytes();
        if total >= 0 && free >= 0 {
            assert!(free <= total);
        }
    }

    #[test]
    fn thread_id_is_stable_on_one_thread() {
        assert_eq!(current_thread_id(), current_thread_id());
    }

    #[test]
    fn snapshot_matches_direct_queries() {
        let snapshot = snapshot();
        assert_eq!(snapshot.cpu_architecture, cpu_architecture());
        assert_eq!(
            (snapshot.cpu_logical_cores, snapshot.cpu_physical_cores),
            cpu_total_cores()
        );
    }
}
