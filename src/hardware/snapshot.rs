//! Point-in-time record of every host query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All host facts captured together.
///
/// Fields hold the same values the sentinel surface returns, failures
/// included, so a consumer can store or ship them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Name of the probe that answered
    pub probe: String,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
    /// Processor model string, or `<unknown>`
    pub cpu_architecture: String,
    pub cpu_logical_cores: i32,
    pub cpu_physical_cores: i32,
    pub cpu_hyper_threading: bool,
    pub cpu_clock_speed_hz: i64,
    pub ram_total_bytes: i64,
    pub ram_free_bytes: i64,
}

impl HostSnapshot {
    /// True when no query in this snapshot hit its failure sentinel
    pub fn is_complete(&self) -> bool {
        self.cpu_architecture != crate::host::UNKNOWN
            && self.cpu_logical_cores >= 0
            && self.cpu_physical_cores >= 0
            && self.cpu_clock_speed_hz >= 0
            && self.ram_total_bytes >= 0
            && self.ram_free_bytes >= 0
    }
}
