//! Host CPU, memory and thread queries.
//!
//! Answers the questions benchmark tooling asks about the machine it runs on:
//! processor model, core counts, hyper-threading, clock speed, RAM and the
//! calling thread's OS id. Each platform family has its own [`probe`]
//! implementation, selected at build time as [`NativeProbe`]:
//!
//! - Linux: `/proc/cpuinfo`, `sysconf`, `sysinfo(2)`, `gettid`
//! - Windows: the `CentralProcessor` registry key, `GetLogicalProcessorInformation`,
//!   `GlobalMemoryStatusEx`, `GetCurrentThreadId`
//! - Elsewhere: the `sysinfo` crate
//!
//! The [`system`] functions and [`HostInfo`] never return errors. A failed
//! lookup answers with [`UNKNOWN`] or `-1` and the caller decides what to do
//! with it. Use a [`HostProbe`] directly to see the [`ProbeError`] instead.
//!
//! ```no_run
//! let (logical, physical) = host_probe::system::cpu_total_cores();
//! if logical != -1 {
//!     println!("{logical} logical / {physical} physical");
//! }
//! ```

pub mod config;
pub mod error;
pub mod hardware;
mod host;
pub mod probe;
pub mod system;

pub use config::ProbeConfig;
pub use error::{ProbeError, Result};
pub use hardware::{CoreCount, HostSnapshot};
pub use host::{HostInfo, FAILED, UNKNOWN};
pub use probe::{HostProbe, NativeProbe};
