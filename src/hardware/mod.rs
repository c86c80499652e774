//! Hardware fact types and OS-independent parsing
//!
//! Nothing in here touches the OS; the probes feed it raw text and topology
//! listings.

pub mod cpu;
mod snapshot;
pub mod topology;

pub use snapshot::HostSnapshot;
pub use topology::{CoreCount, Relationship};
