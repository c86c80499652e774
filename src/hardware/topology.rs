//! Processor topology counting

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

/// Logical and physical core counts reported together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreCount {
    /// Schedulable execution units, including hyper-threaded siblings
    pub logical: i32,
    /// Distinct silicon cores
    pub physical: i32,
}

impl CoreCount {
    /// Both counts set to the failure sentinel
    pub const FAILED: CoreCount = CoreCount {
        logical: -1,
        physical: -1,
    };

    pub fn new(logical: i32, physical: i32) -> Self {
        Self { logical, physical }
    }

    /// Same count for both, for sources that cannot tell them apart
    pub fn uniform(count: i32) -> Self {
        Self::new(count, count)
    }

    /// True when more than one logical core shares a physical core
    pub fn hyper_threading(&self) -> bool {
        self.logical != self.physical
    }

    pub fn as_pair(&self) -> (i32, i32) {
        (self.logical, self.physical)
    }
}

impl From<CoreCount> for (i32, i32) {
    fn from(cores: CoreCount) -> Self {
        cores.as_pair()
    }
}

/// Relationship tag attached to one processor topology entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    ProcessorCore,
    NumaNode,
    Cache,
    ProcessorPackage,
    /// Any tag we do not recognise, kept with its raw value
    Other(i32),
}

impl Relationship {
    /// Map a raw `LOGICAL_PROCESSOR_RELATIONSHIP` value
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Relationship::ProcessorCore,
            1 => Relationship::NumaNode,
            2 => Relationship::Cache,
            3 => Relationship::ProcessorPackage,
            other => Relationship::Other(other),
        }
    }
}

/// Count cores over a topology listing.
///
/// Each processor-core entry is one physical core carrying as many logical
/// cores as its affinity mask has bits set. NUMA, cache and package entries
/// are skipped. Any other relationship fails the whole tally: no partial
/// counts are ever returned.
pub fn tally_topology<I>(entries: I) -> Result<CoreCount>
where
    I: IntoIterator<Item = (Relationship, u64)>,
{
    let mut cores = CoreCount::new(0, 0);

    for (relationship, mask) in entries {
        match relationship {
            Relationship::ProcessorCore => {
                cores.logical += mask.count_ones() as i32;
                cores.physical += 1;
            }
            Relationship::NumaNode | Relationship::Cache | Relationship::ProcessorPackage => {}
            Relationship::Other(raw) => return Err(ProbeError::unexpected_topology(raw)),
        }
    }

    Ok(cores)
}
