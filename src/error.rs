//! Probe failure reasons.
//!
//! The public query surface never returns these; it maps every failure to a
//! sentinel value. They exist so probes can use `?` internally and so callers
//! going through [`crate::probe::HostProbe`] directly can see why a lookup
//! failed.

use thiserror::Error;

/// Why a host query could not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The OS-exposed source could not be opened or queried
    #[error("Source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// The source was read but the expected field was not found
    #[error("Pattern mismatch: no `{field}` field found")]
    PatternMismatch { field: &'static str },

    /// Topology enumeration returned a relationship we do not understand
    #[error("Unexpected topology relationship: {relationship}")]
    UnexpectedTopology { relationship: i32 },

    /// The active probe has no way to answer this query
    #[error("Unsupported query: {query}")]
    Unsupported { query: &'static str },
}

impl ProbeError {
    /// Create a source unavailable error
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ProbeError::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a pattern mismatch error
    pub fn pattern_mismatch(field: &'static str) -> Self {
        ProbeError::PatternMismatch { field }
    }

    /// Create an unexpected topology error
    pub fn unexpected_topology(relationship: i32) -> Self {
        ProbeError::UnexpectedTopology { relationship }
    }

    /// Create an unsupported query error
    pub fn unsupported(query: &'static str) -> Self {
        ProbeError::Unsupported { query }
    }
}

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
