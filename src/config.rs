//! Probe source configuration
//!
//! Every field has a default matching the real OS location, so most callers
//! never touch this. Overrides exist for hosts that expose the data elsewhere
//! (containers with a bind-mounted procfs, for example) and for tests.
//!
//! The crate never reads a config file on its own; callers load one and hand
//! it to a probe's `with_config` constructor.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sources consulted by the platform probes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Linux pseudo-file locations
    #[serde(default)]
    pub procfs: ProcfsConfig,

    /// Windows registry locations
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl ProbeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse probe config")
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read probe config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse probe config from {}", path.display()))
    }

    /// Serialize configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize probe config to TOML")
    }
}

/// Linux procfs sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcfsConfig {
    /// Kernel processor description (model name, cpu MHz)
    #[serde(default = "default_cpuinfo_path")]
    pub cpuinfo_path: PathBuf,

    /// cpufreq directory of the first processor (nominal clock in kHz)
    #[serde(default = "default_cpufreq_dir")]
    pub cpufreq_dir: PathBuf,
}

impl Default for ProcfsConfig {
    fn default() -> Self {
        Self {
            cpuinfo_path: default_cpuinfo_path(),
            cpufreq_dir: default_cpufreq_dir(),
        }
    }
}

fn default_cpuinfo_path() -> PathBuf {
    PathBuf::from("/proc/cpuinfo")
}

fn default_cpufreq_dir() -> PathBuf {
    PathBuf::from("/sys/devices/system/cpu/cpu0/cpufreq")
}

/// Windows registry sources, all under `HKEY_LOCAL_MACHINE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Key describing the first processor
    #[serde(default = "default_processor_key")]
    pub processor_key: String,

    /// REG_SZ value holding the model string
    #[serde(default = "default_name_value")]
    pub name_value: String,

    /// REG_DWORD value holding the nominal clock in MHz
    #[serde(default = "default_mhz_value")]
    pub mhz_value: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            processor_key: default_processor_key(),
            name_value: default_name_value(),
            mhz_value: default_mhz_value(),
        }
    }
}

fn default_processor_key() -> String {
    r"HARDWARE\DESCRIPTION\System\CentralProcessor\0".to_string()
}

fn default_name_value() -> String {
    "ProcessorNameString".to_string()
}

fn default_mhz_value() -> String {
    "~MHz".to_string()
}
