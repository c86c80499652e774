//! Windows probe backed by the registry and Win32 system information calls.

use std::ffi::c_void;
use std::mem::size_of;
use std::ptr;

use windows_sys::Win32::Foundation::{GetLastError, ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS};
use windows_sys::Win32::System::Registry::{
    RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_DWORD, RRF_RT_REG_SZ,
};
use windows_sys::Win32::System::SystemInformation::{
    GetLogicalProcessorInformation, GlobalMemoryStatusEx, MEMORYSTATUSEX,
    SYSTEM_LOGICAL_PROCESSOR_INFORMATION,
};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;

use super::{bytes_to_i64, HostProbe};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::hardware::topology::{tally_topology, Relationship};
use crate::hardware::CoreCount;

/// Reads processor facts from `HKLM` and topology from the kernel
#[derive(Debug, Clone)]
pub struct RegistryProbe {
    processor_key: String,
    name_value: String,
    mhz_value: String,
}

impl RegistryProbe {
    pub fn new() -> Self {
        Self::with_config(&ProbeConfig::default())
    }

    pub fn with_config(config: &ProbeConfig) -> Self {
        Self {
            processor_key: config.registry.processor_key.clone(),
            name_value: config.registry.name_value.clone(),
            mhz_value: config.registry.mhz_value.clone(),
        }
    }

    fn source_name(&self, value: &str) -> String {
        format!(r"HKLM\{}\{}", self.processor_key, value)
    }

    fn read_string(&self, value: &str) -> Result<String> {
        let key = to_wide(&self.processor_key);
        let name = to_wide(value);
        let mut size = 0u32;

        // SAFETY: key and name are NUL-terminated; a null data pointer asks for the size only.
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                key.as_ptr(),
                name.as_ptr(),
                RRF_RT_REG_SZ,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(self.registry_error(value, status));
        }

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        let mut size = (buffer.len() * 2) as u32;
        // SAFETY: buffer holds `size` bytes and outlives the call.
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                key.as_ptr(),
                name.as_ptr(),
                RRF_RT_REG_SZ,
                ptr::null_mut(),
                buffer.as_mut_ptr().cast::<c_void>(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(self.registry_error(value, status));
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Ok(String::from_utf16_lossy(&buffer[..len]).trim().to_string())
    }

    fn read_dword(&self, value: &str) -> Result<u32> {
        let key = to_wide(&self.processor_key);
        let name = to_wide(value);
        let mut data = 0u32;
        let mut size = size_of::<u32>() as u32;

        // SAFETY: data is a valid u32 slot and size matches it.
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                key.as_ptr(),
                name.as_ptr(),
                RRF_RT_REG_DWORD,
                ptr::null_mut(),
                (&mut data as *mut u32).cast::<c_void>(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(self.registry_error(value, status));
        }
        Ok(data)
    }

    fn registry_error(&self, value: &str, status: u32) -> ProbeError {
        let err = std::io::Error::from_raw_os_error(status as i32);
        tracing::debug!(source = %self.source_name(value), error = %err, "registry read failed");
        ProbeError::source_unavailable(self.source_name(value), err)
    }
}

impl Default for RegistryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for RegistryProbe {
    fn name(&self) -> &'static str {
        "registry"
    }

    fn cpu_architecture(&self) -> Result<String> {
        let name = self.read_string(&self.name_value)?;
        if name.is_empty() {
            return Err(ProbeError::pattern_mismatch("ProcessorNameString"));
        }
        Ok(name)
    }

    fn cpu_total_cores(&self) -> Result<CoreCount> {
        let entries = logical_processor_information()?;
        let tagged = entries.iter().map(|entry| {
            let relationship = Relationship::from_raw(entry.Relationship);
            (relationship, entry.ProcessorMask as u64)
        });
        tally_topology(tagged)
            .inspect_err(|err| tracing::debug!(error = %err, "topology rejected"))
    }

    fn cpu_clock_speed_hz(&self) -> Result<i64> {
        let mhz = self.read_dword(&self.mhz_value)?;
        Ok(i64::from(mhz) * 1_000_000)
    }

    fn ram_total_bytes(&self) -> Result<i64> {
        Ok(bytes_to_i64(memory_status()?.ullTotalPhys))
    }

    fn ram_free_bytes(&self) -> Result<i64> {
        Ok(bytes_to_i64(memory_status()?.ullAvailPhys))
    }
}

/// Fetch the full topology listing, growing the buffer until it fits
fn logical_processor_information() -> Result<Vec<SYSTEM_LOGICAL_PROCESSOR_INFORMATION>> {
    let entry_size = size_of::<SYSTEM_LOGICAL_PROCESSOR_INFORMATION>();
    let mut length = 0u32;
    let mut buffer: Vec<SYSTEM_LOGICAL_PROCESSOR_INFORMATION> = Vec::new();

    loop {
        // SAFETY: buffer has capacity for `length` bytes (zero on the first pass).
        let ok = unsafe { GetLogicalProcessorInformation(buffer.as_mut_ptr(), &mut length) };
        if ok != 0 {
            // SAFETY: the call initialised `length` bytes of whole entries.
            unsafe { buffer.set_len(length as usize / entry_size) };
            return Ok(buffer);
        }

        // SAFETY: no preconditions.
        let code = unsafe { GetLastError() };
        if code != ERROR_INSUFFICIENT_BUFFER {
            let err = std::io::Error::from_raw_os_error(code as i32);
            tracing::debug!(error = %err, "GetLogicalProcessorInformation failed");
            return Err(ProbeError::source_unavailable(
                "GetLogicalProcessorInformation",
                err,
            ));
        }

        buffer = Vec::with_capacity((length as usize).div_ceil(entry_size));
    }
}

fn memory_status() -> Result<MEMORYSTATUSEX> {
    // SAFETY: MEMORYSTATUSEX is plain old data; all-zero is a valid value.
    let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
    status.dwLength = size_of::<MEMORYSTATUSEX>() as u32;

    // SAFETY: status is initialised with its own size as required.
    if unsafe { GlobalMemoryStatusEx(&mut status) } == 0 {
        let err = std::io::Error::last_os_error();
        tracing::debug!(error = %err, "GlobalMemoryStatusEx failed");
        return Err(ProbeError::source_unavailable("GlobalMemoryStatusEx", err));
    }
    Ok(status)
}

pub(super) fn current_thread_id_impl() -> u64 {
    // SAFETY: no preconditions.
    u64::from(unsafe { GetCurrentThreadId() })
}

fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_are_nul_terminated() {
        assert_eq!(to_wide("~MHz"), vec![0x7E, 0x4D, 0x48, 0x7A, 0]);
    }

    #[test]
    fn live_topology_is_consistent() {
        let cores = RegistryProbe::new().cpu_total_cores().unwrap();
        assert!(cores.physical > 0);
        assert!(cores.logical >= cores.physical);
    }

    #[test]
    fn missing_registry_value_is_source_unavailable() {
        let mut config = ProbeConfig::default();
        config.registry.name_value = "HostProbeDoesNotExist".to_string();
        config.registry.mhz_value = "HostProbeDoesNotExist".to_string();
        let probe = RegistryProbe::with_config(&config);

        assert!(matches!(
            probe.cpu_architecture(),
            Err(ProbeError::SourceUnavailable { .. })
        ));
        assert!(matches!(
            probe.cpu_clock_speed_hz(),
            Err(ProbeError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn live_memory_is_consistent() {
        let probe = RegistryProbe::new();
        let total = probe.ram_total_bytes().unwrap();
        let free = probe.ram_free_bytes().unwrap();
        assert!(total > 0);
        assert!(free <= total);
    }
}
