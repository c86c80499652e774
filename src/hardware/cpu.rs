//! `/proc/cpuinfo` and cpufreq sysfs field parsing
//!
//! Kept free of any file or OS access so the fragile part (the text format)
//! can be exercised with captured samples. Only the first matching line is
//! used; on multi-socket hosts every processor block repeats the same model.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ProbeError, Result};

const MODEL_NAME_FIELD: &str = "model name";
const CPU_MHZ_FIELD: &str = "cpu MHz";
const CPUFREQ_FIELD: &str = "cpufreq";

static MODEL_NAME_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static CPU_MHZ_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn model_name_pattern() -> Option<&'static Regex> {
    MODEL_NAME_PATTERN
        .get_or_init(|| Regex::new(r"(?m)^model name\s*:[ \t]*(.*?)\s*$").ok())
        .as_ref()
}

fn cpu_mhz_pattern() -> Option<&'static Regex> {
    CPU_MHZ_PATTERN
        .get_or_init(|| Regex::new(r"(?m)^cpu MHz\s*:[ \t]*(.*?)\s*$").ok())
        .as_ref()
}

fn first_capture<'a>(pattern: Option<&Regex>, text: &'a str) -> Option<&'a str> {
    pattern?.captures(text)?.get(1).map(|value| value.as_str())
}

/// Processor model string from the first `model name` line.
///
/// A present but blank field counts as a mismatch so callers never see an
/// empty model string.
pub fn parse_model_name(cpuinfo: &str) -> Result<String> {
    first_capture(model_name_pattern(), cpuinfo)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProbeError::pattern_mismatch(MODEL_NAME_FIELD))
}

/// Clock speed in MHz from the first `cpu MHz` line
pub fn parse_clock_mhz(cpuinfo: &str) -> Result<f64> {
    first_capture(cpu_mhz_pattern(), cpuinfo)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|mhz| mhz.is_finite() && *mhz >= 0.0)
        .ok_or_else(|| ProbeError::pattern_mismatch(CPU_MHZ_FIELD))
}

/// Convert a MHz reading to whole Hz
pub fn mhz_to_hz(mhz: f64) -> i64 {
    (mhz * 1_000_000.0).round() as i64
}

/// Frequency in kHz from a single-value cpufreq sysfs file
pub fn parse_khz(content: &str) -> Result<u64> {
    content
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|khz| *khz > 0)
        .ok_or_else(|| ProbeError::pattern_mismatch(CPUFREQ_FIELD))
}

/// Convert a kHz reading to Hz
pub fn khz_to_hz(khz: u64) -> i64 {
    i64::try_from(khz.saturating_mul(1_000)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const X86_SAMPLE: &str = "processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz
stepping\t: 10
cpu MHz\t\t: 3700.000
cache size\t: 12288 KB

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz
cpu MHz\t\t: 4512.346
";

    const ARM_SAMPLE: &str = "processor\t: 0
BogoMIPS\t: 48.00
Features\t: fp asimd evtstrm aes pmull sha1 sha2 crc32
CPU implementer\t: 0x41
CPU part\t: 0xd08
";

    #[test]
    fn model_name_uses_first_processor_block() {
        assert_eq!(
            parse_model_name(X86_SAMPLE).unwrap(),
            "Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz"
        );
    }

    #[test]
    fn clock_uses_first_processor_block() {
        assert_eq!(parse_clock_mhz(X86_SAMPLE).unwrap(), 3700.0);
        assert_eq!(
            mhz_to_hz(parse_clock_mhz(X86_SAMPLE).unwrap()),
            3_700_000_000
        );
    }

    #[test]
    fn fractional_mhz_rounds_to_nearest_hz() {
        assert_eq!(mhz_to_hz(2894.5625), 2_894_562_500);
        assert_eq!(mhz_to_hz(0.0), 0);
    }

    #[test]
    fn empty_input_is_a_mismatch() {
        assert_eq!(
            parse_model_name(""),
            Err(ProbeError::pattern_mismatch("model name"))
        );
        assert_eq!(
            parse_clock_mhz(""),
            Err(ProbeError::pattern_mismatch("cpu MHz"))
        );
    }

    #[test]
    fn arm_cpuinfo_without_fields_is_a_mismatch() {
        assert!(parse_model_name(ARM_SAMPLE).is_err());
        assert!(parse_clock_mhz(ARM_SAMPLE).is_err());
    }

    #[test]
    fn blank_model_name_is_a_mismatch() {
        assert!(parse_model_name("model name\t: \ncpu MHz\t: 1000\n").is_err());
    }

    #[test]
    fn garbage_clock_value_is_a_mismatch() {
        assert!(parse_clock_mhz("cpu MHz\t: unknown\n").is_err());
        assert!(parse_clock_mhz("cpu MHz\t: -5\n").is_err());
    }

    #[test]
    fn field_must_start_a_line() {
        assert!(parse_model_name("not a model name: fake\n").is_err());
    }

    #[test]
    fn cpufreq_values_are_khz() {
        assert_eq!(parse_khz("3700000\n").unwrap(), 3_700_000);
        assert_eq!(khz_to_hz(parse_khz("3700000\n").unwrap()), 3_700_000_000);
    }

    #[test]
    fn bad_cpufreq_values_are_a_mismatch() {
        assert!(parse_khz("").is_err());
        assert!(parse_khz("0\n").is_err());
        assert!(parse_khz("<unknown>\n").is_err());
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let sample = "model name : AMD Ryzen 7 5800X 8-Core Processor\r\ncpu MHz : 3800.000\r\n";
        assert_eq!(
            parse_model_name(sample).unwrap(),
            "AMD Ryzen 7 5800X 8-Core Processor"
        );
        assert_eq!(parse_clock_mhz(sample).unwrap(), 3800.0);
    }
}
