//! System-wide readers for `/proc/cpuinfo` and `/proc/meminfo`.

use crate::collector::procfs::parser::{parse_cpu_mhz, parse_named_value};
use crate::collector::traits::FileSystem;
use crate::error::ResolveError;
use std::path::Path;

/// Reads `path` and returns the raw value of the first record whose key starts
/// with `key`.
///
/// An unreadable file is an error; a missing key is `Ok(None)`.
pub(crate) fn lookup_named_value<F: FileSystem>(
    fs: &F,
    path: &str,
    key: &str,
) -> Result<Option<String>, ResolveError> {
    let content = fs
        .read_file(Path::new(path))
        .map_err(|source| ResolveError::Io {
            path: path.to_string(),
            source,
        })?;

    Ok(parse_named_value(&content, key).map(str::to_string))
}

/// Trims the raw scanner output; blank values count as absent.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads system-wide facts from text files under the proc root.
#[derive(Debug, Clone)]
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Returns the `model name` of the first processor in `/proc/cpuinfo`.
    pub fn processor_name(&self) -> Result<Option<String>, ResolveError> {
        let path = format!("{}/cpuinfo", self.proc_path);
        Ok(trimmed(lookup_named_value(&self.fs, &path, "model name")?))
    }

    /// Returns the `cpu MHz` of the first processor in `/proc/cpuinfo`, in Hz.
    ///
    /// Kernels that do not publish a frequency (most ARM builds) yield `None`.
    /// A value that is present but unparseable, or too large for `u64` once in
    /// Hz, is [`ResolveError::Frequency`].
    pub fn processor_frequency(&self) -> Result<Option<u64>, ResolveError> {
        let path = format!("{}/cpuinfo", self.proc_path);
        let Some(text) = trimmed(lookup_named_value(&self.fs, &path, "cpu MHz")?) else {
            return Ok(None);
        };

        parse_cpu_mhz(&text)
            .map(Some)
            .map_err(|_| ResolveError::Frequency { text })
    }

    /// Returns a `/proc/meminfo` value verbatim, including its unit suffix.
    pub fn meminfo_value(&self, key: &str) -> Result<Option<String>, ResolveError> {
        let path = format!("{}/meminfo", self.proc_path);
        Ok(trimmed(lookup_named_value(&self.fs, &path, key)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_processor_name_is_trimmed() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "model name : Example CPU @ 3.00GHz\n");
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(
            collector.processor_name().unwrap().as_deref(),
            Some("Example CPU @ 3.00GHz")
        );
    }

    #[test]
    fn test_processor_frequency_scales_mhz_to_hz() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "cpu MHz : 3000.000\n");
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(collector.processor_frequency().unwrap(), Some(3_000_000_000));
    }

    #[test]
    fn test_processor_frequency_missing_key_is_absent() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "processor : 0\nBogoMIPS : 50.00\n");
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(collector.processor_frequency().unwrap(), None);
    }

    #[test]
    fn test_processor_frequency_garbage_is_fatal() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "cpu MHz : turbo\n");
        let collector = SystemCollector::new(fs, "/proc");

        let err = collector.processor_frequency().unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ResolveError::Frequency { ref text } if text == "turbo"));
    }

    #[test]
    fn test_processor_frequency_out_of_range_is_fatal() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "cpu MHz\t\t: 1e20\n");
        let collector = SystemCollector::new(fs, "/proc");

        assert!(collector.processor_frequency().unwrap_err().is_fatal());
    }

    #[test]
    fn test_meminfo_value_keeps_unit() {
        let fs = MockFs::typical_host();
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(
            collector.meminfo_value("MemTotal").unwrap().as_deref(),
            Some("16384000 kB")
        );
        assert_eq!(
            collector.meminfo_value("HugePages_Total").unwrap().as_deref(),
            Some("0")
        );
        assert_eq!(collector.meminfo_value("NoSuchKey").unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let collector = SystemCollector::new(MockFs::new(), "/proc");

        let err = collector.meminfo_value("MemTotal").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/proc/meminfo"));
    }

    #[test]
    fn test_custom_proc_root() {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/meminfo", "MemFree:  42 kB\n");
        let collector = SystemCollector::new(fs, "/host/proc");

        assert_eq!(
            collector.meminfo_value("MemFree").unwrap().as_deref(),
            Some("42 kB")
        );
    }
}
