//! Per-process readers for `/proc/[pid]/status` and `/proc/[pid]/stat`.

use crate::collector::procfs::parser::{ProcStat, parse_proc_stat};
use crate::collector::procfs::system::{lookup_named_value, trimmed};
use crate::collector::traits::FileSystem;
use crate::error::ResolveError;
use std::path::Path;

/// Reads per-process records from `/proc/[pid]/`.
#[derive(Debug, Clone)]
pub struct ProcessCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> ProcessCollector<F> {
    /// Creates a new process collector.
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

    /// Returns a value from `/proc/[pid]/status`, trimmed.
    pub fn status_value(&self, pid: u32, key: &str) -> Result<Option<String>, ResolveError> {
        let path = format!("{}/{}/status", self.proc_path, pid);
        match lookup_named_value(&self.fs, &path, key) {
            Ok(value) => Ok(trimmed(value)),
            Err(e) => Err(self.classify(pid, e)),
        }
    }

    /// Reads and parses `/proc/[pid]/stat`.
    pub fn collect_stat(&self, pid: u32) -> Result<ProcStat, ResolveError> {
        let path = format!("{}/{}/stat", self.proc_path, pid);
        let content = self
            .fs
            .read_file(Path::new(&path))
            .map_err(|source| self.classify(pid, ResolveError::Io { path, source }))?;

        Ok(parse_proc_stat(&content)?)
    }

    /// Reports a read failure as `ProcessGone` when the whole process
    /// directory is missing.
    fn classify(&self, pid: u32, err: ResolveError) -> ResolveError {
        let proc_dir = format!("{}/{}", self.proc_path, pid);
        if self.fs.exists(Path::new(&proc_dir)) {
            err
        } else {
            ResolveError::ProcessGone(pid)
        }
    }
}
