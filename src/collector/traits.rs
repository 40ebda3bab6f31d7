//! The file-access seam between the procfs readers and the host.
//!
//! Readers only ever need two things from the host: the text of a file and
//! whether a path is there at all (to tell a vanished process from an
//! unreadable file). Tests swap in [`MockFs`](crate::collector::MockFs).

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read-only view of a proc tree.
pub trait FileSystem: Send + Sync {
    /// Returns the whole text of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Returns `true` if `path` names a file or directory.
    fn exists(&self, path: &Path) -> bool;
}

/// Typical upper bound for the proc files this crate reads.
const PROC_READ_HINT: usize = 4096;

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        // procfs files report a length of 0, so size the buffer up front.
        let mut text = String::with_capacity(PROC_READ_HINT);
        File::open(path)?.read_to_string(&mut text)?;
        Ok(text)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
