//! An in-memory proc tree.

use crate::collector::traits::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// A proc tree held in memory, so resolution runs the same on any host.
///
/// A path exists if it is a file, a registered directory, or an ancestor of
/// either.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `content` at `path`, replacing any earlier content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Registers a directory that may hold no files.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        self.dirs.insert(path.as_ref().to_path_buf());
    }

    /// Adds `/proc/<pid>/` with its `stat` and `status` files.
    pub fn add_process(&mut self, pid: u32, stat: &str, status: &str) {
        let dir = PathBuf::from(format!("/proc/{}", pid));
        self.add_file(dir.join("stat"), stat);
        self.add_file(dir.join("status"), status);
        self.dirs.insert(dir);
    }

    /// Drops `/proc/<pid>/` and everything under it, as when a process exits.
    pub fn remove_process(&mut self, pid: u32) {
        let dir = PathBuf::from(format!("/proc/{}", pid));
        self.files.retain(|path, _| !path.starts_with(&dir));
        self.dirs.retain(|path| !path.starts_with(&dir));
    }
}

impl FileSystem for MockFs {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(content) => Ok(content.clone()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.keys().chain(self.dirs.iter()).any(|p| p.starts_with(path))
    }
}
