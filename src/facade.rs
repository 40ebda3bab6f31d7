//! The total, string-valued query interface.

use crate::collector::traits::FileSystem;
use crate::context::ProcessContext;
use crate::error::ResolveError;
use crate::facts::SystemFacts;
use crate::registry::Trait;
use crate::resolver::Resolver;
use tracing::{debug, error, warn};

/// Value reported for anything that cannot be resolved.
pub const NOT_FOUND: &str = "0";

fn collapse(t: Trait, pid: u32, result: Result<Option<String>, ResolveError>) -> String {
    match result {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!(%t, pid, "not provided on this platform");
            NOT_FOUND.to_string()
        }
        Err(e) => {
            if e.is_fatal() {
                error!(%t, pid, "{}", e);
            } else if e.is_not_found() {
                debug!(%t, pid, "{}", e);
            } else {
                warn!(%t, pid, "{}", e);
            }
            NOT_FOUND.to_string()
        }
    }
}

/// Resolves traits to text.
///
/// `resolve` never fails: absent values and errors both read as `"0"`, with
/// the cause logged. Each call reads the process fresh. To parse the process
/// status record once for many traits, resolve them through a [`Batch`].
///
/// # Example
///
/// ```
/// use systraits::collector::MockFs;
/// use systraits::facts::MockFacts;
/// use systraits::{SystemInfo, Trait};
///
/// let info = SystemInfo::new(MockFacts::typical_host(), MockFs::typical_host(), "/proc");
///
/// assert_eq!(info.resolve(Trait::ProcessorFrequency, 1234), "3000000000");
/// assert_eq!(info.resolve(Trait::Executable, 1234), "initd");
/// assert_eq!(info.resolve(Trait::Executable, 4321), "0");
///
/// let mut batch = info.begin_batch(1234);
/// assert_eq!(batch.resolve(Trait::ParentPid), "1");
/// assert_eq!(batch.resolve(Trait::State), "S");
/// ```
#[derive(Debug, Clone)]
pub struct SystemInfo<S: SystemFacts, F: FileSystem> {
    resolver: Resolver<S, F>,
}

impl<S: SystemFacts, F: FileSystem + Clone> SystemInfo<S, F> {
    pub fn new(facts: S, fs: F, proc_path: impl Into<String>) -> Self {
        Self::with_resolver(Resolver::new(facts, fs, proc_path))
    }
}

impl<S: SystemFacts, F: FileSystem> SystemInfo<S, F> {
    pub fn with_resolver(resolver: Resolver<S, F>) -> Self {
        Self { resolver }
    }

    /// Resolves `t` for `pid`, or `"0"` when it cannot be resolved.
    pub fn resolve(&self, t: Trait, pid: u32) -> String {
        self.begin_batch(pid).resolve(t)
    }

    /// Like [`resolve`](Self::resolve), but fatal-class errors are returned
    /// instead of reading as `"0"`.
    pub fn resolve_checked(&self, t: Trait, pid: u32) -> Result<String, ResolveError> {
        self.begin_batch(pid).resolve_checked(t)
    }

    /// Resolves `t` for `pid`, keeping absence and failure apart.
    pub fn try_resolve(&self, t: Trait, pid: u32) -> Result<Option<String>, ResolveError> {
        self.begin_batch(pid).try_resolve(t)
    }

    /// Starts a batch for `pid`. Stat fields resolved through it share one
    /// read of `/proc/[pid]/stat`.
    pub fn begin_batch(&self, pid: u32) -> Batch<'_, S, F> {
        Batch {
            resolver: &self.resolver,
            context: ProcessContext::new(pid),
        }
    }

    /// Resolves every trait for `pid` in one batch, in declaration order.
    pub fn resolve_all(&self, pid: u32) -> Vec<(Trait, String)> {
        let mut batch = self.begin_batch(pid);
        Trait::ALL.iter().map(|&t| (t, batch.resolve(t))).collect()
    }
}

/// Resolutions for one pid that share its status record.
///
/// The record is read the first time a stat field needs it and kept until
/// the batch is dropped. A failed read is not retried within the batch.
#[derive(Debug)]
pub struct Batch<'a, S: SystemFacts, F: FileSystem> {
    resolver: &'a Resolver<S, F>,
    context: ProcessContext,
}

impl<S: SystemFacts, F: FileSystem> Batch<'_, S, F> {
    pub fn pid(&self) -> u32 {
        self.context.pid()
    }

    /// Resolves `t`, or `"0"` when it cannot be resolved.
    pub fn resolve(&mut self, t: Trait) -> String {
        let result = self.try_resolve(t);
        collapse(t, self.pid(), result)
    }

    /// Like [`resolve`](Self::resolve), but fatal-class errors are returned.
    pub fn resolve_checked(&mut self, t: Trait) -> Result<String, ResolveError> {
        match self.try_resolve(t) {
            Err(e) if e.is_fatal() => Err(e),
            result => Ok(collapse(t, self.pid(), result)),
        }
    }

    /// Resolves `t`, keeping absence and failure apart.
    pub fn try_resolve(&mut self, t: Trait) -> Result<Option<String>, ResolveError> {
        self.resolver.resolve_raw(t, &mut self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::RealFs;
    use crate::collector::mock::{INITD_STAT, MockFs};
    use crate::facts::MockFacts;
    use crate::source::Family;

    fn info() -> SystemInfo<MockFacts, MockFs> {
        SystemInfo::new(MockFacts::typical_host(), MockFs::typical_host(), "/proc")
    }

    #[test]
    fn test_processor_name() {
        assert_eq!(
            info().resolve(Trait::ProcessorName, 1234),
            "Example CPU @ 3.00GHz"
        );
    }

    #[test]
    fn test_processor_frequency_from_cpuinfo() {
        #[cfg(target_os = "linux")]
        {
            let facts = crate::facts::LinuxFacts::new(MockFs::typical_host(), "/proc");
            let info = SystemInfo::new(facts, MockFs::typical_host(), "/proc");
            assert_eq!(info.resolve(Trait::ProcessorFrequency, 1), "3000000000");
        }

        assert_eq!(info().resolve(Trait::ProcessorFrequency, 1), "3000000000");
    }

    #[test]
    fn test_unlimited_hard_limit() {
        assert_eq!(
            info().resolve(Trait::VirtualMemory, 1234),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_stat_field_before_any_status_field() {
        let info = info();

        assert_eq!(info.resolve(Trait::Executable, 1234), "initd");
        assert_eq!(info.resolve(Trait::VoluntaryCtxtSwitches, 1234), "500");
        assert_eq!(info.resolve(Trait::NonvoluntaryCtxtSwitches, 1234), "50");
        assert_eq!(info.resolve(Trait::ParentPid, 1234), "1");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let info = info();

        for &t in Trait::ALL {
            let first = info.resolve(t, 1234);
            let second = info.resolve(t, 1234);
            assert_eq!(first, second, "{} changed between calls", t);
        }
    }

    #[test]
    fn test_pid_change_drops_record() {
        let info = info();

        assert_eq!(info.resolve(Trait::Executable, 1234), "initd");
        assert_eq!(info.resolve(Trait::Executable, 1), "systemd");
        assert_eq!(info.resolve(Trait::Executable, 1234), "initd");
    }

    #[test]
    fn test_missing_process_reads_zero() {
        let info = info();

        assert_eq!(info.resolve(Trait::Pid, 9999), "0");
        assert_eq!(info.resolve(Trait::VoluntaryCtxtSwitches, 9999), "0");
        assert!(matches!(
            info.try_resolve(Trait::State, 9999),
            Err(ResolveError::ProcessGone(9999))
        ));

        let mut batch = info.begin_batch(9999);
        assert!(matches!(
            batch.try_resolve(Trait::Pid),
            Err(ResolveError::ProcessGone(9999))
        ));
        assert!(matches!(
            batch.try_resolve(Trait::State),
            Err(ResolveError::RecordUnavailable(9999))
        ));
    }

    fn write_stat(root: &std::path::Path, pid: u32, stat: &str) {
        let dir = root.join(pid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stat"), stat).unwrap();
    }

    #[test]
    fn test_resolve_rereads_changed_stat() {
        let root = tempfile::tempdir().unwrap();
        write_stat(root.path(), 1234, INITD_STAT);
        let proc_path = root.path().to_string_lossy().into_owned();
        let info = SystemInfo::new(MockFacts::new(), RealFs::new(), proc_path);

        assert_eq!(info.resolve(Trait::UserTime, 1234), "100");

        write_stat(
            root.path(),
            1234,
            &INITD_STAT.replacen(" 100 50 200 100 ", " 999 50 200 100 ", 1),
        );
        assert_eq!(info.resolve(Trait::UserTime, 1234), "999");
    }

    #[test]
    fn test_resolve_sees_process_that_appears_later() {
        let root = tempfile::tempdir().unwrap();
        let proc_path = root.path().to_string_lossy().into_owned();
        let info = SystemInfo::new(MockFacts::new(), RealFs::new(), proc_path);

        assert_eq!(info.resolve(Trait::Pid, 4321), "0");

        write_stat(root.path(), 4321, &INITD_STAT.replacen("1234", "4321", 1));
        assert_eq!(info.resolve(Trait::Pid, 4321), "4321");
        assert_eq!(info.try_resolve(Trait::Pid, 4321).unwrap().as_deref(), Some("4321"));
    }

    #[test]
    fn test_batch_reads_stat_once() {
        let root = tempfile::tempdir().unwrap();
        write_stat(root.path(), 1234, INITD_STAT);
        let proc_path = root.path().to_string_lossy().into_owned();
        let info = SystemInfo::new(MockFacts::new(), RealFs::new(), proc_path);

        let mut batch = info.begin_batch(1234);
        assert_eq!(batch.resolve(Trait::UserTime), "100");

        write_stat(
            root.path(),
            1234,
            &INITD_STAT.replacen(" 100 50 200 100 ", " 999 50 200 100 ", 1),
        );
        assert_eq!(batch.resolve(Trait::UserTime), "100");
        drop(batch);

        assert_eq!(info.begin_batch(1234).resolve(Trait::UserTime), "999");
    }

    #[test]
    fn test_cache_family_is_integer_or_zero() {
        let info = info();

        for t in Trait::ALL.iter().filter(|t| t.family() == Family::Cache) {
            let value = info.resolve(*t, 1234);
            assert!(value.parse::<u64>().is_ok(), "{} = {:?}", t, value);
        }
        assert_eq!(info.resolve(Trait::LevelFourCacheSize, 1234), "0");
        assert_eq!(info.resolve(Trait::LevelOneDCacheLineSize, 1234), "64");
    }

    #[test]
    fn test_fatal_frequency_reads_zero_but_is_reported() {
        let facts = MockFacts {
            unparseable_frequency: Some("fast".to_string()),
            ..MockFacts::typical_host()
        };
        let info = SystemInfo::new(facts, MockFs::typical_host(), "/proc");

        assert_eq!(info.resolve(Trait::ProcessorFrequency, 1), "0");
        assert!(
            info.try_resolve(Trait::ProcessorFrequency, 1)
                .unwrap_err()
                .is_fatal()
        );
        assert!(info.resolve_checked(Trait::ProcessorFrequency, 1).is_err());
    }

    #[test]
    fn test_resolve_checked_collapses_non_fatal_errors() {
        let info = info();

        assert_eq!(info.resolve_checked(Trait::Pid, 9999).unwrap(), "0");
        assert_eq!(info.resolve_checked(Trait::LevelFourCacheSize, 1).unwrap(), "0");
        assert_eq!(info.resolve_checked(Trait::MemFree, 1).unwrap(), "8192000 kB");
    }

    #[test]
    fn test_unknown_policy_reads_zero() {
        let facts = MockFacts {
            policy: Some(6),
            ..MockFacts::typical_host()
        };
        let info = SystemInfo::new(facts, MockFs::typical_host(), "/proc");

        assert_eq!(info.resolve(Trait::Scheduler, 1), "0");
    }

    #[test]
    fn test_resolve_all_in_declaration_order() {
        let all = info().resolve_all(1234);

        assert_eq!(all.len(), Trait::COUNT);
        assert_eq!(all[0].0, Trait::LevelOneICacheSize);
        assert_eq!(all[0].1, "32768");
        assert!(all.iter().map(|(t, _)| *t).eq(Trait::ALL.iter().copied()));
        assert!(
            all.iter()
                .any(|(t, v)| *t == Trait::MemAvailable && v == "12000000 kB")
        );
    }

    #[test]
    fn test_empty_platform_reads_zero_everywhere() {
        let info = SystemInfo::new(MockFacts::new(), MockFs::new(), "/proc");

        for (t, value) in info.resolve_all(1) {
            assert_eq!(value, "0", "{}", t);
        }
    }
}
