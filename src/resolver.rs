//! Dispatches a [`Trait`] to the backend that serves it.

use crate::collector::procfs::{ProcessCollector, SystemCollector};
use crate::collector::traits::FileSystem;
use crate::context::ProcessContext;
use crate::error::ResolveError;
use crate::facts::SystemFacts;
use crate::registry::Trait;
use crate::source::Source;

/// Resolves traits against one set of platform facts and one proc root.
#[derive(Debug, Clone)]
pub struct Resolver<S: SystemFacts, F: FileSystem> {
    facts: S,
    system: SystemCollector<F>,
    processes: ProcessCollector<F>,
}

impl<S: SystemFacts, F: FileSystem + Clone> Resolver<S, F> {
    /// Creates a resolver reading proc files from `proc_path` through `fs`.
    pub fn new(facts: S, fs: F, proc_path: impl Into<String>) -> Self {
        let proc_path = proc_path.into();
        Self {
            facts,
            system: SystemCollector::new(fs.clone(), proc_path.clone()),
            processes: ProcessCollector::new(fs, proc_path),
        }
    }
}

impl<S: SystemFacts, F: FileSystem> Resolver<S, F> {
    /// Resolves `t` for the process `ctx` targets.
    ///
    /// `Ok(None)` means the platform does not provide the value.
    pub fn resolve_raw(
        &self,
        t: Trait,
        ctx: &mut ProcessContext,
    ) -> Result<Option<String>, ResolveError> {
        match t.source() {
            Source::Cache(param) => Ok(self.facts.cache_parameter(param)?.map(|v| v.to_string())),
            Source::ProcessorCount => Ok(self.facts.processor_count()?.map(|n| n.to_string())),
            Source::ProcessorName => self.facts.processor_name(),
            Source::ProcessorFrequency => {
                Ok(self.facts.processor_frequency()?.map(|hz| hz.to_string()))
            }
            Source::Identity(field) => Ok(self
                .facts
                .identity()?
                .map(|identity| identity.field(field).to_string())),
            Source::KernelStats(stat) => Ok(self.facts.kernel_stats()?.value(stat)),
            Source::SchedulerPolicy => self.facts.scheduler_policy(),
            Source::Priority => Ok(self.facts.priority()?.map(|p| p.to_string())),
            Source::HardLimit(limit) => Ok(self.facts.hard_limit(limit)?.map(|l| l.to_string())),
            Source::MemInfo(key) => self.system.meminfo_value(key),
            Source::ProcessStatus(key) => self.processes.status_value(ctx.pid(), key),
            Source::ProcessStat(project) => {
                let stat = ctx.record_with(|pid| self.processes.collect_stat(pid))?;
                Ok(Some(project(stat)))
            }
        }
    }
}
