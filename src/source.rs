//! Backend selectors: which OS mechanism serves a trait, and with what parameters.
//!
//! Every [`Trait`](crate::Trait) maps to exactly one [`Source`] through
//! [`Trait::source`](crate::Trait::source).

use crate::collector::procfs::ProcStat;

/// A cache in the processor's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cache {
    L1Instruction,
    L1Data,
    L2,
    L3,
    L4,
}

/// A geometry attribute of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheAttr {
    /// Total size in bytes.
    Size,
    /// Number of ways.
    Associativity,
    /// Line size in bytes.
    LineSize,
}

/// One cache geometry query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheParam {
    pub cache: Cache,
    pub attr: CacheAttr,
}

impl CacheParam {
    pub const fn new(cache: Cache, attr: CacheAttr) -> Self {
        Self { cache, attr }
    }
}

/// A field of the `uname` identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    SystemName,
    NodeName,
    Release,
    Version,
    Machine,
}

/// A field of the kernel statistics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelStat {
    Uptime,
    Load1,
    Load5,
    Load15,
    TotalRam,
    FreeRam,
    SharedRam,
    BufferRam,
    TotalSwap,
    FreeSwap,
    Procs,
    TotalHigh,
    FreeHigh,
    MemUnit,
}

/// A POSIX resource-limit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceLimit {
    AddressSpace,
    Core,
    Cpu,
    Data,
    FileSize,
    Locks,
    MemLock,
    MsgQueue,
    Nice,
    NoFile,
    NProc,
    Rss,
    RtPrio,
    RtTime,
    SigPending,
    Stack,
}

/// Projects one field of a parsed process status record to text.
pub type StatProjection = fn(&ProcStat) -> String;

/// The backend that produces a trait's value.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// System configuration query for cache geometry.
    Cache(CacheParam),
    ProcessorCount,
    ProcessorName,
    /// Processor frequency in Hz.
    ProcessorFrequency,
    Identity(IdentityField),
    KernelStats(KernelStat),
    SchedulerPolicy,
    Priority,
    /// Hard limit of a resource-limit category.
    HardLimit(ResourceLimit),
    /// Key in `/proc/meminfo`.
    MemInfo(&'static str),
    /// Key in `/proc/[pid]/status`.
    ProcessStatus(&'static str),
    /// Field of the `/proc/[pid]/stat` record.
    ProcessStat(StatProjection),
}

impl Source {
    pub fn family(&self) -> Family {
        match self {
            Source::Cache(_) => Family::Cache,
            Source::ProcessorCount | Source::ProcessorName | Source::ProcessorFrequency => {
                Family::Processor
            }
            Source::Identity(_) => Family::Identity,
            Source::KernelStats(_) => Family::KernelStats,
            Source::SchedulerPolicy | Source::Priority => Family::Scheduling,
            Source::HardLimit(_) => Family::ResourceLimits,
            Source::MemInfo(_) => Family::MemInfo,
            Source::ProcessStatus(_) => Family::ProcessStatus,
            Source::ProcessStat(_) => Family::ProcessStat,
        }
    }

    /// Returns `true` when the value depends on the target process id.
    #[cfg(test)]
    pub(crate) fn is_process_scoped(&self) -> bool {
        matches!(self, Source::ProcessStatus(_) | Source::ProcessStat(_))
    }
}

/// Trait families, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Cache,
    Processor,
    Identity,
    KernelStats,
    Scheduling,
    ResourceLimits,
    MemInfo,
    ProcessStatus,
    ProcessStat,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Cache => "cache",
            Family::Processor => "processor",
            Family::Identity => "identity",
            Family::KernelStats => "kernel",
            Family::Scheduling => "scheduling",
            Family::ResourceLimits => "rlimit",
            Family::MemInfo => "meminfo",
            Family::ProcessStatus => "status",
            Family::ProcessStat => "stat",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
