//! The closed set of queryable traits.
//!
//! The enum, the canonical name table and the trait → [`Source`] mapping are
//! generated from one list, so a trait cannot exist without a name and a
//! backend. Declaration order is the display order.
//!
//! # Stat field names
//!
//! The `/proc/[pid]/stat` traits are named after their `proc(5)` fields.
//! Listings from older tools used other names for some of them:
//!
//! | Here | Older listings |
//! |------|----------------|
//! | `user_time` | `uptime` |
//! | `system_time` | `scheduled_time` |
//! | `child_user_time` | `child_uptime` |
//! | `child_system_time` | `child_scheduled_time` |
//! | `priority` | `priority1` |
//! | `nice` | `nice1` |
//! | `signal_pending` | `signal_unused` |
//! | `signal_ignored` | `signal_ignore_unused` |
//! | `signal_caught` | `signal_caught_unused` |
//! | `wait_channel` | `channel` |
//!
//! `signal_blocked` has no older counterpart. It sits between
//! `signal_pending` and `signal_ignored`, so line-by-line comparisons with
//! older output shift by one from there on.

use crate::source::{
    Cache, CacheAttr, CacheParam, Family, IdentityField, KernelStat, ResourceLimit, Source,
};

macro_rules! define_traits {
    ($($variant:ident => $name:literal, $source:expr;)+) => {
        /// An enumerated identifier for one queryable system or process fact.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Trait {
            $($variant,)+
        }

        impl Trait {
            /// Every trait, in declaration order.
            pub const ALL: &'static [Trait] = &[$(Trait::$variant,)+];

            /// Canonical name, used for display and as the lookup key into
            /// `/proc/meminfo` and `/proc/[pid]/status`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Trait::$variant => $name,)+
                }
            }

            /// The backend that serves this trait.
            pub fn source(self) -> Source {
                match self {
                    $(Trait::$variant => $source,)+
                }
            }

            fn from_name(name: &str) -> Option<Trait> {
                match name {
                    $($name => Some(Trait::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

const fn cache(cache: Cache, attr: CacheAttr) -> Source {
    Source::Cache(CacheParam::new(cache, attr))
}

define_traits! {
    LevelOneICacheSize => "LevelOneICacheSize", cache(Cache::L1Instruction, CacheAttr::Size);
    LevelOneICacheAssociativity => "LevelOneICacheAssociativity", cache(Cache::L1Instruction, CacheAttr::Associativity);
    LevelOneICacheLineSize => "LevelOneICacheLineSize", cache(Cache::L1Instruction, CacheAttr::LineSize);
    LevelOneDCacheSize => "LevelOneDCacheSize", cache(Cache::L1Data, CacheAttr::Size);
    LevelOneDCacheAssociativity => "LevelOneDCacheAssociativity", cache(Cache::L1Data, CacheAttr::Associativity);
    LevelOneDCacheLineSize => "LevelOneDCacheLineSize", cache(Cache::L1Data, CacheAttr::LineSize);
    LevelTwoCacheSize => "LevelTwoCacheSize", cache(Cache::L2, CacheAttr::Size);
    LevelTwoCacheAssociativity => "LevelTwoCacheAssociativity", cache(Cache::L2, CacheAttr::Associativity);
    LevelTwoCacheLineSize => "LevelTwoCacheLineSize", cache(Cache::L2, CacheAttr::LineSize);
    LevelThreeCacheSize => "LevelThreeCacheSize", cache(Cache::L3, CacheAttr::Size);
    LevelThreeCacheAssociativity => "LevelThreeCacheAssociativity", cache(Cache::L3, CacheAttr::Associativity);
    LevelThreeCacheLineSize => "LevelThreeCacheLineSize", cache(Cache::L3, CacheAttr::LineSize);
    LevelFourCacheSize => "LevelFourCacheSize", cache(Cache::L4, CacheAttr::Size);
    LevelFourCacheAssociativity => "LevelFourCacheAssociativity", cache(Cache::L4, CacheAttr::Associativity);
    LevelFourCacheLineSize => "LevelFourCacheLineSize", cache(Cache::L4, CacheAttr::LineSize);
    NumberOfProcessors => "NumberOfProcessors", Source::ProcessorCount;
    ProcessorName => "ProcessorName", Source::ProcessorName;
    ProcessorFrequency => "ProcessorFrequency", Source::ProcessorFrequency;

    SystemName => "SystemName", Source::Identity(IdentityField::SystemName);
    NodeName => "NodeName", Source::Identity(IdentityField::NodeName);
    OSRelease => "OSRelease", Source::Identity(IdentityField::Release);
    OSVersion => "OSVersion", Source::Identity(IdentityField::Version);
    MachineName => "MachineName", Source::Identity(IdentityField::Machine);

    UpTime => "UpTime", Source::KernelStats(KernelStat::Uptime);
    OneMinLoad => "OneMinLoad", Source::KernelStats(KernelStat::Load1);
    FiveMinLoad => "FiveMinLoad", Source::KernelStats(KernelStat::Load5);
    FifteenMinLoad => "FifteenMinLoad", Source::KernelStats(KernelStat::Load15);
    TotalMainMemory => "TotalMainMemory", Source::KernelStats(KernelStat::TotalRam);
    FreeRam => "FreeRam", Source::KernelStats(KernelStat::FreeRam);
    SharedRam => "SharedRam", Source::KernelStats(KernelStat::SharedRam);
    BufferRam => "BufferRam", Source::KernelStats(KernelStat::BufferRam);
    TotalSwap => "TotalSwap", Source::KernelStats(KernelStat::TotalSwap);
    FreeSwap => "FreeSwap", Source::KernelStats(KernelStat::FreeSwap);
    NumberOfProcessesRunning => "NumberOfProcessesRunning", Source::KernelStats(KernelStat::Procs);
    TotalHighMemory => "TotalHighMemory", Source::KernelStats(KernelStat::TotalHigh);
    FreeHighMemory => "FreeHighMemory", Source::KernelStats(KernelStat::FreeHigh);
    MemoryUnit => "MemoryUnit", Source::KernelStats(KernelStat::MemUnit);

    Scheduler => "Scheduler", Source::SchedulerPolicy;
    Priority => "Priority", Source::Priority;

    VirtualMemory => "VirtualMemory", Source::HardLimit(ResourceLimit::AddressSpace);
    CoreFile => "CoreFile", Source::HardLimit(ResourceLimit::Core);
    CPUTime => "CPUTime", Source::HardLimit(ResourceLimit::Cpu);
    DataSegment => "DataSegment", Source::HardLimit(ResourceLimit::Data);
    MaxFileSize => "MaxFileSize", Source::HardLimit(ResourceLimit::FileSize);
    LockLimit => "LockLimit", Source::HardLimit(ResourceLimit::Locks);
    MaxMemLock => "MaxMemLock", Source::HardLimit(ResourceLimit::MemLock);
    MsgQueueLimit => "MsgQueueLimit", Source::HardLimit(ResourceLimit::MsgQueue);
    MaxNice => "MaxNice", Source::HardLimit(ResourceLimit::Nice);
    MaxFD => "MaxFD", Source::HardLimit(ResourceLimit::NoFile);
    MaxNumProcesses => "MaxNumProcesses", Source::HardLimit(ResourceLimit::NProc);
    MaxRAMPages => "MaxRAMPages", Source::HardLimit(ResourceLimit::Rss);
    MaxPriority => "MaxPriority", Source::HardLimit(ResourceLimit::RtPrio);
    MaxRTime => "MaxRTime", Source::HardLimit(ResourceLimit::RtTime);
    MaxSignalQueue => "MaxSignalQueue", Source::HardLimit(ResourceLimit::SigPending);
    MaxStackSize => "MaxStackSize", Source::HardLimit(ResourceLimit::Stack);

    MemTotal => "MemTotal", Source::MemInfo("MemTotal");
    MemFree => "MemFree", Source::MemInfo("MemFree");
    MemAvailable => "MemAvailable", Source::MemInfo("MemAvailable");
    Buffers => "Buffers", Source::MemInfo("Buffers");
    Cached => "Cached", Source::MemInfo("Cached");
    SwapCached => "SwapCached", Source::MemInfo("SwapCached");
    Active => "Active", Source::MemInfo("Active");
    Inactive => "Inactive", Source::MemInfo("Inactive");
    ActiveAnon => "Active(anon)", Source::MemInfo("Active(anon)");
    InactiveAnon => "Inactive(anon)", Source::MemInfo("Inactive(anon)");
    ActiveFile => "Active(file)", Source::MemInfo("Active(file)");
    InactiveFile => "Inactive(file)", Source::MemInfo("Inactive(file)");
    SwapTotal => "SwapTotal", Source::MemInfo("SwapTotal");
    SwapFree => "SwapFree", Source::MemInfo("SwapFree");
    Dirty => "Dirty", Source::MemInfo("Dirty");
    Writeback => "Writeback", Source::MemInfo("Writeback");
    AnonPages => "AnonPages", Source::MemInfo("AnonPages");
    Mapped => "Mapped", Source::MemInfo("Mapped");
    Shmem => "Shmem", Source::MemInfo("Shmem");
    Slab => "Slab", Source::MemInfo("Slab");
    SReclaimable => "SReclaimable", Source::MemInfo("SReclaimable");
    SUnreclaim => "SUnreclaim", Source::MemInfo("SUnreclaim");
    KernelStack => "KernelStack", Source::MemInfo("KernelStack");
    PageTables => "PageTables", Source::MemInfo("PageTables");
    CommitLimit => "CommitLimit", Source::MemInfo("CommitLimit");
    CommittedAs => "Committed_AS", Source::MemInfo("Committed_AS");
    VmallocTotal => "VmallocTotal", Source::MemInfo("VmallocTotal");
    VmallocUsed => "VmallocUsed", Source::MemInfo("VmallocUsed");
    VmallocChunk => "VmallocChunk", Source::MemInfo("VmallocChunk");
    HardwareCorrupted => "HardwareCorrupted", Source::MemInfo("HardwareCorrupted");
    AnonHugePages => "AnonHugePages", Source::MemInfo("AnonHugePages");
    HugePagesTotal => "HugePages_Total", Source::MemInfo("HugePages_Total");
    HugePagesFree => "HugePages_Free", Source::MemInfo("HugePages_Free");
    Hugepagesize => "Hugepagesize", Source::MemInfo("Hugepagesize");

    VoluntaryCtxtSwitches => "voluntary_ctxt_switches", Source::ProcessStatus("voluntary_ctxt_switches");
    NonvoluntaryCtxtSwitches => "nonvoluntary_ctxt_switches", Source::ProcessStatus("nonvoluntary_ctxt_switches");

    Pid => "pid", Source::ProcessStat(|s| s.pid.to_string());
    Executable => "executable", Source::ProcessStat(|s| s.comm.clone());
    State => "state", Source::ProcessStat(|s| s.state.to_string());
    ParentPid => "parent_pid", Source::ProcessStat(|s| s.ppid.to_string());
    GroupId => "group_id", Source::ProcessStat(|s| s.pgrp.to_string());
    SessionId => "session_id", Source::ProcessStat(|s| s.session.to_string());
    TtyNr => "tty_nr", Source::ProcessStat(|s| s.tty_nr.to_string());
    ForegroundId => "foreground_id", Source::ProcessStat(|s| s.tpgid.to_string());
    Flags => "flags", Source::ProcessStat(|s| s.flags.to_string());
    MinorFaults => "minor_faults", Source::ProcessStat(|s| s.minflt.to_string());
    ChildMinorFaults => "child_minor_faults", Source::ProcessStat(|s| s.cminflt.to_string());
    MajorFaults => "major_faults", Source::ProcessStat(|s| s.majflt.to_string());
    ChildMajorFaults => "child_major_faults", Source::ProcessStat(|s| s.cmajflt.to_string());
    UserTime => "user_time", Source::ProcessStat(|s| s.utime.to_string());
    SystemTime => "system_time", Source::ProcessStat(|s| s.stime.to_string());
    ChildUserTime => "child_user_time", Source::ProcessStat(|s| s.cutime.to_string());
    ChildSystemTime => "child_system_time", Source::ProcessStat(|s| s.cstime.to_string());
    ProcessPriority => "priority", Source::ProcessStat(|s| s.priority.to_string());
    Nice => "nice", Source::ProcessStat(|s| s.nice.to_string());
    NumberThreads => "number_threads", Source::ProcessStat(|s| s.num_threads.to_string());
    ItRealValue => "itrealvalue", Source::ProcessStat(|s| s.itrealvalue.to_string());
    StartTime => "start_time", Source::ProcessStat(|s| s.starttime.to_string());
    VirtualMemSizeBytes => "virtual_mem_size_bytes", Source::ProcessStat(|s| s.vsize.to_string());
    ResidentMemSize => "resident_mem_size", Source::ProcessStat(|s| s.rss.to_string());
    ResidentMemSoftLimit => "resident_mem_soft_limit", Source::ProcessStat(|s| s.rsslim.to_string());
    StartCode => "startcode", Source::ProcessStat(|s| s.startcode.to_string());
    EndCode => "endcode", Source::ProcessStat(|s| s.endcode.to_string());
    StartStack => "startstack", Source::ProcessStat(|s| s.startstack.to_string());
    CurrEsp => "curr_esp", Source::ProcessStat(|s| s.kstkesp.to_string());
    CurrEip => "curr_eip", Source::ProcessStat(|s| s.kstkeip.to_string());
    SignalPending => "signal_pending", Source::ProcessStat(|s| s.signal.to_string());
    SignalBlocked => "signal_blocked", Source::ProcessStat(|s| s.blocked.to_string());
    SignalIgnored => "signal_ignored", Source::ProcessStat(|s| s.sigignore.to_string());
    SignalCaught => "signal_caught", Source::ProcessStat(|s| s.sigcatch.to_string());
    WaitChannel => "wait_channel", Source::ProcessStat(|s| s.wchan.to_string());
    PagesSwapped => "pages_swapped", Source::ProcessStat(|s| s.nswap.to_string());
    CumulativeChildSwappedPages => "cumulative_child_swapped_pages", Source::ProcessStat(|s| s.cnswap.to_string());
    ExitSignal => "exit_signal", Source::ProcessStat(|s| s.exit_signal.to_string());
    ProcessorLastExecutedOn => "processor_last_executed_on", Source::ProcessStat(|s| s.processor.to_string());
    RtSchedule => "rt_schedule", Source::ProcessStat(|s| s.rt_priority.to_string());
    Policy => "policy", Source::ProcessStat(|s| s.policy.to_string());
    DelayedIoTicks => "delayed_io_ticks", Source::ProcessStat(|s| s.delayacct_blkio_ticks.to_string());
    GuestTime => "guest_time", Source::ProcessStat(|s| s.guest_time.to_string());
    ChildGuestTime => "child_guest_time", Source::ProcessStat(|s| s.cguest_time.to_string());
}

impl Trait {
    /// Number of defined traits.
    pub const COUNT: usize = Trait::ALL.len();

    pub fn family(self) -> Family {
        self.source().family()
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name does not belong to any trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTrait(pub String);

impl std::fmt::Display for UnknownTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown trait '{}'", self.0)
    }
}

impl std::error::Error for UnknownTrait {}

impl std::str::FromStr for Trait {
    type Err = UnknownTrait;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trait::from_name(s).ok_or_else(|| UnknownTrait(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::procfs::ProcStat;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = Trait::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), Trait::COUNT);
    }

    #[test]
    fn test_names_are_stable() {
        for t in Trait::ALL {
            assert_eq!(t.name(), t.name());
            assert_eq!(t.to_string(), t.name());
        }
    }

    #[test]
    fn test_from_str_round_trips_every_name() {
        for &t in Trait::ALL {
            assert_eq!(t.name().parse::<Trait>(), Ok(t));
        }
        assert_eq!(
            "NoSuchTrait".parse::<Trait>(),
            Err(UnknownTrait("NoSuchTrait".to_string()))
        );
    }

    #[test]
    fn test_family_sizes() {
        let count = |family: Family| Trait::ALL.iter().filter(|t| t.family() == family).count();

        assert_eq!(count(Family::Cache), 15);
        assert_eq!(count(Family::Processor), 3);
        assert_eq!(count(Family::Identity), 5);
        assert_eq!(count(Family::KernelStats), 14);
        assert_eq!(count(Family::Scheduling), 2);
        assert_eq!(count(Family::ResourceLimits), 16);
        assert_eq!(count(Family::MemInfo), 34);
        assert_eq!(count(Family::ProcessStatus), 2);
        assert_eq!(count(Family::ProcessStat), 44);
    }

    #[test]
    fn test_families_are_contiguous_in_declaration_order() {
        let families: Vec<Family> = Trait::ALL.iter().map(|t| t.family()).collect();
        assert!(families.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_file_keys_match_names() {
        for &t in Trait::ALL {
            match t.source() {
                Source::MemInfo(key) | Source::ProcessStatus(key) => assert_eq!(key, t.name()),
                _ => {}
            }
        }
    }

    #[test]
    fn test_stat_projections() {
        let stat = ProcStat {
            pid: 1234,
            comm: "initd".to_string(),
            state: 'S',
            nice: -5,
            rsslim: u64::MAX,
            ..Default::default()
        };
        let project = |t: Trait| match t.source() {
            Source::ProcessStat(projection) => projection(&stat),
            other => panic!("{} is not a stat field: {:?}", t, other),
        };

        assert_eq!(project(Trait::Pid), "1234");
        assert_eq!(project(Trait::Executable), "initd");
        assert_eq!(project(Trait::State), "S");
        assert_eq!(project(Trait::Nice), "-5");
        assert_eq!(project(Trait::ResidentMemSoftLimit), "18446744073709551615");
        assert_eq!(project(Trait::GuestTime), "0");
    }

    #[test]
    fn test_process_scoped_traits() {
        assert!(Trait::Pid.source().is_process_scoped());
        assert!(Trait::VoluntaryCtxtSwitches.source().is_process_scoped());
        assert!(!Trait::MemTotal.source().is_process_scoped());
        assert!(!Trait::Priority.source().is_process_scoped());
    }
}
