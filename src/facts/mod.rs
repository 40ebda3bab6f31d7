//! Platform backends for the facts that do not come from `/proc` text files.
//!
//! Each platform implements [`SystemFacts`] once:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────────────────────────────────┐
//! │   Resolver   │───▶│ SystemFacts                                  │
//! └──────────────┘    │  LinuxFacts  sysconf, sysinfo, cpuinfo, ...  │
//!                     │  MacFacts    sysctlbyname, getloadavg, ...   │
//!                     │  MockFacts   fixed values for tests          │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Every method distinguishes three outcomes: a value, `Ok(None)` when the
//! platform does not provide the fact, and an error when the query failed.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
mod mock;
#[cfg(any(target_os = "linux", target_os = "macos"))]
mod posix;

#[cfg(target_os = "linux")]
pub use linux::LinuxFacts;
#[cfg(target_os = "macos")]
pub use macos::MacFacts;
pub use mock::MockFacts;

use crate::error::ResolveError;
use crate::source::{CacheParam, IdentityField, KernelStat, ResourceLimit};
use std::fmt;

/// Fields of the `uname` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub system_name: String,
    pub node_name: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

impl Identity {
    pub fn field(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::SystemName => &self.system_name,
            IdentityField::NodeName => &self.node_name,
            IdentityField::Release => &self.release,
            IdentityField::Version => &self.version,
            IdentityField::Machine => &self.machine,
        }
    }
}

/// Kernel-wide statistics, as reported by `sysinfo(2)` on Linux.
///
/// Fields a platform does not report stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KernelStats {
    /// Seconds since boot.
    pub uptime: Option<u64>,
    /// 1, 5 and 15 minute load averages.
    pub loads: Option<[f64; 3]>,
    pub total_ram: Option<u64>,
    pub free_ram: Option<u64>,
    pub shared_ram: Option<u64>,
    pub buffer_ram: Option<u64>,
    pub total_swap: Option<u64>,
    pub free_swap: Option<u64>,
    pub procs: Option<u64>,
    pub total_high: Option<u64>,
    pub free_high: Option<u64>,
    /// Size in bytes of the unit the memory fields are counted in.
    pub mem_unit: Option<u64>,
}

impl KernelStats {
    /// Renders one field. Load averages carry six fractional digits.
    pub fn value(&self, stat: KernelStat) -> Option<String> {
        let load = |i: usize| self.loads.map(|loads| format!("{:.6}", loads[i]));
        let int = |v: Option<u64>| v.map(|v| v.to_string());

        match stat {
            KernelStat::Uptime => int(self.uptime),
            KernelStat::Load1 => load(0),
            KernelStat::Load5 => load(1),
            KernelStat::Load15 => load(2),
            KernelStat::TotalRam => int(self.total_ram),
            KernelStat::FreeRam => int(self.free_ram),
            KernelStat::SharedRam => int(self.shared_ram),
            KernelStat::BufferRam => int(self.buffer_ram),
            KernelStat::TotalSwap => int(self.total_swap),
            KernelStat::FreeSwap => int(self.free_swap),
            KernelStat::Procs => int(self.procs),
            KernelStat::TotalHigh => int(self.total_high),
            KernelStat::FreeHigh => int(self.free_high),
            KernelStat::MemUnit => int(self.mem_unit),
        }
    }
}

/// Hard limit of a resource-limit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardLimit {
    Finite(u64),
    Unlimited,
}

impl fmt::Display for HardLimit {
    /// `Unlimited` renders as `u64::MAX`, the value of `RLIM_INFINITY` on
    /// 64-bit Linux, on every platform.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardLimit::Finite(v) => write!(f, "{}", v),
            HardLimit::Unlimited => write!(f, "{}", u64::MAX),
        }
    }
}

/// Scheduling policies reported by `sched_getscheduler(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedPolicy {
    Other,
    Fifo,
    RoundRobin,
    Batch,
    Idle,
}

impl SchedPolicy {
    /// Kernel flag OR-ed into the policy by `SCHED_RESET_ON_FORK`.
    const RESET_ON_FORK: i32 = 0x4000_0000;

    /// Maps a raw Linux policy value. `SCHED_DEADLINE` and anything else
    /// outside the five classic policies is [`ResolveError::UnknownPolicy`].
    pub fn from_raw(raw: i32) -> Result<Self, ResolveError> {
        match raw & !Self::RESET_ON_FORK {
            0 => Ok(SchedPolicy::Other),
            1 => Ok(SchedPolicy::Fifo),
            2 => Ok(SchedPolicy::RoundRobin),
            3 => Ok(SchedPolicy::Batch),
            5 => Ok(SchedPolicy::Idle),
            _ => Err(ResolveError::UnknownPolicy(raw)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedPolicy::Other => "SCHED_OTHER",
            SchedPolicy::Fifo => "SCHED_FIFO",
            SchedPolicy::RoundRobin => "SCHED_RR",
            SchedPolicy::Batch => "SCHED_BATCH",
            SchedPolicy::Idle => "SCHED_IDLE",
        }
    }
}

/// OS facts served by system calls rather than proc text files.
pub trait SystemFacts {
    /// Cache geometry, in bytes or ways.
    fn cache_parameter(&self, param: CacheParam) -> Result<Option<u64>, ResolveError>;

    /// Number of online processors.
    fn processor_count(&self) -> Result<Option<u64>, ResolveError>;

    fn processor_name(&self) -> Result<Option<String>, ResolveError>;

    /// Processor frequency in Hz.
    fn processor_frequency(&self) -> Result<Option<u64>, ResolveError>;

    fn identity(&self) -> Result<Option<Identity>, ResolveError>;

    fn kernel_stats(&self) -> Result<KernelStats, ResolveError>;

    /// Scheduling policy of the calling process, by name.
    fn scheduler_policy(&self) -> Result<Option<String>, ResolveError>;

    /// Nice value of the calling process.
    fn priority(&self) -> Result<Option<i32>, ResolveError>;

    fn hard_limit(&self, limit: ResourceLimit) -> Result<Option<HardLimit>, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_limit_display() {
        assert_eq!(HardLimit::Finite(1024).to_string(), "1024");
        assert_eq!(HardLimit::Unlimited.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_sched_policy_names() {
        assert_eq!(SchedPolicy::from_raw(0).unwrap().as_str(), "SCHED_OTHER");
        assert_eq!(SchedPolicy::from_raw(1).unwrap().as_str(), "SCHED_FIFO");
        assert_eq!(SchedPolicy::from_raw(2).unwrap().as_str(), "SCHED_RR");
        assert_eq!(SchedPolicy::from_raw(3).unwrap().as_str(), "SCHED_BATCH");
        assert_eq!(SchedPolicy::from_raw(5).unwrap().as_str(), "SCHED_IDLE");
    }

    #[test]
    fn test_sched_policy_reset_on_fork_is_masked() {
        assert_eq!(
            SchedPolicy::from_raw(0x4000_0001).unwrap(),
            SchedPolicy::Fifo
        );
    }

    #[test]
    fn test_sched_policy_unknown_is_error() {
        // SCHED_DEADLINE
        assert!(matches!(
            SchedPolicy::from_raw(6),
            Err(ResolveError::UnknownPolicy(6))
        ));
        assert!(matches!(
            SchedPolicy::from_raw(-1),
            Err(ResolveError::UnknownPolicy(-1))
        ));
    }

    #[test]
    fn test_kernel_stats_loads_have_six_digits() {
        let stats = KernelStats {
            loads: Some([0.5, 1.25, 2.0]),
            uptime: Some(3600),
            ..Default::default()
        };

        assert_eq!(stats.value(KernelStat::Load1).as_deref(), Some("0.500000"));
        assert_eq!(stats.value(KernelStat::Load5).as_deref(), Some("1.250000"));
        assert_eq!(stats.value(KernelStat::Load15).as_deref(), Some("2.000000"));
        assert_eq!(stats.value(KernelStat::Uptime).as_deref(), Some("3600"));
        assert_eq!(stats.value(KernelStat::TotalHigh), None);
    }

    #[test]
    fn test_identity_field() {
        let identity = Identity {
            system_name: "Linux".into(),
            node_name: "host".into(),
            release: "6.1.0".into(),
            version: "#1 SMP".into(),
            machine: "x86_64".into(),
        };

        assert_eq!(identity.field(IdentityField::SystemName), "Linux");
        assert_eq!(identity.field(IdentityField::Machine), "x86_64");
    }
}
