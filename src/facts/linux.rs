//! Linux backend: `sysconf`, `sysinfo`, `sched_getscheduler` and `/proc/cpuinfo`.

use super::{HardLimit, Identity, KernelStats, SchedPolicy, SystemFacts, posix};
use crate::collector::procfs::SystemCollector;
use crate::collector::traits::FileSystem;
use crate::error::ResolveError;
use crate::source::{CacheParam, ResourceLimit};

/// `sysinfo` reports load averages as fixed point with 16 fractional bits.
const LOAD_SCALE: f64 = 65536.0;

/// Facts for Linux hosts.
///
/// Processor name and frequency come from `<proc>/cpuinfo` through `fs`;
/// everything else is a direct libc call.
#[derive(Debug, Clone)]
pub struct LinuxFacts<F: FileSystem> {
    system: SystemCollector<F>,
}

impl<F: FileSystem> LinuxFacts<F> {
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            system: SystemCollector::new(fs, proc_path),
        }
    }
}

fn sysconf(name: libc::c_int) -> Option<u64> {
    // SAFETY: sysconf only reads configuration.
    let value = unsafe { libc::sysconf(name) };
    if value < 0 { None } else { Some(value as u64) }
}

#[cfg(target_env = "gnu")]
fn cache_sysconf_name(param: CacheParam) -> libc::c_int {
    use crate::source::{Cache, CacheAttr};

    match (param.cache, param.attr) {
        (Cache::L1Instruction, CacheAttr::Size) => libc::_SC_LEVEL1_ICACHE_SIZE,
        (Cache::L1Instruction, CacheAttr::Associativity) => libc::_SC_LEVEL1_ICACHE_ASSOC,
        (Cache::L1Instruction, CacheAttr::LineSize) => libc::_SC_LEVEL1_ICACHE_LINESIZE,
        (Cache::L1Data, CacheAttr::Size) => libc::_SC_LEVEL1_DCACHE_SIZE,
        (Cache::L1Data, CacheAttr::Associativity) => libc::_SC_LEVEL1_DCACHE_ASSOC,
        (Cache::L1Data, CacheAttr::LineSize) => libc::_SC_LEVEL1_DCACHE_LINESIZE,
        (Cache::L2, CacheAttr::Size) => libc::_SC_LEVEL2_CACHE_SIZE,
        (Cache::L2, CacheAttr::Associativity) => libc::_SC_LEVEL2_CACHE_ASSOC,
        (Cache::L2, CacheAttr::LineSize) => libc::_SC_LEVEL2_CACHE_LINESIZE,
        (Cache::L3, CacheAttr::Size) => libc::_SC_LEVEL3_CACHE_SIZE,
        (Cache::L3, CacheAttr::Associativity) => libc::_SC_LEVEL3_CACHE_ASSOC,
        (Cache::L3, CacheAttr::LineSize) => libc::_SC_LEVEL3_CACHE_LINESIZE,
        (Cache::L4, CacheAttr::Size) => libc::_SC_LEVEL4_CACHE_SIZE,
        (Cache::L4, CacheAttr::Associativity) => libc::_SC_LEVEL4_CACHE_ASSOC,
        (Cache::L4, CacheAttr::LineSize) => libc::_SC_LEVEL4_CACHE_LINESIZE,
    }
}

impl<F: FileSystem> SystemFacts for LinuxFacts<F> {
    #[cfg(target_env = "gnu")]
    fn cache_parameter(&self, param: CacheParam) -> Result<Option<u64>, ResolveError> {
        // glibc reports 0 when the CPU does not describe the cache.
        Ok(sysconf(cache_sysconf_name(param)).filter(|&v| v > 0))
    }

    // Only glibc exposes cache geometry through sysconf.
    #[cfg(not(target_env = "gnu"))]
    fn cache_parameter(&self, _param: CacheParam) -> Result<Option<u64>, ResolveError> {
        Ok(None)
    }

    fn processor_count(&self) -> Result<Option<u64>, ResolveError> {
        Ok(sysconf(libc::_SC_NPROCESSORS_ONLN))
    }

    fn processor_name(&self) -> Result<Option<String>, ResolveError> {
        self.system.processor_name()
    }

    fn processor_frequency(&self) -> Result<Option<u64>, ResolveError> {
        self.system.processor_frequency()
    }

    fn identity(&self) -> Result<Option<Identity>, ResolveError> {
        posix::uname().map(Some)
    }

    fn kernel_stats(&self) -> Result<KernelStats, ResolveError> {
        // SAFETY: sysinfo is plain C data; all-zero is a valid value.
        let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
        // SAFETY: info is a valid, writable sysinfo.
        if unsafe { libc::sysinfo(&mut info) } != 0 {
            return Err(ResolveError::last_os_error("sysinfo"));
        }

        Ok(KernelStats {
            uptime: Some(info.uptime as u64),
            loads: Some(info.loads.map(|load| load as f64 / LOAD_SCALE)),
            total_ram: Some(info.totalram as u64),
            free_ram: Some(info.freeram as u64),
            shared_ram: Some(info.sharedram as u64),
            buffer_ram: Some(info.bufferram as u64),
            total_swap: Some(info.totalswap as u64),
            free_swap: Some(info.freeswap as u64),
            procs: Some(u64::from(info.procs)),
            total_high: Some(info.totalhigh as u64),
            free_high: Some(info.freehigh as u64),
            mem_unit: Some(u64::from(info.mem_unit)),
        })
    }

    fn scheduler_policy(&self) -> Result<Option<String>, ResolveError> {
        // SAFETY: plain syscall; pid 0 is the calling process.
        let raw = unsafe { libc::sched_getscheduler(0) };
        if raw < 0 {
            return Err(ResolveError::last_os_error("sched_getscheduler"));
        }
        Ok(Some(SchedPolicy::from_raw(raw)?.as_str().to_string()))
    }

    fn priority(&self) -> Result<Option<i32>, ResolveError> {
        posix::priority().map(Some)
    }

    fn hard_limit(&self, limit: ResourceLimit) -> Result<Option<HardLimit>, ResolveError> {
        posix::hard_limit(limit)
    }
}
