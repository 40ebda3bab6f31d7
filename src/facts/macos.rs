//! macOS backend built on `sysctlbyname`.

use super::{HardLimit, Identity, KernelStats, SystemFacts, posix};
use crate::error::ResolveError;
use crate::source::{Cache, CacheAttr, CacheParam, ResourceLimit};
use std::ffi::{CStr, CString};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Facts for macOS hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacFacts;

impl MacFacts {
    pub fn new() -> Self {
        Self
    }
}

fn sysctl_name(name: &str) -> Result<CString, ResolveError> {
    CString::new(name).map_err(|_| ResolveError::Os {
        call: "sysctlbyname",
        source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
    })
}

/// Calls `sysctlbyname` into `buf` and returns the number of bytes written.
///
/// Unknown names (`ENOENT`) are `Ok(None)`.
fn sysctl_raw(name: &str, buf: *mut libc::c_void, len: usize) -> Result<Option<usize>, ResolveError> {
    let cname = sysctl_name(name)?;
    let mut len = len;
    // SAFETY: buf is either null with len 0 or valid for len bytes.
    let rc = unsafe {
        libc::sysctlbyname(cname.as_ptr(), buf, &mut len, std::ptr::null_mut(), 0)
    };
    if rc == 0 {
        return Ok(Some(len));
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ENOENT) {
        debug!(sysctl = name, "not present");
        return Ok(None);
    }
    Err(ResolveError::Os {
        call: "sysctlbyname",
        source: err,
    })
}

/// Reads an integer sysctl of either 32 or 64 bits.
fn sysctl_u64(name: &str) -> Result<Option<u64>, ResolveError> {
    let mut buf = [0u8; 8];
    let Some(len) = sysctl_raw(name, buf.as_mut_ptr().cast(), buf.len())? else {
        return Ok(None);
    };

    Ok(match len {
        4 => Some(u64::from(u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]))),
        8 => Some(u64::from_ne_bytes(buf)),
        _ => None,
    })
}

fn sysctl_string(name: &str) -> Result<Option<String>, ResolveError> {
    let Some(len) = sysctl_raw(name, std::ptr::null_mut(), 0)? else {
        return Ok(None);
    };

    let mut buf = vec![0u8; len];
    let Some(written) = sysctl_raw(name, buf.as_mut_ptr().cast(), buf.len())? else {
        return Ok(None);
    };
    buf.truncate(written);

    Ok(CStr::from_bytes_until_nul(&buf)
        .ok()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn boot_time() -> Result<Option<libc::timeval>, ResolveError> {
    let mut boot = libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    };
    let size = std::mem::size_of::<libc::timeval>();
    let written = sysctl_raw("kern.boottime", (&mut boot as *mut libc::timeval).cast(), size)?;
    Ok(written.filter(|&len| len == size).map(|_| boot))
}

fn swap_usage() -> Result<Option<libc::xsw_usage>, ResolveError> {
    // SAFETY: xsw_usage is plain C data; all-zero is a valid value.
    let mut swap: libc::xsw_usage = unsafe { std::mem::zeroed() };
    let size = std::mem::size_of::<libc::xsw_usage>();
    let written = sysctl_raw("vm.swapusage", (&mut swap as *mut libc::xsw_usage).cast(), size)?;
    Ok(written.filter(|&len| len == size).map(|_| swap))
}

fn load_averages() -> Option<[f64; 3]> {
    let mut loads = [0f64; 3];
    // SAFETY: loads has room for the three requested samples.
    let n = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    (n == 3).then_some(loads)
}

fn process_count() -> Result<u64, ResolveError> {
    // SAFETY: a null buffer asks only for the pid count.
    let n = unsafe { libc::proc_listallpids(std::ptr::null_mut(), 0) };
    if n < 0 {
        return Err(ResolveError::last_os_error("proc_listallpids"));
    }
    Ok(n as u64)
}

impl SystemFacts for MacFacts {
    fn cache_parameter(&self, param: CacheParam) -> Result<Option<u64>, ResolveError> {
        let name = match (param.cache, param.attr) {
            (Cache::L1Instruction, CacheAttr::Size) => "hw.l1icachesize",
            (Cache::L1Data, CacheAttr::Size) => "hw.l1dcachesize",
            (Cache::L2, CacheAttr::Size) => "hw.l2cachesize",
            (Cache::L3, CacheAttr::Size) => "hw.l3cachesize",
            (Cache::L2, CacheAttr::Associativity) => "machdep.cpu.cache.L2_associativity",
            (Cache::L4, _) => return Ok(None),
            (_, CacheAttr::LineSize) => "hw.cachelinesize",
            (_, CacheAttr::Associativity) => return Ok(None),
        };
        sysctl_u64(name)
    }

    fn processor_count(&self) -> Result<Option<u64>, ResolveError> {
        sysctl_u64("hw.activecpu")
    }

    fn processor_name(&self) -> Result<Option<String>, ResolveError> {
        sysctl_string("machdep.cpu.brand_string")
    }

    fn processor_frequency(&self) -> Result<Option<u64>, ResolveError> {
        // Not published on Apple silicon.
        sysctl_u64("hw.cpufrequency")
    }

    fn identity(&self) -> Result<Option<Identity>, ResolveError> {
        posix::uname().map(Some)
    }

    fn kernel_stats(&self) -> Result<KernelStats, ResolveError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let uptime = boot_time()?.map(|boot| now.saturating_sub(boot.tv_sec as u64));

        let page_size = sysctl_u64("hw.pagesize")?;
        let free_pages = sysctl_u64("vm.page_free_count")?;
        let free_ram = page_size.zip(free_pages).map(|(size, pages)| size * pages);
        let swap = swap_usage()?;

        Ok(KernelStats {
            uptime,
            loads: load_averages(),
            total_ram: sysctl_u64("hw.memsize")?,
            free_ram,
            total_swap: swap.map(|s| s.xsu_total),
            free_swap: swap.map(|s| s.xsu_avail),
            procs: Some(process_count()?),
            // Memory fields are in bytes.
            mem_unit: Some(1),
            ..Default::default()
        })
    }

    fn scheduler_policy(&self) -> Result<Option<String>, ResolveError> {
        sysctl_string("kern.sched")
    }

    fn priority(&self) -> Result<Option<i32>, ResolveError> {
        posix::priority().map(Some)
    }

    fn hard_limit(&self, limit: ResourceLimit) -> Result<Option<HardLimit>, ResolveError> {
        posix::hard_limit(limit)
    }
}
