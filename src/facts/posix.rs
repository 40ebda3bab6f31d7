//! Calls shared by every Unix backend: `uname`, `getpriority`, `getrlimit`.

use super::{HardLimit, Identity};
use crate::error::ResolveError;
use crate::source::ResourceLimit;
use std::ffi::CStr;

fn c_field(field: &[libc::c_char]) -> String {
    // SAFETY: uname fills every field with a NUL-terminated string.
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn uname() -> Result<Identity, ResolveError> {
    // SAFETY: utsname is plain C data; all-zero is a valid value.
    let mut un: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: un is a valid, writable utsname.
    if unsafe { libc::uname(&mut un) } != 0 {
        return Err(ResolveError::last_os_error("uname"));
    }

    Ok(Identity {
        system_name: c_field(&un.sysname),
        node_name: c_field(&un.nodename),
        release: c_field(&un.release),
        version: c_field(&un.version),
        machine: c_field(&un.machine),
    })
}

#[cfg(target_os = "linux")]
fn clear_errno() {
    // SAFETY: __errno_location returns the calling thread's errno slot.
    unsafe { *libc::__errno_location() = 0 };
}

#[cfg(target_os = "macos")]
fn clear_errno() {
    // SAFETY: __error returns the calling thread's errno slot.
    unsafe { *libc::__error() = 0 };
}

/// Nice value of the calling process.
///
/// `getpriority` may legitimately return -1, so failure is detected through
/// errno.
pub(crate) fn priority() -> Result<i32, ResolveError> {
    clear_errno();
    // SAFETY: plain syscall; who = 0 is the calling process.
    let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, 0) };
    if prio == -1 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error().is_some_and(|code| code != 0) {
            return Err(ResolveError::Os {
                call: "getpriority",
                source: err,
            });
        }
    }
    Ok(prio)
}

/// Hard limit of `limit`, or `None` when the platform has no such resource.
pub(crate) fn hard_limit(limit: ResourceLimit) -> Result<Option<HardLimit>, ResolveError> {
    let resource = match limit {
        ResourceLimit::AddressSpace => libc::RLIMIT_AS,
        ResourceLimit::Core => libc::RLIMIT_CORE,
        ResourceLimit::Cpu => libc::RLIMIT_CPU,
        ResourceLimit::Data => libc::RLIMIT_DATA,
        ResourceLimit::FileSize => libc::RLIMIT_FSIZE,
        ResourceLimit::MemLock => libc::RLIMIT_MEMLOCK,
        ResourceLimit::NoFile => libc::RLIMIT_NOFILE,
        ResourceLimit::NProc => libc::RLIMIT_NPROC,
        ResourceLimit::Rss => libc::RLIMIT_RSS,
        ResourceLimit::Stack => libc::RLIMIT_STACK,
        #[cfg(target_os = "linux")]
        ResourceLimit::Locks => libc::RLIMIT_LOCKS,
        #[cfg(target_os = "linux")]
        ResourceLimit::MsgQueue => libc::RLIMIT_MSGQUEUE,
        #[cfg(target_os = "linux")]
        ResourceLimit::Nice => libc::RLIMIT_NICE,
        #[cfg(target_os = "linux")]
        ResourceLimit::RtPrio => libc::RLIMIT_RTPRIO,
        #[cfg(target_os = "linux")]
        ResourceLimit::RtTime => libc::RLIMIT_RTTIME,
        #[cfg(target_os = "linux")]
        ResourceLimit::SigPending => libc::RLIMIT_SIGPENDING,
        #[cfg(not(target_os = "linux"))]
        ResourceLimit::Locks
        | ResourceLimit::MsgQueue
        | ResourceLimit::Nice
        | ResourceLimit::RtPrio
        | ResourceLimit::RtTime
        | ResourceLimit::SigPending => return Ok(None),
    };

    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: rlim is a valid, writable rlimit.
    if unsafe { libc::getrlimit(resource, &mut rlim) } != 0 {
        return Err(ResolveError::last_os_error("getrlimit"));
    }

    if rlim.rlim_max == libc::RLIM_INFINITY {
        Ok(Some(HardLimit::Unlimited))
    } else {
        Ok(Some(HardLimit::Finite(rlim.rlim_max as u64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uname_reports_system_name() {
        let identity = uname().unwrap();
        assert!(!identity.system_name.is_empty());
        assert!(!identity.machine.is_empty());
    }

    #[test]
    fn test_priority_is_a_nice_value() {
        let prio = priority().unwrap();
        assert!((-20..=20).contains(&prio));
    }

    #[test]
    fn test_hard_limit_of_open_files() {
        let limit = hard_limit(ResourceLimit::NoFile).unwrap();
        assert!(limit.is_some());
    }
}
