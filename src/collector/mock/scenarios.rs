//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` filesystem states
//! for testing trait resolution.

use super::filesystem::MockFs;

/// `/proc/1234/stat` of the `initd` fixture process, every field distinct.
pub const INITD_STAT: &str = "1234 (initd) S 1 1234 1234 34816 1235 4194560 5000 50000 10 20 100 50 200 100 20 -5 3 0 100000 25000000 2000 18446744073709551615 4194304 4238788 140736466511168 140736466510000 4196000 1 2 3 4 5 6 7 17 2 0 0 9 11 12\n";

impl MockFs {
    /// Creates a typical x86 host with two processes.
    ///
    /// Includes: `/proc/cpuinfo`, a full `/proc/meminfo`, init (PID 1) and the
    /// `initd` fixture (PID 1234).
    pub fn typical_host() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Example CPU @ 3.00GHz
stepping\t: 10
cpu MHz\t\t: 3000.000
cache size\t: 12288 KB
flags\t\t: fpu vme de pse tsc msr pae mce
power management:

processor\t: 1
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Example CPU @ 3.00GHz
stepping\t: 10
cpu MHz\t\t: 2899.998
cache size\t: 12288 KB
flags\t\t: fpu vme de pse tsc msr pae mce
power management:
",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
Active(anon):    1024000 kB
Inactive(anon):   512000 kB
Active(file):    3072000 kB
Inactive(file):  1536000 kB
Unevictable:           0 kB
Mlocked:               0 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
Writeback:             0 kB
AnonPages:       1500000 kB
Mapped:           300000 kB
Shmem:             64000 kB
KReclaimable:     256000 kB
Slab:             512000 kB
SReclaimable:     256000 kB
SUnreclaim:       256000 kB
KernelStack:       16000 kB
PageTables:        32000 kB
NFS_Unstable:          0 kB
Bounce:                0 kB
WritebackTmp:          0 kB
CommitLimit:    12288000 kB
Committed_AS:    6000000 kB
VmallocTotal:   34359738367 kB
VmallocUsed:       40000 kB
VmallocChunk:          0 kB
Percpu:             8000 kB
HardwareCorrupted:     0 kB
AnonHugePages:    204800 kB
ShmemHugePages:        0 kB
ShmemPmdMapped:        0 kB
HugePages_Total:       0
HugePages_Free:        0
HugePages_Rsvd:        0
HugePages_Surp:        0
Hugepagesize:       2048 kB
Hugetlb:               0 kB
DirectMap4k:      300000 kB
DirectMap2M:     8000000 kB
",
        );

        fs.add_process(
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 30000 900000 80 400 500 300 4000 2000 20 0 1 0 1 170000000 3000 18446744073709551615 1 1 0 0 0 0 671173123 4096 1260 0 0 0 17 0 0 0 50 0 0\n",
            "\
Name:\tsystemd
State:\tS (sleeping)
Pid:\t1
PPid:\t0
voluntary_ctxt_switches:\t90000
nonvoluntary_ctxt_switches:\t1200
",
        );

        fs.add_process(
            1234,
            INITD_STAT,
            "\
Name:\tinitd
Umask:\t0022
State:\tS (sleeping)
Tgid:\t1234
Pid:\t1234
PPid:\t1
VmPeak:\t   30000 kB
VmSize:\t   25000 kB
VmRSS:\t    8000 kB
Threads:\t3
voluntary_ctxt_switches:\t500
nonvoluntary_ctxt_switches:\t50
",
        );

        fs
    }

    /// Creates an ARM host whose `/proc/cpuinfo` carries no model name or frequency.
    pub fn arm_host() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
BogoMIPS\t: 50.00
Features\t: fp asimd evtstrm aes pmull sha1 sha2 crc32
CPU implementer\t: 0x41
CPU architecture: 8
CPU part\t: 0xd0c
",
        );
        fs.add_file("/proc/meminfo", "MemTotal:        4000000 kB\n");

        fs
    }

    /// Creates a system with a zombie process (PID 4000).
    pub fn with_zombie_process() -> Self {
        let mut fs = Self::typical_host();

        fs.add_process(
            4000,
            "4000 (defunct) Z 1234 4000 1234 0 -1 4194308 0 0 0 0 0 0 0 0 20 0 1 0 400000 0 0 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 -1 0 0 0 0 0 0\n",
            "\
Name:\tdefunct
State:\tZ (zombie)
Pid:\t4000
PPid:\t1234
voluntary_ctxt_switches:\t3
nonvoluntary_ctxt_switches:\t0
",
        );

        fs
    }
}
