//! Text parsers for proc records: `key: value` files and the stat line.
//!
//! Everything here works on `&str` and never touches the filesystem.

use std::str::FromStr;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Finds the value of a `key: value` record.
///
/// Each line is split at its first colon. The requested `key` only has to be a
/// prefix of the line's key, so `"model name"` matches `"model name\t"` and
/// `"Active"` would match `"Active(anon)"` if no plain `Active` line came first.
/// The first matching line wins.
///
/// Returns the raw text after the colon, untrimmed. Lines without a colon or
/// with nothing after it never match. Keys containing a colon cannot be looked up.
pub fn parse_named_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim_start().starts_with(key) && !value.is_empty()).then_some(value)
    })
}

/// Converts the `cpu MHz` text from `/proc/cpuinfo` into whole Hz.
pub fn parse_cpu_mhz(text: &str) -> Result<u64, ParseError> {
    let mhz: f64 = text
        .trim()
        .parse()
        .map_err(|_| ParseError::new(format!("invalid cpu MHz value {:?}", text.trim())))?;

    if !mhz.is_finite() || mhz < 0.0 {
        return Err(ParseError::new(format!("cpu MHz out of range: {}", mhz)));
    }

    let hz = (mhz * 1e6).round();
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it overflows.
    if hz >= u64::MAX as f64 {
        return Err(ParseError::new(format!("cpu MHz out of range: {}", mhz)));
    }

    Ok(hz as u64)
}

/// Number of whitespace-separated fields after the `(comm)` field that a
/// complete record carries, from `state` up to `cguest_time`.
const STAT_FIELDS_AFTER_COMM: usize = 42;

/// Parsed data from `/proc/[pid]/stat`.
///
/// Field names follow `proc(5)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub ppid: u32,
    pub pgrp: i32,
    pub session: i32,
    /// Controlling terminal.
    pub tty_nr: i32,
    /// Foreground process group of the controlling terminal.
    pub tpgid: i32,
    pub flags: u32,
    pub minflt: u64,
    pub cminflt: u64,
    pub majflt: u64,
    pub cmajflt: u64,
    /// User time, in clock ticks.
    pub utime: u64,
    /// System time, in clock ticks.
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
    pub itrealvalue: i64,
    /// Start time after boot, in clock ticks.
    pub starttime: u64,
    pub vsize: u64,
    /// Resident set size, in pages.
    pub rss: i64,
    pub rsslim: u64,
    pub startcode: u64,
    pub endcode: u64,
    pub startstack: u64,
    pub kstkesp: u64,
    pub kstkeip: u64,
    pub signal: u64,
    pub blocked: u64,
    pub sigignore: u64,
    pub sigcatch: u64,
    pub wchan: u64,
    pub nswap: u64,
    pub cnswap: u64,
    pub exit_signal: i32,
    pub processor: i32,
    pub rt_priority: u32,
    pub policy: u32,
    pub delayacct_blkio_ticks: u64,
    pub guest_time: u64,
    pub cguest_time: i64,
}

/// Parses the single-line `/proc/[pid]/stat` record.
///
/// `comm` is whatever sits between the first `(` and the last `)`, so names
/// holding spaces or parentheses survive intact.
///
/// Every field up to `cguest_time` is required; a truncated record is an error
/// rather than a partially filled `ProcStat`.
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in stat"));
    }

    let pid: u32 = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;

    let comm = content[open_paren + 1..close_paren].to_string();

    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();

    if fields.len() < STAT_FIELDS_AFTER_COMM {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected {}, got {}",
            STAT_FIELDS_AFTER_COMM,
            fields.len()
        )));
    }

    let mut state_chars = fields[0].chars();
    let state = match (state_chars.next(), state_chars.next()) {
        (Some(c), None) => c,
        _ => return Err(ParseError::new(format!("invalid state {:?}", fields[0]))),
    };

    Ok(ProcStat {
        pid,
        comm,
        state,
        ppid: field(&fields, 1, "ppid")?,
        pgrp: field(&fields, 2, "pgrp")?,
        session: field(&fields, 3, "session")?,
        tty_nr: field(&fields, 4, "tty_nr")?,
        tpgid: field(&fields, 5, "tpgid")?,
        flags: field(&fields, 6, "flags")?,
        minflt: field(&fields, 7, "minflt")?,
        cminflt: field(&fields, 8, "cminflt")?,
        majflt: field(&fields, 9, "majflt")?,
        cmajflt: field(&fields, 10, "cmajflt")?,
        utime: field(&fields, 11, "utime")?,
        stime: field(&fields, 12, "stime")?,
        cutime: field(&fields, 13, "cutime")?,
        cstime: field(&fields, 14, "cstime")?,
        priority: field(&fields, 15, "priority")?,
        nice: field(&fields, 16, "nice")?,
        num_threads: field(&fields, 17, "num_threads")?,
        itrealvalue: field(&fields, 18, "itrealvalue")?,
        starttime: field(&fields, 19, "starttime")?,
        vsize: field(&fields, 20, "vsize")?,
        rss: field(&fields, 21, "rss")?,
        rsslim: field(&fields, 22, "rsslim")?,
        startcode: field(&fields, 23, "startcode")?,
        endcode: field(&fields, 24, "endcode")?,
        startstack: field(&fields, 25, "startstack")?,
        kstkesp: field(&fields, 26, "kstkesp")?,
        kstkeip: field(&fields, 27, "kstkeip")?,
        signal: field(&fields, 28, "signal")?,
        blocked: field(&fields, 29, "blocked")?,
        sigignore: field(&fields, 30, "sigignore")?,
        sigcatch: field(&fields, 31, "sigcatch")?,
        wchan: field(&fields, 32, "wchan")?,
        nswap: field(&fields, 33, "nswap")?,
        cnswap: field(&fields, 34, "cnswap")?,
        exit_signal: field(&fields, 35, "exit_signal")?,
        processor: field(&fields, 36, "processor")?,
        rt_priority: field(&fields, 37, "rt_priority")?,
        policy: field(&fields, 38, "policy")?,
        delayacct_blkio_ticks: field(&fields, 39, "delayacct_blkio_ticks")?,
        guest_time: field(&fields, 40, "guest_time")?,
        cguest_time: field(&fields, 41, "cguest_time")?,
    })
}

fn field<T: FromStr>(fields: &[&str], idx: usize, name: &str) -> Result<T, ParseError> {
    fields
        .get(idx)
        .ok_or_else(|| ParseError::new(format!("missing field {}", name)))?
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {}", name)))
}
