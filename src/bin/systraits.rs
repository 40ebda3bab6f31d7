//! systraits - print operating-system and process facts.
//!
//! Usage:
//!   systraits                     # every trait for this process
//!   systraits 1                   # every trait, process facts for pid 1
//!   systraits -t MemTotal -t pid  # selected traits only
//!   systraits --json 1            # JSON report
//!   systraits --list              # trait names and families

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use systraits::collector::{FileSystem, RealFs};
#[cfg(target_os = "linux")]
use systraits::facts::LinuxFacts;
#[cfg(target_os = "macos")]
use systraits::facts::MacFacts;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use systraits::facts::MockFacts;
use systraits::facts::SystemFacts;
use systraits::{SystemInfo, Trait};

/// Print operating-system and process facts.
#[derive(Parser)]
#[command(name = "systraits", about = "Operating-system and process facts", version)]
struct Args {
    /// Process to report per-process traits for (default: this process).
    #[arg(value_name = "PID")]
    pid: Option<u32>,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Resolve only this trait. May be repeated.
    #[arg(short = 't', long = "trait", value_name = "NAME")]
    traits: Vec<Trait>,

    /// List trait names and their families, then exit.
    ///
    /// Process stat traits use proc(5) field names: user_time, system_time,
    /// child_user_time, child_system_time, priority, nice, signal_pending,
    /// signal_ignored, signal_caught and wait_channel were printed by older
    /// tools as uptime, scheduled_time, child_uptime, child_scheduled_time,
    /// priority1, nice1, signal_unused, signal_ignore_unused,
    /// signal_caught_unused and channel. signal_blocked is new.
    #[arg(long)]
    list: bool,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Report {
    pid: u32,
    traits: Vec<Entry>,
}

#[derive(Serialize)]
struct Entry {
    name: &'static str,
    value: String,
}

/// Initializes the tracing subscriber. Logs go to stderr so they never mix
/// with the report.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("systraits={}", level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn list_traits() {
    for t in Trait::ALL {
        println!("{:<32} {}", t.name(), t.family());
    }
}

fn run<S: SystemFacts, F: FileSystem>(info: SystemInfo<S, F>, args: &Args) -> ExitCode {
    let pid = args.pid.unwrap_or_else(std::process::id);
    let selected: &[Trait] = if args.traits.is_empty() {
        Trait::ALL
    } else {
        &args.traits
    };
    debug!("Resolving {} traits for pid {}", selected.len(), pid);

    let mut batch = info.begin_batch(pid);
    let mut entries = Vec::with_capacity(selected.len());
    for &t in selected {
        match batch.resolve_checked(t) {
            Ok(value) => entries.push(Entry {
                name: t.name(),
                value,
            }),
            Err(e) => {
                error!("{}: {}", t, e);
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if args.json {
        let report = Report {
            pid,
            traits: entries,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("pid={}", pid);
        for entry in &entries {
            println!("{} - {}", entry.name, entry.value);
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    if args.list {
        list_traits();
        return ExitCode::SUCCESS;
    }

    debug!("proc={}", args.proc_path);

    #[cfg(target_os = "linux")]
    let info = {
        let fs = RealFs::new();
        SystemInfo::new(LinuxFacts::new(fs, &args.proc_path), fs, &args.proc_path)
    };
    #[cfg(target_os = "macos")]
    let info = SystemInfo::new(MacFacts::new(), RealFs::new(), &args.proc_path);
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let info = SystemInfo::new(MockFacts::new(), RealFs::new(), &args.proc_path);

    run(info, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["systraits"]).unwrap();

        assert_eq!(args.pid, None);
        assert_eq!(args.proc_path, "/proc");
        assert!(args.traits.is_empty());
        assert!(!args.json);
    }

    #[test]
    fn test_args_trait_filter() {
        let args =
            Args::try_parse_from(["systraits", "42", "-t", "MemTotal", "--trait", "pid"]).unwrap();

        assert_eq!(args.pid, Some(42));
        assert_eq!(args.traits, vec![Trait::MemTotal, Trait::Pid]);
    }

    #[test]
    fn test_args_unknown_trait_is_usage_error() {
        let err = Args::try_parse_from(["systraits", "-t", "NoSuchTrait"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_list_help_maps_older_stat_names() {
        let help = Args::command().render_long_help().to_string();

        assert!(help.contains("wait_channel"));
        assert!(help.contains("priority1"));
        assert!(help.contains("signal_blocked is new"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report {
            pid: 7,
            traits: vec![Entry {
                name: Trait::MemTotal.name(),
                value: "16384000 kB".to_string(),
            }],
        };

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pid"], 7);
        assert_eq!(json["traits"][0]["name"], "MemTotal");
        assert_eq!(json["traits"][0]["value"], "16384000 kB");
    }
}
