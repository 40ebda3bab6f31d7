//! Readers for the Linux `/proc` filesystem.
//!
//! `parser` holds the pure text parsers; `system` and `process` bind them to
//! concrete files under a configurable proc root.

pub mod parser;
pub mod process;
pub mod system;

pub use parser::{ParseError, ProcStat};
pub use process::ProcessCollector;
pub use system::SystemCollector;
