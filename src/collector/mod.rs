//! Text-file data sources for trait resolution.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  SystemCollector        ProcessCollector     │
//! │  - /proc/cpuinfo        - /proc/[pid]/status │
//! │  - /proc/meminfo        - /proc/[pid]/stat   │
//! │            └──────────┬──────────┘           │
//! │                ┌──────▼──────┐               │
//! │                │  FileSystem │ (trait)       │
//! │                └──────┬──────┘               │
//! └───────────────────────┼──────────────────────┘
//!                  ┌──────┴──────┐
//!           ┌──────▼──────┐ ┌────▼────────┐
//!           │   RealFs    │ │   MockFs    │
//!           └─────────────┘ └─────────────┘
//! ```
//!
//! ```
//! use systraits::collector::{MockFs, SystemCollector};
//!
//! let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
//! let total = collector.meminfo_value("MemTotal").unwrap();
//! assert_eq!(total.as_deref(), Some("16384000 kB"));
//! ```

pub mod mock;
pub mod procfs;
pub mod traits;

pub use mock::MockFs;
pub use procfs::{ProcessCollector, SystemCollector};
pub use traits::{FileSystem, RealFs};
