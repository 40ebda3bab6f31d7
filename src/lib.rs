//! systraits - uniform access to operating-system and process facts.
//!
//! Every fact is a [`Trait`]. A [`SystemInfo`] resolves traits to text,
//! hiding whether the value came from `sysconf`, `sysinfo`, `getrlimit`,
//! `uname`, `sysctl` or a file under `/proc`.
//!
//! - `registry` - the closed set of traits and their canonical names
//! - `source` - which backend serves each trait
//! - `collector` - `/proc` text readers behind a mockable filesystem
//! - `facts` - per-platform system-call backends
//! - `resolver` / `facade` - dispatch and the total `"0"`-on-failure API

pub mod collector;
pub mod context;
pub mod error;
pub mod facade;
pub mod facts;
pub mod registry;
pub mod resolver;
pub mod source;

pub use context::ProcessContext;
pub use error::ResolveError;
pub use facade::{Batch, NOT_FOUND, SystemInfo};
pub use registry::{Trait, UnknownTrait};
pub use resolver::Resolver;
pub use source::{Family, Source};
