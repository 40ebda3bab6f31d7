//! Error type shared by the procfs readers, platform backends and resolver.

use crate::collector::procfs::parser::ParseError;

/// Why a trait could not be resolved.
///
/// Data that is simply not provided by a platform is not an error: resolvers
/// report it as `Ok(None)`. Every variant here is collapsed to `"0"` by the
/// facade; [`ResolveError::is_fatal`] marks the one class the CLI treats as a
/// hard stop.
#[derive(Debug)]
pub enum ResolveError {
    /// A proc file could not be read.
    Io { path: String, source: std::io::Error },
    /// The process directory disappeared before its files were read.
    ProcessGone(u32),
    /// An OS call returned a failure.
    Os {
        call: &'static str,
        source: std::io::Error,
    },
    /// A proc record was malformed.
    Parse(ParseError),
    /// The process status record for this pid already failed to load in the
    /// current batch.
    RecordUnavailable(u32),
    /// The processor frequency text was present but not a number.
    Frequency { text: String },
    /// The OS reported a scheduling policy outside the known set.
    UnknownPolicy(i32),
}

impl ResolveError {
    /// Returns `true` for failures the CLI must not paper over with `"0"`.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::Frequency { .. })
    }

    /// Returns `true` when the error only means "no such file", which is the
    /// normal outcome for procfs traits on platforms without `/proc`.
    pub fn is_not_found(&self) -> bool {
        match self {
            ResolveError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            ResolveError::ProcessGone(_) => true,
            _ => false,
        }
    }

    pub(crate) fn last_os_error(call: &'static str) -> Self {
        ResolveError::Os {
            call,
            source: std::io::Error::last_os_error(),
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            ResolveError::ProcessGone(pid) => write!(f, "process {} disappeared", pid),
            ResolveError::Os { call, source } => write!(f, "{} failed: {}", call, source),
            ResolveError::Parse(e) => write!(f, "{}", e),
            ResolveError::RecordUnavailable(pid) => {
                write!(f, "status record for process {} is unavailable", pid)
            }
            ResolveError::Frequency { text } => {
                write!(f, "failed to convert frequency {:?} from cpuinfo", text)
            }
            ResolveError::UnknownPolicy(policy) => {
                write!(f, "unknown scheduling policy {}", policy)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Io { source, .. } | ResolveError::Os { source, .. } => Some(source),
            ResolveError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ResolveError {
    fn from(e: ParseError) -> Self {
        ResolveError::Parse(e)
    }
}
