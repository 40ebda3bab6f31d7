//! Per-batch scope for the `/proc/[pid]/stat` record.

use crate::collector::procfs::ProcStat;
use crate::error::ResolveError;

#[derive(Debug, Clone, Default)]
enum RecordState {
    #[default]
    Unparsed,
    Parsed(ProcStat),
    Failed,
}

/// The process a batch of resolutions targets, plus its status record once
/// something has needed it.
///
/// The record is parsed at most once per context. A context lives for one
/// batch; a new batch starts from a new context.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    pid: u32,
    record: RecordState,
}

impl ProcessContext {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            record: RecordState::Unparsed,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    #[cfg(test)]
    pub(crate) fn is_loaded(&self) -> bool {
        matches!(self.record, RecordState::Parsed(_))
    }

    /// Returns the record, calling `load` the first time it is needed.
    ///
    /// A failed load is reported once with its cause; later calls in the same
    /// batch return [`ResolveError::RecordUnavailable`] without retrying.
    pub fn record_with<L>(&mut self, load: L) -> Result<&ProcStat, ResolveError>
    where
        L: FnOnce(u32) -> Result<ProcStat, ResolveError>,
    {
        if matches!(self.record, RecordState::Unparsed) {
            match load(self.pid) {
                Ok(stat) => self.record = RecordState::Parsed(stat),
                Err(e) => {
                    self.record = RecordState::Failed;
                    return Err(e);
                }
            }
        }

        match &self.record {
            RecordState::Parsed(stat) => Ok(stat),
            _ => Err(ResolveError::RecordUnavailable(self.pid)),
        }
    }
}
