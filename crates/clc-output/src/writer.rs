//! The `OutputWriter` trait implemented by backend writers.

use crate::{ActionRow, MobilityRow, OutputResult, RolloutRow};

/// Backend-agnostic row sink.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`LogObserver::take_error`][crate::LogObserver::take_error].
pub trait OutputWriter {
    /// Write one decision row.
    fn write_action(&mut self, row: &ActionRow) -> OutputResult<()>;

    /// Write one per-vehicle mobility row.
    fn write_mobility(&mut self, row: &MobilityRow) -> OutputResult<()>;

    /// Write one predicted-point row.
    fn write_rollout(&mut self, row: &RolloutRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
