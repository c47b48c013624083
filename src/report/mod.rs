//! Run reporting
//!
//! The two shared accumulators every probe loop feeds - the operation
//! tally and the snapshot history - plus the post-run analysis and the
//! terminal summary built from them.

mod history;
mod summary;
mod tally;

pub use history::{Anomaly, StateHistory};
pub use summary::RunSummary;
pub use tally::OperationTally;
