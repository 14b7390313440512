//! Comparison runs
//!
//! Ties the pipeline together: [`RecordBuilder`] turns raw transcript
//! entries into records, [`ComparisonCoordinator`] drives a full run and
//! [`ComparisonSummary`] reports on it.

pub mod coordinator;
pub mod records;
pub mod summary;

pub use coordinator::ComparisonCoordinator;
pub use records::RecordBuilder;
pub use summary::ComparisonSummary;
