//! Domain models and types for hl7diff.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SegmentName`], [`PatientId`])
//! - **Records** ([`Record`], [`RecordSide`])
//! - **Error types** ([`Hl7DiffError`], [`ParseError`], [`TranscriptError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Segment names and patient identifiers are validated on construction, so
//! the diff engine never has to second-guess them:
//!
//! ```rust
//! use hl7diff::domain::{PatientId, SegmentName};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pid = SegmentName::new("PID")?;
//! let key = PatientId::new("123456")?;
//! assert_eq!(pid.as_str(), "PID");
//! assert_eq!(key.as_str(), "123456");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

pub use errors::{Hl7DiffError, ParseError, RecordErrorDetail, TranscriptError};
pub use ids::{PatientId, SegmentName};
pub use record::{Record, RecordSide};
pub use result::Result;
