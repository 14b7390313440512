//! Domain identifier types with validation
//!
//! Newtype wrappers for the two identifiers the comparison pipeline keys on:
//! the three-character segment name and the patient identifier used to
//! correlate records across transcripts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HL7 segment name newtype wrapper
///
/// Three ASCII characters, uppercase letters or digits, starting with a
/// letter (`PID`, `NK1`, `ZPD`).
///
/// # Examples
///
/// ```
/// use hl7diff::domain::ids::SegmentName;
/// use std::str::FromStr;
///
/// let name = SegmentName::from_str("NK1").unwrap();
/// assert_eq!(name.as_str(), "NK1");
/// assert!(SegmentName::from_str("pid").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentName(String);

impl SegmentName {
    /// Creates a new SegmentName, validating its shape
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if !Self::is_valid(&name) {
            return Err(format!(
                "Invalid segment name '{name}'. Expected 3 uppercase letters or digits starting with a letter"
            ));
        }
        Ok(Self(name))
    }

    /// Wraps a name known to be valid, such as a built-in default
    pub(crate) fn from_known(name: &str) -> Self {
        debug_assert!(Self::is_valid(name), "invalid built-in segment name {name}");
        Self(name.to_string())
    }

    /// Returns true if `candidate` has the shape of a segment name
    pub fn is_valid(candidate: &str) -> bool {
        let bytes = candidate.as_bytes();
        bytes.len() == 3
            && bytes[0].is_ascii_uppercase()
            && bytes[1..]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }

    /// Returns the segment name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for batch/file/message header segments, which declare
    /// their own encoding characters
    pub fn is_header(&self) -> bool {
        matches!(self.0.as_str(), "MSH" | "BHS" | "FHS")
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SegmentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SegmentName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SegmentName> for String {
    fn from(name: SegmentName) -> Self {
        name.0
    }
}

impl AsRef<str> for SegmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Patient identifier newtype wrapper
///
/// The correlation key shared by an output record and its example record.
/// An empty identifier is never a valid key.
///
/// # Examples
///
/// ```
/// use hl7diff::domain::ids::PatientId;
///
/// let id = PatientId::new("123456").unwrap();
/// assert_eq!(id.to_string(), "123456");
/// assert!(PatientId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
