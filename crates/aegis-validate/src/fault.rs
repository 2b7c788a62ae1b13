//! Validation fault and outcome types.

use std::fmt;

/// A single finding against one field.
///
/// `Developer` means the restriction set itself is broken (a bug in the
/// caller, not in user input) and short-circuits further checks on that
/// field. `Data` means the submitted value failed a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Developer(String),
    Data(String),
}

impl Fault {
    pub fn is_developer(&self) -> bool {
        matches!(self, Self::Developer(_))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Developer(msg) => write!(f, "DEV ERROR: {msg}"),
            Self::Data(msg) => write!(f, "{msg}"),
        }
    }
}

/// Faults raised on `optional` fields. They never reject a request; callers
/// may surface them as warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisories(pub Vec<Fault>);

impl Advisories {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

/// A rejected request: at least one fault on a non-optional field.
///
/// `faults` lists the hard faults first, then any advisory faults gathered
/// along the way, matching the order clients have always seen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation rejected: {}", self.messages().join("; "))]
pub struct Rejection {
    pub faults: Vec<Fault>,
}

impl Rejection {
    pub fn messages(&self) -> Vec<String> {
        self.faults.iter().map(ToString::to_string).collect()
    }

    /// Whether any fault points at a broken restriction set rather than bad
    /// user data. These should fail loudly in non-production environments.
    pub fn has_developer_fault(&self) -> bool {
        self.faults.iter().any(Fault::is_developer)
    }
}
