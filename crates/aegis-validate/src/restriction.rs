//! Closed restriction-value enums.
//!
//! Restriction templates are built in code, but the enum values also arrive
//! as strings from operator configuration; `from_value` therefore parses
//! explicitly and reports unrecognized input instead of defaulting.

/// Error for a restriction string that names no known enum value. Always a
/// developer fault, never user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} value `{value}`")]
pub struct UnrecognizedValue {
    pub kind: &'static str,
    pub value: String,
}

/// Character-class requirement: the class MUST appear, may appear (DEFAULT),
/// or must be absent (NONE).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    Must,
    #[default]
    Default,
    None,
}

impl TriState {
    pub fn from_value(value: &str) -> Result<Self, UnrecognizedValue> {
        match value {
            "MUST" => Ok(Self::Must),
            "DEFAULT" => Ok(Self::Default),
            "NONE" => Ok(Self::None),
            _ => Err(UnrecognizedValue {
                kind: "character requirement",
                value: value.to_owned(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Default => "DEFAULT",
            Self::None => "NONE",
        }
    }
}

/// Nullable boolean used by the unix-time restrictions: explicitly allowed,
/// explicitly disallowed, or unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Allow {
    True,
    False,
    #[default]
    None,
}

impl Allow {
    pub fn from_value(value: &str) -> Result<Self, UnrecognizedValue> {
        match value {
            "TRUE" => Ok(Self::True),
            "FALSE" => Ok(Self::False),
            "NONE" => Ok(Self::None),
            _ => Err(UnrecognizedValue {
                kind: "nullable boolean",
                value: value.to_owned(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::None => "NONE",
        }
    }
}

/// Unit for unix-time bound magnitudes. Years use the Julian average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
    Years,
}

impl TimeUnit {
    pub fn from_value(value: &str) -> Result<Self, UnrecognizedValue> {
        match value {
            "SECONDS" => Ok(Self::Seconds),
            "MINUTES" => Ok(Self::Minutes),
            "HOURS" => Ok(Self::Hours),
            "DAYS" => Ok(Self::Days),
            "YEARS" => Ok(Self::Years),
            _ => Err(UnrecognizedValue {
                kind: "time unit",
                value: value.to_owned(),
            }),
        }
    }

    /// The unit expressed in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 60 * 60,
            Self::Days => 60 * 60 * 24,
            Self::Years => 31_557_600, // round(60 * 60 * 24 * 365.25)
        }
    }
}
