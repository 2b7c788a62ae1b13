//! Schema and restriction types.

use std::collections::HashMap;

use crate::restriction::{Allow, TimeUnit, TriState};

/// Raw value carried by a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    /// Short type-name used in "expected X but received Y" messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Restrictions for string fields.
///
/// Lengths are `i64` so that a misconfigured negative minimum is
/// representable and reported as a developer fault rather than silently
/// clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRules {
    pub min_len: i64,
    /// `None` means unbounded.
    pub max_len: Option<i64>,
    pub lower_case: TriState,
    pub upper_case: TriState,
    pub numbers: TriState,
    pub symbols: TriState,
}

impl Default for StringRules {
    fn default() -> Self {
        Self {
            min_len: 0,
            max_len: None,
            lower_case: TriState::Default,
            upper_case: TriState::Default,
            numbers: TriState::Default,
            symbols: TriState::Default,
        }
    }
}

/// Which numeric kind a number field requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Float,
}

impl NumberKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// Restrictions for number fields. An integer value coerces to float when
/// `kind` is [`NumberKind::Float`]; the reverse never coerces.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberRules {
    pub kind: NumberKind,
    pub min_num: f64,
    pub max_num: f64,
}

impl Default for NumberRules {
    fn default() -> Self {
        Self {
            kind: NumberKind::Int,
            min_num: f64::NEG_INFINITY,
            max_num: f64::INFINITY,
        }
    }
}

/// One bound of a unix-time window, expressed as an offset from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnixBound {
    /// Pin the bound to "now" instead of computing an offset. Only
    /// meaningful on `min_time`.
    pub current_time: bool,
    /// Bound applies on the future side of "now".
    pub future: Allow,
    /// Bound applies on the past side of "now".
    pub past: Allow,
    pub unit: TimeUnit,
    pub value: i64,
}

impl Default for UnixBound {
    fn default() -> Self {
        Self {
            current_time: false,
            future: Allow::None,
            past: Allow::None,
            unit: TimeUnit::Seconds,
            value: 0,
        }
    }
}

/// Restrictions for unix-timestamp fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnixRules {
    /// Whether values after "now" are acceptable at all. Defaults to FALSE:
    /// a bare unix field only accepts "now" itself.
    pub allow_future: Allow,
    /// Whether values before "now" are acceptable at all.
    pub allow_past: Allow,
    pub min_time: Option<UnixBound>,
    pub max_time: Option<UnixBound>,
}

impl Default for UnixRules {
    fn default() -> Self {
        Self {
            allow_future: Allow::False,
            allow_past: Allow::False,
            min_time: None,
            max_time: None,
        }
    }
}

/// Inclusive calendar-date window, `YYYY-MM-DD` strings.
/// Unset bounds default to 100 years either side of today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Inclusive time-of-day window, `HH:MM:SS` strings.
/// Unset bounds default to the full day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Restrictions for datetime-string fields. Which groups are present selects
/// the expected format: date-only, time-only, or combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeRules {
    pub date: Option<DateWindow>,
    pub time: Option<TimeWindow>,
}

/// Closed set of field kinds, each carrying its restriction set.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Str(StringRules),
    Number(NumberRules),
    Email,
    UuidV4,
    Unix(UnixRules),
    DateTime(DateTimeRules),
}

/// One entry of a bound schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub value: Option<FieldValue>,
    pub kind: FieldKind,
    /// Faults on this field are advisory and never reject the request.
    pub optional: bool,
    /// Skip verification entirely when the value is an empty string.
    pub skip_empty: bool,
    /// Whether this field participates in verification at all.
    pub check: bool,
}

/// An ordered, bound schema ready for [`crate::engine::Validator::verify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

/// A static field template: everything but the per-request value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTemplate {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
    pub skip_empty: bool,
}

impl FieldTemplate {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            skip_empty: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn skip_empty(mut self) -> Self {
        self.skip_empty = true;
        self
    }
}

/// A static restriction template for one operation. Binding per-request
/// values produces a [`Schema`]; fields with no value supplied are marked
/// `check = false` and sit out of verification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub fields: Vec<FieldTemplate>,
}

impl Template {
    pub fn new(fields: Vec<FieldTemplate>) -> Self {
        Self { fields }
    }

    pub fn bind(&self, mut values: HashMap<&'static str, Option<FieldValue>>) -> Schema {
        let fields = self
            .fields
            .iter()
            .map(|template| {
                let value = values.remove(template.name).flatten();
                FieldSpec {
                    name: template.name.to_owned(),
                    check: value.is_some(),
                    value,
                    kind: template.kind.clone(),
                    optional: template.optional,
                    skip_empty: template.skip_empty,
                }
            })
            .collect();
        Schema { fields }
    }
}
