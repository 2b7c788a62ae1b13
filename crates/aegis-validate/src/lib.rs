//! Declarative, schema-driven request validation.
//!
//! A [`schema::Schema`] is an ordered list of fields, each carrying its raw
//! value, a closed [`schema::FieldKind`] tag with the restrictions for that
//! kind, and the `optional` / `skip_empty` / `check` flags. The
//! [`engine::Validator`] dispatches each field to a kind-specific verifier and
//! aggregates [`fault::Fault`]s: data faults reject the request, developer
//! faults flag a broken restriction set, and faults on optional fields are
//! advisory only.
//!
//! Email fields resolve the domain's MX record through the [`mx::MxResolver`]
//! port; everything else is pure.

pub mod engine;
pub mod fault;
pub mod mx;
pub mod restriction;
pub mod schema;
pub mod verify;

pub use engine::Validator;
pub use fault::{Advisories, Fault, Rejection};
pub use mx::{DnsMxResolver, MxOutcome, MxResolver};
pub use restriction::{Allow, TimeUnit, TriState, UnrecognizedValue};
pub use schema::{
    DateTimeRules, DateWindow, FieldKind, FieldSpec, FieldTemplate, FieldValue, NumberKind,
    NumberRules, Schema, StringRules, Template, TimeWindow, UnixBound, UnixRules,
};
