//! Kind-specific field verifiers.
//!
//! Each verifier returns the faults found for one field; an empty vector
//! means the field passed. Developer faults short-circuit the data checks
//! for that field.

pub mod datetime;
pub mod email;
pub mod number;
pub mod string;
pub mod unix;
pub mod uuid4;
