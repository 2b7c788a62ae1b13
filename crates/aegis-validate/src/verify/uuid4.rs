//! Canonical UUIDv4 string verification.
//!
//! Structural checks run in order (length, dash placement, version nibble,
//! variant nibble) before the final parse, so error messages name the first
//! thing wrong rather than a generic parse failure.

use uuid::Uuid;

use crate::fault::Fault;
use crate::schema::FieldValue;

pub fn check(name: &str, value: &FieldValue) -> Vec<Fault> {
    let FieldValue::Str(data) = value else {
        return vec![Fault::Data(format!(
            "{name} type is invalid. Expected str but received {}",
            value.kind_name()
        ))];
    };

    let bytes = data.as_bytes();

    if bytes.len() != 36 {
        return vec![Fault::Data(format!("uuid {name} length is not 36"))];
    }

    let dashes_placed = [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');
    if !dashes_placed || data.matches('-').count() != 4 {
        return vec![Fault::Data(format!("uuid {name} incorrectly formatted"))];
    }

    if bytes[14] != b'4' {
        return vec![Fault::Data(format!(
            "uuid {name} received version uuid{}. Expected version uuid4",
            bytes[14] as char
        ))];
    }

    if !matches!(bytes[19], b'8' | b'9' | b'a' | b'b') {
        return vec![Fault::Data(format!("uuid {name} variant invalid"))];
    }

    if Uuid::parse_str(data).is_err() {
        return vec![Fault::Data(format!("uuid {name} unable to convert to uuid"))];
    }

    Vec::new()
}
