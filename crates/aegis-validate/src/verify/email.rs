//! Email verification: single `@`, local-part length, domain MX resolution.

use crate::fault::Fault;
use crate::mx::{MxOutcome, MxResolver};
use crate::schema::{FieldValue, StringRules};
use crate::verify::string;

pub async fn check<R: MxResolver>(name: &str, value: &FieldValue, resolver: &R) -> Vec<Fault> {
    let FieldValue::Str(data) = value else {
        return vec![Fault::Data(format!(
            "{name} type is invalid. Expected str but received {}",
            value.kind_name()
        ))];
    };

    if data.matches('@').count() != 1 {
        return vec![Fault::Data(format!(
            "{name} is invalid. Email must only contain one @"
        ))];
    }

    // Split is infallible here: exactly one '@' was just established.
    let (local, domain) = data.split_once('@').unwrap_or((data, ""));

    let local_rules = StringRules {
        min_len: 1,
        max_len: Some(63),
        ..Default::default()
    };
    let faults = string::check("Email", &FieldValue::Str(local.to_owned()), &local_rules);
    if !faults.is_empty() {
        return faults;
    }

    match resolver.lookup_mx(domain).await {
        MxOutcome::Found => Vec::new(),
        MxOutcome::NoRecords => vec![Fault::Data(format!("{name} was unable to be verified"))],
        MxOutcome::NxDomain => vec![Fault::Data(format!("{name} has an invalid domain"))],
    }
}
