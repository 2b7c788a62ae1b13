//! Number verification: kind matching plus bounds.

use crate::fault::Fault;
use crate::schema::{FieldValue, NumberKind, NumberRules};

pub fn check(name: &str, value: &FieldValue, rules: &NumberRules) -> Vec<Fault> {
    // Kind matching first: float coerces an integer value, int is exact.
    let data = match (rules.kind, value) {
        (NumberKind::Float, FieldValue::Float(f)) => *f,
        (NumberKind::Float, FieldValue::Int(i)) => *i as f64,
        (NumberKind::Int, FieldValue::Int(i)) => *i as f64,
        _ => {
            return vec![Fault::Data(format!(
                "{name} type is invalid. Expected {} but received {}",
                rules.kind.name(),
                value.kind_name()
            ))];
        }
    };

    if rules.max_num < rules.min_num {
        return vec![Fault::Developer(format!(
            "{name}-restriction-num_limits is invalid. max_num must be >= min_num"
        ))];
    }

    let mut faults = Vec::new();
    let rendered = value.render();

    if data < rules.min_num {
        faults.push(Fault::Data(format!(
            "{name} number {rendered} is too small. Minimum expected number is {}",
            rules.min_num
        )));
    }

    if data > rules.max_num {
        faults.push(Fault::Data(format!(
            "{name} number {rendered} is too large. Maximum expected number is {}",
            rules.max_num
        )));
    }

    faults
}
