//! Unix-timestamp verification.
//!
//! `allow_future` / `allow_past` gate which side of "now" a value may fall
//! on at all. The optional `min_time` / `max_time` bounds then carve a
//! window on the allowed side, each bound expressed as an offset from "now"
//! in a configurable unit. The future branch and the past branch are
//! evaluated independently.
//!
//! The past branch rejects `min <= max` where the future branch rejects
//! `min >= max`; the asymmetry is inherited wire behavior and intentionally
//! left as-is (see DESIGN.md).

use crate::fault::Fault;
use crate::restriction::{Allow, TimeUnit};
use crate::schema::{FieldValue, UnixRules};

/// Direction multiplier applied when converting a bound offset into an
/// absolute timestamp.
fn bound_limit(now: i64, direction: f64, unit: TimeUnit, value: f64) -> f64 {
    now as f64 + (value * unit.seconds() as f64) * direction
}

pub fn check(name: &str, value: &FieldValue, rules: &UnixRules, now: i64) -> Vec<Fault> {
    let FieldValue::Int(data) = value else {
        return vec![Fault::Data(format!(
            "{name} type is invalid. Expected int but received {}",
            value.kind_name()
        ))];
    };
    let data = *data as f64;

    if rules.allow_future == Allow::False && rules.allow_past == Allow::False {
        return vec![Fault::Developer(
            "Filter must allow either past or future".to_owned(),
        )];
    }

    if rules.allow_future == Allow::False && data > now as f64 {
        return vec![Fault::Data(format!(
            "{name} unix time cannot be set in the future"
        ))];
    }

    if rules.allow_past == Allow::False && data < now as f64 {
        return vec![Fault::Data(format!(
            "{name} unix time cannot be set in the past"
        ))];
    }

    let min = rules.min_time.unwrap_or_default();
    let max = rules.max_time;

    let max_future = max.map(|b| b.future).unwrap_or_default();
    let max_past = max.map(|b| b.past).unwrap_or_default();

    // Until a bound overrides it, the lower limit sits at "now".
    let mut min_limit = now as f64;

    // Future window.
    if min.future == Allow::True || max_future == Allow::True {
        if min.future != max_future && !min.current_time {
            return vec![Fault::Developer(format!(
                "{name} unix future restriction for min/max must both be set to TRUE"
            ))];
        }

        if min.past == Allow::True || max_past == Allow::True {
            return vec![Fault::Developer(format!(
                "{name} unix restriction for min/max past cannot be set to TRUE when min/max future is set to TRUE"
            ))];
        }

        if rules.allow_future == Allow::False {
            return vec![Fault::Developer(format!(
                "{name} unix restriction for min/max future cannot be set to TRUE when future unix is not allowed"
            ))];
        }

        if !min.current_time {
            min_limit = bound_limit(now, 1.0, min.unit, min.value as f64);
        }

        let max_limit = match max {
            Some(bound) => bound_limit(now, 1.0, bound.unit, bound.value as f64),
            None => f64::INFINITY,
        };

        if min_limit >= max_limit {
            return vec![Fault::Developer(format!(
                "{name} unix future restriction min limit ({min_limit}) greater than max limit ({max_limit})"
            ))];
        }

        if min_limit > data {
            return vec![Fault::Data(format!("{name} unix out of range (PAST)"))];
        }

        if data > max_limit {
            return vec![Fault::Data(format!("{name} unix out of range (FUTURE)"))];
        }
    }

    // Past window. Bounds run backwards from "now", so min_limit is the
    // newest acceptable value and max_limit the oldest.
    if min.past == Allow::True || max_past == Allow::True {
        if min.past != max_past && !min.current_time {
            return vec![Fault::Developer(format!(
                "{name} unix past restriction for min/max must both be set to TRUE"
            ))];
        }

        if rules.allow_past == Allow::False {
            return vec![Fault::Developer(format!(
                "{name} unix restriction for min/max past cannot be set to TRUE when past unix is not allowed"
            ))];
        }

        if !min.current_time {
            min_limit = bound_limit(now, -1.0, min.unit, min.value as f64);
        }

        let max_limit = match max {
            Some(bound) => bound_limit(now, -1.0, bound.unit, bound.value as f64),
            None => f64::NEG_INFINITY,
        };

        if min_limit <= max_limit {
            return vec![Fault::Developer(format!(
                "{name} unix past restriction min limit ({min_limit}) greater than max limit ({max_limit})"
            ))];
        }

        if min_limit < data {
            return vec![Fault::Data(format!("{name} unix out of range (PAST)"))];
        }

        if data < max_limit {
            return vec![Fault::Data(format!("{name} unix out of range (FUTURE)"))];
        }
    }

    Vec::new()
}
