//! String verification: length window plus four tri-state character classes.

use crate::fault::Fault;
use crate::restriction::TriState;
use crate::schema::{FieldValue, StringRules};

pub fn check(name: &str, value: &FieldValue, rules: &StringRules) -> Vec<Fault> {
    let FieldValue::Str(data) = value else {
        return vec![Fault::Data(format!(
            "{name} type is invalid. Expected str but received {}",
            value.kind_name()
        ))];
    };

    let mut rest_faults = Vec::new();

    if let Some(max_len) = rules.max_len {
        if max_len < rules.min_len {
            rest_faults.push(Fault::Developer(format!(
                "{name}-restriction-len_limits is invalid. max_len must be >= min_len"
            )));
        }
    }

    if rules.min_len < 0 {
        rest_faults.push(Fault::Developer(format!(
            "{name}-restriction-min_len is invalid. min_len must be a positive integer"
        )));
    }

    if !rest_faults.is_empty() {
        return rest_faults;
    }

    let mut faults = Vec::new();
    let data_len = data.chars().count() as i64;

    if data_len < rules.min_len {
        faults.push(Fault::Data(format!(
            "{name} string length of {data_len} is too short. Minimum expected length is {} characters",
            rules.min_len
        )));
    }

    if let Some(max_len) = rules.max_len {
        if data_len > max_len {
            faults.push(Fault::Data(format!(
                "{name} string length of {data_len} is too long. Maximum expected length is {max_len} characters"
            )));
        }
    }

    char_requirement(data, |c| c.is_lowercase(), rules.lower_case, name, "lower_case", &mut faults);
    char_requirement(data, |c| c.is_uppercase(), rules.upper_case, name, "upper_case", &mut faults);
    char_requirement(data, |c| c.is_ascii_digit(), rules.numbers, name, "number", &mut faults);
    char_requirement(data, |c| !c.is_alphanumeric(), rules.symbols, name, "symbol", &mut faults);

    faults
}

/// A field is invalid iff the class appears under NONE, or is missing under
/// MUST. DEFAULT never raises.
fn char_requirement(
    data: &str,
    class: impl Fn(char) -> bool,
    requirement: TriState,
    name: &str,
    class_name: &str,
    faults: &mut Vec<Fault>,
) {
    if requirement == TriState::Default {
        return;
    }

    let has_char = data.chars().any(class);

    if has_char && requirement == TriState::None {
        faults.push(Fault::Data(format!("{name} must not contain {class_name}")));
    } else if !has_char && requirement == TriState::Must {
        faults.push(Fault::Data(format!(
            "{name} must contain at least one {class_name}"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_value(s: &str) -> FieldValue {
        FieldValue::Str(s.to_owned())
    }

    #[test]
    fn accepts_string_within_length_window() {
        let rules = StringRules {
            min_len: 4,
            max_len: Some(8),
            ..Default::default()
        };
        assert!(check("name", &str_value("hello"), &rules).is_empty());
        assert!(check("name", &str_value("hell"), &rules).is_empty());
        assert!(check("name", &str_value("hellohel"), &rules).is_empty());
    }

    #[test]
    fn rejects_string_outside_length_window() {
        let rules = StringRules {
            min_len: 4,
            max_len: Some(8),
            ..Default::default()
        };

        let faults = check("name", &str_value("hey"), &rules);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].to_string().contains("too short"));

        let faults = check("name", &str_value("hellohello"), &rules);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].to_string().contains("too long"));
    }

    #[test]
    fn rejects_non_string_value() {
        let faults = check("name", &FieldValue::Int(7), &StringRules::default());
        assert_eq!(
            faults,
            vec![Fault::Data(
                "name type is invalid. Expected str but received int".to_owned()
            )]
        );
    }

    #[test]
    fn must_requires_class_presence() {
        let rules = StringRules {
            upper_case: TriState::Must,
            ..Default::default()
        };
        assert!(check("password", &str_value("Secret"), &rules).is_empty());

        let faults = check("password", &str_value("secret"), &rules);
        assert_eq!(
            faults,
            vec![Fault::Data(
                "password must contain at least one upper_case".to_owned()
            )]
        );
    }

    #[test]
    fn none_requires_class_absence() {
        let rules = StringRules {
            numbers: TriState::None,
            ..Default::default()
        };
        assert!(check("first_name", &str_value("Ada"), &rules).is_empty());

        let faults = check("first_name", &str_value("Ada99"), &rules);
        assert_eq!(
            faults,
            vec![Fault::Data("first_name must not contain number".to_owned())]
        );
    }

    #[test]
    fn default_never_raises_for_class() {
        let rules = StringRules::default();
        assert!(check("note", &str_value("AnyTHING at 4ll!"), &rules).is_empty());
        assert!(check("note", &str_value(""), &rules).is_empty());
    }

    #[test]
    fn symbol_class_covers_non_alphanumerics() {
        let rules = StringRules {
            symbols: TriState::Must,
            ..Default::default()
        };
        assert!(check("password", &str_value("pass!word"), &rules).is_empty());
        assert_eq!(check("password", &str_value("password1"), &rules).len(), 1);
    }

    #[test]
    fn misordered_length_limits_are_developer_fault() {
        let rules = StringRules {
            min_len: 10,
            max_len: Some(4),
            ..Default::default()
        };
        let faults = check("name", &str_value("hello"), &rules);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].is_developer());
        assert!(
            faults[0]
                .to_string()
                .starts_with("DEV ERROR: name-restriction-len_limits")
        );
    }

    #[test]
    fn negative_min_len_is_developer_fault() {
        let rules = StringRules {
            min_len: -1,
            ..Default::default()
        };
        let faults = check("name", &str_value("hello"), &rules);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].is_developer());
    }

    #[test]
    fn developer_fault_short_circuits_data_checks() {
        // Broken limits plus a value that would also fail MUST: only the
        // developer fault may surface.
        let rules = StringRules {
            min_len: 10,
            max_len: Some(4),
            upper_case: TriState::Must,
            ..Default::default()
        };
        let faults = check("password", &str_value("short"), &rules);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].is_developer());
    }

    #[test]
    fn accumulates_multiple_data_faults() {
        let rules = StringRules {
            min_len: 10,
            upper_case: TriState::Must,
            numbers: TriState::Must,
            ..Default::default()
        };
        let faults = check("password", &str_value("short"), &rules);
        assert_eq!(faults.len(), 3);
    }
}
