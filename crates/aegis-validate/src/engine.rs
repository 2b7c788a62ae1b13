//! Schema verification engine.

use chrono::Utc;

use crate::fault::{Advisories, Fault, Rejection};
use crate::mx::MxResolver;
use crate::schema::{FieldKind, FieldSpec, FieldValue, Schema};
use crate::verify;

/// Verifies bound schemas. Stateless apart from the MX resolver handle; one
/// instance is shared across requests.
#[derive(Clone)]
pub struct Validator<R: MxResolver> {
    resolver: R,
}

impl<R: MxResolver> Validator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Verify every checked field of `schema`.
    ///
    /// Faults on non-optional fields reject the schema; faults on optional
    /// fields come back as [`Advisories`] and never reject. A [`Rejection`]
    /// lists the hard faults first, then the advisories.
    pub async fn verify(&self, schema: &Schema) -> Result<Advisories, Rejection> {
        let mut errors = Vec::new();
        let mut advisories = Vec::new();

        for field in &schema.fields {
            if !field.check {
                continue;
            }

            if field.skip_empty {
                if let Some(FieldValue::Str(s)) = &field.value {
                    if s.is_empty() {
                        continue;
                    }
                }
            }

            let faults = self.verify_field(field).await;

            if field.optional {
                advisories.extend(faults);
            } else {
                errors.extend(faults);
            }
        }

        if errors.is_empty() {
            Ok(Advisories(advisories))
        } else {
            errors.extend(advisories);
            Err(Rejection { faults: errors })
        }
    }

    async fn verify_field(&self, field: &FieldSpec) -> Vec<Fault> {
        let Some(value) = &field.value else {
            // A checked field with no value only happens when a `FieldSpec`
            // is built by hand; binding a template never produces it.
            return vec![Fault::Developer(format!(
                "{} is checked but carries no value",
                field.name
            ))];
        };

        match &field.kind {
            FieldKind::Str(rules) => verify::string::check(&field.name, value, rules),
            FieldKind::Number(rules) => verify::number::check(&field.name, value, rules),
            FieldKind::Email => verify::email::check(&field.name, value, &self.resolver).await,
            FieldKind::UuidV4 => verify::uuid4::check(&field.name, value),
            FieldKind::Unix(rules) => {
                verify::unix::check(&field.name, value, rules, Utc::now().timestamp())
            }
            FieldKind::DateTime(rules) => {
                verify::datetime::check(&field.name, value, rules, Utc::now().date_naive())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mx::MxOutcome;
    use crate::restriction::TriState;
    use crate::schema::{FieldTemplate, StringRules, Template};
    use std::collections::HashMap;

    struct AlwaysFound;

    impl MxResolver for AlwaysFound {
        async fn lookup_mx(&self, _domain: &str) -> MxOutcome {
            MxOutcome::Found
        }
    }

    fn password_template() -> Template {
        Template::new(vec![
            FieldTemplate::new("email", FieldKind::Email),
            FieldTemplate::new(
                "password",
                FieldKind::Str(StringRules {
                    min_len: 12,
                    upper_case: TriState::Must,
                    ..Default::default()
                }),
            ),
            FieldTemplate::new(
                "nickname",
                FieldKind::Str(StringRules {
                    min_len: 3,
                    ..Default::default()
                }),
            )
            .optional(),
            FieldTemplate::new(
                "referrer",
                FieldKind::Str(StringRules {
                    min_len: 3,
                    ..Default::default()
                }),
            )
            .skip_empty(),
        ])
    }

    fn bind(
        email: Option<&str>,
        password: Option<&str>,
        nickname: Option<&str>,
        referrer: Option<&str>,
    ) -> Schema {
        password_template().bind(HashMap::from([
            ("email", email.map(FieldValue::from)),
            ("password", password.map(FieldValue::from)),
            ("nickname", nickname.map(FieldValue::from)),
            ("referrer", referrer.map(FieldValue::from)),
        ]))
    }

    #[tokio::test]
    async fn passes_a_fully_valid_schema() {
        let schema = bind(
            Some("user@example.com"),
            Some("CorrectHorse9!"),
            Some("ada"),
            None,
        );
        let advisories = Validator::new(AlwaysFound).verify(&schema).await.unwrap();
        assert!(advisories.is_empty());
    }

    #[tokio::test]
    async fn rejects_hard_faults_and_appends_advisories() {
        let schema = bind(
            Some("user@example.com"),
            Some("weak"),
            Some("x"), // optional, too short
            None,
        );
        let rejection = Validator::new(AlwaysFound)
            .verify(&schema)
            .await
            .unwrap_err();

        // Two hard password faults first, then the advisory nickname fault.
        assert_eq!(rejection.faults.len(), 3);
        assert!(rejection.messages()[0].contains("password"));
        assert!(rejection.messages()[2].contains("nickname"));
    }

    #[tokio::test]
    async fn optional_faults_alone_do_not_reject() {
        let schema = bind(
            Some("user@example.com"),
            Some("CorrectHorse9!"),
            Some("x"),
            None,
        );
        let advisories = Validator::new(AlwaysFound).verify(&schema).await.unwrap();
        assert_eq!(advisories.0.len(), 1);
        assert!(advisories.messages()[0].contains("nickname"));
    }

    #[tokio::test]
    async fn unchecked_fields_sit_out() {
        // No password supplied: bind marks it check=false, schema passes.
        let schema = bind(Some("user@example.com"), None, None, None);
        assert!(
            Validator::new(AlwaysFound)
                .verify(&schema)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn skip_empty_fields_are_ignored_when_empty() {
        let schema = bind(
            Some("user@example.com"),
            Some("CorrectHorse9!"),
            None,
            Some(""),
        );
        assert!(
            Validator::new(AlwaysFound)
                .verify(&schema)
                .await
                .is_ok()
        );

        // A non-empty value is checked as usual.
        let schema = bind(
            Some("user@example.com"),
            Some("CorrectHorse9!"),
            None,
            Some("ab"),
        );
        assert!(
            Validator::new(AlwaysFound)
                .verify(&schema)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn checked_field_without_value_is_developer_fault() {
        let schema = Schema {
            fields: vec![FieldSpec {
                name: "ghost".to_owned(),
                value: None,
                kind: FieldKind::UuidV4,
                optional: false,
                skip_empty: false,
                check: true,
            }],
        };
        let rejection = Validator::new(AlwaysFound)
            .verify(&schema)
            .await
            .unwrap_err();
        assert!(rejection.has_developer_fault());
    }
}
