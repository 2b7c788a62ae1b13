//! Static restriction templates for the authentication operations.
//!
//! One `ValidationTemplates` instance is built at startup and handed to the
//! workflows; binding a template with the request values produces the
//! schema the validation engine runs. The date-of-birth window tracks the
//! current date, so the auth template is assembled per call.

use chrono::{Datelike, NaiveDate, Utc};

use aegis_validate::{
    DateTimeRules, DateWindow, FieldKind, FieldTemplate, StringRules, Template, TriState,
};

/// Oldest accepted age for registration, in years.
const DOB_MAX_AGE_YEARS: i32 = 110;
/// Youngest accepted age for registration, in years.
const DOB_MIN_AGE_YEARS: i32 = 9;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationTemplates;

impl ValidationTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Registration and login fields. Login binds only `email` and
    /// `password`; the remaining fields sit out unchecked.
    pub fn auth(&self) -> Template {
        let today = Utc::now().date_naive();

        Template::new(vec![
            FieldTemplate::new("email", FieldKind::Email),
            FieldTemplate::new(
                "password",
                FieldKind::Str(StringRules {
                    min_len: 12,
                    max_len: Some(128),
                    lower_case: TriState::Must,
                    upper_case: TriState::Must,
                    numbers: TriState::Must,
                    symbols: TriState::Must,
                }),
            ),
            FieldTemplate::new(
                "first_name",
                FieldKind::Str(StringRules {
                    min_len: 1,
                    max_len: Some(50),
                    numbers: TriState::None,
                    symbols: TriState::None,
                    ..Default::default()
                }),
            ),
            FieldTemplate::new(
                "last_name",
                FieldKind::Str(StringRules {
                    min_len: 1,
                    max_len: Some(50),
                    numbers: TriState::None,
                    symbols: TriState::None,
                    ..Default::default()
                }),
            ),
            FieldTemplate::new(
                "gender",
                FieldKind::Str(StringRules {
                    min_len: 4,
                    max_len: Some(17),
                    numbers: TriState::None,
                    ..Default::default()
                }),
            ),
            FieldTemplate::new(
                "date_of_birth",
                FieldKind::DateTime(DateTimeRules {
                    date: Some(DateWindow {
                        min: Some(shift_years(today, -DOB_MAX_AGE_YEARS).to_string()),
                        max: Some(shift_years(today, -DOB_MIN_AGE_YEARS).to_string()),
                    }),
                    time: None,
                }),
            ),
        ])
    }

    /// OTP verification fields. `session_uuid` is empty outside the login
    /// flow and skips verification then.
    pub fn otp(&self) -> Template {
        Template::new(vec![
            FieldTemplate::new("email", FieldKind::Email),
            FieldTemplate::new(
                "otp_code",
                FieldKind::Str(StringRules {
                    min_len: 6,
                    max_len: Some(6),
                    lower_case: TriState::None,
                    upper_case: TriState::None,
                    numbers: TriState::Must,
                    symbols: TriState::None,
                }),
            ),
            FieldTemplate::new("session_uuid", FieldKind::UuidV4).skip_empty(),
            FieldTemplate::new(
                "return_action",
                FieldKind::Str(StringRules {
                    min_len: 5,
                    max_len: Some(8),
                    lower_case: TriState::None,
                    numbers: TriState::None,
                    symbols: TriState::None,
                    ..Default::default()
                }),
            ),
        ])
    }

    pub fn logout(&self) -> Template {
        Template::new(vec![
            FieldTemplate::new("session_uuid", FieldKind::UuidV4),
            FieldTemplate::new("user_uuid", FieldKind::UuidV4),
        ])
    }
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(date)
}
