//! # Init Data Schemas
//!
//! Inputs for a generated init data payload. These replace the sample values a
//! one-off script would hardcode, so fixtures can be described in code, on the
//! command line or in a JSON file.

use serde::{Deserialize, Serialize};

use crate::errors::InitDataError;

/// Messaging-platform user embedded in the `user` field
///
/// The declaration order of the fields is the key order of the JSON text, and
/// that text is part of the signed bytes. Reordering fields changes every
/// generated hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebAppUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// IETF language tag of the client, e.g. "en"
    pub language_code: String,
    pub is_premium: bool,
    pub allows_write_to_pm: bool,
}

impl WebAppUser {
    /// Rejects empty text fields, naming the first one found. Whitespace is a
    /// value like any other and is signed as given.
    pub fn validate(&self) -> Result<(), InitDataError> {
        let text_fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("username", &self.username),
            ("language_code", &self.language_code),
        ];

        match text_fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(InitDataError::missing_field(name)),
            None => Ok(()),
        }
    }
}

/// Everything that goes into one init data payload, except the secret token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitDataParams {
    pub user: WebAppUser,
    /// Unix timestamp in seconds, as decimal text
    pub auth_date: String,
    pub start_param: Option<String>,
    pub chat_type: Option<String>,
    pub chat_instance: Option<String>,
}

impl InitDataParams {
    /// The reference fixture every implementation is checked against
    pub fn sample() -> Self {
        Self {
            user: WebAppUser {
                id: 99281932,
                first_name: "Andrew".into(),
                last_name: "Rogue".into(),
                username: "rogue".into(),
                language_code: "en".into(),
                is_premium: true,
                allows_write_to_pm: true,
            },
            auth_date: "1716922846".into(),
            start_param: Some("debug".into()),
            chat_type: Some("sender".into()),
            chat_instance: Some("8428209589180549439".into()),
        }
    }

    /// Reads params from a JSON fixture. A missing key is reported by name.
    pub fn from_json(raw: &str) -> Result<Self, InitDataError> {
        serde_json::from_str(raw).map_err(|err| {
            InitDataError::ConfigurationError(format!("invalid init data params: {err}"))
        })
    }

    pub fn validate(&self) -> Result<(), InitDataError> {
        self.user.validate()?;

        if self.auth_date.is_empty() || !self.auth_date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InitDataError::ConfigurationError(format!(
                "`auth_date` must be a unix timestamp in decimal digits, got {:?}",
                self.auth_date
            )));
        }

        Ok(())
    }
}
