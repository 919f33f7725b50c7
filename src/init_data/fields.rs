//! Fields and the ordered payload they are collected into.

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::schemas::{InitDataParams, WebAppUser};
use crate::{consts, errors::InitDataError};

/// Characters `encodeURIComponent` leaves untouched
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Stored form of the value. This exact text is what gets signed.
    pub value: String,
}

pub fn build_field(name: impl Into<String>, value: impl Into<String>) -> Field {
    Field {
        name: name.into(),
        value: value.into(),
    }
}

/// Builds the `user` field: JSON text in struct order, percent-encoded once
pub fn build_user_field(user: &WebAppUser) -> Result<Field, InitDataError> {
    let json = serde_json::to_string(user)
        .map_err(|err| InitDataError::SerializationError(err.to_string()))?;

    Ok(build_field(consts::USER_FIELD, encode_uri_component(&json)))
}

/// Percent-encodes UTF-8 text the way `encodeURIComponent` does
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Ordered, unsigned set of fields with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<Field>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the fields of `params` in the order they are sent on the wire
    pub fn from_params(params: &InitDataParams) -> Result<Self, InitDataError> {
        params.validate()?;

        let mut payload = Self::new();
        payload.push(build_user_field(&params.user)?)?;
        let auth_date = build_field(consts::AUTH_DATE_FIELD, params.auth_date.as_str());
        payload.push(auth_date)?;

        let optional = [
            (consts::START_PARAM_FIELD, &params.start_param),
            (consts::CHAT_TYPE_FIELD, &params.chat_type),
            (consts::CHAT_INSTANCE_FIELD, &params.chat_instance),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                payload.push(build_field(name, value.as_str()))?;
            }
        }

        debug!("collected {} init data fields", payload.len());
        Ok(payload)
    }

    /// Appends a field. The `hash` name is reserved for the signature and
    /// names must not repeat.
    pub fn push(&mut self, field: Field) -> Result<(), InitDataError> {
        if field.name == consts::HASH_FIELD {
            return Err(InitDataError::ConfigurationError(format!(
                "`{}` is added by signing and cannot be set by hand",
                consts::HASH_FIELD
            )));
        }

        if self.get(&field.name).is_some() {
            return Err(InitDataError::ConfigurationError(format!(
                "duplicate field `{}`",
                field.name
            )));
        }

        self.fields.push(field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}
