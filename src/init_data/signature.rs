//! Data check string and HMAC-SHA256 signature for init data
//!
//! Signing happens in three steps:
//! 1. Render every field except `hash` as `name=value`, sort the lines by byte
//!    order and join them with `\n`. This is the data check string.
//! 2. Derive a secret key from the bot token.
//! 3. HMAC-SHA256 the data check string with the derived key and hex encode it.
//!
//! # Important Notes
//!
//! - Values are signed in their stored form. For `user` that is the
//!   percent-encoded JSON, not the decoded text.
//! - Strings are hashed as UTF-8 bytes. A backend hashing any other encoding
//!   computes a different signature for the same text.
//! - Neither the token nor the derived key may ever be logged.

use std::fmt;

use clap::ValueEnum;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::fields::Field;
use crate::{consts, errors::InitDataError};

type HmacSha256 = Hmac<Sha256>;

/// How the signing key is obtained from the bot token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyScheme {
    /// HMAC-SHA256 keyed by the token over "WebAppData"
    #[default]
    TokenKeyed,
    /// HMAC-SHA256 keyed by "WebAppData" over the token
    WebAppDataKeyed,
    /// The raw bytes of the token followed by "WebAppData"
    Concatenated,
}

/// Key material the data check string is signed with
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, InitDataError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|err| {
        InitDataError::ConfigurationError(format!("failed to create HMAC instance: {err}"))
    })?;
    mac.update(message);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derives the signing key with the default [`KeyScheme::TokenKeyed`] scheme
pub fn derive_key(secret_token: &str) -> Result<SecretKey, InitDataError> {
    derive_key_with(secret_token, KeyScheme::TokenKeyed)
}

pub fn derive_key_with(secret_token: &str, scheme: KeyScheme) -> Result<SecretKey, InitDataError> {
    if secret_token.is_empty() {
        return Err(InitDataError::missing_field(consts::BOT_TOKEN_ENV));
    }

    let token = secret_token.as_bytes();
    let web_app_data = consts::WEB_APP_DATA.as_bytes();

    let key = match scheme {
        KeyScheme::TokenKeyed => hmac_sha256(token, web_app_data)?,
        KeyScheme::WebAppDataKeyed => hmac_sha256(web_app_data, token)?,
        KeyScheme::Concatenated => [token, web_app_data].concat(),
    };

    Ok(SecretKey(key))
}

/// Builds the data check string. Any `hash` field is left out.
pub fn canonicalize(fields: &[Field]) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .filter(|field| field.name != consts::HASH_FIELD)
        .map(|field| format!("{}={}", field.name, field.value))
        .collect();
    // UTF-8 byte order; UTF-16 sorts differ only for astral vs U+E000..U+FFFF text
    lines.sort();

    lines.join("\n")
}

/// Signs a data check string, returning 64 lowercase hex characters
pub fn sign(data_check_string: &str, key: &SecretKey) -> Result<String, InitDataError> {
    let digest = hmac_sha256(key.as_bytes(), data_check_string.as_bytes())?;

    Ok(hex::encode(digest))
}
