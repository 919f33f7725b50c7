//! Signed init data payloads
//!
//! This module turns [`InitDataParams`] and a bot token into the query string a
//! web client sends to its backend. A backend validator recomputes the `hash`
//! field from the other fields and the same token, so the output doubles as a
//! fixture for testing such validators.

pub mod fields;
pub mod schemas;
pub mod signature;

use log::{debug, info};
use serde::Serialize;
use url::form_urlencoded;

use crate::{consts, errors::InitDataError};
use fields::{Field, Payload};
use schemas::InitDataParams;
use signature::KeyScheme;

#[derive(Serialize)]
struct InitDataBody {
    #[serde(rename = "initDataRaw")]
    init_data_raw: String,
}

/// Payload fields in wire order plus the signature over them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInitData {
    fields: Vec<Field>,
    hash: String,
}

impl SignedInitData {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Data check string the hash was computed over
    pub fn data_check_string(&self) -> String {
        signature::canonicalize(&self.fields)
    }

    /// Serializes every field in insertion order with `hash` last
    ///
    /// Values are form-encoded on top of their stored form, so the already
    /// percent-encoded `user` value comes out encoded twice (`%7B` → `%257B`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            serializer.append_pair(&field.name, &field.value);
        }
        serializer.append_pair(consts::HASH_FIELD, &self.hash);

        serializer.finish()
    }

    /// JSON body for a `Content-Type: application/json` POST to the backend
    pub fn to_request_body(&self) -> Result<String, InitDataError> {
        let body = InitDataBody {
            init_data_raw: self.to_query_string(),
        };

        serde_json::to_string(&body)
            .map_err(|err| InitDataError::SerializationError(err.to_string()))
    }
}

/// Appends the signature to the payload without reordering it
pub fn assemble(payload: Payload, hash: String) -> SignedInitData {
    SignedInitData {
        fields: payload.into_fields(),
        hash,
    }
}

/// Runs the full pipeline: collect, canonicalize, derive, sign, assemble
pub fn generate(
    params: &InitDataParams,
    secret_token: &str,
    scheme: KeyScheme,
) -> Result<SignedInitData, InitDataError> {
    if secret_token.is_empty() {
        return Err(InitDataError::missing_field(consts::BOT_TOKEN_ENV));
    }

    let payload = Payload::from_params(params)?;

    let data_check_string = signature::canonicalize(payload.fields());
    debug!("data check string:\n{data_check_string}");

    let key = signature::derive_key_with(secret_token, scheme)?;
    let hash = signature::sign(&data_check_string, &key)?;
    info!("init data signed with {scheme:?} key scheme");

    Ok(assemble(payload, hash))
}
