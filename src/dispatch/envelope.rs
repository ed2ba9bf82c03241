use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::outcome::{Failure, Outcome, TransportError};

/// Envelope code the service uses for success.
pub const SUCCESS_CODE: i32 = 200;

/// The `{code, message, data}` wrapper every reply arrives in.
#[derive(Clone, Debug, Deserialize)]
pub struct ResponseEnvelope<T = Value> {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl ResponseEnvelope<Value> {
    pub fn decode(body: &str) -> Result<Self, TransportError> {
        serde_json::from_str(body)
            .map_err(|e| TransportError::Decode(format!("invalid response envelope: {e}")))
    }

    /// Routes on `code`: the payload is only decoded into `T` on success, so failure
    /// replies may carry any (or no) `data`.
    pub fn into_outcome<T: DeserializeOwned>(self, url: &str) -> Outcome<T> {
        if self.code != SUCCESS_CODE {
            return Outcome::Failure(Failure {
                message: self.message.unwrap_or_default(),
                code: self.code,
                url: url.to_string(),
            });
        }
        match serde_json::from_value(self.data.unwrap_or(Value::Null)) {
            Ok(data) => Outcome::Success(data),
            Err(e) => Outcome::Error(TransportError::Decode(format!(
                "unexpected response data: {e}"
            ))),
        }
    }
}
