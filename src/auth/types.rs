use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::token::flexible_timestamp;

/// Payload of a successful login.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorizeData {
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    pub token: String,
    #[serde(with = "flexible_timestamp")]
    pub expire: Timestamp,
}

/// Purpose of an emailed verification code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeKind {
    Register,
    Reset,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Register => write!(f, "register"),
            CodeKind::Reset => write!(f, "reset"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EmailRegister {
    pub email: String,
    pub code: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConfirmReset {
    pub email: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmailReset {
    pub email: String,
    pub code: String,
    pub password: String,
}
