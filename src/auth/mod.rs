mod client;
mod types;

pub use client::AuthClient;
pub use types::{AuthorizeData, CodeKind, ConfirmReset, EmailRegister, EmailReset};
