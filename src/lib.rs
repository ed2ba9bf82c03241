mod auth;
mod config;
mod dispatch;
pub mod errors;
pub mod notify;
pub mod storage;
mod telemetry;
pub mod token;

pub use auth::{AuthClient, AuthorizeData, CodeKind, ConfirmReset, EmailRegister, EmailReset};
pub use config::{Config, Endpoints};
pub use dispatch::{
    Failure, FailureHandler, Outcome, RequestDispatcher, ResponseEnvelope, SUCCESS_CODE,
    TransportError, on_failure,
};
pub use errors::Error;
