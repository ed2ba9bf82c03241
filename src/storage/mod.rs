mod file;
mod memory;

use std::fmt;

use crate::errors::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// A string key/value store backing one token scope.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Which of the two stores a record lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Survives restarts of the client.
    Persistent,
    /// Lives as long as the client that owns it.
    Session,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Persistent => write!(f, "persistent"),
            Scope::Session => write!(f, "session"),
        }
    }
}
