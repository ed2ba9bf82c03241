use std::sync::Arc;

use jiff::Timestamp;
use tracing::{debug, info, warn};

use crate::errors::Error;
use crate::notify::{NoticeLevel, Notifier, SESSION_EXPIRED};
use crate::storage::{Scope, Storage};

use super::{Clock, TokenRecord};

/// Owns the token record across the persistent and session scopes.
pub struct TokenStore {
    key: String,
    persistent: Arc<dyn Storage>,
    session: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(
        key: impl Into<String>,
        persistent: Arc<dyn Storage>,
        session: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key: key.into(),
            persistent,
            session,
            notifier,
            clock,
        }
    }

    /// Writes the record to the persistent scope when `remember` is set, otherwise to the
    /// session scope. The other scope is left as it is.
    pub fn store(&self, token: &str, remember: bool, expire: Timestamp) -> Result<(), Error> {
        let scope = if remember {
            Scope::Persistent
        } else {
            Scope::Session
        };
        let serialized = serde_json::to_string(&TokenRecord::new(token, expire))?;
        self.storage(scope).set(&self.key, &serialized)?;
        info!(scope = %scope, expire = %expire, "token.stored");
        Ok(())
    }

    /// Returns the live token, preferring the persistent scope. An expired record is
    /// removed from both scopes and reported to the user.
    pub fn take(&self) -> Option<String> {
        let record = self
            .read(Scope::Persistent)
            .or_else(|| self.read(Scope::Session))?;
        if record.is_expired(self.clock.now()) {
            info!(expire = %record.expire, "token.expired");
            self.delete();
            self.notifier.notify(NoticeLevel::Warning, SESSION_EXPIRED);
            return None;
        }
        Some(record.token)
    }

    /// Removes the record from both scopes.
    pub fn delete(&self) {
        for scope in [Scope::Persistent, Scope::Session] {
            if let Err(err) = self.storage(scope).remove(&self.key) {
                warn!(scope = %scope, error = %err, "token.delete_failed");
            }
        }
        debug!("token.deleted");
    }

    fn storage(&self, scope: Scope) -> &dyn Storage {
        match scope {
            Scope::Persistent => self.persistent.as_ref(),
            Scope::Session => self.session.as_ref(),
        }
    }

    // Unreadable or corrupt records count as absent; corrupt ones are cleared.
    fn read(&self, scope: Scope) -> Option<TokenRecord> {
        let raw = match self.storage(scope).get(&self.key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(scope = %scope, error = %err, "token.read_failed");
                return None;
            }
        };
        match serde_json::from_str::<TokenRecord>(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(scope = %scope, error = %err, "token.corrupt_record");
                if let Err(err) = self.storage(scope).remove(&self.key) {
                    warn!(scope = %scope, error = %err, "token.delete_failed");
                }
                None
            }
        }
    }
}
