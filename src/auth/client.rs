use std::sync::Arc;

use reqwest::{Client, Method};
use tracing::{error, info};

use crate::config::{Config, Endpoints};
use crate::dispatch::{FailureHandler, RequestDispatcher, form_body};
use crate::errors::Error;
use crate::notify::{
    GENERIC_ERROR, LOGOUT_SUCCESS, NoticeLevel, Notifier, TracingNotifier, login_welcome,
};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::token::{Clock, SystemClock, TokenStore};

use super::{AuthorizeData, CodeKind, ConfirmReset, EmailRegister, EmailReset};

/// Login, logout and account operations on top of a [`RequestDispatcher`].
///
/// Each `AuthClient` owns its session scope: a token stored with `remember = false`
/// is gone once the client is dropped, while a remembered token lives in
/// `Config::storage_dir` and is picked up by the next client built on that directory.
#[derive(Clone)]
pub struct AuthClient {
    dispatcher: RequestDispatcher,
    tokens: Arc<TokenStore>,
    notifier: Arc<dyn Notifier>,
    endpoints: Endpoints,
}

impl AuthClient {
    /// Builds a client that reports through `tracing` and checks expiry against the wall clock.
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::build(config, Arc::new(TracingNotifier), Arc::new(SystemClock))
    }

    pub fn build(
        config: Config,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        let base_url = config.validate()?;
        let persistent: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.storage_dir));
        let session: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let tokens = Arc::new(TokenStore::new(
            config.storage_key.as_str(),
            persistent,
            session,
            Arc::clone(&notifier),
            clock,
        ));
        let http_client = Client::builder().build()?;
        let dispatcher = RequestDispatcher::new(
            http_client,
            base_url,
            config.user_agent.as_str(),
            Arc::clone(&tokens),
            Arc::clone(&notifier),
        );
        Ok(Self {
            dispatcher,
            tokens,
            notifier,
            endpoints: config.endpoints,
        })
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn tokens(&self) -> Arc<TokenStore> {
        Arc::clone(&self.tokens)
    }

    /// Posts the credentials as a form. On success the token is stored (persistently
    /// when `remember` is set) before `success` runs.
    pub async fn login<S>(
        &self,
        username: &str,
        password: &str,
        remember: bool,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        S: FnOnce(AuthorizeData),
    {
        let form = [("username", username), ("password", password)];
        let outcome = self
            .dispatcher
            .dispatch::<AuthorizeData>(
                Method::POST,
                &self.endpoints.login,
                form_body(&form),
                false,
            )
            .await;
        self.dispatcher.route(
            outcome,
            |data: AuthorizeData| {
                if let Err(err) = self.tokens.store(&data.token, remember, data.expire) {
                    error!(error = %err, "login.store_failed");
                    self.notifier.notify(NoticeLevel::Error, GENERIC_ERROR);
                    return;
                }
                info!(username = %data.username, remember, "login.success");
                self.notifier
                    .notify(NoticeLevel::Success, &login_welcome(&data.username));
                success(data);
            },
            failure,
        );
    }

    pub async fn logout<S>(&self, success: S, failure: Option<FailureHandler>)
    where
        S: FnOnce(),
    {
        self.dispatcher
            .get(
                &self.endpoints.logout,
                |()| {
                    self.tokens.delete();
                    info!("logout.success");
                    self.notifier.notify(NoticeLevel::Success, LOGOUT_SUCCESS);
                    success();
                },
                failure,
            )
            .await;
    }

    /// True when no live token is stored.
    pub fn unauthorized(&self) -> bool {
        self.tokens.take().is_none()
    }

    /// Asks the service to email a verification code for registration or password reset.
    pub async fn ask_code<S>(
        &self,
        email: &str,
        kind: CodeKind,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        S: FnOnce(),
    {
        let url = format!(
            "{}?email={}&type={}",
            self.endpoints.ask_code,
            urlencoding::encode(email),
            kind
        );
        self.dispatcher.get(&url, |()| success(), failure).await;
    }

    pub async fn register<S>(
        &self,
        request: &EmailRegister,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        S: FnOnce(),
    {
        self.dispatcher
            .post(&self.endpoints.register, request, |()| success(), failure)
            .await;
    }

    /// Checks an emailed reset code before a new password is chosen.
    pub async fn reset_confirm<S>(
        &self,
        request: &ConfirmReset,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        S: FnOnce(),
    {
        self.dispatcher
            .post(&self.endpoints.reset_confirm, request, |()| success(), failure)
            .await;
    }

    pub async fn reset_password<S>(
        &self,
        request: &EmailReset,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        S: FnOnce(),
    {
        self.dispatcher
            .post(&self.endpoints.reset_password, request, |()| success(), failure)
            .await;
    }
}
