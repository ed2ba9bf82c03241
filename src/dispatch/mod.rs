mod envelope;
mod outcome;

use std::sync::Arc;

use reqwest::header::USER_AGENT;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::notify::{GENERIC_ERROR, NoticeLevel, Notifier};
use crate::telemetry::request::RequestTelemetry;
use crate::token::TokenStore;

pub use envelope::{ResponseEnvelope, SUCCESS_CODE};
pub use outcome::{Failure, Outcome, TransportError};

/// Caller-supplied handler for application-level failures.
pub type FailureHandler = Box<dyn FnOnce(Failure) + Send>;

/// Wraps a closure as a failure handler, for passing in place of the default.
pub fn on_failure<F>(handler: F) -> Option<FailureHandler>
where
    F: FnOnce(Failure) + Send + 'static,
{
    Some(Box::new(handler))
}

pub(crate) enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Issues requests against the service and routes each reply to exactly one of
/// success, failure or error.
#[derive(Clone)]
pub struct RequestDispatcher {
    http_client: Client,
    base_url: Url,
    user_agent: String,
    tokens: Arc<TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl RequestDispatcher {
    pub fn new(
        http_client: Client,
        base_url: Url,
        user_agent: impl Into<String>,
        tokens: Arc<TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            user_agent: user_agent.into(),
            tokens,
            notifier,
        }
    }

    pub fn tokens(&self) -> Arc<TokenStore> {
        Arc::clone(&self.tokens)
    }

    /// GET `url`; `failure: None` selects [`RequestDispatcher::default_failure`].
    pub async fn get<T, S>(&self, url: &str, success: S, failure: Option<FailureHandler>)
    where
        T: DeserializeOwned,
        S: FnOnce(T),
    {
        let outcome = self.send_get(url).await;
        self.route(outcome, success, failure);
    }

    /// POST `body` as JSON.
    pub async fn post<B, T, S>(
        &self,
        url: &str,
        body: &B,
        success: S,
        failure: Option<FailureHandler>,
    ) where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        S: FnOnce(T),
    {
        let outcome = self.send_post(url, body).await;
        self.route(outcome, success, failure);
    }

    /// POST `form` as `application/x-www-form-urlencoded`.
    pub async fn post_form<T, S>(
        &self,
        url: &str,
        form: &[(&str, &str)],
        success: S,
        failure: Option<FailureHandler>,
    ) where
        T: DeserializeOwned,
        S: FnOnce(T),
    {
        let outcome = self.dispatch(Method::POST, url, form_body(form), true).await;
        self.route(outcome, success, failure);
    }

    pub async fn send_get<T: DeserializeOwned>(&self, url: &str) -> Outcome<T> {
        self.dispatch(Method::GET, url, RequestBody::Empty, true).await
    }

    pub async fn send_post<B, T>(&self, url: &str, body: &B) -> Outcome<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = match serde_json::to_value(body) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => {
                return Outcome::Error(TransportError::Decode(format!(
                    "request body is not serializable: {e}"
                )));
            }
        };
        self.dispatch(Method::POST, url, body, true).await
    }

    /// Hands an outcome to the matching callback. Transport errors always go through
    /// [`RequestDispatcher::default_error`].
    pub fn route<T, S>(&self, outcome: Outcome<T>, success: S, failure: Option<FailureHandler>)
    where
        S: FnOnce(T),
    {
        match outcome {
            Outcome::Success(data) => success(data),
            Outcome::Failure(f) => match failure {
                Some(handler) => handler(f),
                None => self.default_failure(&f),
            },
            Outcome::Error(err) => self.default_error(&err),
        }
    }

    pub fn default_failure(&self, failure: &Failure) {
        warn!(
            url = %failure.url,
            code = failure.code,
            msg = %failure.message,
            "request.failure"
        );
        self.notifier.notify(NoticeLevel::Warning, &failure.message);
    }

    /// Rate limiting surfaces the server's own message; everything else is generic.
    pub fn default_error(&self, err: &TransportError) {
        error!(error = %err, "request.error");
        let message = match err.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => err
                .body_message()
                .unwrap_or_else(|| GENERIC_ERROR.to_string()),
            _ => GENERIC_ERROR.to_string(),
        };
        self.notifier.notify(NoticeLevel::Error, &message);
    }

    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: RequestBody,
        authenticate: bool,
    ) -> Outcome<T> {
        let target = match self.resolve(url) {
            Ok(target) => target,
            Err(err) => return Outcome::Error(err),
        };
        let telemetry = RequestTelemetry::new(method.clone(), url);
        let mut builder = self
            .http_client
            .request(method, target)
            .header(USER_AGENT, self.user_agent.as_str());
        let token = if authenticate { self.tokens.take() } else { None };
        telemetry.emit_start(token.is_some());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = attach_body(builder, body);

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => return Outcome::Error(TransportError::Network(e)),
        };
        let status = resp.status();
        telemetry.emit_response(status);
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Outcome::Error(TransportError::Network(e)),
        };
        if !status.is_success() {
            return Outcome::Error(TransportError::Http { status, body: text });
        }
        match ResponseEnvelope::decode(&text) {
            Ok(envelope) => {
                telemetry.emit_envelope(envelope.code);
                envelope.into_outcome(url)
            }
            Err(err) => Outcome::Error(err),
        }
    }

    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let joined = if url.contains("://") {
            Url::parse(url)
        } else {
            self.base_url.join(url.trim_start_matches('/'))
        };
        joined.map_err(|e| TransportError::InvalidUrl(format!("'{}': {}", url, e)))
    }
}

pub(crate) fn form_body(form: &[(&str, &str)]) -> RequestBody {
    RequestBody::Form(
        form.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

fn attach_body(builder: RequestBuilder, body: RequestBody) -> RequestBuilder {
    match body {
        RequestBody::Empty => builder,
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Form(pairs) => builder.form(&pairs),
    }
}
