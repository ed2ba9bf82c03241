//! User-facing notifications.

use std::fmt;

use tracing::{Level, event};

/// Shown when a stored token is found past its expiry.
pub const SESSION_EXPIRED: &str = "登录状态已过期,请重新登录";
/// Shown for any transport error other than rate limiting.
pub const GENERIC_ERROR: &str = "发生了一些错误，请联系管理员";
pub const LOGOUT_SUCCESS: &str = "退出登录成功";

pub fn login_welcome(username: &str) -> String {
    format!("登录成功,欢迎{username}进入系统")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// Sink for messages meant for the person using the client.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Emits every notification as a `notice` tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => event!(Level::INFO, %level, text = message, "notice"),
            NoticeLevel::Warning => event!(Level::WARN, %level, text = message, "notice"),
            NoticeLevel::Error => event!(Level::ERROR, %level, text = message, "notice"),
        }
    }
}
