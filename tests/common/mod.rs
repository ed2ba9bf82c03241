#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use access_client::notify::{NoticeLevel, Notifier};
use access_client::token::Clock;
use access_client::{AuthClient, Config};
use jiff::{SignedDuration, Timestamp};
use tempfile::TempDir;
use tracing::subscriber::{DefaultGuard, set_default};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Registry, fmt};
use wiremock::{MockServer, ResponseTemplate};

pub fn now() -> Timestamp {
    "2025-04-01T08:00:00Z".parse().unwrap()
}

pub fn later(hours: i64) -> Timestamp {
    now() + SignedDuration::from_hours(hours)
}

/// A scratch directory for the persistent token scope, removed on drop.
pub fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("access-client-it")
        .tempdir()
        .expect("create temp dir")
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn advance(&self, by: SignedDuration) {
        let mut guard = self.now.lock().unwrap();
        *guard = *guard + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

pub struct Harness {
    pub client: AuthClient,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
    pub storage_dir: PathBuf,
    scratch: Option<TempDir>,
}

pub fn harness(server: &MockServer) -> Harness {
    let scratch = scratch_dir();
    let mut h = harness_in(server, scratch.path().to_path_buf());
    h.scratch = Some(scratch);
    h
}

/// Builds a client against `server`, reusing `dir` as its persistent scope.
pub fn harness_in(server: &MockServer, dir: PathBuf) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(ManualClock {
        now: Mutex::new(now()),
    });
    let cfg = Config::from_values(server.uri(), dir.clone(), None);
    let client = AuthClient::build(
        cfg,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    )
    .expect("client build failed");
    Harness {
        client,
        notifier,
        clock,
        storage_dir: dir,
        scratch: None,
    }
}

pub fn envelope_ok(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "code": 200, "message": "请求成功", "data": data })
}

/// HTTP 200 carrying a success envelope around `data`.
pub fn ok_reply(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope_ok(data))
}

/// HTTP 200 carrying a failure envelope.
pub fn failure_reply(code: i32, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope_err(code, message))
}

pub fn envelope_err(code: i32, message: &str) -> serde_json::Value {
    serde_json::json!({ "code": code, "message": message, "data": null })
}

struct VecWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl std::io::Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.lines.lock().unwrap();
        guard.push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn capture_logs() -> (Arc<Mutex<Vec<String>>>, DefaultGuard) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let writer_lines = lines.clone();
    let subscriber = Registry::default().with(
        fmt::Layer::default()
            .with_writer(move || VecWriter {
                lines: writer_lines.clone(),
            })
            .with_target(false)
            .with_level(true)
            .with_ansi(false),
    );
    let guard = set_default(subscriber);
    (lines, guard)
}
