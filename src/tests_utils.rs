//! This is a tests utility module, which contains the type definitions and
//! functions shared by the integration tests.
//! See `tests` directory for more information

use std::sync::{Arc, Mutex};

use crate::{
    config::Config,
    events::issues::NotificationMessage,
    notifier::{Notifier, NotifyError},
    webhook::configure,
    State,
};
use actix_http::Request;
pub use actix_web::http::StatusCode;
pub use actix_web::test;
use actix_web::{dev::ServiceResponse, web::Data, App};

pub use crate::webhook::WebhookError;

pub static WEBHOOK_ENDPOINT: &str = "/github/webhook/";
pub static TEST_SLACK_URL: &str = "https://hooks.slack.test/services/T000/B000/XXXX";

/// How a [`RecordingNotifier`] answers.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Accept,
    Reject(u16),
}

/// Notifier that keeps every message instead of sending it.
pub struct RecordingNotifier {
    reply: Reply,
    sent: Mutex<Vec<(String, NotificationMessage)>>,
}

impl RecordingNotifier {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(String, NotificationMessage)> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, url: &str, message: &NotificationMessage) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((url.to_owned(), message.clone()));
        }

        match self.reply {
            Reply::Accept => Ok(()),
            Reply::Reject(code) => Err(NotifyError::Rejected {
                status: reqwest::StatusCode::from_u16(code)
                    .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
                body: String::from("invalid_payload"),
            }),
        }
    }
}

pub fn configured() -> Config {
    Config::new(Some(String::from(TEST_SLACK_URL)))
}

pub async fn test_endpoint_with(req: Request, state: State) -> ServiceResponse {
    let app = test::init_service(App::new().app_data(Data::new(state)).configure(configure)).await;
    test::call_service(&app, req).await
}

/// Runs the request against an app whose Slack url is set and whose
/// notifier accepts everything.
pub async fn test_endpoint(req: Request) -> ServiceResponse {
    let state = State::with_notifier(configured(), RecordingNotifier::new(Reply::Accept));
    test_endpoint_with(req, state).await
}

pub async fn read_json(resp: ServiceResponse) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap_or_default()
}

pub mod payload_template {
    pub static GITHUB_ISSUES_OPENED: &[u8] =
        include_str!("../tests_payload/github_issues_opened.json").as_bytes();

    pub static GITHUB_ISSUES_WITHOUT_URL: &[u8] =
        include_str!("../tests_payload/github_issues_without_url.json").as_bytes();

    pub static GITHUB_FORK: &[u8] = include_str!("../tests_payload/github_fork.json").as_bytes();

    pub static MINIMAL_ISSUES_OPENED: &str = r#"{"action":"opened","issue":{"html_url":"https://x/1","title":"Bug","number":1},"repository":{"full_name":"o/r"},"sender":{"login":"alice"}}"#;
}
