use crate::{
    config::Config,
    events::{issues::IssuePayload, GITHUB_EVENT_HEADER, ISSUES_EVENT},
    notifier::{Notifier, NotifyError},
    State,
};
use actix_web::{
    http::{header::HeaderMap, Method, StatusCode},
    web::{self, Bytes, ServiceConfig},
    HttpRequest, HttpResponse, ResponseError,
};
use derive_more::{Display, Error};
use serde_json::{json, Value};
use tracing::{error, info};

// The Webhook Payload size limit is 25MB
pub static WEBHOOK_SIZE_LIMIT: usize = 25_000_000; // 25 * 1000 * 1000

pub static HEALTH_MESSAGE: &str = "EsepWebhook alive";

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum WebhookError {
    #[display("Empty body")]
    EmptyBody,
    #[display("Invalid JSON")]
    InvalidJson,
    #[display("Payload too large")]
    LargeBodySize,
    #[display("Slack not configured")]
    SlackNotConfigured,
    #[display("Failed to post to Slack")]
    SlackRejected,
    #[display("Slack call failed")]
    SlackCallFailed,
}

impl WebhookError {
    pub fn to_json(self) -> Value {
        json!({ "error": self.to_string() })
    }

    pub fn to_bytes(self) -> Bytes {
        Bytes::from(self.to_json().to_string())
    }
}

impl ResponseError for WebhookError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HandlerResponse::from(*self).into_http_response()
    }

    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::EmptyBody => StatusCode::BAD_REQUEST,
            WebhookError::InvalidJson => StatusCode::BAD_REQUEST,
            WebhookError::LargeBodySize => StatusCode::PAYLOAD_TOO_LARGE,
            WebhookError::SlackNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::SlackRejected => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::SlackCallFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Why a well-formed request was not forwarded.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    #[display("Not an 'issues' event")]
    NotIssuesEvent,
    #[display("No issue.html_url present")]
    MissingIssueUrl,
}

/// Successful (2xx) results of handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    Ignored(IgnoreReason),
    Posted {
        issue: String,
        action: String,
        repo: String,
    },
}

impl Outcome {
    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Alive => json!({ "ok": true, "message": HEALTH_MESSAGE }),
            Outcome::Ignored(reason) => json!({ "ignored": true, "reason": reason.to_string() }),
            Outcome::Posted {
                issue,
                action,
                repo,
            } => json!({
                "posted": true,
                "issue": issue,
                "action": action,
                "repo": repo,
            }),
        }
    }
}

/// Status and JSON body answered for one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResponse {
    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.body)
    }
}

impl From<Outcome> for HandlerResponse {
    fn from(outcome: Outcome) -> Self {
        Self {
            status: StatusCode::OK,
            body: outcome.to_json(),
        }
    }
}

impl From<WebhookError> for HandlerResponse {
    fn from(err: WebhookError) -> Self {
        Self {
            status: err.status_code(),
            body: err.to_json(),
        }
    }
}

/// An inbound request, detached from actix so the handler can be driven
/// directly.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundEvent {
    pub fn new(method: Method, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            headers,
            body: body.into(),
        }
    }

    pub fn is_health_probe(&self) -> bool {
        self.method.as_str().eq_ignore_ascii_case(Method::GET.as_str())
    }

    /// Value of `X-GitHub-Event`, if present and valid UTF-8.
    pub fn github_event(&self) -> Option<&str> {
        self.headers
            .get(GITHUB_EVENT_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    pub fn is_issues_event(&self) -> bool {
        self.github_event()
            .is_some_and(|event| event.eq_ignore_ascii_case(ISSUES_EVENT))
    }

    pub fn has_empty_body(&self) -> bool {
        matches!(std::str::from_utf8(&self.body), Ok(text) if text.trim().is_empty())
    }
}

/// Handles one inbound request. Never fails: every error becomes a JSON
/// response.
pub async fn handle(event: &InboundEvent, config: &Config, notifier: &dyn Notifier) -> HandlerResponse {
    match process(event, config, notifier).await {
        Ok(outcome) => outcome.into(),
        Err(err) => err.into(),
    }
}

pub async fn process(
    event: &InboundEvent,
    config: &Config,
    notifier: &dyn Notifier,
) -> Result<Outcome, WebhookError> {
    if event.is_health_probe() {
        return Ok(Outcome::Alive);
    }

    if !event.is_issues_event() {
        return Ok(Outcome::Ignored(IgnoreReason::NotIssuesEvent));
    }

    if event.has_empty_body() {
        return Err(WebhookError::EmptyBody);
    }

    let payload = match IssuePayload::from_slice(&event.body) {
        Ok(payload) => payload,
        Err(err) => {
            error!("Failed to parse JSON: {}", err);
            return Err(WebhookError::InvalidJson);
        }
    };

    let issue = payload.summary();
    if !issue.has_url() {
        return Ok(Outcome::Ignored(IgnoreReason::MissingIssueUrl));
    }

    let Some(slack_url) = config.slack_url() else {
        error!("SLACK_URL is not set, can't forward issue {}", issue.url);
        return Err(WebhookError::SlackNotConfigured);
    };

    match notifier.notify(slack_url, &issue.message()).await {
        Ok(()) => {}
        Err(err @ NotifyError::Rejected { .. }) => {
            error!("{}", err);
            return Err(WebhookError::SlackRejected);
        }
        Err(err @ NotifyError::Transport(_)) => {
            error!("{}", err);
            return Err(WebhookError::SlackCallFailed);
        }
    }

    info!(
        "Posted issue #{} ({}) of {} to Slack",
        issue.number, issue.action, issue.repo
    );

    Ok(Outcome::Posted {
        issue: issue.url,
        action: issue.action,
        repo: issue.repo,
    })
}

/// Actix entrypoint, mounted on every path for every method.
pub async fn receive_event(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<State>,
) -> HttpResponse {
    let mut event = InboundEvent::new(req.method().clone(), req.headers().clone(), Bytes::new());

    // Probes and non-issues deliveries are answered without reading the body.
    if event.is_health_probe() || !event.is_issues_event() {
        return handle(&event, &state.config, state.notifier.as_ref())
            .await
            .into_http_response();
    }

    event.body = match body.to_bytes_limited(WEBHOOK_SIZE_LIMIT).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(err)) => {
            error!("Failed to convert body payload to bytes. Error: {:?}", err);
            Bytes::new()
        }
        Err(_) => {
            error!("Body size is greater than 25MB.");
            return WebhookError::LargeBodySize.error_response();
        }
    };

    handle(&event, &state.config, state.notifier.as_ref())
        .await
        .into_http_response()
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/{tail:.*}", web::route().to(receive_event));
}
