use crate::config::Config;
use crate::log::Logger;
use anyhow::Context;
use chrono::{DateTime, Local};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const CHANNEL_PREFIX: &str = "whatsapp:";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    HttpError,
    NetworkError,
    InternalError,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::HttpError => "http-error",
            FailureKind::NetworkError => "network-error",
            FailureKind::InternalError => "internal-error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_sid: Option<String>,
    pub status: Option<String>,
    pub to: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable cause, `HTTP <code>` for HTTP errors.
    pub detail: String,
    /// Only set for [`FailureKind::HttpError`].
    pub status_code: Option<u16>,
    pub response: Option<String>,
    pub to: String,
    pub timestamp: DateTime<Local>,
}

/// Outcome of one send attempt. Always produced, whatever went wrong.
#[derive(Debug, Clone)]
pub enum SendResult {
    Sent(Delivery),
    Failed(Failure),
}

#[derive(Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

/// Puts an address into the `whatsapp:+<number>` form the provider expects.
pub fn normalize_recipient(address: &str) -> String {
    if address.starts_with(CHANNEL_PREFIX) {
        return address.to_string();
    }

    let number = address.trim().trim_start_matches('+');

    format!("{}+{}", CHANNEL_PREFIX, number)
}

pub struct WhatsAppClient<'a> {
    config: &'a Config,
    log: &'a dyn Logger,
}

impl<'a> WhatsAppClient<'a> {
    pub fn new(config: &'a Config, log: &'a dyn Logger) -> Self {
        Self { config, log }
    }

    pub fn send(&self, to: &str, body: &str) -> SendResult {
        let to = normalize_recipient(to);

        let result = match self.post(&to, body) {
            Ok(response) => read_response(response, &to),
            Err(PostError::Request(e)) => failure(
                FailureKind::NetworkError,
                format!("Network error: {}", e),
                &to,
            ),
            Err(PostError::Client(e)) => failure(
                FailureKind::InternalError,
                format!("Unexpected error: {}", e),
                &to,
            ),
        };

        match &result {
            SendResult::Sent(_) => {
                self.log
                    .info(&format!("WhatsApp message sent successfully to {}", to));
            }
            SendResult::Failed(f) if f.kind == FailureKind::HttpError => {
                self.log.error(&format!(
                    "Failed to send WhatsApp message. Status: {}, Response: {}",
                    f.status_code.unwrap_or_default(),
                    f.response.as_deref().unwrap_or_default()
                ));
            }
            SendResult::Failed(f) => {
                self.log.error(&format!(
                    "Error sending WhatsApp message to {}: {}",
                    to, f.detail
                ));
            }
        }

        result
    }

    fn post(&self, to: &str, body: &str) -> Result<reqwest::blocking::Response, PostError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(PostError::Client)?;

        client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", self.config.from_whatsapp.as_str()),
                ("To", to),
                ("Body", body),
            ])
            .send()
            .map_err(PostError::Request)
    }
}

// Building the client is our problem; failing to reach the provider is the network's.
enum PostError {
    Client(reqwest::Error),
    Request(reqwest::Error),
}

fn read_response(response: reqwest::blocking::Response, to: &str) -> SendResult {
    let status = response.status();

    if status != StatusCode::CREATED {
        let text = response.text().unwrap_or_default();
        return SendResult::Failed(Failure {
            kind: FailureKind::HttpError,
            detail: format!("HTTP {}", status.as_u16()),
            status_code: Some(status.as_u16()),
            response: Some(text),
            to: to.to_string(),
            timestamp: Local::now(),
        });
    }

    match parse_message_resource(response) {
        Ok(resource) => SendResult::Sent(Delivery {
            message_sid: resource.sid,
            status: resource.status,
            to: to.to_string(),
            timestamp: Local::now(),
        }),
        Err(e) => failure(
            FailureKind::InternalError,
            format!("Unexpected error: {:#}", e),
            to,
        ),
    }
}

fn parse_message_resource(
    response: reqwest::blocking::Response,
) -> anyhow::Result<MessageResource> {
    let text = response.text().context("Unable to read response body")?;

    serde_json::from_str::<MessageResource>(&text)
        .with_context(|| format!("Unexpected provider response: {}", text))
}

fn failure(kind: FailureKind, detail: String, to: &str) -> SendResult {
    SendResult::Failed(Failure {
        kind,
        detail,
        status_code: None,
        response: None,
        to: to.to_string(),
        timestamp: Local::now(),
    })
}
