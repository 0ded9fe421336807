/*
[INPUT]:  Template choice, current rider, trip vehicle, driver-typed text
[OUTPUT]: Rendered SMS bodies and fire-and-forget delivery reports
[POS]:    Collaborator - messaging to rider contacts
[UPDATE]: When adding templates, placeholders, or SMS providers
*/

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("message text is empty")]
    EmptyBody,

    #[error("no phone number for {0}")]
    MissingRecipient(String),

    #[error("unknown message template: {0}")]
    UnknownTemplate(String),

    #[error("SMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMS provider rejected message (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Canned messages offered to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageTemplate {
    OnWay,
    Arrived,
    RunningLate,
    Traffic,
    Completed,
    Custom,
}

impl MessageTemplate {
    pub const ALL: [MessageTemplate; 6] = [
        MessageTemplate::OnWay,
        MessageTemplate::Arrived,
        MessageTemplate::RunningLate,
        MessageTemplate::Traffic,
        MessageTemplate::Completed,
        MessageTemplate::Custom,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MessageTemplate::OnWay => "on-way",
            MessageTemplate::Arrived => "arrived",
            MessageTemplate::RunningLate => "running-late",
            MessageTemplate::Traffic => "traffic",
            MessageTemplate::Completed => "completed",
            MessageTemplate::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageTemplate::OnWay => "On my way",
            MessageTemplate::Arrived => "Arrived",
            MessageTemplate::RunningLate => "Running late",
            MessageTemplate::Traffic => "Traffic delay",
            MessageTemplate::Completed => "Dropped off",
            MessageTemplate::Custom => "Custom message",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            MessageTemplate::OnWay => {
                "Hi! I'm on my way to pick up [CHILD_NAME]. I'll be there in about [ETA] minutes."
            }
            MessageTemplate::Arrived => {
                "I've arrived for pickup! I'm outside in a [VEHICLE_COLOR] [VEHICLE_MODEL]."
            }
            MessageTemplate::RunningLate => {
                "Hi, I'm running about 5 minutes late for pickup. Sorry for the delay!"
            }
            MessageTemplate::Traffic => {
                "There's unexpected traffic. I'll be about 10 minutes late for pickup."
            }
            MessageTemplate::Completed => {
                "[CHILD_NAME] has been safely dropped off at school. Have a great day!"
            }
            MessageTemplate::Custom => "",
        }
    }

    /// Next template in [`Self::ALL`], wrapping
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MessageTemplate {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| MessagingError::UnknownTemplate(s.to_string()))
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub child_name: String,
    /// Accepts "5" or "5 min"; only the number is substituted
    pub eta: String,
    pub vehicle_color: String,
    pub vehicle_model: String,
}

impl TemplateContext {
    fn eta_number(&self) -> &str {
        let eta = self.eta.trim();
        eta.strip_suffix("min").map(str::trim_end).unwrap_or(eta)
    }
}

/// Fill every placeholder occurrence
pub fn render(template: MessageTemplate, context: &TemplateContext) -> String {
    template
        .text()
        .replace("[CHILD_NAME]", &context.child_name)
        .replace("[ETA]", context.eta_number())
        .replace("[VEHICLE_COLOR]", &context.vehicle_color)
        .replace("[VEHICLE_MODEL]", &context.vehicle_model)
}

/// Message ready to hand to an SMS provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub to: String,
    pub body: String,
    pub trip_id: String,
}

/// SMS delivery collaborator
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MessagingError>;

    fn name(&self) -> &'static str;
}

/// Logs instead of sending
#[derive(Debug, Clone, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MessagingError> {
        info!(
            to = %message.to,
            trip_id = %message.trip_id,
            body = %message.body,
            "sending SMS"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// POSTs `{to, body, trip_id}` JSON to an SMS gateway webhook
#[derive(Debug, Clone)]
pub struct WebhookSmsSender {
    client: reqwest::Client,
    url: Url,
}

impl WebhookSmsSender {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, MessagingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SmsSender for WebhookSmsSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MessagingError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(message)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(MessagingError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

/// Result of a background send, reported back to the UI
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub to: String,
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Validates and dispatches messages without waiting on the provider
#[derive(Clone)]
pub struct Messenger {
    sender: Arc<dyn SmsSender>,
    reports: Option<mpsc::UnboundedSender<DeliveryReport>>,
}

impl Messenger {
    pub fn new(sender: Arc<dyn SmsSender>) -> Self {
        Self {
            sender,
            reports: None,
        }
    }

    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<DeliveryReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    pub fn sender_name(&self) -> &'static str {
        self.sender.name()
    }

    /// Spawn the send. Requires a tokio runtime; failures are logged, not retried.
    pub fn dispatch(&self, message: OutgoingMessage) -> Result<(), MessagingError> {
        if message.body.trim().is_empty() {
            return Err(MessagingError::EmptyBody);
        }
        if message.to.trim().is_empty() {
            return Err(MessagingError::MissingRecipient(message.trip_id.clone()));
        }

        let sender = self.sender.clone();
        let reports = self.reports.clone();
        tokio::spawn(async move {
            let error = match sender.send(&message).await {
                Ok(()) => None,
                Err(err) => {
                    warn!(to = %message.to, sender = sender.name(), error = %err, "SMS send failed");
                    Some(err.to_string())
                }
            };
            if let Some(reports) = reports {
                let _ = reports.send(DeliveryReport {
                    to: message.to,
                    error,
                });
            }
        });
        Ok(())
    }
}

impl fmt::Debug for Messenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messenger")
            .field("sender", &self.sender.name())
            .field("reports", &self.reports.is_some())
            .finish()
    }
}
