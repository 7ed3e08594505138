//! SendGrid email provider implementation.

use super::{EmailContent, EmailProvider};
use crate::error::{CommentError, CommentResult};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_API_URL: &str = "https://api.sendgrid.com/v3";

/// SendGrid API configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// SendGrid API key.
    pub api_key: String,
    /// Sender email address.
    pub from_email: String,
    /// Sender name.
    pub from_name: String,
    /// SendGrid API base URL (defaults to production).
    pub api_url: String,
}

impl SendGridConfig {
    pub fn new(api_key: String, from_email: String, from_name: String) -> Self {
        Self {
            api_key,
            from_email,
            from_name,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl FromEnv for SendGridConfig {
    /// `SENDGRID_API_KEY` and a sender address are required. The sender is read
    /// from `SENDGRID_FROM_EMAIL`, or the older `EMAIL_REMITENTE`.
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_optional("SENDGRID_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("SENDGRID_API_KEY".to_string()))?;
        let from_email = env_optional("SENDGRID_FROM_EMAIL")
            .or_else(|| env_optional("EMAIL_REMITENTE"))
            .ok_or_else(|| ConfigError::MissingEnvVar("SENDGRID_FROM_EMAIL".to_string()))?;
        let from_name = env_or_default("SENDGRID_FROM_NAME", "Kalendas");
        let api_url = env_or_default("SENDGRID_API_URL", DEFAULT_API_URL);

        Ok(Self::new(api_key, from_email, from_name).with_api_url(api_url))
    }
}

/// SendGrid email provider.
pub struct SendGridProvider {
    config: SendGridConfig,
    client: Client,
}

impl SendGridProvider {
    pub fn new(config: SendGridConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }
}

// SendGrid API request/response structures

#[derive(Debug, Serialize)]
struct SendGridRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct SendGridError {
    errors: Vec<SendGridErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorDetail {
    message: String,
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(&self, email: &EmailContent) -> CommentResult<()> {
        let request = SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: email.to_email.clone(),
                    name: None,
                }],
            }],
            from: EmailAddress {
                email: self.config.from_email.clone(),
                name: Some(self.config.from_name.clone()),
            },
            subject: email.subject.clone(),
            content: vec![
                Content {
                    content_type: "text/plain".to_string(),
                    value: email.text_body.clone(),
                },
                Content {
                    content_type: "text/html".to_string(),
                    value: email.html_body.clone(),
                },
            ],
        };

        debug!(to = %email.to_email, subject = %email.subject, "Sending email via SendGrid");

        let response = self
            .client
            .post(format!("{}/mail/send", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CommentError::Email(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(to = %email.to_email, "Email sent via SendGrid");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(
            to = %email.to_email,
            status = %status,
            error = %error_body,
            "Failed to send email via SendGrid"
        );

        let error_message = match serde_json::from_str::<SendGridError>(&error_body) {
            Ok(sg_error) => sg_error
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", "),
            Err(_) => error_body,
        };

        Err(CommentError::Email(format!(
            "SendGrid error ({}): {}",
            status, error_message
        )))
    }

    fn name(&self) -> &'static str {
        "SendGrid"
    }
}
