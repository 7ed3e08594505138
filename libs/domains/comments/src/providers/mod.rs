//! Email providers.
//!
//! The notifier only depends on the `EmailProvider` trait; SendGrid is the
//! provider used in deployments.

mod sendgrid;

pub use sendgrid::{SendGridConfig, SendGridProvider};

use crate::error::CommentResult;
use async_trait::async_trait;

/// Email content ready for sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailContent {
    /// Recipient email address.
    pub to_email: String,
    /// Email subject.
    pub subject: String,
    /// HTML body content.
    pub html_body: String,
    /// Plain text body content.
    pub text_body: String,
}

/// Trait for email sending providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email.
    async fn send(&self, email: &EmailContent) -> CommentResult<()>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
