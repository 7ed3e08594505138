//! Best-effort notification of an event organizer about a new comment.
//!
//! Runs after the comment is stored. Nothing in here returns an error to the
//! caller: every step reduces to a [`NotificationOutcome`] that is logged and
//! dropped.

use std::sync::Arc;
use tracing::instrument;

use crate::event_lookup::EventLookup;
use crate::models::{Comment, Notification, NotificationPreference, excerpt};
use crate::providers::{EmailContent, EmailProvider};
use crate::repository::{NotificationRepository, PreferenceRepository};

/// Result of one notification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Nothing to notify, or not enough information to do it
    Skipped(String),
    Emailed,
    StoredInApp,
    Failed(String),
}

pub struct Notifier<P: PreferenceRepository, N: NotificationRepository> {
    events: Arc<dyn EventLookup>,
    preferences: Arc<P>,
    notifications: Arc<N>,
    email: Option<Arc<dyn EmailProvider>>,
}

impl<P: PreferenceRepository, N: NotificationRepository> Notifier<P, N> {
    pub fn new(events: Arc<dyn EventLookup>, preferences: Arc<P>, notifications: Arc<N>) -> Self {
        Self {
            events,
            preferences,
            notifications,
            email: None,
        }
    }

    pub fn with_email_provider(mut self, provider: Arc<dyn EmailProvider>) -> Self {
        self.email = Some(provider);
        self
    }

    #[instrument(skip(self, comment, author), fields(comment_id = %comment.id))]
    pub async fn notify(&self, comment: &Comment, author: &str) -> NotificationOutcome {
        let Some(event_id) = comment.event_id else {
            return NotificationOutcome::Skipped("comment is not attached to an event".into());
        };

        let event = match self.events.find_event(event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                return NotificationOutcome::Skipped(format!("event {} could not be resolved", event_id));
            }
            Err(e) => return NotificationOutcome::Skipped(e.to_string()),
        };

        let Some(recipient) = event.organizer_email.filter(|email| !email.trim().is_empty()) else {
            return NotificationOutcome::Skipped(format!(
                "event '{}' has no emailOrganizador",
                event.title
            ));
        };

        let preference = match self.preferences.get(&recipient).await {
            Ok(preference) => preference.unwrap_or_default(),
            Err(e) => return NotificationOutcome::Failed(e.to_string()),
        };

        tracing::debug!(preference = preference.as_str(), "Notifying organizer");

        match preference {
            NotificationPreference::Email => {
                let Some(provider) = self.email.as_ref() else {
                    return NotificationOutcome::Failed("email provider is not configured".into());
                };
                let email = comment_email(&recipient, author, &event.title, &comment.content);
                match provider.send(&email).await {
                    Ok(()) => NotificationOutcome::Emailed,
                    Err(e) => NotificationOutcome::Failed(format!("{}: {}", provider.name(), e)),
                }
            }
            NotificationPreference::App => {
                let notification = Notification::for_comment(
                    recipient,
                    author,
                    &event.title,
                    &comment.content,
                    event_id,
                );
                match self.notifications.insert(notification).await {
                    Ok(()) => NotificationOutcome::StoredInApp,
                    Err(e) => NotificationOutcome::Failed(e.to_string()),
                }
            }
        }
    }
}

impl<P: PreferenceRepository, N: NotificationRepository> Clone for Notifier<P, N> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            preferences: Arc::clone(&self.preferences),
            notifications: Arc::clone(&self.notifications),
            email: self.email.clone(),
        }
    }
}

/// Email telling `to` that `author` commented on the event titled `event_title`
pub fn comment_email(to: &str, author: &str, event_title: &str, content: &str) -> EmailContent {
    let quoted = excerpt(content);

    let html_body = format!(
        "<h3>Tienes un nuevo comentario</h3>\
         <p><strong>{author}</strong> ha comentado en tu evento <em>\"{title}\"</em>:</p>\
         <blockquote style=\"background: #f8f9fa; padding: 15px; border-left: 4px solid #0d6efd;\">\
         \"{quoted}\"</blockquote>\
         <p style=\"font-size: 12px; color: #888;\">Enviado desde Kalendas</p>",
        author = escape_html(author),
        title = escape_html(event_title),
        quoted = escape_html(&quoted),
    );
    let text_body = format!(
        "{} ha comentado en tu evento \"{}\":\n\n\"{}\"\n\nEnviado desde Kalendas",
        author, event_title, quoted
    );

    EmailContent {
        to_email: to.to_string(),
        subject: format!("Nuevo comentario en: {}", event_title),
        html_body,
        text_body,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
