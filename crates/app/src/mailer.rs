use std::time::Duration;

use serde::Serialize;

use crate::error::{AppError, Result};
use subtrack_core::{ReminderTier, Subscription};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A rendered reminder, ready for whatever transport is configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub trait EmailTransport: Send + Sync {
    fn send(&self, email: &ReminderEmail) -> Result<()>;
}

/// Render one owner's reminder covering every qualifying subscription.
pub fn render_reminder_email(
    recipient_name: &str,
    recipient_email: &str,
    tier: ReminderTier,
    subscriptions: &[Subscription],
) -> ReminderEmail {
    let subject = if subscriptions.len() == 1 {
        format!(
            "{} renews on {}",
            subscriptions[0].name, subscriptions[0].end_date
        )
    } else {
        format!("{} subscriptions renew soon", subscriptions.len())
    };
    let mut rows = String::new();
    for sub in subscriptions {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{} {:.2}</td><td>{}</td></tr>",
            sub.name, sub.currency, sub.price, sub.end_date
        ));
    }
    let html = format!(
        "<p>Hi {recipient_name},</p>\
         <p>This is your {tier} renewal reminder.</p>\
         <table><tr><th>Subscription</th><th>Price</th><th>Renews</th></tr>{rows}</table>",
    );
    ReminderEmail {
        to: recipient_email.to_string(),
        subject,
        html,
    }
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Transport backed by the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::blocking::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|err| AppError::Send(err.to_string()))?;
        Ok(Self {
            client,
            api_key,
            from,
        })
    }
}

impl EmailTransport for ResendMailer {
    fn send(&self, email: &ReminderEmail) -> Result<()> {
        let payload = ResendPayload {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|err| AppError::Send(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(AppError::Send(format!("{status}: {body}")));
        }
        Ok(())
    }
}
