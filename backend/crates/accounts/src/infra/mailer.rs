//! Mail Delivery Implementations
//!
//! Verification mail goes out through the Resend HTTP API. Deployments
//! without an API key fall back to a no-op mailer that logs the link,
//! which keeps local development working without outbound mail.

use serde::Serialize;

use crate::domain::mailer::Mailer;
use crate::domain::value_object::Email;
use crate::error::{AccountError, AccountResult};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend API mailer
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    async fn post(&self, payload: &ResendPayload<'_>) -> AccountResult<()> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| AccountError::Internal(format!("Mail request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AccountError::Internal(format!(
                "Mail provider returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

impl Mailer for ResendMailer {
    async fn send_verification(
        &self,
        to: &Email,
        verification_url: &str,
        ttl_hours: i64,
    ) -> AccountResult<()> {
        let html = format!(
            "<h2>Verify your email</h2>\
             <p>Click the link below to verify your email address:</p>\
             <p><a href=\"{url}\">{url}</a></p>\
             <p>This link expires in {ttl_hours} hours.</p>",
            url = verification_url,
        );

        let payload = ResendPayload {
            from: &self.from,
            to: [to.as_str()],
            subject: "Verify your email address",
            html,
        };

        self.post(&payload).await
    }
}

/// Mailer selected at startup
#[derive(Clone)]
pub enum AppMailer {
    Resend(ResendMailer),
    /// No outbound mail; verification links only appear in logs
    Disabled,
}

impl Mailer for AppMailer {
    async fn send_verification(
        &self,
        to: &Email,
        verification_url: &str,
        ttl_hours: i64,
    ) -> AccountResult<()> {
        match self {
            AppMailer::Resend(mailer) => {
                mailer.send_verification(to, verification_url, ttl_hours).await
            }
            AppMailer::Disabled => {
                tracing::warn!(
                    email = %to,
                    url = %verification_url,
                    "Mail delivery disabled; verification link not sent"
                );
                Ok(())
            }
        }
    }
}
