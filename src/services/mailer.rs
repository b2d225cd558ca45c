use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::SendEmail;

const EMAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Client for the outbound email HTTP API. Rate pacing is the delivery
/// stage's job, not this client's.
pub struct EmailClient {
    client: Client,
    api_key: String,
    from: String,
}

impl EmailClient {
    pub fn new(api_key: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl SendEmail for EmailClient {
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str) -> Result<()> {
        let request = SendRequest {
            from: self.from.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            html: html.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(EMAIL_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::EmailApi(format!("API error: {}", error_text)));
        }

        let send_response: SendResponse = response.json().await?;
        tracing::debug!(
            "Email accepted for {} (id: {})",
            to,
            send_response.id.as_deref().unwrap_or("unknown")
        );

        Ok(())
    }
}
