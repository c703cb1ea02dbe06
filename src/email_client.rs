use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::configuration::DeliveryMode;
use crate::domain::SubscriberEmail;

/// Client for the transactional email provider's batch-send endpoint.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    authorization_token: Secret<String>,
    message_stream: String,
    delivery_mode: DeliveryMode,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        authorization_token: Secret<String>,
        message_stream: String,
        timeout: Duration,
        delivery_mode: DeliveryMode,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            message_stream,
            delivery_mode,
        }
    }

    /// Submits one batch as a single request: a JSON array with one
    /// message per recipient. In dry-run mode the payload is built and
    /// logged but never transmitted.
    pub async fn send_batch(
        &self,
        recipients: &[SubscriberEmail],
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/email/batch", self.base_url);
        let request_body: Vec<SendEmailRequest> = recipients
            .iter()
            .map(|recipient| SendEmailRequest {
                from: self.sender.as_ref(),
                to: recipient.as_ref(),
                subject,
                text_body: text_content,
                html_body: html_content,
                message_stream: &self.message_stream,
            })
            .collect();

        if self.delivery_mode == DeliveryMode::DryRun {
            tracing::info!(
                recipients = recipients.len(),
                payload = %serde_json::to_string(&request_body).unwrap_or_default(),
                "Dry-run mode, skipping the batch send"
            );
            return Ok(());
        }

        self.http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .header("Accept", "application/json")
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    html_body: &'a str,
    message_stream: &'a str,
}
