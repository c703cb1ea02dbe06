use serde::Serialize;

use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;

/// Partitions subscribers into bounded batches and dispatches one
/// provider request per batch.
pub struct AlertDispatcher {
    email_client: EmailClient,
    batch_size: usize,
    subject_template: String,
    text_template: String,
    html_template: String,
}

/// Aggregate result of one broadcast run. A failed batch is recorded
/// here and the remaining batches still go out.
#[derive(Debug, Serialize)]
pub struct BroadcastOutcome {
    pub subscribers: usize,
    pub batches_delivered: usize,
    pub batches_failed: usize,
}

impl AlertDispatcher {
    pub fn new(
        email_client: EmailClient,
        batch_size: usize,
        subject_template: String,
        text_template: String,
        html_template: String,
    ) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            email_client,
            batch_size,
            subject_template,
            text_template,
            html_template,
        }
    }

    /// Sends a rate alert to every subscriber, walking the list in order
    /// in chunks of at most `batch_size`. Every subscriber lands in
    /// exactly one batch; the final partial batch is flushed too.
    #[tracing::instrument(
        name = "Broadcasting rate alert",
        skip(self, subscribers),
        fields(subscribers = subscribers.len(), rate = rate)
    )]
    pub async fn broadcast(&self, subscribers: &[String], rate: f64) -> BroadcastOutcome {
        let subject = render(&self.subject_template, rate);
        let text = render(&self.text_template, rate);
        let html = render(&self.html_template, rate);

        let recipients: Vec<SubscriberEmail> = subscribers
            .iter()
            .filter_map(|stored| match SubscriberEmail::parse(stored.clone()) {
                Ok(email) => Some(email),
                Err(e) => {
                    tracing::error!(
                        error.message = %e,
                        "Skipping a subscriber. Their stored contact details are invalid"
                    );
                    None
                }
            })
            .collect();

        let mut outcome = BroadcastOutcome {
            subscribers: recipients.len(),
            batches_delivered: 0,
            batches_failed: 0,
        };
        for batch in recipients.chunks(self.batch_size) {
            match self
                .email_client
                .send_batch(batch, &subject, &html, &text)
                .await
            {
                Ok(()) => outcome.batches_delivered += 1,
                Err(e) => {
                    tracing::error!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        batch_size = batch.len(),
                        "Failed to deliver a batch. Continuing with the remaining batches"
                    );
                    outcome.batches_failed += 1;
                }
            }
        }
        outcome
    }
}

fn render(template: &str, rate: f64) -> String {
    template.replace("{rate}", &rate.to_string())
}
