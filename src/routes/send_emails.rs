use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;

use crate::delivery::AlertDispatcher;
use crate::rate_feed::{RateFeedClient, RateFeedError};
use crate::subscriber_store::SubscriberStore;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error("failed to fetch the current rate")]
    Fetch(#[source] RateFeedError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for BroadcastError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Sends the current rate to every subscriber. Setup failures (feed
/// down, store unreadable) abort the request; individual batch failures
/// do not, they are aggregated in the response body.
#[tracing::instrument(
    name = "Broadcasting a rate alert to all subscribers",
    skip(store, rate_feed, dispatcher)
)]
pub async fn send_emails(
    store: web::Data<SubscriberStore>,
    rate_feed: web::Data<RateFeedClient>,
    dispatcher: web::Data<AlertDispatcher>,
) -> Result<HttpResponse, BroadcastError> {
    let rate = rate_feed
        .current_rate()
        .await
        .map_err(BroadcastError::Fetch)?;
    let subscribers = store
        .all()
        .context("Failed to read the subscriber store")?;
    let outcome = dispatcher.broadcast(&subscribers, rate).await;
    tracing::info!(
        batches_delivered = outcome.batches_delivered,
        batches_failed = outcome.batches_failed,
        "Broadcast completed"
    );
    Ok(HttpResponse::Ok().json(outcome))
}
