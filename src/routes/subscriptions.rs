use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;

use crate::domain::SubscriberEmail;
use crate::subscriber_store::SubscriberStore;
use crate::utils::error_chain_fmt;

#[derive(Deserialize)]
pub struct FormData {
    email: String,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} is already subscribed")]
    AlreadySubscribed(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed(_) => StatusCode::CONFLICT,
            SubscribeError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(form, store),
    fields(subscriber_email = %form.email)
)]
pub async fn subscribe(
    form: web::Form<FormData>,
    store: web::Data<SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let email = SubscriberEmail::parse(form.0.email).map_err(SubscribeError::Validation)?;
    if store
        .is_subscribed(&email)
        .context("Failed to scan the subscriber store")?
    {
        return Err(SubscribeError::AlreadySubscribed(email.to_string()));
    }
    store
        .append(&email)
        .await
        .context("Failed to append the new subscriber to the store")?;
    Ok(HttpResponse::Ok().finish())
}
