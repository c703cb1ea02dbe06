use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::rate_feed::{RateFeedClient, RateFeedError};
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
#[error(transparent)]
pub struct RateError(#[from] RateFeedError);

impl std::fmt::Debug for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RateError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[tracing::instrument(name = "Fetching the current rate", skip(rate_feed))]
pub async fn get_rate(rate_feed: web::Data<RateFeedClient>) -> Result<HttpResponse, RateError> {
    let rate = rate_feed.current_rate().await?;
    Ok(HttpResponse::Ok().json(rate))
}
