use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

/// Client for the external price feed.
///
/// The feed returns a JSON document keyed by currency pair, e.g.
/// `{"btc_uah": {"sell": "1234.56"}}`; only the sell price of the
/// configured pair is read.
pub struct RateFeedClient {
    http_client: Client,
    url: String,
    pair: String,
}

#[derive(Deserialize)]
struct PairQuote {
    sell: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RateFeedError {
    #[error("failed to fetch a quote from the price feed")]
    Request(#[from] reqwest::Error),
    #[error("the price feed response is missing the \"{0}\" pair")]
    MissingPair(String),
    #[error("the price feed returned an unparseable sell price: {0:?}")]
    InvalidPrice(String),
}

impl RateFeedClient {
    pub fn new(url: String, pair: String, timeout: Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            url,
            pair,
        }
    }

    /// Fetches a fresh quote and returns the sell price of the configured
    /// pair. Nothing is cached.
    pub async fn current_rate(&self) -> Result<f64, RateFeedError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let quotes: HashMap<String, PairQuote> = response.json().await?;
        let quote = quotes
            .get(&self.pair)
            .ok_or_else(|| RateFeedError::MissingPair(self.pair.clone()))?;
        quote
            .sell
            .parse::<f64>()
            .map_err(|_| RateFeedError::InvalidPrice(quote.sell.clone()))
    }
}
