use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::rate_feed::RateFeedClient;

#[derive(Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscriber_store: SubscriberStoreSettings,
    pub rate_feed: RateFeedSettings,
    pub email_client: EmailClientSettings,
    pub delivery: DeliverySettings,
}

#[derive(Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct SubscriberStoreSettings {
    pub path: String,
}

#[derive(Clone, Deserialize)]
pub struct RateFeedSettings {
    pub url: String,
    pub pair: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl RateFeedSettings {
    pub fn client(self) -> RateFeedClient {
        let timeout = self.timeout();
        RateFeedClient::new(self.url, self.pair, timeout)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub authorization_token: Secret<String>,
    pub message_stream: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub delivery_mode: DeliveryMode,
}

impl EmailClientSettings {
    pub fn client(self) -> EmailClient {
        let sender = self.sender().expect("Invalid sender email address.");
        let timeout = self.timeout();
        EmailClient::new(
            self.base_url,
            sender,
            self.authorization_token,
            self.message_stream,
            timeout,
            self.delivery_mode,
        )
    }

    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Whether outbound batches are actually transmitted to the provider.
///
/// In dry-run mode every request is still built and logged, but no network
/// call is made. Overridable at runtime via
/// `APP_EMAIL_CLIENT__DELIVERY_MODE=live`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    DryRun,
    Live,
}

#[derive(Clone, Deserialize)]
pub struct DeliverySettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub batch_size: usize,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(
            "configuration.yaml",
            config::FileFormat::Yaml,
        ))
        // Runtime overrides, e.g. `APP_EMAIL_CLIENT__AUTHORIZATION_TOKEN`
        // for the provider token.
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize()
}
