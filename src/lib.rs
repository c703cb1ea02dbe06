pub mod configuration;
pub mod delivery;
pub mod domain;
pub mod email_client;
pub mod rate_feed;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
pub mod utils;
