pub mod health_check;
pub mod rate;
pub mod send_emails;
pub mod subscriptions;
