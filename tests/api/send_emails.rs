use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{spawn_app, spawn_app_with_batch_size, TestApp};

async fn subscribe_many(app: &TestApp, n: usize) {
    for i in 1..=n {
        let response = app
            .post_subscribe(format!("email=sub{}%40example.com", i))
            .await;
        assert_eq!(200, response.status().as_u16());
    }
}

async fn batch_recipients(email_server: &MockServer) -> Vec<Vec<String>> {
    email_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body.as_array()
                .unwrap()
                .iter()
                .map(|message| message["To"].as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn send_emails_delivers_to_every_subscriber_in_bounded_batches() {
    let app = spawn_app_with_batch_size(3).await;
    subscribe_many(&app, 7).await;
    app.mock_rate_feed("1234.56").await;

    Mock::given(path("/email/batch"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_emails().await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["batches_delivered"], 3);
    assert_eq!(outcome["batches_failed"], 0);

    let batches = batch_recipients(&app.email_server).await;
    let sizes: Vec<usize> = batches.iter().map(|batch| batch.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    let flattened: Vec<String> = batches.into_iter().flatten().collect();
    let expected: Vec<String> = (1..=7).map(|i| format!("sub{}@example.com", i)).collect();
    assert_eq!(flattened, expected);
}

#[tokio::test]
async fn an_exactly_full_batch_is_delivered_as_one_request() {
    let app = spawn_app_with_batch_size(5).await;
    subscribe_many(&app, 5).await;
    app.mock_rate_feed("1234.56").await;

    Mock::given(path("/email/batch"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_emails().await;

    assert_eq!(200, response.status().as_u16());
    let batches = batch_recipients(&app.email_server).await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 5);
}

#[tokio::test]
async fn the_rate_is_interpolated_into_the_delivered_messages() {
    let app = spawn_app().await;
    subscribe_many(&app, 1).await;
    app.mock_rate_feed("1234.56").await;

    Mock::given(path("/email/batch"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_send_emails().await;

    let request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let message = &body.as_array().unwrap()[0];
    assert_eq!(message["To"], "sub1@example.com");
    assert!(message["TextBody"].as_str().unwrap().contains("1234.56"));
    assert!(message["HtmlBody"].as_str().unwrap().contains("1234.56"));
}

#[tokio::test]
async fn a_failed_batch_does_not_stop_the_broadcast() {
    let app = spawn_app_with_batch_size(3).await;
    subscribe_many(&app, 7).await;
    app.mock_rate_feed("1234.56").await;

    // The provider rejects the first batch and accepts the rest.
    Mock::given(path("/email/batch"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/email/batch"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_emails().await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["batches_delivered"], 2);
    assert_eq!(outcome["batches_failed"], 1);
}

#[tokio::test]
async fn a_broadcast_with_no_subscribers_sends_nothing() {
    let app = spawn_app().await;
    app.mock_rate_feed("1234.56").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_emails().await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["subscribers"], 0);
    assert_eq!(outcome["batches_delivered"], 0);
}

#[tokio::test]
async fn send_emails_returns_a_500_when_the_feed_is_down() {
    let app = spawn_app().await;
    subscribe_many(&app, 2).await;

    Mock::given(method("GET"))
        .and(path("/ticker"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.rate_feed_server)
        .await;
    Mock::given(path("/email/batch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_emails().await;

    assert_eq!(500, response.status().as_u16());
}
