use std::io::Error;
use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::delivery::AlertDispatcher;
use crate::rate_feed::RateFeedClient;
use crate::routes;
use crate::subscriber_store::SubscriberStore;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, Error> {
        let store = SubscriberStore::new(configuration.subscriber_store.path);
        let rate_feed = configuration.rate_feed.client();
        let dispatcher = AlertDispatcher::new(
            configuration.email_client.client(),
            configuration.delivery.batch_size,
            configuration.delivery.subject,
            configuration.delivery.text_body,
            configuration.delivery.html_body,
        );

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, store, rate_feed, dispatcher)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: SubscriberStore,
    rate_feed: RateFeedClient,
    dispatcher: AlertDispatcher,
) -> Result<Server, Error> {
    let store = web::Data::new(store);
    let rate_feed = web::Data::new(rate_feed);
    let dispatcher = web::Data::new(dispatcher);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route(
                "/health_check",
                web::get().to(routes::health_check::health_check),
            )
            .route("/rate", web::get().to(routes::rate::get_rate))
            .route(
                "/subscribe",
                web::post().to(routes::subscriptions::subscribe),
            )
            .route(
                "/sendEmails",
                web::post().to(routes::send_emails::send_emails),
            )
            .app_data(store.clone())
            .app_data(rate_feed.clone())
            .app_data(dispatcher.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
