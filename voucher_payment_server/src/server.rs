use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use voucher_payment_engine::{SqliteDatabase, WebhookFlowApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, stripe_webhook},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let stripe_config = config.stripe;
    let srv = HttpServer::new(move || {
        let webhook_api = WebhookFlowApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vpg::access_log"))
            .app_data(web::Data::new(webhook_api))
            .app_data(web::Data::new(stripe_config.clone()))
            .service(health)
            .service(
                web::resource("/api/webhooks/stripe").route(web::post().to(stripe_webhook::<SqliteDatabase>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
