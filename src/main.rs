use std::sync::Arc;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use anyhow::Context;
use serde::Serialize;

use crate::config::Config;
use crate::repository::TodoStore;

mod api;
mod config;
mod error;
mod models;
mod repository;
mod telemetry;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    let response = Response {
        message: "Resource not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

async fn setup(config: &Config) -> anyhow::Result<web::Data<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = repository::build_store(config).await?;
    Ok(web::Data::from(store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    telemetry::init_tracing(env!("CARGO_PKG_NAME")).context("failed to install tracing subscriber")?;

    let app_data = setup(&config).await?;
    tracing::info!(store = %config.store, host = %config.host, port = config.port, "starting todo service");

    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(api::todos::config)
            .service(healthcheck)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind to {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
