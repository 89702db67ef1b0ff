// Web Server - main.rs
// web-server/src/main.rs
mod api;
mod error;
mod middleware;
mod state;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use common::{setup_tracing, Config, Logger};
use state::AppState;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Wallet Auth Server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Setup tracing at the configured level
    let level = config
        .tracing_level()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    setup_tracing(level);

    if let Err(e) = config.validate() {
        tracing::error!("Refusing to start: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
    }

    // Save address before moving config into web::Data
    let server_addr = config.web_server_addr.clone();

    tracing::info!("Starting Wallet Auth Server on {}", server_addr);

    // Components log through the subscriber installed above
    let state = web::Data::new(AppState::new(config, Logger::current()));

    // Start HTTP server
    HttpServer::new(move || {
        let bearer_auth = state.bearer_auth();
        App::new()
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| api::configure(cfg, bearer_auth))
    })
    .bind(&server_addr)?
    .run()
    .await
}
