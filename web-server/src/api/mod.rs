// web-server/src/api/mod.rs
pub mod auth;
pub mod session;

use actix_web::{error::InternalError, web, HttpResponse};
use common::AuthResponse;

use crate::middleware::bearer_auth::BearerAuth;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig, bearer_auth: BearerAuth) {
    cfg.service(
        actix_web::web::scope("/api")
            .app_data(json_config())
            .service(auth::api_index)
            .service(auth::challenge)
            .service(auth::authenticate)
            .service(
                web::scope("/session")
                    .wrap(bearer_auth)
                    .route("", web::get().to(session::current_session))
            )
    );
}

// Malformed bodies get the same shape as any other auth failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(AuthResponse::error(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
