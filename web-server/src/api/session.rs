// web-server/src/api/session.rs
use actix_web::{HttpResponse, Responder};
use common::SessionResponse;

use crate::middleware::bearer_auth::AuthenticatedUser;

// Return the claims of the caller's session token
pub async fn current_session(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(SessionResponse {
        success: true,
        claims: user.0,
    })
}
