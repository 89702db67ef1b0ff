// web-server/src/api/auth.rs
use actix_web::{get, post, web, HttpResponse, Responder};
use common::{AuthChallenge, AuthRequest, AuthResponse, AuthResult, ChallengeQuery};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

#[get("/")]
pub async fn api_index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "Wallet Auth API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// Hand out a fresh challenge for the client's wallet to sign
#[get("/auth/challenge")]
pub async fn challenge(query: web::Query<ChallengeQuery>) -> impl Responder {
    let public_key = query.into_inner().public_key;
    if public_key.trim().is_empty() {
        return HttpResponse::BadRequest().json(AuthResponse::error("publicKey is required"));
    }

    let challenge = AuthChallenge::now(public_key);
    tracing::debug!("Issued challenge for wallet: {}", challenge.public_key);
    HttpResponse::Ok().json(challenge)
}

// Exchange a signed challenge for a session token
#[post("/auth")]
pub async fn authenticate(
    state: web::Data<AppState>,
    body: web::Json<AuthRequest>,
) -> Result<HttpResponse, ApiError> {
    let auth: AuthResult = body.into_inner().into();

    let token = state
        .issuer
        .issue(&auth, state.config.secret(), &state.config.token)
        .map_err(|e| {
            tracing::warn!("Authentication failed for wallet {}: {}", auth.public_key, e);
            e
        })?;

    tracing::info!("Authenticated wallet: {}", auth.public_key);
    Ok(HttpResponse::Ok().json(AuthResponse::token(token)))
}
