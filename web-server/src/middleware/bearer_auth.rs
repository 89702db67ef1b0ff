// web-server/src/middleware/bearer_auth.rs
use std::sync::Arc;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use common::{AuthError, AuthResponse, SessionClaims, TokenOptions, TokenValidator};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = value[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then_some(token)
}

// Gate for routes that need a valid session token
#[derive(Clone)]
pub struct BearerAuth {
    inner: Arc<BearerAuthInner>,
}

struct BearerAuthInner {
    secret: Vec<u8>,
    expected: TokenOptions,
    validator: TokenValidator,
}

impl BearerAuth {
    pub fn new(secret: Vec<u8>, expected: TokenOptions, validator: TokenValidator) -> Self {
        Self {
            inner: Arc::new(BearerAuthInner { secret, expected, validator }),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<SessionClaims, AuthError> {
        let token = bearer_token(headers)
            .ok_or_else(|| AuthError::token_invalid("missing bearer token"))?;
        self.inner
            .validator
            .validate(token, &self.inner.secret, Some(&self.inner.expected))
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BearerAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service,
            auth: self.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: S,
    auth: BearerAuth,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.auth.authorize(req.headers()) {
            Ok(claims) => {
                tracing::debug!("Authorized request for wallet: {}", claims.public_key);
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(async move {
                    fut.await.map(ServiceResponse::map_into_left_body)
                })
            },
            Err(e) => {
                tracing::warn!("Rejected request to {}: {}", req.path(), e);

                let response = HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(AuthResponse::error(e.to_string()));

                Box::pin(async move {
                    Ok(req.into_response(response).map_into_right_body())
                })
            }
        }
    }
}

/// Claims attached by [`BearerAuth`], available to handlers behind the gate
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<SessionClaims>().cloned();
        ready(
            claims
                .map(AuthenticatedUser)
                .ok_or_else(|| ApiError(AuthError::token_invalid("no authenticated session"))),
        )
    }
}
