// web-server/src/state.rs
use common::{Config, Logger, TokenIssuer, TokenValidator};

use crate::middleware::bearer_auth::BearerAuth;

/// Shared, read-only state handed to every worker
pub struct AppState {
    pub config: Config,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
}

impl AppState {
    pub fn new(config: Config, logger: Logger) -> Self {
        Self {
            config,
            issuer: TokenIssuer::new(logger.clone()),
            validator: TokenValidator::new(logger),
        }
    }

    /// Bearer gate checking tokens against this server's secret and expected claims
    pub fn bearer_auth(&self) -> BearerAuth {
        BearerAuth::new(
            self.config.secret().to_vec(),
            self.config.token.clone(),
            self.validator.clone(),
        )
    }
}
