use std::sync::Arc;

use tokio::sync::watch;

use smartroom_api::models::{LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::services::ApiService;

/// Single writer of the bearer token. Every request-issuing component reads
/// the token through the matching watch receiver, so a login is visible
/// everywhere immediately and nothing holds ambient global state.
pub struct AuthService {
    api: Arc<ApiService>,
    token_tx: watch::Sender<Option<String>>,
}

impl AuthService {
    pub fn new(api: Arc<ApiService>, token_tx: watch::Sender<Option<String>>) -> Self {
        Self { api, token_tx }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .api
            .sign_in(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.token_tx.send_replace(Some(response.token.clone()));
        tracing::info!(username = %response.username, "signed in");

        Ok(response)
    }

    pub fn logout(&self) {
        self.token_tx.send_replace(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_tx.borrow().is_some()
    }
}
