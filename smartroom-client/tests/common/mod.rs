use std::sync::Arc;

use smartroom_client::services::{ApiService, AuthService, connect};
use smartroom_client::settings::Api;
use smartroom_mock::data::{AppState, MockData};

/// Serves `data` on an ephemeral port and returns the shared state for
/// inspection plus a ready-to-use client wired against it.
pub async fn start_backend(data: MockData) -> (Arc<AppState>, Arc<ApiService>, AuthService) {
    let state = Arc::new(AppState::new(data));
    let addr = smartroom_mock::spawn(Arc::clone(&state)).await;

    let (api, auth) = connect(Api {
        base_url: format!("http://{addr}/api/v1"),
        timeout_secs: 5,
        page_size: 100,
    })
    .expect("client construction");

    (state, api, auth)
}

pub async fn sign_in(auth: &AuthService) {
    auth.login("admin", "admin").await.expect("login");
}
