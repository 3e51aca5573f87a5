use std::sync::Arc;

use tokio::sync::watch;

mod api_service;
mod auth_service;
mod chart_service;
mod home_service;
mod room_service;

pub use api_service::ApiService;
pub use auth_service::AuthService;
pub use chart_service::{ChartKind, ChartService, ChartState, DateRange, SensorChoice};
pub use home_service::{HomeService, HomeState};
pub use room_service::{RoomService, RoomState};

use crate::error::ApiError;
use crate::settings::Api;

/// Wires the token channel between the auth service (single writer) and the
/// api service (reader), so no component ever touches global state.
pub fn connect(api: Api) -> Result<(Arc<ApiService>, AuthService), ApiError> {
    let (token_tx, token_rx) = watch::channel(None);
    let api = Arc::new(ApiService::new(api, token_rx)?);
    let auth = AuthService::new(Arc::clone(&api), token_tx);

    Ok((api, auth))
}
