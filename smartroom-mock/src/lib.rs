//! In-memory stand-in for the smartroom backend.
//!
//! Serves the same REST surface the real backend exposes, with simulated
//! history data, so the client can be exercised end to end without any
//! infrastructure. Runs standalone via the binary, or embedded by tests
//! through [`spawn`].

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::data::{AppState, MockData};
use crate::handles::*;
use crate::settings::Settings;

pub mod data;
pub mod handles;
pub mod settings;
pub mod simulate;

pub fn create_app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/floors", get(list_floors))
        .route("/floors/:floor_id/rooms", get(list_rooms))
        .route("/rooms/:room_id", get(get_room))
        .route("/rooms/:room_id/temperatures", get(list_temp_sensors))
        .route(
            "/rooms/:room_id/temperatures/average-history",
            get(temp_history),
        )
        .route("/rooms/:room_id/power-consumptions", get(list_power_sensors))
        .route(
            "/rooms/:room_id/power-consumptions/average-history",
            get(power_history),
        )
        .route("/lights/room/:room_id", get(list_lights))
        .route("/lights/:light_id/toggle-state", put(toggle_light))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let api = Router::new().route("/auth/signin", post(sign_in)).merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds an ephemeral local port and serves in the background. Used by the
/// client integration tests.
pub async fn spawn(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

pub async fn run(settings: &Arc<Settings>) {
    let mut data = MockData::demo();
    data.username = settings.mock.username.clone();
    data.password = settings.mock.password.clone();
    data.history.sample_minutes = settings.mock.sample_minutes;
    data.history.jitter = settings.mock.jitter;

    let state = Arc::new(AppState::new(data));
    let app = create_app(state);

    let ip_addr = settings.server.host.parse::<IpAddr>().unwrap();
    let address = SocketAddr::from((ip_addr, settings.server.port));
    let listener = TcpListener::bind(&address).await.unwrap();

    tracing::info!("mock backend listening on {:?}", address);

    axum::serve(listener, app).await.unwrap();
}
