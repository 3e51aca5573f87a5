use std::env;
use std::sync::Arc;

use smartroom_client::services::{ChartKind, ChartService, ChartState, HomeService, connect};
use smartroom_client::settings::Settings;

#[tokio::main]
async fn main() {
    let settings = Arc::new(Settings::new().expect("Failed to load settings."));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level}").into()
        }))
        .init();

    let (api, auth) = connect(settings.api.clone()).expect("Failed to build API client.");

    let username = env::var("SMARTROOM_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("SMARTROOM_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    if let Err(e) = auth.login(&username, &password).await {
        tracing::error!("login failed: {e}");
        return;
    }

    let home = HomeService::new(Arc::clone(&api));
    home.load().await;
    let overview = home.current();
    tracing::info!(
        floors = overview.floors.len(),
        rooms = overview.rooms.len(),
        "home overview loaded"
    );

    let Some(room) = overview.rooms.first().cloned() else {
        tracing::warn!("no rooms to chart");
        return;
    };

    let chart = ChartService::new(Arc::clone(&api), room.id, ChartKind::Temperature);
    let mut updates = chart.state();
    chart.load_sensors().await;

    let outcome = loop {
        match chart.current() {
            state @ (ChartState::Ready(_) | ChartState::Empty | ChartState::Failed { .. }) => {
                break state;
            }
            _ => {}
        }
        if updates.changed().await.is_err() {
            break chart.current();
        }
    };

    match outcome {
        ChartState::Ready(series) => {
            tracing::info!(room = %room.name, points = series.points.len(), "temperature chart");
            for (point, label) in series.points.iter().zip(&series.labels) {
                tracing::info!("{label}  {:.2}", point.value);
            }
        }
        ChartState::Empty => tracing::info!(room = %room.name, "no chart data in range"),
        ChartState::Failed { message } => {
            tracing::error!(room = %room.name, "chart failed: {message}")
        }
        _ => {}
    }
}
