use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use smartroom_api::models::{
    ApiEnvelope, Floor, Id, Light, LoginRequest, LoginResponse, Paged, PowerReading, PowerSensor,
    Room, TempReading, TempSensor,
};
use smartroom_api::restful::{HistoryRangeQuery, PageQuery};

use crate::data::AppState;
use crate::simulate;

#[derive(Debug)]
pub enum MockError {
    BadCredentials,
    Unauthorized,
    NotFound(&'static str),
    BadRequest(String),
    Simulated,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MockError::BadCredentials => (StatusCode::UNAUTHORIZED, "Bad credentials".to_string()),
            MockError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing token".to_string(),
            ),
            MockError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            MockError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            MockError::Simulated => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Simulated backend failure".to_string(),
            ),
        };

        let body = Json(ApiEnvelope::<serde_json::Value> {
            status: status.as_u16(),
            message,
            data: None,
            timestamp: now_rfc3339(),
        });

        (status, body).into_response()
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

fn envelope<T>(data: T) -> Json<ApiEnvelope<T>> {
    Json(ApiEnvelope {
        status: 200,
        message: "Success".to_string(),
        data: Some(data),
        timestamp: now_rfc3339(),
    })
}

fn paged<T>(items: Vec<T>, query: &PageQuery) -> Paged<T> {
    let size = query.size.max(1);
    let total_elements = items.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content = items
        .into_iter()
        .skip((query.page * size) as usize)
        .take(size as usize)
        .collect();

    Paged {
        content,
        page: query.page,
        size,
        total_elements,
        total_pages,
    }
}

/// Rejects any request that does not carry a token issued by `sign_in`.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, MockError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if state.tokens.read().await.contains(token) => Ok(next.run(request).await),
        _ => Err(MockError::Unauthorized),
    }
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiEnvelope<LoginResponse>>, MockError> {
    {
        let data = state.data.read().await;
        if request.username != data.username || request.password != data.password {
            return Err(MockError::BadCredentials);
        }
    }

    let token = Uuid::new_v4().to_string();
    state.tokens.write().await.insert(token.clone());

    tracing::debug!(username = %request.username, "issued mock token");

    Ok(envelope(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        username: request.username,
        roles: vec!["ROLE_USER".to_string()],
    }))
}

pub async fn list_floors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiEnvelope<Paged<Floor>>>, MockError> {
    let data = state.data.read().await;
    if data.fail_floors {
        return Err(MockError::Simulated);
    }

    Ok(envelope(paged(data.floors.clone(), &query)))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Path(floor_id): Path<Id>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiEnvelope<Paged<Room>>>, MockError> {
    let (delay_ms, outcome) = {
        let data = state.data.read().await;
        let outcome = if data.fail_rooms_for.contains(&floor_id) {
            Err(MockError::Simulated)
        } else {
            Ok(data
                .rooms
                .iter()
                .filter(|room| room.floor_id == floor_id)
                .cloned()
                .collect::<Vec<_>>())
        };

        (data.rooms_delay_ms, outcome)
    };

    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(envelope(paged(outcome?, &query)))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
) -> Result<Json<ApiEnvelope<Room>>, MockError> {
    state
        .data
        .read()
        .await
        .rooms
        .iter()
        .find(|room| room.id == room_id)
        .cloned()
        .map(envelope)
        .ok_or(MockError::NotFound("Room"))
}

pub async fn list_lights(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
    Query(query): Query<PageQuery>,
) -> Json<ApiEnvelope<Paged<Light>>> {
    let data = state.data.read().await;
    let lights = data
        .lights
        .iter()
        .filter(|light| light.room_id == room_id)
        .cloned()
        .collect();

    envelope(paged(lights, &query))
}

pub async fn toggle_light(
    State(state): State<Arc<AppState>>,
    Path(light_id): Path<Id>,
) -> Result<Json<ApiEnvelope<Light>>, MockError> {
    let mut data = state.data.write().await;
    let light = data
        .lights
        .iter_mut()
        .find(|light| light.id == light_id)
        .ok_or(MockError::NotFound("Light"))?;

    light.is_active = !light.is_active;

    Ok(envelope(light.clone()))
}

pub async fn list_temp_sensors(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
    Query(query): Query<PageQuery>,
) -> Json<ApiEnvelope<Paged<TempSensor>>> {
    let data = state.data.read().await;
    let sensors = data
        .temp_sensors
        .iter()
        .filter(|sensor| sensor.room_id == room_id)
        .cloned()
        .collect();

    envelope(paged(sensors, &query))
}

pub async fn list_power_sensors(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
    Query(query): Query<PageQuery>,
) -> Json<ApiEnvelope<Paged<PowerSensor>>> {
    let data = state.data.read().await;
    let sensors = data
        .power_sensors
        .iter()
        .filter(|sensor| sensor.room_id == room_id)
        .cloned()
        .collect();

    envelope(paged(sensors, &query))
}

pub async fn temp_history(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
    Query(range): Query<HistoryRangeQuery>,
) -> Result<Json<ApiEnvelope<Vec<TempReading>>>, MockError> {
    let (start, end, profile) = history_request(&state, room_id, &range).await?;

    Ok(envelope(simulate::temperature_series(start, end, &profile)))
}

pub async fn power_history(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Id>,
    Query(range): Query<HistoryRangeQuery>,
) -> Result<Json<ApiEnvelope<Vec<PowerReading>>>, MockError> {
    let (start, end, profile) = history_request(&state, room_id, &range).await?;

    Ok(envelope(simulate::power_series(start, end, &profile)))
}

async fn history_request(
    state: &AppState,
    room_id: Id,
    range: &HistoryRangeQuery,
) -> Result<(OffsetDateTime, OffsetDateTime, crate::data::HistoryProfile), MockError> {
    state.history_hits.fetch_add(1, Ordering::SeqCst);

    let (profile, room_exists, failing) = {
        let data = state.data.read().await;
        (
            data.history.clone(),
            data.rooms.iter().any(|room| room.id == room_id),
            data.fail_history_for.contains(&room_id),
        )
    };

    if profile.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(profile.delay_ms)).await;
    }
    if failing {
        return Err(MockError::Simulated);
    }
    if !room_exists {
        return Err(MockError::NotFound("Room"));
    }

    let start = OffsetDateTime::parse(&range.started_at, &Rfc3339)
        .map_err(|e| MockError::BadRequest(format!("invalid startedAt: {e}")))?;
    let end = OffsetDateTime::parse(&range.ended_at, &Rfc3339)
        .map_err(|e| MockError::BadRequest(format!("invalid endedAt: {e}")))?;

    Ok((start, end, profile))
}
