use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::watch;

use smartroom_api::models::{
    ApiEnvelope, Floor, Id, Light, LoginRequest, LoginResponse, Paged, PowerReading, PowerSensor,
    Room, TempReading, TempSensor,
};

use crate::error::ApiError;
use crate::settings::Api;

/// Typed access to the backend REST API, one method per endpoint.
///
/// The bearer token arrives through a watch channel owned by the auth
/// service; every request reads the latest value, so a login or logout is
/// picked up without re-creating the service.
pub struct ApiService {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
    token: watch::Receiver<Option<String>>,
}

impl ApiService {
    pub fn new(api: Api, token: watch::Receiver<Option<String>>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url,
            page_size: api.page_size,
            token,
        })
    }

    pub async fn sign_in(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.request(self.client.post(self.url("/auth/signin")).json(request))
            .await
    }

    pub async fn floors(&self) -> Result<Vec<Floor>, ApiError> {
        let page: Paged<Floor> = self
            .request(self.get("/floors").query(&[
                ("page", 0.to_string()),
                ("size", self.page_size.to_string()),
            ]))
            .await?;

        Ok(page.content)
    }

    pub async fn rooms_by_floor(&self, floor_id: Id) -> Result<Vec<Room>, ApiError> {
        let page: Paged<Room> = self
            .request(
                self.get(&format!("/floors/{floor_id}/rooms"))
                    .query(&[("size", self.page_size.to_string())]),
            )
            .await?;

        Ok(page.content)
    }

    pub async fn room(&self, room_id: Id) -> Result<Room, ApiError> {
        self.request(self.get(&format!("/rooms/{room_id}"))).await
    }

    /// Resolves a room's display name, falling back to a placeholder when
    /// the lookup fails so screens never block on a missing name.
    pub async fn room_name(&self, room_id: Id) -> String {
        match self.room(room_id).await {
            Ok(room) => room.name,
            Err(e) => {
                tracing::warn!(room_id, error = %e, "room lookup failed, using placeholder name");
                format!("Room {room_id}")
            }
        }
    }

    pub async fn lights(&self, room_id: Id) -> Result<Vec<Light>, ApiError> {
        let page: Paged<Light> = self
            .request(
                self.get(&format!("/lights/room/{room_id}"))
                    .query(&[("size", self.page_size.to_string())]),
            )
            .await?;

        Ok(page.content)
    }

    /// Flips one light. The backend owns the state; the response carries the
    /// light as it is after the toggle.
    pub async fn toggle_light(&self, light_id: Id) -> Result<Light, ApiError> {
        self.request(self.put(&format!("/lights/{light_id}/toggle-state")))
            .await
    }

    pub async fn temp_sensors(&self, room_id: Id) -> Result<Vec<TempSensor>, ApiError> {
        let page: Paged<TempSensor> = self
            .request(self.get(&format!("/rooms/{room_id}/temperatures")))
            .await?;

        Ok(page.content)
    }

    pub async fn power_sensors(&self, room_id: Id) -> Result<Vec<PowerSensor>, ApiError> {
        let page: Paged<PowerSensor> = self
            .request(self.get(&format!("/rooms/{room_id}/power-consumptions")))
            .await?;

        Ok(page.content)
    }

    pub async fn temp_history(
        &self,
        room_id: Id,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<TempReading>, ApiError> {
        self.request(
            self.get(&format!("/rooms/{room_id}/temperatures/average-history"))
                .query(&range_query(start, end)),
        )
        .await
    }

    pub async fn power_history(
        &self,
        room_id: Id,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<PowerReading>, ApiError> {
        self.request(
            self.get(&format!("/rooms/{room_id}/power-consumptions/average-history"))
                .query(&range_query(start, end)),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.put(self.url(path)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and unwraps the response envelope. Success requires
    /// an HTTP 2xx, an envelope status in the 2xx range, and a present
    /// payload; anything else maps onto the error taxonomy.
    async fn request<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .map(|envelope| envelope.message)
                .unwrap_or_else(|_| status.to_string());

            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if !(200..300).contains(&envelope.status) {
            return Err(ApiError::Server {
                status: envelope.status,
                message: envelope.message,
            });
        }

        envelope.data.ok_or(ApiError::EmptyPayload)
    }
}

fn range_query(start: OffsetDateTime, end: OffsetDateTime) -> [(&'static str, String); 2] {
    [
        ("startedAt", start.format(&Rfc3339).unwrap_or_default()),
        ("endedAt", end.format(&Rfc3339).unwrap_or_default()),
    ]
}
