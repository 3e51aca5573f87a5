use std::sync::Arc;

use tokio::sync::watch;

use smartroom_api::models::{Id, Light};

use crate::services::ApiService;

/// Observable state of one room-detail screen.
#[derive(Debug, Clone, Default)]
pub struct RoomState {
    pub loading: bool,
    pub room_name: String,
    pub lights: Vec<Light>,
    pub current_temp: Option<f64>,
    pub error: Option<String>,
}

/// State holder for a single room: name, lights, and the latest temperature
/// reading, with light control patched back in place on success.
pub struct RoomService {
    api: Arc<ApiService>,
    room_id: Id,
    tx: watch::Sender<RoomState>,
}

impl RoomService {
    pub fn new(api: Arc<ApiService>, room_id: Id) -> Arc<Self> {
        let (tx, _rx) = watch::channel(RoomState {
            loading: true,
            ..RoomState::default()
        });

        Arc::new(Self { api, room_id, tx })
    }

    pub fn state(&self) -> watch::Receiver<RoomState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> RoomState {
        self.tx.borrow().clone()
    }

    pub async fn load(&self) {
        self.tx.send_replace(RoomState {
            loading: true,
            ..RoomState::default()
        });

        let room_name = self.api.room_name(self.room_id).await;
        let (lights, sensors) = tokio::join!(
            self.api.lights(self.room_id),
            self.api.temp_sensors(self.room_id),
        );

        let mut state = RoomState {
            loading: false,
            room_name,
            ..RoomState::default()
        };
        match lights {
            Ok(lights) => state.lights = lights,
            Err(e) => state.error = Some(format!("failed to load lights: {e}")),
        }
        match sensors {
            Ok(sensors) => {
                state.current_temp = sensors.first().and_then(|sensor| sensor.current_value)
            }
            Err(e) => tracing::warn!(room_id = self.room_id, error = %e, "temperature unavailable"),
        }

        self.tx.send_replace(state);
    }

    /// Asks the backend to flip one light and patches the returned state
    /// back into the list. On failure the list is kept and only the error
    /// message changes.
    pub async fn toggle_light(&self, light_id: Id) {
        match self.api.toggle_light(light_id).await {
            Ok(updated) => self.tx.send_modify(|state| {
                if let Some(light) = state.lights.iter_mut().find(|l| l.id == updated.id) {
                    *light = updated;
                }
                state.error = None;
            }),
            Err(e) => self.tx.send_modify(|state| {
                state.error = Some(format!("failed to toggle light: {e}"));
            }),
        }
    }

    /// Drives every light to the requested state. There is no bulk endpoint,
    /// so lights that already match are skipped and the rest toggle one by
    /// one.
    pub async fn set_all(&self, on: bool) {
        let targets: Vec<Id> = self
            .tx
            .borrow()
            .lights
            .iter()
            .filter(|light| light.is_active != on)
            .map(|light| light.id)
            .collect();

        for light_id in targets {
            self.toggle_light(light_id).await;
        }
    }
}
