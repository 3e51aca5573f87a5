use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;

use smartroom_api::models::{Floor, Room};

use crate::services::ApiService;

/// Observable state of the home overview: every floor, and the rooms merged
/// in as each floor's fetch completes.
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub loading: bool,
    pub floors: Vec<Floor>,
    pub rooms: Vec<Room>,
    pub error: Option<String>,
}

/// Loads the floor list, then fans out one concurrent room fetch per floor.
///
/// Results merge incrementally in completion order; a failing floor simply
/// contributes no rooms. `loading` drops to false exactly once, after every
/// floor fetch has settled.
pub struct HomeService {
    api: Arc<ApiService>,
    tx: watch::Sender<HomeState>,
}

impl HomeService {
    pub fn new(api: Arc<ApiService>) -> Arc<Self> {
        let (tx, _rx) = watch::channel(HomeState::default());

        Arc::new(Self { api, tx })
    }

    pub fn state(&self) -> watch::Receiver<HomeState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> HomeState {
        self.tx.borrow().clone()
    }

    pub async fn load(&self) {
        self.tx.send_replace(HomeState {
            loading: true,
            ..HomeState::default()
        });

        let floors = match self.api.floors().await {
            Ok(floors) => floors,
            Err(e) => {
                self.tx.send_replace(HomeState {
                    loading: false,
                    error: Some(format!("failed to load floors: {e}")),
                    ..HomeState::default()
                });
                return;
            }
        };

        if floors.is_empty() {
            self.tx.send_replace(HomeState {
                loading: false,
                error: Some("no floors available".to_string()),
                ..HomeState::default()
            });
            return;
        }

        self.tx.send_replace(HomeState {
            loading: true,
            floors: floors.clone(),
            ..HomeState::default()
        });

        let mut fetches = JoinSet::new();
        for floor in &floors {
            let api = Arc::clone(&self.api);
            let floor_id = floor.id;
            fetches.spawn(async move { (floor_id, api.rooms_by_floor(floor_id).await) });
        }

        // Draining the set is the fan-in barrier: every completion merges
        // immediately, and the loop only ends once all floors settled.
        let mut rooms: Vec<Room> = Vec::new();
        while let Some(settled) = fetches.join_next().await {
            match settled {
                Ok((floor_id, Ok(batch))) => {
                    rooms.extend(batch.into_iter().map(|mut room| {
                        // The backend occasionally omits the parent id on
                        // nested listings; re-stamp it from the query.
                        room.floor_id = floor_id;
                        room
                    }));
                    self.tx.send_replace(HomeState {
                        loading: true,
                        floors: floors.clone(),
                        rooms: rooms.clone(),
                        error: None,
                    });
                }
                Ok((floor_id, Err(e))) => {
                    tracing::warn!(floor_id, error = %e, "failed to load rooms for floor");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "room fetch task aborted");
                }
            }
        }

        self.tx.send_replace(HomeState {
            loading: false,
            floors,
            rooms,
            error: None,
        });
    }

    /// Manual retry after a failure; identical to the initial load.
    pub async fn retry(&self) {
        self.load().await;
    }
}
