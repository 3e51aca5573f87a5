use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::{Date, Duration, OffsetDateTime};
use tokio::sync::{Mutex, watch};

use smartroom_api::models::Id;

use crate::aggregate::{HourlySeries, aggregate_hourly};
use crate::error::ApiError;
use crate::services::ApiService;

/// Which history a chart screen renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Temperature,
    Power,
}

/// One selectable sensor row on the chart screen. The backend aggregates
/// per-room, so the selection gates whether anything is shown at all rather
/// than filtering individual sensors out of the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorChoice {
    pub id: Id,
    pub name: String,
    pub selected: bool,
}

/// Inclusive day range the chart covers, expanded to whole days when
/// querying the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn last_days(days: i64) -> Self {
        let today = OffsetDateTime::now_utc().date();
        let start = today.checked_sub(Duration::days(days)).unwrap_or(today);

        Self { start, end: today }
    }

    fn instants(&self) -> (OffsetDateTime, OffsetDateTime) {
        let start = self.start.midnight().assume_utc();
        let end = self
            .end
            .with_hms(23, 59, 59)
            .unwrap_or_else(|_| self.end.midnight())
            .assume_utc();

        (start, end)
    }
}

/// Observable state of one chart screen.
///
/// `Empty` and `Failed` are distinct on purpose: a successful fetch with
/// nothing to plot shows a neutral placeholder, not an error.
#[derive(Debug, Clone)]
pub enum ChartState {
    Idle,
    Loading,
    Ready(HourlySeries),
    Empty,
    Failed { message: String },
}

struct ChartParams {
    range: DateRange,
    sensors: Vec<SensorChoice>,
}

/// Holds the chart parameters for one room and re-runs fetch + aggregation
/// whenever one of them changes. The UI observes the state through a watch
/// channel and never mutates it.
pub struct ChartService {
    api: Arc<ApiService>,
    room_id: Id,
    kind: ChartKind,
    params: Mutex<ChartParams>,
    // Reload ticket; completions from superseded reloads are discarded.
    generation: AtomicU64,
    tx: watch::Sender<ChartState>,
}

impl ChartService {
    pub fn new(api: Arc<ApiService>, room_id: Id, kind: ChartKind) -> Arc<Self> {
        let (tx, _rx) = watch::channel(ChartState::Idle);

        Arc::new(Self {
            api,
            room_id,
            kind,
            params: Mutex::new(ChartParams {
                range: DateRange::last_days(3),
                sensors: Vec::new(),
            }),
            generation: AtomicU64::new(0),
            tx,
        })
    }

    pub fn state(&self) -> watch::Receiver<ChartState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ChartState {
        self.tx.borrow().clone()
    }

    pub async fn sensors(&self) -> Vec<SensorChoice> {
        self.params.lock().await.sensors.clone()
    }

    pub async fn date_range(&self) -> DateRange {
        self.params.lock().await.range
    }

    /// Fetches the sensor list for this room and kind, selects everything,
    /// and kicks off the first aggregation. A failed sensor fetch leaves the
    /// list empty, which reads as "nothing selected" downstream.
    pub async fn load_sensors(self: &Arc<Self>) {
        let loaded = match self.kind {
            ChartKind::Temperature => self.api.temp_sensors(self.room_id).await.map(|sensors| {
                sensors
                    .into_iter()
                    .map(|sensor| SensorChoice {
                        id: sensor.id,
                        name: sensor
                            .name
                            .unwrap_or_else(|| format!("Sensor {}", sensor.id)),
                        selected: true,
                    })
                    .collect::<Vec<_>>()
            }),
            ChartKind::Power => self.api.power_sensors(self.room_id).await.map(|sensors| {
                sensors
                    .into_iter()
                    .map(|sensor| SensorChoice {
                        id: sensor.id,
                        name: sensor
                            .name
                            .unwrap_or_else(|| format!("Sensor {}", sensor.id)),
                        selected: true,
                    })
                    .collect::<Vec<_>>()
            }),
        };

        match loaded {
            Ok(sensors) => self.params.lock().await.sensors = sensors,
            Err(e) => {
                tracing::warn!(room_id = self.room_id, error = %e, "failed to load sensor list")
            }
        }

        self.reload().await;
    }

    pub async fn toggle_sensor(self: &Arc<Self>, sensor_id: Id, selected: bool) {
        {
            let mut params = self.params.lock().await;
            for sensor in params.sensors.iter_mut() {
                if sensor.id == sensor_id {
                    sensor.selected = selected;
                }
            }
        }

        self.reload().await;
    }

    pub async fn set_date_range(self: &Arc<Self>, start: Date, end: Date) {
        self.params.lock().await.range = DateRange { start, end };
        self.reload().await;
    }

    /// Re-runs fetch + aggregation with the current parameters. Returns as
    /// soon as the work is in flight; progress arrives through the state
    /// channel. An empty selection short-circuits to `Empty` without asking
    /// the backend for anything.
    pub async fn reload(self: &Arc<Self>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (range, any_selected) = {
            let params = self.params.lock().await;
            (params.range, params.sensors.iter().any(|s| s.selected))
        };

        self.tx.send_replace(ChartState::Loading);

        if !any_selected {
            self.tx.send_replace(ChartState::Empty);
            return;
        }

        let api = Arc::clone(&self.api);
        let weak = Arc::downgrade(self);
        let room_id = self.room_id;
        let kind = self.kind;

        tokio::spawn(async move {
            let outcome = fetch_series(&api, room_id, kind, range).await;

            // The screen may be gone, or a newer reload may have superseded
            // this one; either way this completion must not publish.
            let Some(this) = weak.upgrade() else { return };
            if this.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(room_id, "discarding stale chart result");
                return;
            }

            let state = match outcome {
                Ok(series) if series.is_empty() => ChartState::Empty,
                Ok(series) => ChartState::Ready(series),
                Err(e) => ChartState::Failed {
                    message: e.to_string(),
                },
            };
            this.tx.send_replace(state);
        });
    }
}

async fn fetch_series(
    api: &ApiService,
    room_id: Id,
    kind: ChartKind,
    range: DateRange,
) -> Result<HourlySeries, ApiError> {
    let (start, end) = range.instants();

    match kind {
        ChartKind::Temperature => {
            let readings = api.temp_history(room_id, start, end).await?;
            Ok(aggregate_hourly(&readings, |r| r.avg_temp_c))
        }
        ChartKind::Power => {
            let readings = api.power_history(room_id, start, end).await?;
            Ok(aggregate_hourly(&readings, |r| r.avg_watt))
        }
    }
}
