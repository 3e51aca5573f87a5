use std::collections::HashSet;
use std::sync::atomic::AtomicU64;

use tokio::sync::RwLock;

use smartroom_api::models::{Floor, Id, Light, PowerSensor, Room, TempSensor};

/// Shape of the simulated history curves.
#[derive(Debug, Clone)]
pub struct HistoryProfile {
    /// Minutes between samples
    pub sample_minutes: u32,
    /// Overnight temperature baseline in Celsius
    pub base_temp: f64,
    /// Daytime temperature rise in Celsius
    pub temp_swing: f64,
    /// Idle power draw in watts
    pub base_watt: f64,
    /// Peak-hours power rise in watts
    pub watt_swing: f64,
    /// Uniform noise amplitude, 0 keeps the curves deterministic
    pub jitter: f64,
    /// Artificial response delay for the history endpoints
    pub delay_ms: u64,
}

impl Default for HistoryProfile {
    fn default() -> Self {
        Self {
            sample_minutes: 10,
            base_temp: 18.0,
            temp_swing: 6.0,
            base_watt: 120.0,
            watt_swing: 480.0,
            jitter: 0.0,
            delay_ms: 0,
        }
    }
}

/// Seed data for the mock backend. Tests construct this directly to shape
/// each scenario; the binary starts from [`MockData::demo`].
#[derive(Debug)]
pub struct MockData {
    pub floors: Vec<Floor>,
    pub rooms: Vec<Room>,
    pub lights: Vec<Light>,
    pub temp_sensors: Vec<TempSensor>,
    pub power_sensors: Vec<PowerSensor>,
    /// Answer the floor listing with a server error
    pub fail_floors: bool,
    /// Floors whose room listing answers with a server error
    pub fail_rooms_for: HashSet<Id>,
    /// Rooms whose history endpoints answer with a server error
    pub fail_history_for: HashSet<Id>,
    /// Artificial response delay for the room listings
    pub rooms_delay_ms: u64,
    pub username: String,
    pub password: String,
    pub history: HistoryProfile,
}

impl Default for MockData {
    fn default() -> Self {
        Self {
            floors: Vec::new(),
            rooms: Vec::new(),
            lights: Vec::new(),
            temp_sensors: Vec::new(),
            power_sensors: Vec::new(),
            fail_floors: false,
            fail_rooms_for: HashSet::new(),
            fail_history_for: HashSet::new(),
            rooms_delay_ms: 0,
            username: "admin".to_string(),
            password: "admin".to_string(),
            history: HistoryProfile::default(),
        }
    }
}

impl MockData {
    /// A small two-floor home with lights and sensors in the living room.
    pub fn demo() -> Self {
        Self {
            floors: vec![
                Floor {
                    id: 1,
                    name: "Ground Floor".to_string(),
                    description: None,
                    level: 0,
                },
                Floor {
                    id: 2,
                    name: "First Floor".to_string(),
                    description: None,
                    level: 1,
                },
            ],
            rooms: vec![
                Room {
                    id: 1,
                    name: "Living Room".to_string(),
                    description: Some("South-facing".to_string()),
                    floor_id: 1,
                },
                Room {
                    id: 2,
                    name: "Kitchen".to_string(),
                    description: None,
                    floor_id: 1,
                },
                Room {
                    id: 3,
                    name: "Bedroom".to_string(),
                    description: None,
                    floor_id: 2,
                },
                Room {
                    id: 4,
                    name: "Study".to_string(),
                    description: None,
                    floor_id: 2,
                },
            ],
            lights: vec![
                Light {
                    id: 1,
                    name: "Ceiling".to_string(),
                    description: None,
                    is_active: true,
                    level: 80,
                    room_id: 1,
                },
                Light {
                    id: 2,
                    name: "Floor Lamp".to_string(),
                    description: None,
                    is_active: false,
                    level: 40,
                    room_id: 1,
                },
                Light {
                    id: 3,
                    name: "Kitchen Spots".to_string(),
                    description: None,
                    is_active: true,
                    level: 100,
                    room_id: 2,
                },
            ],
            temp_sensors: vec![
                TempSensor {
                    id: 1,
                    name: Some("North Wall".to_string()),
                    current_value: Some(21.5),
                    room_id: 1,
                },
                TempSensor {
                    id: 2,
                    name: Some("South Wall".to_string()),
                    current_value: Some(22.1),
                    room_id: 1,
                },
            ],
            power_sensors: vec![PowerSensor {
                id: 1,
                name: Some("Main Meter".to_string()),
                current_watt: Some(250.0),
                current_watt_hour: Some(1200.0),
                room_id: 1,
            }],
            ..Self::default()
        }
    }
}

/// Shared state behind the router: the seed data, the issued tokens, and a
/// request counter the tests read to assert fetch behavior.
pub struct AppState {
    pub data: RwLock<MockData>,
    pub tokens: RwLock<HashSet<String>>,
    /// Number of history requests served, across both sensor kinds
    pub history_hits: AtomicU64,
}

impl AppState {
    pub fn new(data: MockData) -> Self {
        Self {
            data: RwLock::new(data),
            tokens: RwLock::new(HashSet::new()),
            history_hits: AtomicU64::new(0),
        }
    }
}
