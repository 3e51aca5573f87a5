use serde::{Deserialize, Serialize};

use super::Id;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    /// Whether the light is currently on
    pub is_active: bool,
    /// Brightness level
    pub level: i32,
    pub room_id: Id,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempSensor {
    pub id: Id,
    pub name: Option<String>,
    /// Latest reported temperature in Celsius, absent when the sensor has
    /// not reported yet
    pub current_value: Option<f64>,
    pub room_id: Id,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSensor {
    pub id: Id,
    pub name: Option<String>,
    /// Latest instantaneous draw in watts
    pub current_watt: Option<f64>,
    /// Accumulated consumption in watt-hours
    pub current_watt_hour: Option<f64>,
    pub room_id: Id,
}
