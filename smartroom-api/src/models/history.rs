use serde::{Deserialize, Serialize};

/// One room-wide averaged temperature observation.
///
/// The timestamp stays ISO-8601 text at this layer; parsing happens where
/// readings are bucketed, so malformed stamps can be dropped instead of
/// failing the whole response.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempReading {
    pub timestamp: String,
    /// Average temperature in Celsius, absent when no sensor reported
    pub avg_temp_c: Option<f64>,
}

/// One room-wide averaged power observation.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerReading {
    pub timestamp: String,
    /// Average draw in watts
    pub avg_watt: Option<f64>,
    /// Average consumption in watt-hours
    pub avg_watt_hour: Option<f64>,
}
