//! Client core for the smartroom backend: a thin typed HTTP layer, the
//! hourly aggregation pipeline behind the history charts, and the per-screen
//! state holders the UI observes.

pub mod aggregate;
pub mod error;
pub mod services;
pub mod settings;
