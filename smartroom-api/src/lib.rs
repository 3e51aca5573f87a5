//! Wire-level types for the smartroom backend REST API.
//!
//! Shared between the client core and the mock backend so both sides agree
//! on field names and envelope semantics. All payload types serialize with
//! camelCase member names, matching the backend JSON.

pub mod models;
pub mod restful;
