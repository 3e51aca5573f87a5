mod auth;
mod device;
mod envelope;
mod history;
mod structure;

pub use auth::*;
pub use device::*;
pub use envelope::*;
pub use history::*;
pub use structure::*;

pub type Id = i64;
