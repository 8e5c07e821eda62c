mod config;
mod dedup;
mod error;
mod fetch_outcome;
mod home_model;
mod hub;
mod mapper;
mod model;
mod orchestrator;
mod source;
mod stream_ext;
pub mod mock;

pub use config::*;
pub use dedup::*;
pub use error::*;
pub use fetch_outcome::*;
pub use home_model::*;
pub use hub::*;
pub use mapper::*;
pub use model::*;
pub use orchestrator::*;
pub use source::*;
pub use stream_ext::*;

#[cfg(test)]
mod unit_tests;

/// Values a hub can hold and broadcast.
pub trait State: Clone + Send + Sync + 'static {}
