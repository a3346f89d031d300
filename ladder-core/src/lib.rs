pub mod error;
pub mod game;
pub mod model;
pub mod stats;

pub use error::{GameError, StatsError};
pub use model::*;
