//! MoodBuy
//!
//! Turns a free-text mood into shoppable recommendations for concerts,
//! outfits, food and travel, with a local cart and persisted progress.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use app::{AppState, Tab};
pub use config::Config;
pub use error::{AppError, AppResult};
