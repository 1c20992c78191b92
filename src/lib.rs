pub mod app;
pub mod config;
pub mod corner;
pub mod error;
pub mod geometry;
pub mod platform;
pub mod tracker;

pub use app::App;
pub use config::{Config, Settings};
pub use corner::Corner;
pub use error::Error;
pub use geometry::{Point, Rect, Size};
pub use tracker::{MouseTracker, TrackerEvent};

pub type Result<T> = anyhow::Result<T>;
