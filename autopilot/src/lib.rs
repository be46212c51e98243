pub mod autopilot;
pub mod config;
pub mod link;
pub mod log;
pub mod mock;
pub mod navigation;
pub mod telemetry;
pub mod types;

pub use crate::autopilot::Autopilot;
pub use crate::navigation::{Done, NavError};
