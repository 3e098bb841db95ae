pub mod config;
pub mod engine;
pub mod persistence;
pub mod simulator;
pub mod support;
pub mod tools;
pub mod ui;

pub use engine::core::app_setup::{ArPlacementPlugin, PlacementBackends, create_app};
