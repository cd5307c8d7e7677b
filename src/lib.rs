// Library exports for Behavior Lens

pub mod analysis;
pub mod camera;
pub mod capture;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod scores;
pub mod ui;
