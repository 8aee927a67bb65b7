pub mod app;
pub mod camera;
pub mod chart;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod loaders;
pub mod math;
pub mod scene;
pub mod texture;
pub mod traits;
pub mod types;

pub use chart::{generate_chart, generate_chart_from_files, ChartOutput};
pub use config::PreviewConfig;
pub use scene::{PreviewSession, SceneBuilder};
