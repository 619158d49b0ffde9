pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod dom;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod render;
pub mod state;
pub mod stats;
pub mod ui;

pub use api::{HttpNewsApi, NewsApi};
pub use app::{router, AppState};
pub use config::Config;
pub use controller::PageController;
pub use stats::StatsPoller;
