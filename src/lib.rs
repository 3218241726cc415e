pub mod app;
pub mod config;
pub mod controller;
pub mod counter;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use controller::{DashboardController, DeleteOutcome};
pub use state::AppState;
pub use store::{SharedStore, SubmissionStore, open_store};
