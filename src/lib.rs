pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod persistence;
pub mod progress;
pub mod reset;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::ChecklistStore;
