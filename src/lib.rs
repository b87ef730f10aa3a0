pub mod analyzer;
pub mod collector;
pub mod config;
pub mod export;
pub mod models;
pub mod notifiers;
pub mod orchestrator;
pub mod scheduler;
pub mod stores;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
