// Declare the main modules
pub mod config;
pub mod db;
pub mod handlers;
pub mod router;

pub use config::Config;
pub use router::{create_router, AppState};
