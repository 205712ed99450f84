//! API server module for the recipe query and meal plan endpoints

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use server::build_app;
pub use server::serve_api;
pub use state::AppState;
pub use state::ReadinessGate;
pub use state::ServiceState;
