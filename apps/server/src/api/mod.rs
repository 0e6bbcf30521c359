//! API endpoint modules.

pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod runs;
pub mod upload;

pub use dashboard::configure_routes as configure_dashboard_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use runs::configure_routes as configure_run_routes;
pub use upload::configure_routes as configure_upload_routes;
