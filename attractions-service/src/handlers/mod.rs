pub mod attractions;
pub mod diagnostics;
pub mod health;

pub use attractions::{create_attraction, search_attractions};
pub use diagnostics::diagnostics;
pub use health::{health_check, metrics_endpoint, not_found, readiness_check, root};
