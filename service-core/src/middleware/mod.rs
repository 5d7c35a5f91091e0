pub mod metrics;
pub mod tracing;

pub use self::metrics::{metrics_middleware, UNMATCHED_PATH};
pub use self::tracing::{request_id_middleware, REQUEST_ID_HEADER};
