pub mod database;
pub mod metrics;

pub use database::{AttractionStore, MongoDb};
pub use self::metrics::{get_metrics, init_metrics, record_attraction_created, record_search};
