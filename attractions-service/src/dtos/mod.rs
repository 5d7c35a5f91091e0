pub mod attractions;
pub mod diagnostics;

pub use attractions::{AttractionListResponse, AttractionQuery, CreateAttractionResponse};
pub use diagnostics::DiagnosticsResponse;
