//! client-core: Shared infrastructure for the procedure-studio client.
pub mod error;
pub mod failure;
pub mod observability;
pub mod token;

pub use http;
pub use serde;
pub use serde_json;
pub use tracing;
