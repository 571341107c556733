//! Infrastructure layer - external concerns

pub mod http;
pub mod storage;

pub use http::{HttpClient, RequestSpec};
pub use storage::{FileTokenStore, MemoryTokenStore, SharedTokenStore, TokenStore};
