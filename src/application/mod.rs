//! Application layer: endpoint catalogue, query cache, session gating, forms

pub mod api;
pub mod cache;
pub mod forms;
pub mod session;

pub use api::ConsoleApi;
pub use cache::{
    CacheEvent, CacheEventMessage, Mutation, Query, QueryCache, QueryKey, QueryState,
    SharedQueryCache, Tag, TagId, TagKind,
};
pub use session::{GuardState, RouteGuard};
