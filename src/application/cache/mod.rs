//! Client-side query cache with tag-based invalidation

mod events;
mod query;
mod store;
mod tags;

pub use events::{CacheEvent, CacheEventMessage, EventBus, EventSubscriber};
pub use query::{Mutation, Query, QueryKey, QueryState};
pub use store::{EntryInfo, QueryCache, SharedQueryCache};
pub use tags::{list_tags, Tag, TagId, TagKind};
