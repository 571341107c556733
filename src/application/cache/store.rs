//! Tag-invalidated query cache.
//!
//! Entries are keyed by [`QueryKey`] and counted by subscriber (a mounted
//! page). The `tag -> keys` index is rebuilt for an entry every time its
//! fetch completes. Invalidation re-issues every subscribed match at once
//! and evicts unsubscribed matches. Identical concurrent fetches share one
//! in-flight future.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use futures_util::future::{join_all, BoxFuture, Shared};
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use super::events::{CacheEvent, EventBus, EventSubscriber};
use super::query::{Fetched, Fetcher, Mutation, Query, QueryKey, QueryState};
use super::tags::{Tag, TagId};
use crate::infrastructure::HttpClient;
use crate::shared::{ApiError, ApiResult};

type InFlight = Shared<BoxFuture<'static, Fetched>>;

struct Entry {
    fetcher: Fetcher,
    data: Option<Arc<Value>>,
    error: Option<ApiError>,
    tags: Vec<Tag>,
    subscribers: usize,
    stale: bool,
    /// Bumped whenever a new fetch starts; late results of older fetches are dropped
    generation: u64,
    in_flight: Option<(u64, InFlight)>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            data: None,
            error: None,
            tags: Vec::new(),
            subscribers: 0,
            stale: true,
            generation: 0,
            in_flight: None,
            fetched_at: None,
        }
    }

    fn is_fresh(&self) -> bool {
        !self.stale && (self.data.is_some() || self.error.is_some())
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    tag_index: HashMap<Tag, HashSet<QueryKey>>,
}

impl CacheState {
    fn unindex(&mut self, key: &QueryKey, tags: &[Tag]) {
        for tag in tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
    }

    fn index(&mut self, key: &QueryKey, tags: &[Tag]) {
        for tag in tags {
            self.tag_index.entry(*tag).or_default().insert(key.clone());
        }
    }

    fn remove(&mut self, key: &QueryKey) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.unindex(key, &entry.tags);
                true
            }
            None => false,
        }
    }

    /// Keys whose provided tags are hit by any of `tags`
    fn matching(&self, tags: &[Tag]) -> BTreeSet<QueryKey> {
        let mut out = BTreeSet::new();
        for tag in tags {
            if tag.id == TagId::Whole {
                for (provided, keys) in &self.tag_index {
                    if tag.invalidates(provided) {
                        out.extend(keys.iter().cloned());
                    }
                }
            } else if let Some(keys) = self.tag_index.get(tag) {
                out.extend(keys.iter().cloned());
            }
        }
        out
    }
}

/// Snapshot of an entry, for diagnostics and tests
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    pub key: QueryKey,
    pub subscribers: usize,
    pub stale: bool,
    pub tags: Vec<Tag>,
    pub fetched_at: Option<DateTime<Utc>>,
}

pub struct QueryCache {
    client: HttpClient,
    state: Mutex<CacheState>,
    events: EventBus,
}

pub type SharedQueryCache = Arc<QueryCache>;

impl QueryCache {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            state: Mutex::new(CacheState::default()),
            events: EventBus::new(),
        }
    }

    pub fn shared(client: HttpClient) -> SharedQueryCache {
        Arc::new(Self::new(client))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn events(&self) -> EventSubscriber {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // a panic while holding the lock leaves plain data behind; keep serving it
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mount a query: count the subscriber, serve fresh data from the cache
    /// or fetch it (joining an identical in-flight request when there is one).
    pub async fn subscribe<T>(&self, query: &Query<T>) -> QueryState<T>
    where
        T: DeserializeOwned + 'static,
    {
        let key = query.key().clone();
        let fresh = {
            let mut state = self.lock();
            let entry = state
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(query.fetcher()));
            entry.subscribers += 1;
            trace!(key = %key, subscribers = entry.subscribers, "Query subscribed");
            entry.is_fresh()
        };

        if fresh {
            debug!(key = %key, "Cache hit");
        } else {
            self.fetch(&key).await;
        }
        self.read(query)
    }

    /// Unmount a query; the entry is evicted when no subscriber is left.
    ///
    /// A request still in flight is not aborted; its result is discarded.
    pub fn unsubscribe(&self, key: &QueryKey) {
        let evicted = {
            let mut state = self.lock();
            let remaining = match state.entries.get_mut(key) {
                Some(entry) => {
                    entry.subscribers = entry.subscribers.saturating_sub(1);
                    entry.subscribers
                }
                None => return,
            };
            remaining == 0 && state.remove(key)
        };
        if evicted {
            debug!(key = %key, "Query evicted");
            self.events.publish(CacheEvent::Evicted { key: key.clone() });
        }
    }

    /// Current state of a query without touching the network
    pub fn read<T: DeserializeOwned>(&self, query: &Query<T>) -> QueryState<T> {
        let state = self.lock();
        let Some(entry) = state.entries.get(query.key()) else {
            return QueryState::Loading;
        };
        match (&entry.data, &entry.error) {
            (_, Some(err)) => QueryState::Failed(err.clone()),
            (Some(value), None) => match serde_json::from_value::<T>(Value::clone(value)) {
                Ok(data) => QueryState::Ready(data),
                Err(e) => QueryState::Failed(ApiError::Decode(e.to_string())),
            },
            (None, None) => QueryState::Loading,
        }
    }

    /// One-off read: subscribe, take the result, unsubscribe
    pub async fn query<T>(&self, query: &Query<T>) -> ApiResult<T>
    where
        T: DeserializeOwned + 'static,
    {
        let state = self.subscribe(query).await;
        self.unsubscribe(query.key());
        match state {
            QueryState::Ready(data) => Ok(data),
            QueryState::Failed(err) => Err(err),
            QueryState::Loading | QueryState::Skipped => {
                Err(ApiError::Transport(format!("{} did not complete", query.key())))
            }
        }
    }

    async fn fetch(&self, key: &QueryKey) {
        let (generation, fut) = {
            let mut state = self.lock();
            let Some(entry) = state.entries.get_mut(key) else {
                return;
            };
            match &entry.in_flight {
                Some((generation, fut)) => {
                    debug!(key = %key, "Joining in-flight request");
                    (*generation, fut.clone())
                }
                None => {
                    entry.generation += 1;
                    let fut = (entry.fetcher)(self.client.clone()).shared();
                    entry.in_flight = Some((entry.generation, fut.clone()));
                    (entry.generation, fut)
                }
            }
        };

        let fetched = fut.await;
        self.complete(key, generation, fetched);
    }

    fn complete(&self, key: &QueryKey, generation: u64, fetched: Fetched) {
        let ok = fetched.result.is_ok();
        {
            let mut state = self.lock();
            let old_tags = match state.entries.get_mut(key) {
                // entry evicted meanwhile, or superseded by a newer fetch
                None => return,
                Some(entry) if entry.generation != generation || entry.in_flight.is_none() => return,
                Some(entry) => {
                    entry.in_flight = None;
                    entry.stale = false;
                    entry.fetched_at = Some(Utc::now());
                    match fetched.result {
                        Ok(value) => {
                            entry.data = Some(value);
                            entry.error = None;
                        }
                        Err(err) => entry.error = Some(err),
                    }
                    std::mem::replace(&mut entry.tags, fetched.tags.clone())
                }
            };
            state.unindex(key, &old_tags);
            state.index(key, &fetched.tags);
        }
        trace!(key = %key, ok, "Fetch completed");
        self.events.publish(CacheEvent::Fetched { key: key.clone(), ok });
    }

    /// Mark every entry matching `tags` stale; re-issue the subscribed ones
    /// (together) and evict the rest. Returns the refetched keys.
    pub async fn invalidate(&self, tags: &[Tag]) -> Vec<QueryKey> {
        if tags.is_empty() {
            return Vec::new();
        }

        let refetch: Vec<QueryKey> = {
            let mut state = self.lock();
            let matching = state.matching(tags);
            let mut refetch = Vec::new();
            for key in matching {
                let subscribed = state
                    .entries
                    .get(&key)
                    .map(|e| e.subscribers > 0)
                    .unwrap_or(false);
                if subscribed {
                    if let Some(entry) = state.entries.get_mut(&key) {
                        entry.stale = true;
                        // a request started before the mutation may carry old data
                        entry.in_flight = None;
                    }
                    refetch.push(key);
                } else {
                    state.remove(&key);
                }
            }
            refetch
        };

        debug!(
            tags = %tags.iter().map(Tag::to_string).collect::<Vec<_>>().join(","),
            refetch = refetch.len(),
            "Tags invalidated"
        );

        join_all(refetch.iter().map(|key| self.fetch(key))).await;

        self.events.publish(CacheEvent::Invalidated {
            tags: tags.to_vec(),
            refetched: refetch.clone(),
        });
        refetch
    }

    /// Run a mutation; on success invalidate its tags (after the call has
    /// resolved). A failed mutation invalidates nothing.
    pub async fn mutate<R: DeserializeOwned>(&self, mutation: Mutation<R>) -> ApiResult<R> {
        let output = self.client.request::<R>(mutation.request()).await?;
        self.invalidate(mutation.invalidates()).await;
        Ok(output)
    }

    /// Drop every entry
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            state.entries.clear();
            state.tag_index.clear();
        }
        debug!("Query cache reset");
        self.events.publish(CacheEvent::Reset);
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.lock().entries.get(key).map(|e| e.subscribers).unwrap_or(0)
    }

    /// Keys currently indexed under exactly `tag`
    pub fn keys_for(&self, tag: &Tag) -> Vec<QueryKey> {
        let state = self.lock();
        let mut keys: Vec<QueryKey> = state
            .tag_index
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn entries(&self) -> Vec<EntryInfo> {
        let state = self.lock();
        let mut out: Vec<EntryInfo> = state
            .entries
            .iter()
            .map(|(key, e)| EntryInfo {
                key: key.clone(),
                subscribers: e.subscribers,
                stale: e.stale,
                tags: e.tags.clone(),
                fetched_at: e.fetched_at,
            })
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }
}
