//! Typed query and mutation descriptors.
//!
//! A [`Query`] knows how to fetch itself and which tags its result
//! provides; a [`Mutation`] knows which tags it invalidates once it
//! succeeds.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::tags::Tag;
use crate::infrastructure::{HttpClient, RequestSpec};
use crate::shared::{ApiError, ApiResult};

/// Endpoint name plus canonical arguments, e.g. `getCompanyUsers(3)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(endpoint: &str, args: impl fmt::Display) -> Self {
        Self(format!("{}({})", endpoint, args))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one network fetch, shared between deduplicated waiters
#[derive(Debug, Clone)]
pub(crate) struct Fetched {
    pub result: ApiResult<Arc<Value>>,
    pub tags: Vec<Tag>,
}

pub(crate) type Fetcher = Arc<dyn Fn(HttpClient) -> BoxFuture<'static, Fetched> + Send + Sync>;

type ProvidesFn<T> = Arc<dyn Fn(Option<&T>) -> Vec<Tag> + Send + Sync>;

pub struct Query<T> {
    key: QueryKey,
    request: RequestSpec,
    provides: ProvidesFn<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            request: self.request.clone(),
            provides: self.provides.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("request", &self.request)
            .finish()
    }
}

impl<T> Query<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn request(&self) -> &RequestSpec {
        &self.request
    }
}

impl<T> Query<T>
where
    T: DeserializeOwned + 'static,
{
    /// `provides` receives the decoded result, or `None` when the fetch
    /// failed; failed queries still provide tags so invalidation retries them.
    pub fn new<F>(endpoint: &str, args: impl fmt::Display, request: RequestSpec, provides: F) -> Self
    where
        F: Fn(Option<&T>) -> Vec<Tag> + Send + Sync + 'static,
    {
        Self {
            key: QueryKey::new(endpoint, args),
            request,
            provides: Arc::new(provides),
            _marker: PhantomData,
        }
    }

    pub fn provided_tags(&self, result: Option<&T>) -> Vec<Tag> {
        (self.provides)(result)
    }

    /// Type-erased fetch closure stored in the cache entry for refetches
    pub(crate) fn fetcher(&self) -> Fetcher {
        let request = self.request.clone();
        let provides = self.provides.clone();
        Arc::new(move |client: HttpClient| {
            let request = request.clone();
            let provides = provides.clone();
            async move {
                let value = match client.execute(&request).await {
                    Ok(value) => value,
                    Err(err) => {
                        return Fetched {
                            result: Err(err),
                            tags: provides(None),
                        }
                    }
                };
                let (result, tags) = match serde_json::from_value::<T>(value.clone()) {
                    Ok(typed) => (Ok(Arc::new(value)), provides(Some(&typed))),
                    Err(e) => (
                        Err(ApiError::Decode(format!("{}: {}", request, e))),
                        provides(None),
                    ),
                };
                Fetched { result, tags }
            }
            .boxed()
        })
    }
}

pub struct Mutation<R> {
    request: RequestSpec,
    invalidates: Vec<Tag>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for Mutation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("request", &self.request)
            .field("invalidates", &self.invalidates)
            .finish()
    }
}

impl<R: DeserializeOwned> Mutation<R> {
    pub fn new(request: RequestSpec, invalidates: impl Into<Vec<Tag>>) -> Self {
        Self {
            request,
            invalidates: invalidates.into(),
            _marker: PhantomData,
        }
    }

    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    pub fn invalidates(&self) -> &[Tag] {
        &self.invalidates
    }
}

/// What a page sees for one of its queries
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Not issued because a prerequisite (e.g. company id) is unknown
    Skipped,
    Loading,
    Ready(T),
    Failed(ApiError),
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Skipped => QueryState::Skipped,
            QueryState::Loading => QueryState::Loading,
            QueryState::Ready(data) => QueryState::Ready(f(data)),
            QueryState::Failed(err) => QueryState::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::tags::TagKind;

    // no decoder bounds: usable from any generic page helper
    fn path_of<T>(query: &Query<T>) -> (&QueryKey, &str) {
        (query.key(), query.request().path.as_str())
    }

    #[test]
    fn key_and_request_are_available_without_bounds() {
        let query: Query<Vec<Value>> = Query::new(
            "getCompanyUsers",
            3,
            RequestSpec::get("/Company/GetCompanyUsers/3"),
            |_| vec![Tag::id(TagKind::User, 3)],
        );
        let (key, path) = path_of(&query);
        assert_eq!(key.as_str(), "getCompanyUsers(3)");
        assert_eq!(path, "/Company/GetCompanyUsers/3");
        assert_eq!(query.provided_tags(None), vec![Tag::id(TagKind::User, 3)]);
    }
}
