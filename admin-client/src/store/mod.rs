//! Entity stores
//!
//! [`EntityStore`] holds the list/pagination state of one resource and
//! funnels every mutation through [`EntityStore::refresh`], so the cached
//! page always comes from the backend; nothing is patched locally.
//!
//! Fetches are sequenced: each takes a request id from a monotonic counter
//! and a response is applied only if no newer fetch was issued meanwhile.
//! Whichever request was issued last wins, regardless of the order responses
//! arrive in.
//!
//! State lives in a `watch` channel; [`EntityStore::subscribe`] gives a
//! receiver that is notified on every change.

pub mod account;
pub mod session;
pub mod state;

pub use account::AccountStore;
pub use session::SessionStore;
pub use state::StoreState;

use std::sync::atomic::{AtomicU64, Ordering};

use shared::ListQuery;
use tokio::sync::watch;

use crate::service::{Resource, ResourceService};
use crate::{ClientError, ClientResult};

/// State type of the store for resource `R`
pub type StateOf<R> = StoreState<<R as Resource>::Entity, <R as Resource>::Filter>;

/// What happened to a fetch's response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced list and total
    Applied { count: usize, total: u64 },
    /// A newer fetch was issued first; the response was dropped
    Superseded,
}

pub struct EntityStore<R: Resource> {
    service: ResourceService<R>,
    state: watch::Sender<StateOf<R>>,
    latest_request: AtomicU64,
}

impl<R: Resource> std::fmt::Debug for EntityStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("resource", &R::NAME)
            .field("latest_request", &self.latest_request.load(Ordering::SeqCst))
            .finish()
    }
}

impl<R: Resource> EntityStore<R> {
    pub fn new(service: ResourceService<R>) -> Self {
        Self::with_state(service, StoreState::default())
    }

    pub fn with_page_size(service: ResourceService<R>, page_size: u32) -> Self {
        Self::with_state(service, StoreState::with_page_size(page_size.max(1)))
    }

    fn with_state(service: ResourceService<R>, state: StateOf<R>) -> Self {
        let (state, _) = watch::channel(state);
        Self {
            service,
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn subscribe(&self) -> watch::Receiver<StateOf<R>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StateOf<R> {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> ListQuery<R::Filter> {
        self.state.borrow().query()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading()
    }

    /// Re-fetches the current page with the current query
    pub async fn refresh(&self) -> ClientResult<FetchOutcome> {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query();
        let _loading = self.begin_loading();

        tracing::debug!(
            store = R::NAME,
            request_id,
            page = query.page,
            page_size = query.page_size,
            search = %query.search,
            "Fetching list"
        );

        let result = self.service.list(&query).await;
        let is_latest = self.latest_request.load(Ordering::SeqCst) == request_id;

        match result {
            Ok(_) if !is_latest => {
                tracing::debug!(store = R::NAME, request_id, "Discarding superseded response");
                Ok(FetchOutcome::Superseded)
            }
            Ok(page) => {
                let outcome = FetchOutcome::Applied {
                    count: page.list.len(),
                    total: page.total,
                };
                self.state.send_modify(|s| {
                    s.list = page.list;
                    s.total = page.total;
                    s.last_error = None;
                });
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(store = R::NAME, request_id, error = %e, "Failed to fetch list");
                if is_latest {
                    self.record_error(&e);
                }
                Err(e)
            }
        }
    }

    /// Replaces the whole query, then refreshes
    pub async fn load(&self, query: ListQuery<R::Filter>) -> ClientResult<FetchOutcome> {
        validate_paging(query.page, query.page_size)?;
        self.state.send_modify(|s| {
            s.page = query.page;
            s.page_size = query.page_size;
            s.search = query.search;
            s.filter = query.filter;
        });
        self.refresh().await
    }

    pub async fn set_page(&self, page: u32) -> ClientResult<FetchOutcome> {
        validate_paging(page, 1)?;
        self.state.send_modify(|s| s.page = page);
        self.refresh().await
    }

    pub async fn set_page_size(&self, page_size: u32) -> ClientResult<FetchOutcome> {
        validate_paging(1, page_size)?;
        self.state.send_modify(|s| s.page_size = page_size);
        self.refresh().await
    }

    /// Updates search and goes back to the first page
    pub async fn set_search(&self, search: impl Into<String>) -> ClientResult<FetchOutcome> {
        let search = search.into();
        self.state.send_modify(|s| {
            s.search = search;
            s.page = 1;
        });
        self.refresh().await
    }

    /// Updates the resource filter and goes back to the first page
    pub async fn set_filter(&self, filter: R::Filter) -> ClientResult<FetchOutcome> {
        self.state.send_modify(|s| {
            s.filter = filter;
            s.page = 1;
        });
        self.refresh().await
    }

    /// Creates an entity, then refreshes
    pub async fn add(&self, payload: &R::Create) -> ClientResult<R::Entity> {
        let created = {
            let _loading = self.begin_loading();
            self.service.create(payload).await
        };
        let entity = self.settle("create", created)?;
        self.refresh_after("create").await;
        Ok(entity)
    }

    /// Updates an entity, then refreshes
    pub async fn edit(&self, payload: &R::Update) -> ClientResult<R::Entity> {
        let updated = {
            let _loading = self.begin_loading();
            self.service.update(payload).await
        };
        let entity = self.settle("update", updated)?;
        self.refresh_after("update").await;
        Ok(entity)
    }

    /// Deletes an entity, then refreshes
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        let deleted = {
            let _loading = self.begin_loading();
            self.service.delete(id).await
        };
        self.settle("delete", deleted)?;
        self.refresh_after("delete").await;
        Ok(())
    }

    /// Reloads the page after a committed mutation
    ///
    /// The mutation's result stands either way; a failed reload is only
    /// logged and left in `last_error`.
    pub(crate) async fn refresh_after(&self, action: &str) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(store = R::NAME, action, error = %e, "Reload after mutation failed");
        }
    }

    /// Logs and records a failed action; successes pass through
    pub(crate) fn settle<T>(&self, action: &str, result: ClientResult<T>) -> ClientResult<T> {
        result.inspect_err(|e| {
            tracing::warn!(store = R::NAME, action, error = %e, "Store action failed");
            self.record_error(e);
        })
    }

    pub(crate) fn begin_loading(&self) -> LoadingGuard<'_, StateOf<R>> {
        LoadingGuard::new(&self.state)
    }

    fn record_error(&self, error: &ClientError) {
        let message = error.to_string();
        self.state.send_modify(|s| s.last_error = Some(message));
    }
}

fn validate_paging(page: u32, page_size: u32) -> ClientResult<()> {
    if page == 0 || page_size == 0 {
        return Err(ClientError::Validation(format!(
            "page and pageSize must be at least 1 (page={}, pageSize={})",
            page, page_size
        )));
    }
    Ok(())
}

/// Store states that count outstanding requests
pub(crate) trait InFlight {
    fn in_flight_mut(&mut self) -> &mut usize;
}

impl<E, F> InFlight for StoreState<E, F> {
    fn in_flight_mut(&mut self) -> &mut usize {
        &mut self.in_flight
    }
}

/// Holds the loading flag up for the lifetime of one request
pub(crate) struct LoadingGuard<'a, S: InFlight> {
    state: &'a watch::Sender<S>,
}

impl<'a, S: InFlight> LoadingGuard<'a, S> {
    fn new(state: &'a watch::Sender<S>) -> Self {
        state.send_modify(|s| *s.in_flight_mut() += 1);
        Self { state }
    }
}

impl<S: InFlight> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            let count = s.in_flight_mut();
            *count = count.saturating_sub(1);
        });
    }
}
