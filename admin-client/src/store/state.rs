//! Store state

use shared::{ListQuery, DEFAULT_PAGE_SIZE};

/// List, pagination and loading state of one entity store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<E, F> {
    /// Items of the last applied fetch
    pub list: Vec<E>,
    /// Size of the whole filtered set at the last applied fetch
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub filter: F,
    /// Message of the most recent failed action, cleared by the next success
    pub last_error: Option<String>,
    pub(crate) in_flight: usize,
}

impl<E, F: Default> Default for StoreState<E, F> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<E, F: Default> StoreState<E, F> {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            list: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            search: String::new(),
            filter: F::default(),
            last_error: None,
            in_flight: 0,
        }
    }
}

impl<E, F: Clone> StoreState<E, F> {
    /// Query derived from the pagination/search/filter fields
    pub fn query(&self) -> ListQuery<F> {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
            filter: self.filter.clone(),
        }
    }

    /// True while any request of the store is outstanding
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }
}
