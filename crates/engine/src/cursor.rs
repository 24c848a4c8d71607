//! Paginated, filtered search over a remote collection.
//!
//! Responsibilities:
//! - Issue `search(term, page)` requests through a `ProviderGateway`.
//! - Track the current term, page, provider `has_more` signal and the
//!   filtered vs global totals of the last page.
//! - Forward an optional sort key to the provider.
//! - Look up known ids (`include=`) so callers can check eligibility before
//!   selecting them.
//!
//! Does NOT handle:
//! - Selection state; a failed search never touches it.
//! - Caching pages across terms.
//!
//! Invariants:
//! - `has_more` is the provider's signal, never inferred from page length.
//! - `total_filtered <= total_global` for every accepted page; a reply
//!   violating it is rejected as inconsistent.
//! - A failed request leaves the cursor's committed state unchanged.
//! - Changing the term resets the page to 1 and clears `has_more`.

use std::sync::Arc;

use roster_client::{SearchQuery, SortOrder};
use roster_config::constants::MAX_PER_PAGE;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::gateway::ProviderGateway;
use crate::resource::{RemoteResource, ResourceId, ResourceKind};

/// Position and counts of the most recent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchCursor {
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
    pub total_filtered: u64,
    pub total_global: u64,
}

/// Items of one page plus its cursor.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub items: Vec<RemoteResource>,
    pub cursor: SearchCursor,
}

/// Stateful search over one resource kind.
pub struct RemoteResultCursor<G: ProviderGateway + ?Sized> {
    gateway: Arc<G>,
    kind: ResourceKind,
    per_page: u32,
    term: String,
    order_by: Option<String>,
    order: Option<SortOrder>,
    current: Option<SearchPage>,
}

impl<G: ProviderGateway + ?Sized> RemoteResultCursor<G> {
    pub fn new(gateway: Arc<G>, kind: ResourceKind, per_page: u32) -> Self {
        Self {
            gateway,
            kind,
            per_page: per_page.max(1),
            term: String::new(),
            order_by: None,
            order: None,
            current: None,
        }
    }

    /// Ask the provider to sort by `field`; the cursor never re-sorts locally.
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Cursor of the last accepted page.
    pub fn cursor(&self) -> Option<SearchCursor> {
        self.current.as_ref().map(|p| p.cursor)
    }

    /// Items of the last accepted page.
    pub fn visible(&self) -> &[RemoteResource] {
        self.current.as_ref().map_or(&[], |p| p.items.as_slice())
    }

    /// Change the search term without fetching.
    ///
    /// Resets to page 1 and drops the previous page so `has_more` from the
    /// old term cannot leak into navigation.
    pub fn set_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.term {
            self.term = term;
            self.current = None;
        }
    }

    /// Fetch `page` for `term` and make it the current page.
    pub async fn search(&mut self, term: &str, page: u32) -> Result<SearchPage, SearchError> {
        if page == 0 {
            return Err(SearchError::InvalidPage);
        }

        let mut query = SearchQuery::new(term, page, self.per_page);
        query.order_by.clone_from(&self.order_by);
        query.order = self.order;

        debug!(kind = %self.kind, term, page, per_page = self.per_page, "Searching provider");

        let reply = self
            .gateway
            .search(self.kind, &query)
            .await
            .map_err(|source| {
                warn!(kind = %self.kind, term, page, error = %source, "Search failed");
                SearchError::Failed {
                    term: term.to_string(),
                    page,
                    source,
                }
            })?;

        if reply.total_filtered > reply.total_global {
            return Err(SearchError::Inconsistent(format!(
                "total_filtered {} exceeds total_global {}",
                reply.total_filtered, reply.total_global
            )));
        }

        let result = SearchPage {
            items: reply.items,
            cursor: SearchCursor {
                page,
                per_page: self.per_page,
                has_more: reply.has_more,
                total_filtered: reply.total_filtered,
                total_global: reply.total_global,
            },
        };

        self.term = term.to_string();
        self.current = Some(result.clone());
        Ok(result)
    }

    /// Fetch the resources behind `ids`, in chunks of at most `MAX_PER_PAGE`.
    ///
    /// Ids the provider does not list are absent from the result. The
    /// current page and term are left untouched.
    pub async fn lookup(&self, ids: &[ResourceId]) -> Result<Vec<RemoteResource>, SearchError> {
        let mut found = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_PER_PAGE as usize) {
            let mut query = SearchQuery::new("", 1, chunk.len() as u32);
            query.include = chunk.iter().map(|id| id.get()).collect();

            let reply = self
                .gateway
                .search(self.kind, &query)
                .await
                .map_err(|source| {
                    warn!(kind = %self.kind, ids = chunk.len(), error = %source, "Lookup failed");
                    SearchError::LookupFailed {
                        count: chunk.len(),
                        source,
                    }
                })?;
            found.extend(reply.items.into_iter().filter(|r| chunk.contains(&r.id)));
        }
        debug!(kind = %self.kind, requested = ids.len(), found = found.len(), "Looked up ids");
        Ok(found)
    }

    /// Re-run the current term at page 1.
    pub async fn first_page(&mut self) -> Result<SearchPage, SearchError> {
        let term = self.term.clone();
        self.search(&term, 1).await
    }

    /// Next page if the provider signalled one; `Ok(None)` otherwise.
    pub async fn next_page(&mut self) -> Result<Option<SearchPage>, SearchError> {
        let Some(cursor) = self.cursor() else {
            return Ok(None);
        };
        if !cursor.has_more {
            return Ok(None);
        }
        let term = self.term.clone();
        self.search(&term, cursor.page + 1).await.map(Some)
    }

    /// Previous page; `Ok(None)` on page 1 or before any search.
    pub async fn prev_page(&mut self) -> Result<Option<SearchPage>, SearchError> {
        match self.cursor() {
            Some(cursor) if cursor.page > 1 => {
                let term = self.term.clone();
                self.search(&term, cursor.page - 1).await.map(Some)
            }
            _ => Ok(None),
        }
    }
}
