//! Driving port for listing reads.

use async_trait::async_trait;

use crate::domain::search::{ListingFilter, Sort};
use crate::domain::{Error, Listing, ListingId};

/// A search request as parsed at the HTTP boundary, before the service
/// applies its hardening policy (limit cap, parking-filter switch).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub filter: ListingFilter,
    pub sort: Sort,
    /// Raw caller-supplied page size; clamped by the service.
    pub limit: Option<i64>,
    /// Raw caller-supplied start index; clamped by the service.
    pub start_index: Option<i64>,
}

/// Use-cases reading listings; no authentication required.
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Fetch one listing; `NotFound` when absent.
    async fn get(&self, id: ListingId) -> Result<Listing, Error>;

    /// Run a search and return the windowed result page, newest first by
    /// default. No total count accompanies the page.
    async fn search(&self, request: SearchRequest) -> Result<Vec<Listing>, Error>;
}

/// Fixture query port backed by nothing: lookups miss, searches are empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingQuery;

#[async_trait]
impl ListingQuery for FixtureListingQuery {
    async fn get(&self, _id: ListingId) -> Result<Listing, Error> {
        Err(Error::not_found("Listing not found"))
    }

    async fn search(&self, _request: SearchRequest) -> Result<Vec<Listing>, Error> {
        Ok(Vec::new())
    }
}
