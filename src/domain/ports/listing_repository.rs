//! Port for listing persistence.
//!
//! The [`ListingRepository`] trait is the contract every store adapter
//! fulfils. Ownership-gated mutations are single conditional operations
//! (`id` and `owner` matched together) so no read-then-write window exists
//! around the mutation itself.

use async_trait::async_trait;

use crate::domain::search::{ListingFilter, Page, Sort};
use crate::domain::{Listing, ListingId, ListingPatch, UserId};

/// Errors raised by listing repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingRepositoryError {
    /// The store could not be reached.
    #[error("listing store connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("listing store query failed: {message}")]
    Query { message: String },
    /// A stored document could not be decoded into a [`Listing`].
    #[error("listing store returned an undecodable document: {message}")]
    Decode { message: String },
}

impl ListingRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for listing storage and retrieval.
///
/// # Search semantics
///
/// Implementations must reproduce [`ListingFilter::matches`] exactly:
/// token-alternation substring match over name/description
/// (case-insensitive), tri-state boolean filters, and the type filter,
/// sorted per [`Sort`] before the [`Page`] window is applied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a freshly created listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &ListingId)
        -> Result<Option<Listing>, ListingRepositoryError>;

    /// Run a filtered, sorted, windowed search.
    async fn search(
        &self,
        filter: &ListingFilter,
        sort: Sort,
        page: Page,
    ) -> Result<Vec<Listing>, ListingRepositoryError>;

    /// Apply a patch to the listing only when `id` and `owner` both match,
    /// returning the updated record. `None` means nothing matched; the
    /// caller distinguishes missing from foreign-owned.
    async fn update_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Delete the listing only when `id` and `owner` both match. Returns
    /// whether a record was removed.
    async fn delete_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
    ) -> Result<bool, ListingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence: an
/// always-empty store that accepts writes and discards them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingRepository;

#[async_trait]
impl ListingRepository for FixtureListingRepository {
    async fn insert(&self, _listing: &Listing) -> Result<(), ListingRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &ListingId,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(None)
    }

    async fn search(
        &self,
        _filter: &ListingFilter,
        _sort: Sort,
        _page: Page,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_owned(
        &self,
        _id: &ListingId,
        _owner: &UserId,
        _patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(None)
    }

    async fn delete_owned(
        &self,
        _id: &ListingId,
        _owner: &UserId,
    ) -> Result<bool, ListingRepositoryError> {
        Ok(false)
    }
}
