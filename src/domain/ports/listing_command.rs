//! Driving port for listing mutations.

use async_trait::async_trait;

use crate::domain::{Error, Listing, ListingDraft, ListingId, ListingPatch, UserId};

/// Use-cases mutating listings on behalf of an authenticated user.
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Create a listing owned by `owner`. When the draft carries no
    /// description, one is generated via the completion API; a generation
    /// failure aborts creation.
    async fn create(&self, owner: UserId, draft: ListingDraft) -> Result<Listing, Error>;

    /// Patch a listing the acting user owns. Missing id yields `NotFound`;
    /// an ownership mismatch yields `Forbidden`.
    async fn update(
        &self,
        id: ListingId,
        acting_user: UserId,
        patch: ListingPatch,
    ) -> Result<Listing, Error>;

    /// Delete a listing the acting user owns. Same `NotFound`/`Forbidden`
    /// classification as [`ListingCommand::update`].
    async fn delete(&self, id: ListingId, acting_user: UserId) -> Result<(), Error>;
}

/// Fixture command port: creation echoes the draft with a canned
/// description; mutations report a missing listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingCommand;

#[async_trait]
impl ListingCommand for FixtureListingCommand {
    async fn create(&self, owner: UserId, draft: ListingDraft) -> Result<Listing, Error> {
        let description = draft
            .supplied_description()
            .unwrap_or(super::FIXTURE_COMPLETION)
            .to_owned();
        Ok(Listing::from_draft(
            ListingId::random(),
            owner,
            draft,
            description,
            chrono::Utc::now(),
        ))
    }

    async fn update(
        &self,
        _id: ListingId,
        _acting_user: UserId,
        _patch: ListingPatch,
    ) -> Result<Listing, Error> {
        Err(Error::not_found("Listing not found"))
    }

    async fn delete(&self, _id: ListingId, _acting_user: UserId) -> Result<(), Error> {
        Err(Error::not_found("Listing not found"))
    }
}
