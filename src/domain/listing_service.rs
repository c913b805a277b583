//! Listing domain service.
//!
//! Implements the driving ports over a listing repository and a description
//! generator. Ownership is enforced through the repository's conditional
//! mutations; a miss is classified afterwards so callers can tell a missing
//! listing (404) from a foreign-owned one (403).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    DescriptionGenerator, DescriptionGeneratorError, ListingCommand, ListingQuery,
    ListingRepository, ListingRepositoryError, SearchRequest,
};
use crate::domain::search::{Page, TriState};
use crate::domain::{Error, Listing, ListingDraft, ListingId, ListingPatch, UserId};

/// Completion length requested for generated descriptions, in tokens.
const DESCRIPTION_MAX_TOKENS: u32 = 100;

/// Hardening knobs applied to search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Upper bound on the caller-supplied page size.
    pub max_limit: u32,
    /// Whether the `parking` tri-state filter is honoured. Off means the
    /// parameter is accepted but never constrains results.
    pub apply_parking_filter: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_limit: 100,
            apply_parking_filter: true,
        }
    }
}

/// Listing service implementing the driving ports.
pub struct ListingService<R: ?Sized, G: ?Sized> {
    repository: Arc<R>,
    generator: Arc<G>,
    policy: SearchPolicy,
}

impl<R: ?Sized, G: ?Sized> ListingService<R, G> {
    /// Create a service with the default search policy.
    pub fn new(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self::with_policy(repository, generator, SearchPolicy::default())
    }

    /// Create a service with an explicit search policy.
    pub fn with_policy(repository: Arc<R>, generator: Arc<G>, policy: SearchPolicy) -> Self {
        Self {
            repository,
            generator,
            policy,
        }
    }
}

/// Build the completion prompt for a draft.
fn description_prompt(draft: &ListingDraft) -> String {
    format!(
        "Generate a compelling real estate description for a property named \
         \"{name}\". It has {bedrooms} bedrooms and features {features}. \
         The type of listing is \"{kind}\".",
        name = draft.name,
        bedrooms = draft.bedrooms,
        features = draft.features.join(", "),
        kind = draft.kind,
    )
}

fn map_repository_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing store unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing store error: {message}"))
        }
        ListingRepositoryError::Decode { message } => {
            Error::internal(format!("listing store returned bad data: {message}"))
        }
    }
}

fn map_generator_error(error: DescriptionGeneratorError) -> Error {
    match error {
        DescriptionGeneratorError::Transport { message }
        | DescriptionGeneratorError::Timeout { message }
        | DescriptionGeneratorError::RateLimited { message } => {
            Error::service_unavailable(format!("description generation failed: {message}"))
        }
        DescriptionGeneratorError::Api { status, message } => Error::internal(format!(
            "completion API rejected the request (status {status}): {message}"
        )),
        DescriptionGeneratorError::Decode { message } => {
            Error::internal(format!("completion API returned bad data: {message}"))
        }
    }
}

impl<R, G> ListingService<R, G>
where
    R: ListingRepository + ?Sized,
    G: DescriptionGenerator + ?Sized,
{
    /// Resolve the description for a draft: the supplied text when present,
    /// otherwise a fresh completion. An empty completion aborts creation;
    /// there is no fallback description.
    async fn resolve_description(&self, draft: &ListingDraft) -> Result<String, Error> {
        if let Some(supplied) = draft.supplied_description() {
            return Ok(supplied.to_owned());
        }

        let prompt = description_prompt(draft);
        debug!(prompt = %prompt, "requesting listing description");
        let completion = self
            .generator
            .complete(&prompt, DESCRIPTION_MAX_TOKENS)
            .await
            .map_err(|error| {
                warn!(error = %error, "description generation failed");
                map_generator_error(error)
            })?;

        let description = completion.trim();
        if description.is_empty() {
            return Err(Error::internal("completion API returned an empty description"));
        }
        Ok(description.to_owned())
    }

    /// Classify a conditional-mutation miss: the listing either does not
    /// exist (404) or belongs to someone else (403).
    async fn classify_miss(&self, id: &ListingId, forbidden_message: &str) -> Error {
        match self.repository.find_by_id(id).await {
            Ok(None) => Error::not_found("Listing not found"),
            Ok(Some(_)) => Error::forbidden(forbidden_message),
            Err(error) => map_repository_error(error),
        }
    }
}

#[async_trait]
impl<R, G> ListingCommand for ListingService<R, G>
where
    R: ListingRepository + ?Sized,
    G: DescriptionGenerator + ?Sized,
{
    async fn create(&self, owner: UserId, draft: ListingDraft) -> Result<Listing, Error> {
        draft
            .validate()
            .map_err(|error| Error::invalid_request(error.to_string()))?;

        let description = self.resolve_description(&draft).await?;
        let listing = Listing::from_draft(
            ListingId::random(),
            owner,
            draft,
            description,
            Utc::now(),
        );

        self.repository
            .insert(&listing)
            .await
            .map_err(map_repository_error)?;
        info!(listing_id = %listing.id, owner = %listing.owner, "listing created");
        Ok(listing)
    }

    async fn update(
        &self,
        id: ListingId,
        acting_user: UserId,
        patch: ListingPatch,
    ) -> Result<Listing, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(
                "update must supply at least one mutable field",
            ));
        }

        match self
            .repository
            .update_owned(&id, &acting_user, &patch)
            .await
            .map_err(map_repository_error)?
        {
            Some(listing) => {
                info!(listing_id = %id, "listing updated");
                Ok(listing)
            }
            None => Err(self
                .classify_miss(&id, "You can only update your own listings")
                .await),
        }
    }

    async fn delete(&self, id: ListingId, acting_user: UserId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete_owned(&id, &acting_user)
            .await
            .map_err(map_repository_error)?;
        if removed {
            info!(listing_id = %id, "listing deleted");
            Ok(())
        } else {
            Err(self
                .classify_miss(&id, "You can only delete your own listings")
                .await)
        }
    }
}

#[async_trait]
impl<R, G> ListingQuery for ListingService<R, G>
where
    R: ListingRepository + ?Sized,
    G: DescriptionGenerator + ?Sized,
{
    async fn get(&self, id: ListingId) -> Result<Listing, Error> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Listing not found"))
    }

    async fn search(&self, request: SearchRequest) -> Result<Vec<Listing>, Error> {
        let SearchRequest {
            mut filter,
            sort,
            limit,
            start_index,
        } = request;

        if !self.policy.apply_parking_filter {
            filter.parking = TriState::Any;
        }
        let page = Page::clamped(limit, start_index, self.policy.max_limit);

        self.repository
            .search(&filter, sort, page)
            .await
            .map_err(map_repository_error)
    }
}
