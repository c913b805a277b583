//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`ListingCommand`], [`ListingQuery`]) are consumed by the
//! HTTP adapter; driven ports ([`ListingRepository`],
//! [`DescriptionGenerator`]) are implemented by outbound adapters.

mod description_generator;
mod listing_command;
mod listing_query;
mod listing_repository;

#[cfg(test)]
pub use description_generator::MockDescriptionGenerator;
pub use description_generator::{
    DescriptionGenerator, DescriptionGeneratorError, FixtureDescriptionGenerator,
    FIXTURE_COMPLETION,
};
pub use listing_command::{FixtureListingCommand, ListingCommand};
pub use listing_query::{FixtureListingQuery, ListingQuery, SearchRequest};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{
    FixtureListingRepository, ListingRepository, ListingRepositoryError,
};
