//! Outbound adapters for listing persistence.

mod memory_listing_repository;
mod mongo_listing_repository;

pub use memory_listing_repository::MemoryListingRepository;
pub use mongo_listing_repository::MongoListingRepository;
