//! Domain model, ports, and the listing service.
//!
//! Everything here is transport agnostic: no actix, mongo, or reqwest types
//! cross this boundary. Inbound adapters translate HTTP requests into the
//! driving ports; outbound adapters implement the driven ports.

pub mod error;
pub mod listing;
pub mod listing_service;
pub mod ports;
pub mod search;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::listing::{
    Listing, ListingDraft, ListingId, ListingKind, ListingPatch, ListingValidationError,
};
pub use self::listing_service::{ListingService, SearchPolicy};
pub use self::user::{UserId, UserIdValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
