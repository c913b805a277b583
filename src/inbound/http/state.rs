//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving ports and remain testable without real collaborators.

use std::sync::Arc;

use crate::domain::ports::{DescriptionGenerator, ListingCommand, ListingQuery, ListingRepository};
use crate::domain::ListingService;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use estate_backend::domain::ports::{FixtureListingCommand, FixtureListingQuery};
/// use estate_backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureListingCommand),
///     Arc::new(FixtureListingQuery),
/// );
/// let _queries = state.queries.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<dyn ListingCommand>,
    pub queries: Arc<dyn ListingQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(commands: Arc<dyn ListingCommand>, queries: Arc<dyn ListingQuery>) -> Self {
        Self { commands, queries }
    }

    /// Construct state from a listing service, which implements both ports.
    pub fn from_service<R, G>(service: Arc<ListingService<R, G>>) -> Self
    where
        R: ListingRepository + ?Sized + 'static,
        G: DescriptionGenerator + ?Sized + 'static,
    {
        Self {
            commands: service.clone(),
            queries: service,
        }
    }
}
