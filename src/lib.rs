//! Real-estate listing backend.
//!
//! CRUD and search over listing records in a document store, with
//! AI-assisted description generation at creation time. Layout is
//! hexagonal: `domain` holds the model, ports, and service; `inbound`
//! and `outbound` hold the adapters.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use doc::ApiDoc;
