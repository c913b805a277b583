//! Listing aggregate and its intake types.
//!
//! A [`Listing`] is a persisted real-estate record. The owner reference is
//! set once at creation and never changes; updates flow through
//! [`ListingPatch`], which can only express the mutable attributes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised when building a [`ListingDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("listing name must not be empty")]
    EmptyName,
    #[error("listing area must not be empty")]
    EmptyArea,
    #[error("listing type must be \"sale\" or \"rent\"")]
    InvalidKind,
}

/// Stable listing identifier, assigned by the service at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Market classification of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sale,
    Rent,
}

impl ListingKind {
    /// Canonical lowercase name used on the wire and in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }

    /// Parse the wire form; anything other than `sale`/`rent` is rejected.
    pub fn parse(raw: &str) -> Result<Self, ListingValidationError> {
        match raw {
            "sale" => Ok(Self::Sale),
            "rent" => Ok(Self::Rent),
            _ => Err(ListingValidationError::InvalidKind),
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted real-estate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    /// Free-form size description; numeric intake is stringified.
    pub area: String,
    pub bedrooms: u32,
    pub features: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub description: String,
    pub offer: bool,
    pub furnished: bool,
    pub parking: bool,
    /// Identifier of the creating user; immutable after creation.
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

/// Validated input for the create operation.
///
/// `description` is optional: when absent the service asks the completion API
/// for one. The tri-state flags default to `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub area: String,
    pub bedrooms: u32,
    pub features: Vec<String>,
    pub kind: ListingKind,
    pub description: Option<String>,
    pub offer: bool,
    pub furnished: bool,
    pub parking: bool,
}

impl ListingDraft {
    /// Validate the required creation fields.
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if self.name.trim().is_empty() {
            return Err(ListingValidationError::EmptyName);
        }
        if self.area.trim().is_empty() {
            return Err(ListingValidationError::EmptyArea);
        }
        Ok(())
    }

    /// The description supplied by the caller, if it carries any content.
    pub fn supplied_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

impl Listing {
    /// Materialise a record from a validated draft and a resolved description.
    pub fn from_draft(
        id: ListingId,
        owner: UserId,
        draft: ListingDraft,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            area: draft.area,
            bedrooms: draft.bedrooms,
            features: draft.features,
            kind: draft.kind,
            description,
            offer: draft.offer,
            furnished: draft.furnished,
            parking: draft.parking,
            owner,
            created_at,
        }
    }
}

/// Field-level patch applied by the update operation.
///
/// Deliberately an allow-list: the identifier, owner reference, and creation
/// timestamp cannot be expressed here, so no request body can overwrite them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub name: Option<String>,
    pub area: Option<String>,
    pub bedrooms: Option<u32>,
    pub features: Option<Vec<String>>,
    pub kind: Option<ListingKind>,
    pub description: Option<String>,
    pub offer: Option<bool>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
}

impl ListingPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the supplied fields onto `listing`, leaving the rest untouched.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(name) = &self.name {
            listing.name = name.clone();
        }
        if let Some(area) = &self.area {
            listing.area = area.clone();
        }
        if let Some(bedrooms) = self.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(features) = &self.features {
            listing.features = features.clone();
        }
        if let Some(kind) = self.kind {
            listing.kind = kind;
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(offer) = self.offer {
            listing.offer = offer;
        }
        if let Some(furnished) = self.furnished {
            listing.furnished = furnished;
        }
        if let Some(parking) = self.parking {
            listing.parking = parking;
        }
    }
}
