//! MongoDB-backed listing repository.
//!
//! Documents key on the listing UUID (`_id` as its canonical string) and
//! mirror the wire field names (`type`, `createdAt`). The filter builders are
//! pure functions so the query shapes are testable without a server.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::search::{KindFilter, ListingFilter, Page, Sort, SortField, SortOrder, TriState};
use crate::domain::{Listing, ListingId, ListingKind, ListingPatch, UserId};

/// Default collection name for listings.
const COLLECTION: &str = "listings";

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListingDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    area: String,
    bedrooms: u32,
    features: Vec<String>,
    #[serde(rename = "type")]
    kind: String,
    description: String,
    offer: bool,
    furnished: bool,
    parking: bool,
    owner: String,
    #[serde(rename = "createdAt")]
    created_at: BsonDateTime,
}

impl From<&Listing> for ListingDocument {
    fn from(value: &Listing) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            area: value.area.clone(),
            bedrooms: value.bedrooms,
            features: value.features.clone(),
            kind: value.kind.to_string(),
            description: value.description.clone(),
            offer: value.offer,
            furnished: value.furnished,
            parking: value.parking,
            owner: value.owner.to_string(),
            created_at: BsonDateTime::from_millis(value.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<ListingDocument> for Listing {
    type Error = ListingRepositoryError;

    fn try_from(value: ListingDocument) -> Result<Self, Self::Error> {
        let id = ListingId::parse(&value.id).map_err(|_| {
            ListingRepositoryError::decode(format!("invalid listing id {:?}", value.id))
        })?;
        let owner = UserId::new(&value.owner).map_err(|error| {
            ListingRepositoryError::decode(format!("invalid owner reference: {error}"))
        })?;
        let kind = ListingKind::parse(&value.kind).map_err(|error| {
            ListingRepositoryError::decode(format!("invalid listing type: {error}"))
        })?;

        Ok(Self {
            id,
            name: value.name,
            area: value.area,
            bedrooms: value.bedrooms,
            features: value.features,
            kind,
            description: value.description,
            offer: value.offer,
            furnished: value.furnished,
            parking: value.parking,
            owner,
            created_at: chrono::DateTime::from_timestamp_millis(
                value.created_at.timestamp_millis(),
            )
            .ok_or_else(|| ListingRepositoryError::decode("createdAt out of range"))?,
        })
    }
}

/// Build the find filter for a search request.
fn search_filter(filter: &ListingFilter) -> Document {
    let mut document = Document::new();
    if !filter.tokens.is_empty() {
        let pattern = filter.tokens.alternation();
        document.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": &pattern, "$options": "i" } },
                doc! { "description": { "$regex": &pattern, "$options": "i" } },
            ],
        );
    }
    document.insert("offer", tri_state_filter(filter.offer));
    document.insert("furnished", tri_state_filter(filter.furnished));
    document.insert("parking", tri_state_filter(filter.parking));
    document.insert("type", kind_filter(filter.kind));
    document
}

fn tri_state_filter(value: TriState) -> mongodb::bson::Bson {
    match value {
        TriState::Only => true.into(),
        TriState::Any => doc! { "$in": [false, true] }.into(),
    }
}

fn kind_filter(value: KindFilter) -> mongodb::bson::Bson {
    match value {
        KindFilter::Exactly(kind) => kind.as_str().into(),
        KindFilter::All => doc! { "$in": ["sale", "rent"] }.into(),
    }
}

/// Build the sort document; `_id` breaks ties so windows stay stable.
fn sort_doc(sort: Sort) -> Document {
    let field = match sort.field {
        SortField::CreatedAt => "createdAt",
        SortField::Name => "name",
        SortField::Bedrooms => "bedrooms",
    };
    let direction: i32 = match sort.order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };
    let mut document = Document::new();
    document.insert(field, direction);
    document.insert("_id", direction);
    document
}

/// Build the `$set` update for a patch; only supplied fields appear.
fn patch_update(patch: &ListingPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(area) = &patch.area {
        set.insert("area", area.as_str());
    }
    if let Some(bedrooms) = patch.bedrooms {
        set.insert("bedrooms", i64::from(bedrooms));
    }
    if let Some(features) = &patch.features {
        set.insert("features", features.clone());
    }
    if let Some(kind) = patch.kind {
        set.insert("type", kind.as_str());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(offer) = patch.offer {
        set.insert("offer", offer);
    }
    if let Some(furnished) = patch.furnished {
        set.insert("furnished", furnished);
    }
    if let Some(parking) = patch.parking {
        set.insert("parking", parking);
    }
    doc! { "$set": set }
}

fn owned_filter(id: &ListingId, owner: &UserId) -> Document {
    doc! { "_id": id.to_string(), "owner": owner.to_string() }
}

fn map_store_error(error: mongodb::error::Error) -> ListingRepositoryError {
    match &*error.kind {
        ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => {
            ListingRepositoryError::connection(error.to_string())
        }
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            ListingRepositoryError::decode(error.to_string())
        }
        _ => ListingRepositoryError::query(error.to_string()),
    }
}

/// Listing repository over a MongoDB collection.
pub struct MongoListingRepository {
    collection: Collection<ListingDocument>,
}

impl MongoListingRepository {
    /// Bind to the `listings` collection of `database`.
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            collection: client.database(database).collection(COLLECTION),
        }
    }
}

#[async_trait]
impl ListingRepository for MongoListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        self.collection
            .insert_one(ListingDocument::from(listing))
            .await
            .map_err(map_store_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_store_error)?
            .map(Listing::try_from)
            .transpose()
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        sort: Sort,
        page: Page,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        let cursor = self
            .collection
            .find(search_filter(filter))
            .sort(sort_doc(sort))
            .skip(page.offset)
            .limit(i64::from(page.limit))
            .await
            .map_err(map_store_error)?;

        let documents: Vec<ListingDocument> =
            cursor.try_collect().await.map_err(map_store_error)?;
        documents.into_iter().map(Listing::try_from).collect()
    }

    async fn update_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        self.collection
            .find_one_and_update(owned_filter(id, owner), patch_update(patch))
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_store_error)?
            .map(Listing::try_from)
            .transpose()
    }

    async fn delete_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
    ) -> Result<bool, ListingRepositoryError> {
        let deleted = self
            .collection
            .find_one_and_delete(owned_filter(id, owner))
            .await
            .map_err(map_store_error)?;
        Ok(deleted.is_some())
    }
}
