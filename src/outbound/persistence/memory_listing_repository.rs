//! In-memory listing repository.
//!
//! Backs tests and store-less local development. Matching, sorting, and
//! windowing delegate to the domain's reference semantics, so behaviour is
//! identical to the document-store adapter by construction.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::search::{ListingFilter, Page, Sort};
use crate::domain::{Listing, ListingId, ListingPatch, UserId};

/// Process-local listing store.
#[derive(Debug, Default)]
pub struct MemoryListingRepository {
    records: RwLock<HashMap<ListingId, Listing>>,
}

impl MemoryListingRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored listings; test convenience.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when no listings are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ListingRepository for MemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        self.records
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        sort: Sort,
        page: Page,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        let records = self.records.read().await;
        let mut matches: Vec<Listing> = records
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();
        matches.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(page.offset).unwrap_or(usize::MAX);
        Ok(matches
            .into_iter()
            .skip(skip)
            .take(page.limit as usize)
            .collect())
    }

    async fn update_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(id) {
            Some(listing) if &listing.owner == owner => {
                patch.apply(listing);
                Ok(Some(listing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(
        &self,
        id: &ListingId,
        owner: &UserId,
    ) -> Result<bool, ListingRepositoryError> {
        let mut records = self.records.write().await;
        match records.get(id) {
            Some(listing) if &listing.owner == owner => {
                records.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{KindFilter, SearchTokens, SortField, SortOrder, TriState};
    use crate::domain::{ListingDraft, ListingKind};
    use chrono::{Duration, Utc};

    fn listing(name: &str, kind: ListingKind, minutes_ago: i64, owner: &UserId) -> Listing {
        let draft = ListingDraft {
            name: name.into(),
            area: "80 sqm".into(),
            bedrooms: 2,
            features: vec!["balcony".into()],
            kind,
            description: None,
            offer: false,
            furnished: false,
            parking: false,
        };
        Listing::from_draft(
            ListingId::random(),
            owner.clone(),
            draft,
            format!("{name}, freshly renovated."),
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    async fn seeded(owner: &UserId) -> MemoryListingRepository {
        let repo = MemoryListingRepository::new();
        for (name, kind, minutes_ago) in [
            ("Cozy Loft Downtown", ListingKind::Rent, 50),
            ("Harbour View Flat", ListingKind::Rent, 40),
            ("Lakeview Villa", ListingKind::Sale, 30),
            ("Garden Cottage", ListingKind::Sale, 20),
            ("Skyline Penthouse", ListingKind::Sale, 10),
        ] {
            repo.insert(&listing(name, kind, minutes_ago, owner))
                .await
                .expect("insert");
        }
        repo
    }

    fn names(results: &[Listing]) -> Vec<&str> {
        results.iter().map(|listing| listing.name.as_str()).collect()
    }

    #[tokio::test]
    async fn search_sorts_newest_first_by_default() {
        let owner = UserId::random();
        let repo = seeded(&owner).await;

        let results = repo
            .search(
                &ListingFilter::default(),
                Sort::default(),
                Page::clamped(None, None, 100),
            )
            .await
            .expect("search");
        assert_eq!(
            names(&results),
            vec![
                "Skyline Penthouse",
                "Garden Cottage",
                "Lakeview Villa",
                "Harbour View Flat",
                "Cozy Loft Downtown",
            ]
        );
    }

    #[tokio::test]
    async fn search_windows_after_sorting() {
        let owner = UserId::random();
        let repo = seeded(&owner).await;

        let results = repo
            .search(
                &ListingFilter::default(),
                Sort::default(),
                Page::clamped(Some(2), Some(2), 100),
            )
            .await
            .expect("search");
        assert_eq!(names(&results), vec!["Lakeview Villa", "Harbour View Flat"]);
    }

    #[tokio::test]
    async fn search_offsets_past_the_end_return_empty() {
        let owner = UserId::random();
        let repo = seeded(&owner).await;

        let results = repo
            .search(
                &ListingFilter::default(),
                Sort::default(),
                Page::clamped(Some(3), Some(99), 100),
            )
            .await
            .expect("search");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_intersects_tokens_with_kind_filter() {
        let owner = UserId::random();
        let repo = seeded(&owner).await;

        let filter = ListingFilter {
            tokens: SearchTokens::tokenize("view"),
            kind: KindFilter::Exactly(ListingKind::Sale),
            ..ListingFilter::default()
        };
        let results = repo
            .search(&filter, Sort::default(), Page::clamped(None, None, 100))
            .await
            .expect("search");
        assert_eq!(names(&results), vec!["Lakeview Villa"]);
    }

    #[tokio::test]
    async fn search_sorts_by_bedrooms_ascending() {
        let owner = UserId::random();
        let repo = MemoryListingRepository::new();
        for (name, bedrooms) in [("Three", 3_u32), ("One", 1), ("Two", 2)] {
            let mut record = listing(name, ListingKind::Sale, 10, &owner);
            record.bedrooms = bedrooms;
            repo.insert(&record).await.expect("insert");
        }

        let sort = Sort {
            field: SortField::Bedrooms,
            order: SortOrder::Asc,
        };
        let results = repo
            .search(&ListingFilter::default(), sort, Page::clamped(None, None, 100))
            .await
            .expect("search");
        assert_eq!(names(&results), vec!["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn search_honours_tristate_parking() {
        let owner = UserId::random();
        let repo = MemoryListingRepository::new();
        let mut with_parking = listing("With", ListingKind::Rent, 10, &owner);
        with_parking.parking = true;
        let without_parking = listing("Without", ListingKind::Rent, 5, &owner);
        repo.insert(&with_parking).await.expect("insert");
        repo.insert(&without_parking).await.expect("insert");

        let constrained = ListingFilter {
            parking: TriState::Only,
            ..ListingFilter::default()
        };
        let results = repo
            .search(&constrained, Sort::default(), Page::clamped(None, None, 100))
            .await
            .expect("search");
        assert_eq!(names(&results), vec!["With"]);

        let open = ListingFilter::default();
        let results = repo
            .search(&open, Sort::default(), Page::clamped(None, None, 100))
            .await
            .expect("search");
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn update_owned_requires_the_matching_owner() {
        let owner = UserId::random();
        let stranger = UserId::random();
        let repo = MemoryListingRepository::new();
        let record = listing("Target", ListingKind::Sale, 10, &owner);
        repo.insert(&record).await.expect("insert");

        let patch = ListingPatch {
            name: Some("Renamed".into()),
            ..ListingPatch::default()
        };
        let denied = repo
            .update_owned(&record.id, &stranger, &patch)
            .await
            .expect("update call");
        assert!(denied.is_none());

        let updated = repo
            .update_owned(&record.id, &owner, &patch)
            .await
            .expect("update call")
            .expect("owner update succeeds");
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.owner, owner);
    }

    #[tokio::test]
    async fn delete_owned_requires_the_matching_owner() {
        let owner = UserId::random();
        let stranger = UserId::random();
        let repo = MemoryListingRepository::new();
        let record = listing("Target", ListingKind::Sale, 10, &owner);
        repo.insert(&record).await.expect("insert");

        assert!(!repo
            .delete_owned(&record.id, &stranger)
            .await
            .expect("delete call"));
        assert!(repo.find_by_id(&record.id).await.expect("lookup").is_some());

        assert!(repo
            .delete_owned(&record.id, &owner)
            .await
            .expect("delete call"));
        assert!(repo.find_by_id(&record.id).await.expect("lookup").is_none());
    }
}
