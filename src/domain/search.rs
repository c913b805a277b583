//! Listing search: filter construction and matching semantics.
//!
//! The search contract mirrors the store-side query the service was built
//! around: the search term is lowercased and split into word tokens, and a
//! record matches when its name or description contains any token as a
//! case-insensitive substring, intersected with tri-state boolean filters and
//! a type filter. The semantics live here so every store adapter reproduces
//! them identically.

use serde::{Deserialize, Serialize};

use crate::domain::{Listing, ListingKind};

/// Default page size when the caller supplies none (or a non-positive value).
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Lowercased word tokens extracted from a free-text search term.
///
/// Tokens are maximal alphanumeric runs, so they contain no regex
/// metacharacters and can be joined into an alternation pattern verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTokens(Vec<String>);

impl SearchTokens {
    /// Tokenize a raw search term.
    pub fn tokenize(term: &str) -> Self {
        let tokens = term
            .to_lowercase()
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();
        Self(tokens)
    }

    /// True when the term produced no tokens; an empty token set matches
    /// every record.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual tokens, lowercased.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Join the tokens into a case-insensitive alternation pattern for
    /// regex-capable stores. Empty when there are no tokens.
    pub fn alternation(&self) -> String {
        self.0.join("|")
    }

    /// Case-insensitive substring match against a candidate text.
    pub fn matches(&self, text: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let haystack = text.to_lowercase();
        self.0.iter().any(|token| haystack.contains(token.as_str()))
    }
}

/// A boolean query filter that is either constrained to `true` or matches
/// both values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    /// Match records regardless of the flag value.
    #[default]
    Any,
    /// Match only records where the flag is `true`.
    Only,
}

impl TriState {
    /// Parse the query-parameter form: exactly `"true"` constrains the
    /// filter; any other value (or absence) leaves it unconstrained.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("true") => Self::Only,
            _ => Self::Any,
        }
    }

    /// Apply the filter to a concrete flag value.
    pub fn accepts(self, value: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Only => value,
        }
    }
}

/// Type filter: an exact classification or the `all` sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    /// Match sale and rent listings alike.
    #[default]
    All,
    /// Match one classification exactly.
    Exactly(ListingKind),
}

impl KindFilter {
    /// Parse the query-parameter form. Absence and `"all"` both mean no
    /// constraint; anything else must be a valid classification.
    pub fn from_param(raw: Option<&str>) -> Result<Self, UnknownParam> {
        match raw {
            None | Some("all") => Ok(Self::All),
            Some(value) => ListingKind::parse(value)
                .map(Self::Exactly)
                .map_err(|_| UnknownParam {
                    field: "type",
                    value: value.to_owned(),
                }),
        }
    }

    /// Apply the filter to a concrete classification.
    pub fn accepts(self, kind: ListingKind) -> bool {
        match self {
            Self::All => true,
            Self::Exactly(expected) => expected == kind,
        }
    }
}

/// A query parameter whose value is outside the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported value {value:?} for query parameter {field}")]
pub struct UnknownParam {
    pub field: &'static str,
    pub value: String,
}

/// Sortable listing fields. Arbitrary field names are not forwarded to the
/// store; unknown values are rejected at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "bedrooms")]
    Bedrooms,
}

impl SortField {
    /// Parse the query-parameter form; absence selects the creation time.
    pub fn from_param(raw: Option<&str>) -> Result<Self, UnknownParam> {
        match raw {
            None | Some("createdAt") => Ok(Self::CreatedAt),
            Some("name") => Ok(Self::Name),
            Some("bedrooms") => Ok(Self::Bedrooms),
            Some(value) => Err(UnknownParam {
                field: "sort",
                value: value.to_owned(),
            }),
        }
    }
}

/// Sort direction; listings default to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

impl SortOrder {
    /// Parse the query-parameter form; absence selects descending.
    pub fn from_param(raw: Option<&str>) -> Result<Self, UnknownParam> {
        match raw {
            None | Some("desc") => Ok(Self::Desc),
            Some("asc") => Ok(Self::Asc),
            Some(value) => Err(UnknownParam {
                field: "order",
                value: value.to_owned(),
            }),
        }
    }
}

/// Sort selection applied before pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    /// Total order over listings for in-process sorting. Ties fall back to
    /// the identifier so pagination windows are stable.
    pub fn compare(&self, a: &Listing, b: &Listing) -> std::cmp::Ordering {
        let forward = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
        };
        let forward = forward.then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()));
        match self.order {
            SortOrder::Asc => forward,
            SortOrder::Desc => forward.reverse(),
        }
    }
}

/// Pagination window: skip `offset` records, return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u64,
}

impl Page {
    /// Clamp raw caller input. Non-positive limits fall back to
    /// [`DEFAULT_PAGE_SIZE`]; `max_limit` caps the window; negative offsets
    /// clamp to zero.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>, max_limit: u32) -> Self {
        let limit = match limit {
            Some(value) if value >= 1 => u32::try_from(value).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE_SIZE,
        };
        let offset = match offset {
            Some(value) if value > 0 => value as u64,
            _ => 0,
        };
        Self {
            limit: limit.min(max_limit.max(1)),
            offset,
        }
    }
}

/// The complete filter a search request resolves to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub tokens: SearchTokens,
    pub offer: TriState,
    pub furnished: TriState,
    pub parking: TriState,
    pub kind: KindFilter,
}

impl ListingFilter {
    /// Reference matching semantics; every store adapter must agree with
    /// this predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        (self.tokens.matches(&listing.name) || self.tokens.matches(&listing.description))
            && self.offer.accepts(listing.offer)
            && self.furnished.accepts(listing.furnished)
            && self.parking.accepts(listing.parking)
            && self.kind.accepts(listing.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cozy loft", &["cozy", "loft"])]
    #[case("Cozy   LOFT!", &["cozy", "loft"])]
    #[case("3-bed flat, downtown", &["3", "bed", "flat", "downtown"])]
    #[case("", &[])]
    #[case("  ?! ", &[])]
    fn tokenizes_into_lowercase_word_runs(#[case] term: &str, #[case] expected: &[&str]) {
        let tokens = SearchTokens::tokenize(term);
        assert_eq!(tokens.as_slice(), expected);
    }

    #[test]
    fn token_match_is_case_insensitive_substring() {
        let tokens = SearchTokens::tokenize("cozy loft");
        assert!(tokens.matches("Cozy Loft Downtown"));
        assert!(tokens.matches("an oversized LOFT conversion"));
        assert!(!tokens.matches("suburban bungalow"));
    }

    #[test]
    fn empty_token_set_matches_everything() {
        let tokens = SearchTokens::tokenize("  ");
        assert!(tokens.is_empty());
        assert!(tokens.matches("anything at all"));
        assert_eq!(tokens.alternation(), "");
    }

    #[rstest]
    #[case(None, TriState::Any)]
    #[case(Some("true"), TriState::Only)]
    #[case(Some("false"), TriState::Any)]
    #[case(Some("yes"), TriState::Any)]
    fn tri_state_only_constrains_on_literal_true(
        #[case] raw: Option<&str>,
        #[case] expected: TriState,
    ) {
        assert_eq!(TriState::from_param(raw), expected);
    }

    #[test]
    fn kind_filter_accepts_all_sentinel_and_absence() {
        assert_eq!(KindFilter::from_param(None).expect("absent"), KindFilter::All);
        assert_eq!(
            KindFilter::from_param(Some("all")).expect("sentinel"),
            KindFilter::All
        );
        assert_eq!(
            KindFilter::from_param(Some("rent")).expect("exact"),
            KindFilter::Exactly(ListingKind::Rent)
        );
        assert!(KindFilter::from_param(Some("lease")).is_err());
    }

    #[rstest]
    #[case(None, None, 9, 0)]
    #[case(Some(2), Some(2), 2, 2)]
    #[case(Some(0), Some(-4), 9, 0)]
    #[case(Some(-1), None, 9, 0)]
    #[case(Some(10_000), None, 100, 0)]
    fn page_clamps_caller_input(
        #[case] limit: Option<i64>,
        #[case] offset: Option<i64>,
        #[case] expected_limit: u32,
        #[case] expected_offset: u64,
    ) {
        let page = Page::clamped(limit, offset, 100);
        assert_eq!(page.limit, expected_limit);
        assert_eq!(page.offset, expected_offset);
    }

    #[test]
    fn sort_field_rejects_unknown_names() {
        let err = SortField::from_param(Some("owner")).expect_err("unknown field");
        assert_eq!(err.field, "sort");
        assert_eq!(err.value, "owner");
    }

    #[test]
    fn sort_order_defaults_to_descending() {
        assert_eq!(SortOrder::from_param(None).expect("default"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")).expect("asc"), SortOrder::Asc);
        assert!(SortOrder::from_param(Some("descending")).is_err());
    }
}
