pub mod history;
pub mod listing;
pub mod related;
pub mod rfc3339;
pub mod search;
pub mod suggest;
pub mod trending;

mod error;

pub use error::{Error, Result};
pub use history::{
	RecordSearchRequest, RecordSearchResponse, SearchHistoryRequest, SearchHistoryResponse,
};
pub use listing::{ListingDetailRequest, ListingDetailResponse, ListingItem};
pub use related::{RelatedItem, RelatedRequest, RelatedResponse};
pub use search::{SearchFilters, SearchItem, SearchRequest, SearchResponse, SortBy, SortOrder};
pub use suggest::{SuggestRequest, SuggestResponse, Suggestion, SuggestionKind};
pub use trending::{
	CategoryStatsItem, CategoryStatsResponse, PopularSearch, PopularSearchesRequest,
	PopularSearchesResponse, TrendingRequest, TrendingResponse,
};

use std::sync::Arc;

use time::OffsetDateTime;

use bazaar_config::Config;
use bazaar_domain::relevance::CodeMatch;
use bazaar_storage::ListingStore;

/// Source of the current instant for windowed aggregations.
pub trait Clock
where
	Self: Send + Sync,
{
	fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

pub struct BazaarService {
	pub cfg: Config,
	pub store: Arc<dyn ListingStore>,
	clock: Arc<dyn Clock>,
	code_match: CodeMatch,
}
impl BazaarService {
	pub fn new(cfg: Config, store: Arc<dyn ListingStore>) -> Self {
		Self::with_clock(cfg, store, Arc::new(SystemClock))
	}

	pub fn with_clock(cfg: Config, store: Arc<dyn ListingStore>, clock: Arc<dyn Clock>) -> Self {
		// Validated configs only carry known policies; anything else keeps the stricter default.
		let code_match = CodeMatch::parse(&cfg.search.code_match).unwrap_or_default();

		Self { cfg, store, clock, code_match }
	}

	pub fn code_match(&self) -> CodeMatch {
		self.code_match
	}

	pub(crate) fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}
}

/// Resolves an optional page size: absent takes `default`, zero stays zero, anything above `max`
/// is capped, and negatives are rejected.
pub(crate) fn resolve_limit(
	field: &str,
	requested: Option<i64>,
	default: u32,
	max: u32,
) -> Result<i64> {
	let limit = requested.unwrap_or(i64::from(default));

	if limit < 0 {
		return Err(Error::invalid_fields(&[field], format!("{field} must be zero or greater.")));
	}

	Ok(limit.min(i64::from(max)))
}
