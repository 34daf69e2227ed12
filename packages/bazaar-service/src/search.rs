use serde::{Deserialize, Serialize};

use crate::{BazaarService, Error, ListingItem, Result};
use bazaar_domain::{
	normalize::{normalize, normalize_code, tokenize},
	relevance::{self, ListingText},
};
use bazaar_storage::models::{KeywordFilter, Listing, ListingQuery, SortColumn, SortDirection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
	#[default]
	Relevance,
	Price,
	Views,
	CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}
impl SortOrder {
	fn direction(self) -> SortDirection {
		match self {
			Self::Asc => SortDirection::Asc,
			Self::Desc => SortDirection::Desc,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
	pub min_price: Option<f64>,
	pub max_price: Option<f64>,
	pub category: Option<String>,
	pub community_id: Option<i64>,
	pub sort_by: SortBy,
	pub sort_order: SortOrder,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub filters: SearchFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchItem {
	#[serde(flatten)]
	pub listing: ListingItem,
	/// Present only when the page was re-ranked by relevance.
	pub relevance_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub items: Vec<SearchItem>,
}

impl BazaarService {
	/// Filters active listings, fetches one page from storage and, for a relevance sort with a
	/// non-empty query, stable-sorts that page by score.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let filters = &req.filters;

		validate_price("min_price", filters.min_price)?;
		validate_price("max_price", filters.max_price)?;

		if let (Some(min), Some(max)) = (filters.min_price, filters.max_price)
			&& min > max
		{
			return Err(Error::invalid_fields(
				&["min_price", "max_price"],
				"min_price must not exceed max_price.",
			));
		}

		let limit = match filters.limit {
			Some(limit) if limit <= 0 => {
				return Err(Error::invalid_fields(&["limit"], "limit must be greater than zero."));
			},
			Some(limit) => limit.min(i64::from(self.cfg.search.max_limit)),
			None => i64::from(self.cfg.search.default_limit),
		};
		let offset = match filters.offset {
			Some(offset) if offset < 0 => {
				return Err(Error::invalid_fields(&["offset"], "offset must be zero or greater."));
			},
			Some(offset) => offset,
			None => 0,
		};
		let normalized = normalize(&req.query);
		let tokens = tokenize(&normalized);
		let keyword = (!normalized.is_empty())
			.then(|| KeywordFilter { code: normalize_code(&normalized), text: normalized.clone() });
		let (sort, direction) = match filters.sort_by {
			SortBy::Relevance => (SortColumn::CreatedAt, SortDirection::Desc),
			SortBy::Price => (SortColumn::Price, filters.sort_order.direction()),
			SortBy::Views => (SortColumn::ViewCount, filters.sort_order.direction()),
			SortBy::CreatedAt => (SortColumn::CreatedAt, filters.sort_order.direction()),
		};
		let query = ListingQuery {
			keyword,
			category: filters
				.category
				.as_deref()
				.map(str::trim)
				.filter(|category| !category.is_empty())
				.map(str::to_string),
			community_id: filters.community_id,
			min_price: filters.min_price,
			max_price: filters.max_price,
			sort,
			direction,
			limit,
			offset,
		};
		let listings = self.store.fetch_listings(&query).await?;
		let scored = filters.sort_by == SortBy::Relevance && !tokens.is_empty();

		tracing::debug!(
			query = %normalized,
			category = ?query.category,
			community_id = ?query.community_id,
			sort_by = ?filters.sort_by,
			candidates = listings.len(),
			scored,
			"Search page fetched."
		);

		let mut items: Vec<SearchItem> = listings
			.into_iter()
			.map(|listing| {
				let relevance_score = scored.then(|| self.score_listing(&listing, &tokens));

				SearchItem { listing: listing.into(), relevance_score }
			})
			.collect();

		if scored {
			items.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
		}

		Ok(SearchResponse { items })
	}

	fn score_listing(&self, listing: &Listing, tokens: &[String]) -> u32 {
		let text = ListingText {
			title: &listing.title,
			description: &listing.description,
			category: &listing.category,
			course_code: listing.course_code.as_deref(),
		};

		relevance::score(&text, tokens, self.code_match())
	}
}

fn validate_price(field: &str, value: Option<f64>) -> Result<()> {
	match value {
		Some(value) if !value.is_finite() || value < 0.0 => {
			Err(Error::invalid_fields(
				&[field],
				format!("{field} must be a finite number zero or greater."),
			))
		},
		_ => Ok(()),
	}
}
