use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{BazaarService, Error, ListingItem, Result};
use bazaar_domain::fallback::{self, KeywordCount};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopularSearchesRequest {
	pub limit: Option<i64>,
	pub window_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularSearch {
	pub keyword: String,
	pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopularSearchesResponse {
	pub items: Vec<PopularSearch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendingRequest {
	pub limit: Option<i64>,
	pub window_hours: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
	pub items: Vec<ListingItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatsItem {
	pub category: String,
	pub count: i64,
	pub avg_price: f64,
	pub min_price: f64,
	pub max_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatsResponse {
	pub categories: Vec<CategoryStatsItem>,
	pub total_active_listings: i64,
}

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

impl BazaarService {
	/// Most searched keywords in the trailing window, padded from the seed list.
	pub async fn popular_searches(
		&self,
		req: PopularSearchesRequest,
	) -> Result<PopularSearchesResponse> {
		let cfg = &self.cfg.trending;
		let limit = crate::resolve_limit("limit", req.limit, cfg.default_limit, cfg.max_limit)?;
		let window_days = resolve_window(
			"window_days",
			req.window_days,
			cfg.popular_window_days,
			cfg.max_popular_window_days,
		)?;

		if limit == 0 {
			return Ok(PopularSearchesResponse { items: Vec::new() });
		}

		let since = window_start(self.now(), "window_days", window_days, SECONDS_PER_DAY)?;
		let observed: Vec<KeywordCount> = self
			.store
			.popular_queries(since, limit)
			.await?
			.into_iter()
			.map(|row| KeywordCount { keyword: row.keyword, count: row.count })
			.collect();
		let observed_len = observed.len();
		let items: Vec<PopularSearch> =
			fallback::pad_with_seeds(observed, fallback::POPULAR_SEARCH_SEEDS, limit as usize)
				.into_iter()
				.map(|entry| PopularSearch { keyword: entry.keyword, count: entry.count })
				.collect();

		tracing::debug!(
			window_days,
			observed = observed_len,
			padded = items.len().saturating_sub(observed_len),
			"Popular searches aggregated."
		);

		Ok(PopularSearchesResponse { items })
	}

	/// Active listings created inside the trailing window, most viewed first.
	pub async fn trending_listings(&self, req: TrendingRequest) -> Result<TrendingResponse> {
		let cfg = &self.cfg.trending;
		let limit = crate::resolve_limit("limit", req.limit, cfg.default_limit, cfg.max_limit)?;
		let window_hours = resolve_window(
			"window_hours",
			req.window_hours,
			cfg.trending_window_hours,
			cfg.max_trending_window_hours,
		)?;

		if limit == 0 {
			return Ok(TrendingResponse { items: Vec::new() });
		}

		let since = window_start(self.now(), "window_hours", window_hours, SECONDS_PER_HOUR)?;
		let listings = self.store.trending_listings(since, limit).await?;

		Ok(TrendingResponse { items: listings.into_iter().map(ListingItem::from).collect() })
	}

	pub async fn category_stats(&self) -> Result<CategoryStatsResponse> {
		let rows = self.store.category_stats().await?;
		let total_active_listings = rows.iter().map(|row| row.count).sum();
		let categories = rows
			.into_iter()
			.map(|row| CategoryStatsItem {
				category: row.category,
				count: row.count,
				avg_price: row.avg_price,
				min_price: row.min_price,
				max_price: row.max_price,
			})
			.collect();

		Ok(CategoryStatsResponse { categories, total_active_listings })
	}
}

/// Absent takes `default`, anything above `max` is capped, and non-positive windows are rejected.
fn resolve_window(field: &str, requested: Option<i64>, default: u32, max: u32) -> Result<i64> {
	let window = requested.unwrap_or(i64::from(default));

	if window <= 0 {
		return Err(Error::invalid_fields(&[field], format!("{field} must be greater than zero.")));
	}

	Ok(window.min(i64::from(max)))
}

fn window_start(
	now: OffsetDateTime,
	field: &str,
	window: i64,
	unit_seconds: i64,
) -> Result<OffsetDateTime> {
	window
		.checked_mul(unit_seconds)
		.map(Duration::seconds)
		.and_then(|span| now.checked_sub(span))
		.ok_or_else(|| {
			Error::invalid_fields(
				&[field],
				format!("{field} reaches before the earliest supported date."),
			)
		})
}
