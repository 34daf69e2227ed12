use std::{future::Future, pin::Pin};

use time::OffsetDateTime;

use crate::{
	Result,
	db::Db,
	models::{CategoryStats, Listing, ListingQuery, QueryCount, RelatedQuery},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read/write contract the discovery engine needs from the marketplace store.
///
/// Every fetch only ever returns `active` listings, except [`ListingStore::get_listing`], which
/// looks a listing up by identifier regardless of status.
pub trait ListingStore
where
	Self: Send + Sync,
{
	fn fetch_listings<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<Vec<Listing>>>;

	fn get_listing(&self, listing_id: i64) -> BoxFuture<'_, Result<Option<Listing>>>;

	fn increment_view_count(&self, listing_id: i64) -> BoxFuture<'_, Result<()>>;

	fn fetch_related_candidates<'a>(
		&'a self,
		query: &'a RelatedQuery,
	) -> BoxFuture<'a, Result<Vec<Listing>>>;

	fn distinct_course_codes<'a>(
		&'a self,
		code_fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	fn distinct_titles<'a>(
		&'a self,
		fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	fn append_search_history<'a>(
		&'a self,
		user_id: i64,
		query: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>>;

	fn popular_queries(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<QueryCount>>>;

	fn recent_queries(&self, user_id: i64, limit: i64) -> BoxFuture<'_, Result<Vec<String>>>;

	fn trending_listings(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<Listing>>>;

	fn category_stats(&self) -> BoxFuture<'_, Result<Vec<CategoryStats>>>;
}

impl ListingStore for Db {
	fn fetch_listings<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<Vec<Listing>>> {
		Box::pin(queries::fetch_listings(self, query))
	}

	fn get_listing(&self, listing_id: i64) -> BoxFuture<'_, Result<Option<Listing>>> {
		Box::pin(queries::get_listing(self, listing_id))
	}

	fn increment_view_count(&self, listing_id: i64) -> BoxFuture<'_, Result<()>> {
		Box::pin(queries::increment_view_count(self, listing_id))
	}

	fn fetch_related_candidates<'a>(
		&'a self,
		query: &'a RelatedQuery,
	) -> BoxFuture<'a, Result<Vec<Listing>>> {
		Box::pin(queries::fetch_related_candidates(self, query))
	}

	fn distinct_course_codes<'a>(
		&'a self,
		code_fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(queries::distinct_course_codes(self, code_fragment, limit))
	}

	fn distinct_titles<'a>(
		&'a self,
		fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(queries::distinct_titles(self, fragment, limit))
	}

	fn append_search_history<'a>(
		&'a self,
		user_id: i64,
		query: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(queries::append_search_history(self, user_id, query, at))
	}

	fn popular_queries(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<QueryCount>>> {
		Box::pin(queries::popular_queries(self, since, limit))
	}

	fn recent_queries(&self, user_id: i64, limit: i64) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(queries::recent_queries(self, user_id, limit))
	}

	fn trending_listings(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<Listing>>> {
		Box::pin(queries::trending_listings(self, since, limit))
	}

	fn category_stats(&self) -> BoxFuture<'_, Result<Vec<CategoryStats>>> {
		Box::pin(queries::category_stats(self))
	}
}
