use std::{
	collections::{BTreeMap, HashMap},
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering as AtomicOrdering},
	},
};

use time::OffsetDateTime;

use bazaar_domain::normalize::normalize_code;
use bazaar_storage::{
	BoxFuture, Error, ListingStore, Result,
	models::{
		CategoryStats, Listing, ListingQuery, QueryCount, RelatedQuery, SortColumn, SortDirection,
	},
};

#[derive(Debug, Clone)]
struct HistoryRow {
	user_id: i64,
	query: String,
	created_at: OffsetDateTime,
}

/// In-process [`ListingStore`] that mirrors the Postgres queries row for row.
///
/// Every trait call is counted, and a failure can be armed to exercise error propagation.
#[derive(Default)]
pub struct MemoryStore {
	listings: Mutex<Vec<Listing>>,
	history: Mutex<Vec<HistoryRow>>,
	calls: AtomicUsize,
	failure: Mutex<Option<String>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_listings<I, L>(listings: I) -> Self
	where
		I: IntoIterator<Item = L>,
		L: Into<Listing>,
	{
		let store = Self::new();

		for listing in listings {
			store.put_listing(listing);
		}

		store
	}

	pub fn put_listing(&self, listing: impl Into<Listing>) {
		let listing = listing.into();
		let mut listings = lock(&self.listings);

		listings.retain(|existing| existing.listing_id != listing.listing_id);
		listings.push(listing);
	}

	pub fn put_history(&self, user_id: i64, query: &str, created_at: OffsetDateTime) {
		lock(&self.history).push(HistoryRow { user_id, query: query.to_string(), created_at });
	}

	pub fn history_len(&self) -> usize {
		lock(&self.history).len()
	}

	pub fn view_count(&self, listing_id: i64) -> Option<i64> {
		lock(&self.listings)
			.iter()
			.find(|listing| listing.listing_id == listing_id)
			.map(|listing| listing.view_count)
	}

	/// Number of trait calls served so far, failed ones included.
	pub fn calls(&self) -> usize {
		self.calls.load(AtomicOrdering::SeqCst)
	}

	/// Makes every following trait call fail with a protocol error carrying `message`.
	pub fn fail_with(&self, message: &str) {
		*lock(&self.failure) = Some(message.to_string());
	}

	fn enter(&self) -> Result<()> {
		self.calls.fetch_add(1, AtomicOrdering::SeqCst);

		match lock(&self.failure).as_ref() {
			Some(message) => Err(Error::Sqlx(sqlx::Error::Protocol(message.clone()))),
			None => Ok(()),
		}
	}

	fn active(&self) -> Vec<Listing> {
		lock(&self.listings).iter().filter(|listing| listing.is_active()).cloned().collect()
	}

	fn fetch_listings_now(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
		self.enter()?;

		if query.limit <= 0 {
			return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
		}
		if query.offset < 0 {
			return Err(Error::InvalidArgument("offset must be zero or greater.".to_string()));
		}

		let mut rows: Vec<Listing> = self
			.active()
			.into_iter()
			.filter(|listing| {
				query.keyword.as_ref().is_none_or(|keyword| {
					let code = listing.course_code.as_deref().unwrap_or("");

					listing.title.to_lowercase().contains(&keyword.text)
						|| listing.description.to_lowercase().contains(&keyword.text)
						|| code.to_lowercase().contains(&keyword.text)
						|| (!keyword.code.is_empty() && normalize_code(code).contains(&keyword.code))
				})
			})
			.filter(|listing| query.category.as_ref().is_none_or(|c| &listing.category == c))
			.filter(|listing| query.community_id.is_none_or(|c| listing.community_id == c))
			.filter(|listing| query.min_price.is_none_or(|min| listing.price >= min))
			.filter(|listing| query.max_price.is_none_or(|max| listing.price <= max))
			.collect();

		rows.sort_by(|a, b| {
			let ordering = match query.sort {
				SortColumn::Price => a.price.total_cmp(&b.price),
				SortColumn::ViewCount => a.view_count.cmp(&b.view_count),
				SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
			}
			.then_with(|| a.listing_id.cmp(&b.listing_id));

			match query.direction {
				SortDirection::Asc => ordering,
				SortDirection::Desc => ordering.reverse(),
			}
		});

		Ok(rows.into_iter().skip(query.offset as usize).take(query.limit as usize).collect())
	}

	fn related_now(&self, query: &RelatedQuery) -> Result<Vec<Listing>> {
		self.enter()?;

		let tier = |listing: &Listing| {
			let same_category = listing.category == query.category;

			if same_category && listing.price >= query.price_low && listing.price <= query.price_high
			{
				3
			} else if same_category {
				2
			} else if listing.community_id == query.community_id {
				1
			} else {
				0
			}
		};
		let mut rows: Vec<(i32, Listing)> = self
			.active()
			.into_iter()
			.filter(|listing| listing.listing_id != query.exclude_listing_id)
			.map(|listing| (tier(&listing), listing))
			.filter(|(tier, _)| *tier > 0)
			.collect();

		rows.sort_by(|(tier_a, a), (tier_b, b)| {
			tier_b
				.cmp(tier_a)
				.then_with(|| b.view_count.cmp(&a.view_count))
				.then_with(|| b.created_at.cmp(&a.created_at))
				.then_with(|| b.listing_id.cmp(&a.listing_id))
		});

		Ok(rows.into_iter().take(query.limit.max(0) as usize).map(|(_, listing)| listing).collect())
	}

	fn distinct_course_codes_now(&self, code_fragment: &str, limit: i64) -> Result<Vec<String>> {
		self.enter()?;

		let mut codes: Vec<String> = self
			.active()
			.into_iter()
			.filter_map(|listing| listing.course_code)
			.filter(|code| normalize_code(code).contains(code_fragment))
			.collect();

		codes.sort();
		codes.dedup();
		codes.truncate(limit.max(0) as usize);

		Ok(codes)
	}

	fn distinct_titles_now(&self, fragment: &str, limit: i64) -> Result<Vec<String>> {
		self.enter()?;

		let mut max_views: HashMap<String, i64> = HashMap::new();

		for listing in self.active() {
			if !listing.title.to_lowercase().contains(fragment) {
				continue;
			}

			let views = max_views.entry(listing.title).or_insert(listing.view_count);

			*views = (*views).max(listing.view_count);
		}

		let mut titles: Vec<(String, i64)> = max_views.into_iter().collect();

		titles.sort_by(|(title_a, views_a), (title_b, views_b)| {
			views_b.cmp(views_a).then_with(|| title_a.cmp(title_b))
		});
		titles.truncate(limit.max(0) as usize);

		Ok(titles.into_iter().map(|(title, _)| title).collect())
	}

	fn popular_queries_now(&self, since: OffsetDateTime, limit: i64) -> Result<Vec<QueryCount>> {
		self.enter()?;

		let mut counts: BTreeMap<String, i64> = BTreeMap::new();

		for row in lock(&self.history).iter().filter(|row| row.created_at >= since) {
			*counts.entry(row.query.to_lowercase()).or_insert(0) += 1;
		}

		let mut rows: Vec<QueryCount> =
			counts.into_iter().map(|(keyword, count)| QueryCount { keyword, count }).collect();

		rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
		rows.truncate(limit.max(0) as usize);

		Ok(rows)
	}

	fn recent_queries_now(&self, user_id: i64, limit: i64) -> Result<Vec<String>> {
		self.enter()?;

		let mut latest: HashMap<String, OffsetDateTime> = HashMap::new();

		for row in lock(&self.history).iter().filter(|row| row.user_id == user_id) {
			let at = latest.entry(row.query.to_lowercase()).or_insert(row.created_at);

			*at = (*at).max(row.created_at);
		}

		let mut rows: Vec<(String, OffsetDateTime)> = latest.into_iter().collect();

		rows.sort_by(|(query_a, at_a), (query_b, at_b)| {
			at_b.cmp(at_a).then_with(|| query_a.cmp(query_b))
		});
		rows.truncate(limit.max(0) as usize);

		Ok(rows.into_iter().map(|(query, _)| query).collect())
	}

	fn trending_now(&self, since: OffsetDateTime, limit: i64) -> Result<Vec<Listing>> {
		self.enter()?;

		let mut rows: Vec<Listing> =
			self.active().into_iter().filter(|listing| listing.created_at >= since).collect();

		rows.sort_by(|a, b| {
			b.view_count
				.cmp(&a.view_count)
				.then_with(|| b.created_at.cmp(&a.created_at))
				.then_with(|| b.listing_id.cmp(&a.listing_id))
		});
		rows.truncate(limit.max(0) as usize);

		Ok(rows)
	}

	fn category_stats_now(&self) -> Result<Vec<CategoryStats>> {
		self.enter()?;

		let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();

		for listing in self.active() {
			groups.entry(listing.category).or_default().push(listing.price);
		}

		let mut rows: Vec<CategoryStats> = groups
			.into_iter()
			.map(|(category, prices)| {
				let count = prices.len() as i64;
				let sum: f64 = prices.iter().sum();

				CategoryStats {
					category,
					count,
					avg_price: sum / count as f64,
					min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
					max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
				}
			})
			.collect();

		rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

		Ok(rows)
	}
}
impl ListingStore for MemoryStore {
	fn fetch_listings<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<Vec<Listing>>> {
		let result = self.fetch_listings_now(query);

		Box::pin(async move { result })
	}

	fn get_listing(&self, listing_id: i64) -> BoxFuture<'_, Result<Option<Listing>>> {
		let result = self.enter().map(|()| {
			lock(&self.listings).iter().find(|listing| listing.listing_id == listing_id).cloned()
		});

		Box::pin(async move { result })
	}

	fn increment_view_count(&self, listing_id: i64) -> BoxFuture<'_, Result<()>> {
		let result = self.enter().and_then(|()| {
			let mut listings = lock(&self.listings);

			match listings.iter_mut().find(|listing| listing.listing_id == listing_id) {
				Some(listing) => {
					listing.view_count += 1;

					Ok(())
				},
				None => Err(Error::NotFound(format!("listing {listing_id}"))),
			}
		});

		Box::pin(async move { result })
	}

	fn fetch_related_candidates<'a>(
		&'a self,
		query: &'a RelatedQuery,
	) -> BoxFuture<'a, Result<Vec<Listing>>> {
		let result = self.related_now(query);

		Box::pin(async move { result })
	}

	fn distinct_course_codes<'a>(
		&'a self,
		code_fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let result = self.distinct_course_codes_now(code_fragment, limit);

		Box::pin(async move { result })
	}

	fn distinct_titles<'a>(
		&'a self,
		fragment: &'a str,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let result = self.distinct_titles_now(fragment, limit);

		Box::pin(async move { result })
	}

	fn append_search_history<'a>(
		&'a self,
		user_id: i64,
		query: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>> {
		let result = self.enter().map(|()| self.put_history(user_id, query, at));

		Box::pin(async move { result })
	}

	fn popular_queries(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<QueryCount>>> {
		let result = self.popular_queries_now(since, limit);

		Box::pin(async move { result })
	}

	fn recent_queries(&self, user_id: i64, limit: i64) -> BoxFuture<'_, Result<Vec<String>>> {
		let result = self.recent_queries_now(user_id, limit);

		Box::pin(async move { result })
	}

	fn trending_listings(
		&self,
		since: OffsetDateTime,
		limit: i64,
	) -> BoxFuture<'_, Result<Vec<Listing>>> {
		let result = self.trending_now(since, limit);

		Box::pin(async move { result })
	}

	fn category_stats(&self) -> BoxFuture<'_, Result<Vec<CategoryStats>>> {
		let result = self.category_stats_now();

		Box::pin(async move { result })
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
