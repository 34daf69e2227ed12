use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::{
	Error, Result,
	db::Db,
	models::{CategoryStats, Listing, ListingQuery, QueryCount, RelatedQuery},
};

const LISTING_COLUMNS: &str = "\
listing_id, user_id, title, description, price, category, course_code, community_id, status, \
view_count, images, created_at";

/// Postgres expression for a course code with case folded and non-word characters removed.
const NORMALIZED_CODE_SQL: &str =
	"regexp_replace(upper(coalesce(course_code, '')), '[^[:alnum:]_]', '', 'g')";

/// Builds a `LIKE` pattern that matches `fragment` anywhere, escaping wildcard characters.
pub fn like_contains(fragment: &str) -> String {
	let mut out = String::with_capacity(fragment.len() + 2);

	out.push('%');

	for ch in fragment.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}

pub async fn fetch_listings(db: &Db, query: &ListingQuery) -> Result<Vec<Listing>> {
	if query.limit <= 0 {
		return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
	}
	if query.offset < 0 {
		return Err(Error::InvalidArgument("offset must be zero or greater.".to_string()));
	}

	let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
		"SELECT {LISTING_COLUMNS} FROM listings WHERE status = 'active'"
	));

	if let Some(keyword) = &query.keyword {
		let pattern = like_contains(&keyword.text);

		builder.push(" AND (lower(title) LIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR lower(description) LIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR lower(coalesce(course_code, '')) LIKE ");
		builder.push_bind(pattern);

		if !keyword.code.is_empty() {
			builder.push(format!(" OR {NORMALIZED_CODE_SQL} LIKE "));
			builder.push_bind(like_contains(&keyword.code));
		}

		builder.push(")");
	}
	if let Some(category) = &query.category {
		builder.push(" AND category = ");
		builder.push_bind(category.clone());
	}
	if let Some(community_id) = query.community_id {
		builder.push(" AND community_id = ");
		builder.push_bind(community_id);
	}
	if let Some(min_price) = query.min_price {
		builder.push(" AND price >= ");
		builder.push_bind(min_price);
	}
	if let Some(max_price) = query.max_price {
		builder.push(" AND price <= ");
		builder.push_bind(max_price);
	}

	builder.push(format!(
		" ORDER BY {} {}, listing_id {}",
		query.sort.as_sql(),
		query.direction.as_sql(),
		query.direction.as_sql()
	));
	builder.push(" LIMIT ");
	builder.push_bind(query.limit);
	builder.push(" OFFSET ");
	builder.push_bind(query.offset);

	let listings = builder.build_query_as::<Listing>().fetch_all(&db.pool).await?;

	Ok(listings)
}

pub async fn get_listing(db: &Db, listing_id: i64) -> Result<Option<Listing>> {
	let listing = sqlx::query_as::<_, Listing>(&format!(
		"SELECT {LISTING_COLUMNS} FROM listings WHERE listing_id = $1"
	))
	.bind(listing_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(listing)
}

pub async fn increment_view_count(db: &Db, listing_id: i64) -> Result<()> {
	let result = sqlx::query(
		"\
UPDATE listings
SET view_count = view_count + 1
WHERE listing_id = $1",
	)
	.bind(listing_id)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("listing {listing_id}")));
	}

	Ok(())
}

pub async fn fetch_related_candidates(db: &Db, query: &RelatedQuery) -> Result<Vec<Listing>> {
	let listings = sqlx::query_as::<_, Listing>(&format!(
		"\
SELECT {LISTING_COLUMNS}
FROM listings
WHERE listing_id <> $1
	AND status = 'active'
	AND (
		(category = $2 AND price BETWEEN $3 AND $4)
		OR community_id = $5
		OR category = $2
	)
ORDER BY
	CASE
		WHEN category = $2 AND price BETWEEN $3 AND $4 THEN 3
		WHEN category = $2 THEN 2
		WHEN community_id = $5 THEN 1
		ELSE 0
	END DESC,
	view_count DESC,
	created_at DESC,
	listing_id DESC
LIMIT $6"
	))
	.bind(query.exclude_listing_id)
	.bind(query.category.as_str())
	.bind(query.price_low)
	.bind(query.price_high)
	.bind(query.community_id)
	.bind(query.limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(listings)
}

/// Distinct course codes of active listings whose normalized form contains `code_fragment`.
pub async fn distinct_course_codes(
	db: &Db,
	code_fragment: &str,
	limit: i64,
) -> Result<Vec<String>> {
	let codes = sqlx::query_scalar::<_, String>(&format!(
		"\
SELECT DISTINCT course_code
FROM listings
WHERE status = 'active'
	AND course_code IS NOT NULL
	AND {NORMALIZED_CODE_SQL} LIKE $1
ORDER BY course_code
LIMIT $2"
	))
	.bind(like_contains(code_fragment))
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(codes)
}

/// Distinct titles of active listings containing `fragment`, most viewed first.
pub async fn distinct_titles(db: &Db, fragment: &str, limit: i64) -> Result<Vec<String>> {
	let titles = sqlx::query_scalar::<_, String>(
		"\
SELECT title
FROM listings
WHERE status = 'active'
	AND lower(title) LIKE $1
GROUP BY title
ORDER BY max(view_count) DESC, title ASC
LIMIT $2",
	)
	.bind(like_contains(fragment))
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(titles)
}

pub async fn append_search_history(
	db: &Db,
	user_id: i64,
	query: &str,
	at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO search_history (user_id, query, created_at)
VALUES ($1, $2, $3)",
	)
	.bind(user_id)
	.bind(query)
	.bind(at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn popular_queries(
	db: &Db,
	since: OffsetDateTime,
	limit: i64,
) -> Result<Vec<QueryCount>> {
	let rows = sqlx::query_as::<_, QueryCount>(
		"\
SELECT lower(query) AS keyword, count(*) AS count
FROM search_history
WHERE created_at >= $1
GROUP BY lower(query)
ORDER BY count DESC, keyword ASC
LIMIT $2",
	)
	.bind(since)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn recent_queries(db: &Db, user_id: i64, limit: i64) -> Result<Vec<String>> {
	let queries = sqlx::query_scalar::<_, String>(
		"\
SELECT lower(query)
FROM search_history
WHERE user_id = $1
GROUP BY lower(query)
ORDER BY max(created_at) DESC, lower(query) ASC
LIMIT $2",
	)
	.bind(user_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(queries)
}

pub async fn trending_listings(
	db: &Db,
	since: OffsetDateTime,
	limit: i64,
) -> Result<Vec<Listing>> {
	let listings = sqlx::query_as::<_, Listing>(&format!(
		"\
SELECT {LISTING_COLUMNS}
FROM listings
WHERE status = 'active'
	AND created_at >= $1
ORDER BY view_count DESC, created_at DESC, listing_id DESC
LIMIT $2"
	))
	.bind(since)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(listings)
}

pub async fn category_stats(db: &Db) -> Result<Vec<CategoryStats>> {
	let rows = sqlx::query_as::<_, CategoryStats>(
		"\
SELECT
	category,
	count(*) AS count,
	avg(price) AS avg_price,
	min(price) AS min_price,
	max(price) AS max_price
FROM listings
WHERE status = 'active'
GROUP BY category
ORDER BY count DESC, category ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
