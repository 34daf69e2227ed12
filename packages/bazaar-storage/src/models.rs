use sqlx::types::Json;
use time::OffsetDateTime;

pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Listing {
	pub listing_id: i64,
	pub user_id: i64,
	pub title: String,
	pub description: String,
	pub price: f64,
	pub category: String,
	pub course_code: Option<String>,
	pub community_id: i64,
	pub status: String,
	pub view_count: i64,
	/// Decoded strictly: anything other than a JSON array of strings is a decode error.
	pub images: Json<Vec<String>>,
	pub created_at: OffsetDateTime,
}
impl Listing {
	pub fn is_active(&self) -> bool {
		self.status == STATUS_ACTIVE
	}
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QueryCount {
	pub keyword: String,
	pub count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryStats {
	pub category: String,
	pub count: i64,
	pub avg_price: f64,
	pub min_price: f64,
	pub max_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
	Price,
	ViewCount,
	CreatedAt,
}
impl SortColumn {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Price => "price",
			Self::ViewCount => "view_count",
			Self::CreatedAt => "created_at",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}
impl SortDirection {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

/// Case-insensitive containment filter. Both fragments are already normalized by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFilter {
	/// Matched against lowercased title, description and course code.
	pub text: String,
	/// Matched against the course code with punctuation and spacing removed. May be empty.
	pub code: String,
}

/// Active-listing fetch with filters pushed down to storage.
#[derive(Debug, Clone)]
pub struct ListingQuery {
	pub keyword: Option<KeywordFilter>,
	pub category: Option<String>,
	pub community_id: Option<i64>,
	pub min_price: Option<f64>,
	pub max_price: Option<f64>,
	pub sort: SortColumn,
	pub direction: SortDirection,
	pub limit: i64,
	pub offset: i64,
}

/// Candidate pool for related items: any active listing other than the anchor that shares the
/// category, the community, or the category within the price band.
#[derive(Debug, Clone)]
pub struct RelatedQuery {
	pub exclude_listing_id: i64,
	pub category: String,
	pub community_id: i64,
	pub price_low: f64,
	pub price_high: f64,
	pub limit: i64,
}
