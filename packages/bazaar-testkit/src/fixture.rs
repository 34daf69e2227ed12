use sqlx::{PgPool, types::Json};
use time::{Duration, OffsetDateTime, macros::datetime};

use bazaar_storage::models::{Listing, STATUS_ACTIVE};

use crate::Result;

/// Reference instant for fixtures; `created_minutes_ago` counts back from here.
pub const FIXTURE_NOW: OffsetDateTime = datetime!(2026-03-02 12:00 UTC);

/// Builder for listing rows with neutral defaults, so tests only spell out the fields they rank on.
#[derive(Debug, Clone)]
pub struct ListingFixture {
	listing: Listing,
}
impl ListingFixture {
	pub fn new(listing_id: i64, title: &str) -> Self {
		Self {
			listing: Listing {
				listing_id,
				user_id: 1,
				title: title.to_string(),
				description: String::new(),
				price: 10.0,
				category: "misc".to_string(),
				course_code: None,
				community_id: 1,
				status: STATUS_ACTIVE.to_string(),
				view_count: 0,
				images: Json(Vec::new()),
				created_at: FIXTURE_NOW - Duration::minutes(listing_id),
			},
		}
	}

	pub fn description(mut self, description: &str) -> Self {
		self.listing.description = description.to_string();

		self
	}

	pub fn price(mut self, price: f64) -> Self {
		self.listing.price = price;

		self
	}

	pub fn category(mut self, category: &str) -> Self {
		self.listing.category = category.to_string();

		self
	}

	pub fn course_code(mut self, course_code: &str) -> Self {
		self.listing.course_code = Some(course_code.to_string());

		self
	}

	pub fn community(mut self, community_id: i64) -> Self {
		self.listing.community_id = community_id;

		self
	}

	pub fn status(mut self, status: &str) -> Self {
		self.listing.status = status.to_string();

		self
	}

	pub fn views(mut self, view_count: i64) -> Self {
		self.listing.view_count = view_count;

		self
	}

	pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.listing.created_at = created_at;

		self
	}

	pub fn created_minutes_ago(self, minutes: i64) -> Self {
		self.created_at(FIXTURE_NOW - Duration::minutes(minutes))
	}

	pub fn images(mut self, images: &[&str]) -> Self {
		self.listing.images = Json(images.iter().map(|image| image.to_string()).collect());

		self
	}

	pub fn build(self) -> Listing {
		self.listing
	}
}
impl From<ListingFixture> for Listing {
	fn from(fixture: ListingFixture) -> Self {
		fixture.build()
	}
}

/// Writes a listing row with its identifier as given, for Postgres-backed tests.
pub async fn insert_listing(pool: &PgPool, listing: &Listing) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO listings (
	listing_id,
	user_id,
	title,
	description,
	price,
	category,
	course_code,
	community_id,
	status,
	view_count,
	images,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$12)",
	)
	.bind(listing.listing_id)
	.bind(listing.user_id)
	.bind(listing.title.as_str())
	.bind(listing.description.as_str())
	.bind(listing.price)
	.bind(listing.category.as_str())
	.bind(listing.course_code.as_deref())
	.bind(listing.community_id)
	.bind(listing.status.as_str())
	.bind(listing.view_count)
	.bind(&listing.images)
	.bind(listing.created_at)
	.execute(pool)
	.await?;

	Ok(())
}
