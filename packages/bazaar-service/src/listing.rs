use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{BazaarService, Error, Result};
use bazaar_storage::models::Listing;

/// Listing fields exposed by every discovery response.
#[derive(Debug, Clone, Serialize)]
pub struct ListingItem {
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
	pub images: Vec<String>,
	#[serde(with = "crate::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<Listing> for ListingItem {
	fn from(listing: Listing) -> Self {
		Self {
			listing_id: listing.listing_id,
			user_id: listing.user_id,
			title: listing.title,
			description: listing.description,
			price: listing.price,
			category: listing.category,
			course_code: listing.course_code,
			community_id: listing.community_id,
			status: listing.status,
			view_count: listing.view_count,
			images: listing.images.0,
			created_at: listing.created_at,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingDetailRequest {
	pub listing_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingDetailResponse {
	pub listing: ListingItem,
}

impl BazaarService {
	/// Returns one listing by identifier, whatever its status, and counts the view.
	///
	/// A failed view-count write is logged and otherwise ignored.
	pub async fn listing_detail(&self, req: ListingDetailRequest) -> Result<ListingDetailResponse> {
		let mut listing = self.store.get_listing(req.listing_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("Listing {} does not exist.", req.listing_id) }
		})?;

		match self.store.increment_view_count(listing.listing_id).await {
			Ok(()) => listing.view_count += 1,
			Err(err) => {
				tracing::warn!(
					listing_id = listing.listing_id,
					error = %err,
					"Failed to increment listing view count."
				);
			},
		}

		Ok(ListingDetailResponse { listing: listing.into() })
	}
}
