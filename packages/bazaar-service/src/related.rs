use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::{BazaarService, ListingItem, Result};
use bazaar_domain::normalize::tokenize;
use bazaar_storage::models::{Listing, RelatedQuery};

/// Same category with a price inside the band around the anchor price.
pub const TIER_CATEGORY_AND_PRICE: u8 = 3;
pub const TIER_CATEGORY: u8 = 2;
pub const TIER_COMMUNITY: u8 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedRequest {
	pub listing_id: i64,
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedItem {
	#[serde(flatten)]
	pub listing: ListingItem,
	pub tier: u8,
	/// Distinct anchor title tokens that also appear in this title.
	pub title_overlap: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedResponse {
	pub items: Vec<RelatedItem>,
}

struct Candidate {
	listing: Listing,
	tier: u8,
	title_overlap: u32,
}

impl BazaarService {
	/// Listings similar to an anchor, best tier first. An unknown anchor yields no items.
	pub async fn related(&self, req: RelatedRequest) -> Result<RelatedResponse> {
		let cfg = &self.cfg.related;
		let limit = crate::resolve_limit("limit", req.limit, cfg.default_limit, cfg.max_limit)?;

		if limit == 0 {
			return Ok(RelatedResponse { items: Vec::new() });
		}

		let Some(anchor) = self.store.get_listing(req.listing_id).await? else {
			tracing::debug!(listing_id = req.listing_id, "Related anchor not found.");

			return Ok(RelatedResponse { items: Vec::new() });
		};
		let query = RelatedQuery {
			exclude_listing_id: anchor.listing_id,
			category: anchor.category.clone(),
			community_id: anchor.community_id,
			price_low: anchor.price * cfg.price_band_low,
			price_high: anchor.price * cfg.price_band_high,
			limit: limit.saturating_mul(i64::from(cfg.over_fetch_factor)),
		};
		let anchor_tokens: HashSet<String> = tokenize(&anchor.title).into_iter().collect();
		let mut candidates: Vec<Candidate> = self
			.store
			.fetch_related_candidates(&query)
			.await?
			.into_iter()
			.filter(|listing| listing.listing_id != anchor.listing_id && listing.is_active())
			.filter_map(|listing| {
				let tier = tier_of(&listing, &query)?;
				let title_overlap = title_overlap(&anchor_tokens, &listing.title);

				Some(Candidate { listing, tier, title_overlap })
			})
			.collect();

		candidates.sort_by(compare_candidates);
		candidates.truncate(limit as usize);

		let items = candidates
			.into_iter()
			.map(|candidate| RelatedItem {
				listing: candidate.listing.into(),
				tier: candidate.tier,
				title_overlap: candidate.title_overlap,
			})
			.collect();

		Ok(RelatedResponse { items })
	}
}

/// Highest tier a candidate qualifies for, or `None` when it shares nothing with the anchor.
fn tier_of(listing: &Listing, query: &RelatedQuery) -> Option<u8> {
	let same_category = listing.category == query.category;

	if same_category && listing.price >= query.price_low && listing.price <= query.price_high {
		Some(TIER_CATEGORY_AND_PRICE)
	} else if same_category {
		Some(TIER_CATEGORY)
	} else if listing.community_id == query.community_id {
		Some(TIER_COMMUNITY)
	} else {
		None
	}
}

fn title_overlap(anchor_tokens: &HashSet<String>, title: &str) -> u32 {
	let tokens: HashSet<String> = tokenize(title).into_iter().collect();

	tokens.intersection(anchor_tokens).count() as u32
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
	b.tier
		.cmp(&a.tier)
		.then_with(|| b.title_overlap.cmp(&a.title_overlap))
		.then_with(|| b.listing.view_count.cmp(&a.listing.view_count))
		.then_with(|| b.listing.created_at.cmp(&a.listing.created_at))
		.then_with(|| b.listing.listing_id.cmp(&a.listing.listing_id))
}
