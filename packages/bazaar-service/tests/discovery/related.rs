use bazaar_service::{RelatedRequest, RelatedResponse};
use bazaar_testkit::ListingFixture;

fn ids(response: &RelatedResponse) -> Vec<i64> {
	response.items.iter().map(|item| item.listing.listing_id).collect()
}

fn request(listing_id: i64, limit: Option<i64>) -> RelatedRequest {
	RelatedRequest { listing_id, limit }
}

fn anchor() -> ListingFixture {
	ListingFixture::new(1, "Desk monitor").category("electronics").price(100.0).community(1)
}

#[tokio::test]
async fn price_band_candidate_ranks_above_category_only_candidate() {
	let store = super::store_with(vec![
		anchor(),
		ListingFixture::new(2, "Gadget")
			.category("electronics")
			.price(170.0)
			.community(2)
			.created_minutes_ago(10),
		ListingFixture::new(3, "Widget")
			.category("electronics")
			.price(140.0)
			.community(2)
			.created_minutes_ago(10),
	]);
	let service = super::service(&store);
	let response = service.related(request(1, Some(4))).await.expect("Related failed.");

	assert_eq!(ids(&response), vec![3, 2]);
	assert_eq!(response.items[0].tier, 3);
	assert_eq!(response.items[1].tier, 2);
}

#[tokio::test]
async fn never_returns_anchor_or_inactive_listings() {
	let store = super::store_with(vec![
		anchor(),
		ListingFixture::new(2, "Monitor stand").category("electronics").price(90.0),
		ListingFixture::new(3, "Desk monitor").category("electronics").price(100.0).status("sold"),
		ListingFixture::new(4, "Monitor arm").category("electronics").status("removed"),
		ListingFixture::new(5, "Kettle").category("kitchen").community(1),
	]);
	let service = super::service(&store);
	let response = service.related(request(1, Some(4))).await.expect("Related failed.");
	let found = ids(&response);

	assert_eq!(found, vec![2, 5]);
	assert!(!found.contains(&1));
}

#[tokio::test]
async fn tiers_order_before_overlap_and_popularity() {
	let store = super::store_with(vec![
		anchor(),
		ListingFixture::new(2, "Desk monitor riser").category("furniture").community(1).views(500),
		ListingFixture::new(3, "Cable").category("electronics").price(900.0).views(1),
		ListingFixture::new(4, "Speaker").category("electronics").price(80.0).views(3),
		ListingFixture::new(5, "Monitor").category("electronics").price(120.0),
		ListingFixture::new(6, "Unrelated").category("garden").community(9).views(1_000),
	]);
	let service = super::service(&store);
	let response = service.related(request(1, Some(10))).await.expect("Related failed.");

	// Tier 3 is [5, 4] (overlap beats views), then tier 2 [3], then community-only [2].
	assert_eq!(ids(&response), vec![5, 4, 3, 2]);
	assert_eq!(response.items[0].title_overlap, 1);
	assert_eq!(response.items[3].tier, 1);
}

#[tokio::test]
async fn limit_truncates_and_defaults() {
	let mut listings = vec![anchor()];

	listings.extend(
		(2..=9).map(|id| ListingFixture::new(id, "Cable").category("electronics").price(100.0)),
	);

	let store = super::store_with(listings);
	let service = super::service(&store);
	let two = service.related(request(1, Some(2))).await.expect("Related failed.");
	let default = service.related(request(1, None)).await.expect("Related failed.");
	let none = service.related(request(1, Some(0))).await.expect("Related failed.");

	assert_eq!(ids(&two), vec![2, 3]);
	assert_eq!(default.items.len(), 4);
	assert!(none.items.is_empty());
}

#[tokio::test]
async fn extreme_over_fetch_settings_still_rank() {
	let mut cfg = super::test_config();

	cfg.related.max_limit = u32::MAX;
	cfg.related.over_fetch_factor = u32::MAX;

	let store = super::store_with(vec![
		anchor(),
		ListingFixture::new(2, "Monitor").category("electronics").price(110.0),
		ListingFixture::new(3, "Kettle").category("kitchen").community(1),
	]);
	let service = super::service_with_config(cfg, &store);
	let response = service.related(request(1, Some(i64::MAX))).await.expect("Related failed.");

	assert_eq!(ids(&response), vec![2, 3]);
}

#[tokio::test]
async fn unknown_anchor_is_an_empty_result() {
	let store = super::store_with(vec![anchor()]);
	let service = super::service(&store);
	let response = service.related(request(404, None)).await.expect("Related failed.");

	assert!(response.items.is_empty());
}
