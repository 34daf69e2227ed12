use std::collections::HashSet;

use time::Duration;

use bazaar_domain::{fallback::POPULAR_SEARCH_SEEDS, normalize::normalize};
use bazaar_service::{Error, PopularSearch, PopularSearchesRequest, TrendingRequest};
use bazaar_testkit::{FIXTURE_NOW, ListingFixture};

fn popular(limit: Option<i64>) -> PopularSearchesRequest {
	PopularSearchesRequest { limit, window_days: None }
}

#[tokio::test]
async fn history_counts_lead_and_seeds_pad_without_duplicates() {
	let store = super::store_with(Vec::new());

	for query in ["calculator", "Calculator", "calculator", "desk lamp"] {
		store.put_history(1, query, FIXTURE_NOW - Duration::hours(2));
	}

	store.put_history(2, "ipad", FIXTURE_NOW - Duration::days(10));

	let service = super::service(&store);
	let response = service.popular_searches(popular(Some(5))).await.expect("Popular failed.");
	let keywords: Vec<&str> = response.items.iter().map(|item| item.keyword.as_str()).collect();

	assert_eq!(keywords, vec![
		"calculator",
		"desk lamp",
		"CS-UY 1134",
		"MA-UY 1024",
		"desk chair"
	]);
	assert_eq!(response.items[0].count, 3);
	assert_eq!(response.items[1].count, 1);
}

#[tokio::test]
async fn empty_history_still_fills_limit_from_seeds() {
	let store = super::store_with(Vec::new());
	let service = super::service(&store);
	let limit = POPULAR_SEARCH_SEEDS.len() as i64;
	let response = service.popular_searches(popular(Some(limit))).await.expect("Popular failed.");

	assert_eq!(response.items.len(), POPULAR_SEARCH_SEEDS.len());
}

#[tokio::test]
async fn keywords_are_unique_after_normalization() {
	let store = super::store_with(Vec::new());

	for query in ["python", "cs-uy 1134", "monitor", "Python"] {
		store.put_history(1, query, FIXTURE_NOW - Duration::minutes(30));
	}

	let service = super::service(&store);
	let response = service.popular_searches(popular(Some(10))).await.expect("Popular failed.");
	let normalized: HashSet<String> =
		response.items.iter().map(|item| normalize(&item.keyword)).collect();

	assert_eq!(response.items.len(), 10);
	assert_eq!(normalized.len(), 10);
	assert_eq!(response.items[0].keyword, "python");
	assert_eq!(response.items[0].count, 2);
}

#[tokio::test]
async fn non_positive_window_is_rejected() {
	let store = super::store_with(Vec::new());
	let service = super::service(&store);
	let popular = service
		.popular_searches(PopularSearchesRequest { limit: None, window_days: Some(0) })
		.await
		.expect_err("Expected a validation error.");
	let trending = service
		.trending_listings(TrendingRequest { limit: None, window_hours: Some(-3) })
		.await
		.expect_err("Expected a validation error.");

	assert!(matches!(popular, Error::InvalidRequest { .. }));
	assert!(matches!(trending, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn oversized_windows_are_capped_at_the_configured_maximum() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Fresh mug").views(3).created_minutes_ago(60),
		ListingFixture::new(2, "Older kettle").views(9).created_minutes_ago(60 * 24 * 29),
		ListingFixture::new(3, "Ancient sofa").views(90).created_minutes_ago(60 * 24 * 31),
	]);

	store.put_history(1, "calculator", FIXTURE_NOW - Duration::days(300));
	store.put_history(1, "typewriter", FIXTURE_NOW - Duration::days(400));

	let service = super::service(&store);
	let trending = service
		.trending_listings(TrendingRequest { limit: Some(5), window_hours: Some(i64::MAX / 2) })
		.await
		.expect("Trending failed.");
	let popular = service
		.popular_searches(PopularSearchesRequest { limit: Some(1), window_days: Some(10_000_000) })
		.await
		.expect("Popular failed.");
	let ids: Vec<i64> = trending.items.iter().map(|item| item.listing_id).collect();

	// Defaults cap trending at 30 days and popular searches at 365 days.
	assert_eq!(ids, vec![2, 1]);
	assert_eq!(popular.items, vec![PopularSearch { keyword: "calculator".to_string(), count: 1 }]);
}

#[tokio::test]
async fn window_reaching_before_supported_dates_is_rejected() {
	let mut cfg = super::test_config();

	cfg.trending.max_popular_window_days = u32::MAX;

	let store = super::store_with(Vec::new());
	let service = super::service_with_config(cfg, &store);
	let err = service
		.popular_searches(PopularSearchesRequest { limit: Some(3), window_days: Some(i64::MAX) })
		.await
		.expect_err("Expected a validation error.");

	match err {
		Error::InvalidRequest { fields, .. } => assert_eq!(fields, vec!["window_days"]),
		other => panic!("Expected an invalid request, got {other:?}."),
	}
}

#[tokio::test]
async fn trending_keeps_window_and_active_listings_by_views() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Fresh mug").views(3).created_minutes_ago(60),
		ListingFixture::new(2, "Popular kettle").views(40).created_minutes_ago(600),
		ListingFixture::new(3, "Old sofa").views(900).created_minutes_ago(60 * 30),
		ListingFixture::new(4, "Sold lamp").views(100).status("sold"),
		ListingFixture::new(5, "Quiet fan").views(3).created_minutes_ago(120),
	]);
	let service = super::service(&store);
	let response = service
		.trending_listings(TrendingRequest::default())
		.await
		.expect("Trending failed.");
	let ids: Vec<i64> = response.items.iter().map(|item| item.listing_id).collect();

	// Views tie between 1 and 5; the newer listing wins.
	assert_eq!(ids, vec![2, 1, 5]);
}

#[tokio::test]
async fn category_stats_cover_active_listings_only() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Mug").category("kitchen").price(4.0),
		ListingFixture::new(2, "Kettle").category("kitchen").price(20.0),
		ListingFixture::new(3, "Pan").category("kitchen").price(12.0),
		ListingFixture::new(4, "Lamp").category("lighting").price(15.0),
		ListingFixture::new(5, "Toaster").category("kitchen").price(500.0).status("sold"),
	]);
	let service = super::service(&store);
	let response = service.category_stats().await.expect("Category stats failed.");

	assert_eq!(response.total_active_listings, 4);
	assert_eq!(response.categories.len(), 2);

	let kitchen = &response.categories[0];

	assert_eq!(kitchen.category, "kitchen");
	assert_eq!(kitchen.count, 3);
	assert_eq!(kitchen.min_price, 4.0);
	assert_eq!(kitchen.max_price, 20.0);
	assert!((kitchen.avg_price - 12.0).abs() < 1e-9);
	assert_eq!(response.categories[1].category, "lighting");
}
