use bazaar_service::{Error, SearchFilters, SearchRequest, SearchResponse, SortBy, SortOrder};
use bazaar_testkit::ListingFixture;

fn ids(response: &SearchResponse) -> Vec<i64> {
	response.items.iter().map(|item| item.listing.listing_id).collect()
}

fn query(text: &str) -> SearchRequest {
	SearchRequest { query: text.to_string(), filters: SearchFilters::default() }
}

#[tokio::test]
async fn title_match_outranks_description_only_match() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Chemistry Notes").description("Typed up in python notebooks"),
		ListingFixture::new(2, "Python Textbook"),
	]);
	let service = super::service(&store);
	let response = service.search(query("python")).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![2, 1]);
	assert_eq!(response.items[0].relevance_score, Some(10));
	assert_eq!(response.items[1].relevance_score, Some(3));
}

#[tokio::test]
async fn course_code_bonus_dominates_description_matches() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Used textbook")
			.description("Great for CS-UY 1134 students")
			.category("books"),
		ListingFixture::new(2, "Algorithms book").course_code("CS-UY 1134").category("books"),
	]);
	let service = super::service(&store);
	let response = service.search(query("CS-UY 1134")).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![2, 1]);
	assert_eq!(response.items[0].relevance_score, Some(20));
	assert_eq!(response.items[1].relevance_score, Some(9));
}

#[tokio::test]
async fn compact_code_query_finds_punctuated_code() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Algorithms book").course_code("CS-UY 1134"),
		ListingFixture::new(2, "Desk lamp"),
	]);
	let service = super::service(&store);
	let response = service.search(query("csuy1134")).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![1]);
	assert_eq!(response.items[0].relevance_score, Some(20));
}

#[tokio::test]
async fn empty_query_browses_by_recency_without_scoring() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Oldest").created_minutes_ago(300),
		ListingFixture::new(2, "Newest").created_minutes_ago(5),
		ListingFixture::new(3, "Middle").created_minutes_ago(60).views(100),
	]);
	let service = super::service(&store);

	for text in ["", "   ", "???"] {
		let response = service.search(query(text)).await.expect("Search failed.");

		assert_eq!(ids(&response), vec![2, 3, 1], "query {text:?}");
		assert!(response.items.iter().all(|item| item.relevance_score.is_none()));
	}
}

#[tokio::test]
async fn explicit_sort_skips_scoring() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Lamp").price(30.0),
		ListingFixture::new(2, "Lamp lamp").price(10.0),
		ListingFixture::new(3, "Lamp shade").price(20.0),
	]);
	let service = super::service(&store);
	let mut request = query("lamp");

	request.filters.sort_by = SortBy::Price;
	request.filters.sort_order = SortOrder::Asc;

	let response = service.search(request).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![2, 3, 1]);
	assert!(response.items.iter().all(|item| item.relevance_score.is_none()));
}

#[tokio::test]
async fn filters_apply_and_inactive_listings_are_hidden() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Desk chair").category("furniture").community(7).price(40.0),
		ListingFixture::new(2, "Desk").category("furniture").community(7).price(90.0),
		ListingFixture::new(3, "Desk lamp").category("lighting").community(7).price(15.0),
		ListingFixture::new(4, "Desk shelf").category("furniture").community(8).price(30.0),
		ListingFixture::new(5, "Desk stool").category("furniture").community(7).status("sold"),
	]);
	let service = super::service(&store);
	let request = SearchRequest {
		query: "desk".to_string(),
		filters: SearchFilters {
			category: Some("furniture".to_string()),
			community_id: Some(7),
			max_price: Some(50.0),
			..Default::default()
		},
	};
	let response = service.search(request).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![1]);
}

#[tokio::test]
async fn pagination_happens_before_reranking() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Calculator case"),
		ListingFixture::new(2, "Graphing calculator"),
		ListingFixture::new(3, "Calculator"),
		ListingFixture::new(4, "Calculators and rulers"),
	]);
	let service = super::service(&store);
	let mut request = query("calculator");

	request.filters.limit = Some(2);
	request.filters.offset = Some(2);

	let response = service.search(request).await.expect("Search failed.");

	// Recency window is [1, 2, 3, 4]; the second page holds 3 and 4 only.
	assert_eq!(ids(&response), vec![3, 4]);
	assert_eq!(response.items[0].relevance_score, Some(10));
	assert_eq!(response.items[1].relevance_score, Some(5));
}

#[tokio::test]
async fn limit_above_maximum_is_capped() {
	let store = super::store_with((1..=5).map(|id| ListingFixture::new(id, "Mug")).collect());
	let mut cfg = super::test_config();

	cfg.search.max_limit = 3;

	let service = super::service_with_config(cfg, &store);
	let mut request = query("");

	request.filters.limit = Some(1_000);

	let response = service.search(request).await.expect("Search failed.");

	assert_eq!(response.items.len(), 3);
}

#[tokio::test]
async fn invalid_filters_are_rejected_before_storage() {
	let store = super::store_with(vec![ListingFixture::new(1, "Mug")]);
	let service = super::service(&store);
	let cases = [
		SearchFilters { min_price: Some(50.0), max_price: Some(10.0), ..Default::default() },
		SearchFilters { min_price: Some(-1.0), ..Default::default() },
		SearchFilters { max_price: Some(f64::NAN), ..Default::default() },
		SearchFilters { limit: Some(0), ..Default::default() },
		SearchFilters { limit: Some(-5), ..Default::default() },
		SearchFilters { offset: Some(-1), ..Default::default() },
	];

	for filters in cases {
		let request = SearchRequest { query: "mug".to_string(), filters: filters.clone() };
		let err = service.search(request).await.expect_err("Expected a validation error.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "filters {filters:?}: {err}");
	}

	assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn no_matches_is_an_empty_page() {
	let store = super::store_with(vec![ListingFixture::new(1, "Mug")]);
	let service = super::service(&store);
	let response = service.search(query("microwave")).await.expect("Search failed.");

	assert!(response.items.is_empty());
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
	let store = super::store_with(vec![ListingFixture::new(1, "Mug")]);
	let service = super::service(&store);

	store.fail_with("connection reset");

	let err = service.search(query("mug")).await.expect_err("Expected a storage error.");

	match err {
		Error::Storage { message } => assert!(message.contains("connection reset"), "{message}"),
		other => panic!("Unexpected error: {other}"),
	}
}

#[tokio::test]
async fn containment_policy_matches_embedded_numbers() {
	let store = super::store_with(vec![
		ListingFixture::new(1, "Lab kit").course_code("MA-UY 1124"),
		ListingFixture::new(2, "Notebook").description("section 124 notes"),
	]);
	let mut cfg = super::test_config();

	cfg.search.code_match = "containment".to_string();

	let containment = super::service_with_config(cfg, &store);
	let prefix = super::service(&store);
	let loose = containment.search(query("124")).await.expect("Search failed.");
	let strict = prefix.search(query("124")).await.expect("Search failed.");

	assert_eq!(ids(&loose), vec![1, 2]);
	assert_eq!(loose.items[0].relevance_score, Some(20));
	let strict_scores: Vec<Option<u32>> =
		strict.items.iter().map(|item| item.relevance_score).collect();

	assert_eq!(ids(&strict), vec![2, 1]);
	assert_eq!(strict_scores, vec![Some(3), Some(0)]);
}
