use time::Duration;

use bazaar_service::{RecordSearchRequest, SearchHistoryRequest};
use bazaar_testkit::FIXTURE_NOW;

#[tokio::test]
async fn short_queries_are_skipped() {
	let store = super::store_with(Vec::new());
	let service = super::service(&store);

	for query in ["", " a ", "??"] {
		let response = service
			.record_search(RecordSearchRequest { user_id: 1, query: query.to_string() })
			.await
			.expect("Record failed.");

		assert!(!response.recorded, "query {query:?}");
	}

	assert_eq!(store.history_len(), 0);
}

#[tokio::test]
async fn recorded_queries_are_normalized() {
	let store = super::store_with(Vec::new());
	let service = super::service(&store);
	let response = service
		.record_search(RecordSearchRequest { user_id: 7, query: "  Desk   LAMP!! ".to_string() })
		.await
		.expect("Record failed.");
	let history = service
		.search_history(SearchHistoryRequest { user_id: 7, limit: None })
		.await
		.expect("History failed.");

	assert!(response.recorded);
	assert_eq!(history.queries, vec!["desk lamp".to_string()]);
}

#[tokio::test]
async fn history_is_distinct_and_most_recent_first() {
	let store = super::store_with(Vec::new());

	store.put_history(3, "calculator", FIXTURE_NOW - Duration::hours(5));
	store.put_history(3, "ipad", FIXTURE_NOW - Duration::hours(3));
	store.put_history(3, "Calculator", FIXTURE_NOW - Duration::hours(1));
	store.put_history(3, "monitor", FIXTURE_NOW - Duration::hours(2));
	store.put_history(4, "sofa", FIXTURE_NOW);

	let service = super::service(&store);
	let all = service
		.search_history(SearchHistoryRequest { user_id: 3, limit: None })
		.await
		.expect("History failed.");
	let two = service
		.search_history(SearchHistoryRequest { user_id: 3, limit: Some(2) })
		.await
		.expect("History failed.");

	assert_eq!(all.queries, vec!["calculator", "monitor", "ipad"]);
	assert_eq!(two.queries, vec!["calculator", "monitor"]);
}
