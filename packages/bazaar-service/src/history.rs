use serde::{Deserialize, Serialize};

use crate::{BazaarService, Result};
use bazaar_domain::normalize::normalize;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordSearchRequest {
	pub user_id: i64,
	pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordSearchResponse {
	pub recorded: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHistoryRequest {
	pub user_id: i64,
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHistoryResponse {
	pub queries: Vec<String>,
}

impl BazaarService {
	/// Appends the normalized query to the user's history. Queries shorter than
	/// `history.min_query_chars` after trimming are skipped without error.
	pub async fn record_search(&self, req: RecordSearchRequest) -> Result<RecordSearchResponse> {
		let trimmed = req.query.trim();
		let normalized = normalize(trimmed);

		if trimmed.chars().count() < self.cfg.history.min_query_chars as usize
			|| normalized.is_empty()
		{
			return Ok(RecordSearchResponse { recorded: false });
		}

		self.store.append_search_history(req.user_id, &normalized, self.now()).await?;

		Ok(RecordSearchResponse { recorded: true })
	}

	/// The user's distinct queries, most recently searched first.
	pub async fn search_history(&self, req: SearchHistoryRequest) -> Result<SearchHistoryResponse> {
		let cfg = &self.cfg.history;
		let limit = crate::resolve_limit("limit", req.limit, cfg.default_limit, cfg.max_limit)?;

		if limit == 0 {
			return Ok(SearchHistoryResponse { queries: Vec::new() });
		}

		let queries = self.store.recent_queries(req.user_id, limit).await?;

		Ok(SearchHistoryResponse { queries })
	}
}
