use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{BazaarService, Result};
use bazaar_domain::normalize::{normalize, normalize_code};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestRequest {
	pub prefix: String,
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
	CourseCode,
	Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
	pub kind: SuggestionKind,
	pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestResponse {
	pub items: Vec<Suggestion>,
}

impl BazaarService {
	/// Course codes first, then titles, for a typed prefix.
	pub async fn suggest(&self, req: SuggestRequest) -> Result<SuggestResponse> {
		let cfg = &self.cfg.suggestions;
		let limit = crate::resolve_limit("limit", req.limit, cfg.default_limit, cfg.max_limit)?;
		let prefix = normalize(&req.prefix);

		if limit == 0 || prefix.chars().count() < cfg.min_prefix_chars as usize {
			return Ok(SuggestResponse { items: Vec::new() });
		}

		let capacity = limit as usize;
		let mut items = Vec::with_capacity(capacity);
		let code_fragment = normalize_code(&prefix);

		if !code_fragment.is_empty() {
			// Spellings that collapse to one normalized code are reported once, so over-fetch.
			let codes = self.store.distinct_course_codes(&code_fragment, limit * 2).await?;
			let mut seen = HashSet::new();

			for code in codes {
				if items.len() >= capacity {
					break;
				}
				if seen.insert(normalize_code(&code)) {
					items.push(Suggestion { kind: SuggestionKind::CourseCode, text: code });
				}
			}
		}

		let remaining = capacity - items.len();

		if remaining > 0 {
			let titles = self.store.distinct_titles(&prefix, remaining as i64).await?;

			items.extend(
				titles
					.into_iter()
					.take(remaining)
					.map(|text| Suggestion { kind: SuggestionKind::Title, text }),
			);
		}

		tracing::debug!(prefix = %prefix, suggestions = items.len(), "Suggestions resolved.");

		Ok(SuggestResponse { items })
	}
}
