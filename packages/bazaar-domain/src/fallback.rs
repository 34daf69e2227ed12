use std::collections::HashSet;

use crate::normalize::normalize;

/// Seed keywords shown when recent search history is too thin to fill the popular list.
///
/// Counts are display weights only; they are never merged with real history counts.
pub const POPULAR_SEARCH_SEEDS: &[(&str, i64)] = &[
	("CS-UY 1134", 45),
	("MA-UY 1024", 38),
	("calculator", 32),
	("desk chair", 28),
	("python", 25),
	("microwave", 22),
	("ipad", 20),
	("desk lamp", 18),
	("data structures", 15),
	("monitor", 12),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
	pub keyword: String,
	pub count: i64,
}

/// Appends seed keywords to `observed` until it holds `limit` entries, skipping seeds that are
/// already present once both sides are normalized. Observed order is preserved.
pub fn pad_with_seeds(
	mut observed: Vec<KeywordCount>,
	seeds: &[(&str, i64)],
	limit: usize,
) -> Vec<KeywordCount> {
	observed.truncate(limit);

	let mut seen: HashSet<String> = observed.iter().map(|entry| normalize(&entry.keyword)).collect();

	for (keyword, count) in seeds {
		if observed.len() >= limit {
			break;
		}
		if seen.insert(normalize(keyword)) {
			observed.push(KeywordCount { keyword: (*keyword).to_string(), count: *count });
		}
	}

	observed
}
