use crate::normalize::{normalize_code, tokenize};

pub const TITLE_EXACT_POINTS: u32 = 10;
pub const TITLE_PARTIAL_POINTS: u32 = 5;
pub const DESCRIPTION_POINTS: u32 = 3;
pub const CODE_MATCH_POINTS: u32 = 20;
pub const CATEGORY_POINTS: u32 = 5;

/// How a listing's structured course code is compared with the whole query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeMatch {
	/// Equal, or one normalized form is a prefix of the other.
	#[default]
	Prefix,
	/// Either normalized form contains the other anywhere.
	Containment,
}
impl CodeMatch {
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"prefix" => Some(Self::Prefix),
			"containment" => Some(Self::Containment),
			_ => None,
		}
	}

	pub fn matches(self, code: &str, query: &str) -> bool {
		if code.is_empty() || query.is_empty() {
			return false;
		}

		match self {
			Self::Prefix => code.starts_with(query) || query.starts_with(code),
			Self::Containment => code.contains(query) || query.contains(code),
		}
	}
}

/// The text fields of a listing that participate in relevance scoring.
#[derive(Debug, Clone, Copy)]
pub struct ListingText<'a> {
	pub title: &'a str,
	pub description: &'a str,
	pub category: &'a str,
	pub course_code: Option<&'a str>,
}

/// Additive relevance of one listing for an already tokenized query.
///
/// Scoring never filters: a listing with no matching signal scores zero.
pub fn score(listing: &ListingText<'_>, query_tokens: &[String], code_match: CodeMatch) -> u32 {
	if query_tokens.is_empty() {
		return 0;
	}

	let title_tokens = tokenize(listing.title);
	let description_tokens = tokenize(listing.description);
	let category = listing.category.to_lowercase();
	let mut total = 0;

	for token in query_tokens {
		if title_tokens.iter().any(|title_token| title_token == token) {
			total += TITLE_EXACT_POINTS;
		} else if title_tokens.iter().any(|title_token| title_token.contains(token.as_str())) {
			total += TITLE_PARTIAL_POINTS;
		}
		if description_tokens.iter().any(|description_token| description_token == token) {
			total += DESCRIPTION_POINTS;
		}
		if category.contains(token.as_str()) {
			total += CATEGORY_POINTS;
		}
	}

	if let Some(code) = listing.course_code {
		let code = normalize_code(code);
		let query = normalize_code(&query_tokens.concat());

		if code_match.matches(&code, &query) {
			total += CODE_MATCH_POINTS;
		}
	}

	total
}
