//! Canonical forms for free text, word tokens and structured course codes.
//!
//! Everything here is pure and allocation-only, so the same helpers can run inside request
//! handlers, SQL parameter preparation and the in-memory test store without diverging.

/// Letters, digits and underscore, matching the usual "word character" class.
pub fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

/// Lowercases, drops everything except letters, digits, whitespace and hyphens, then collapses
/// whitespace runs into single spaces and trims the ends.
///
/// Whitespace is collapsed after stripping so that `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
	let mut kept = String::with_capacity(text.len());

	for ch in text.chars().flat_map(char::to_lowercase) {
		if ch.is_alphanumeric() || ch.is_whitespace() || ch == '-' {
			kept.push(ch);
		}
	}

	let mut out = String::with_capacity(kept.len());

	for part in kept.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(part);
	}

	out
}

/// Maximal runs of word characters, lowercased, in input order. Duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut out = Vec::new();
	let mut current = String::new();

	for ch in text.chars() {
		if is_word_char(ch) {
			current.extend(ch.to_lowercase());
		} else if !current.is_empty() {
			out.push(std::mem::take(&mut current));
		}
	}

	if !current.is_empty() {
		out.push(current);
	}

	out
}

/// Uppercases and removes every non-word character, so "CS-UY 1134" and "csuy1134" compare equal.
pub fn normalize_code(text: &str) -> String {
	text.chars().flat_map(char::to_uppercase).filter(|ch| is_word_char(*ch)).collect()
}
