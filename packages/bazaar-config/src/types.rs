use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub suggestions: Suggestions,
	#[serde(default)]
	pub related: Related,
	#[serde(default)]
	pub trending: Trending,
	#[serde(default)]
	pub history: History,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	/// How a structured course code is compared with the query: "prefix" or "containment".
	pub code_match: String,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_limit: 50, max_limit: 200, code_match: "prefix".to_string() }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub min_prefix_chars: u32,
	pub default_limit: u32,
	pub max_limit: u32,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { min_prefix_chars: 2, default_limit: 5, max_limit: 20 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Related {
	pub default_limit: u32,
	pub max_limit: u32,
	pub over_fetch_factor: u32,
	/// Lower bound of the same-category price band, as a fraction of the anchor price.
	pub price_band_low: f64,
	/// Upper bound of the same-category price band, as a fraction of the anchor price.
	pub price_band_high: f64,
}
impl Default for Related {
	fn default() -> Self {
		Self {
			default_limit: 4,
			max_limit: 24,
			over_fetch_factor: 2,
			price_band_low: 0.5,
			price_band_high: 1.5,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Trending {
	pub default_limit: u32,
	pub max_limit: u32,
	pub popular_window_days: u32,
	pub max_popular_window_days: u32,
	pub trending_window_hours: u32,
	pub max_trending_window_hours: u32,
}
impl Default for Trending {
	fn default() -> Self {
		Self {
			default_limit: 10,
			max_limit: 50,
			popular_window_days: 7,
			max_popular_window_days: 365,
			trending_window_hours: 24,
			max_trending_window_hours: 24 * 30,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct History {
	pub min_query_chars: u32,
	pub default_limit: u32,
	pub max_limit: u32,
}
impl Default for History {
	fn default() -> Self {
		Self { min_query_chars: 2, default_limit: 10, max_limit: 50 }
	}
}
