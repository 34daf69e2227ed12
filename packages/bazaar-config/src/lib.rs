mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, History, Postgres, Related, Search, Service, Storage, Suggestions, Trending};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a config document that is already in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, default_limit, max_limit) in [
		("search", cfg.search.default_limit, cfg.search.max_limit),
		("suggestions", cfg.suggestions.default_limit, cfg.suggestions.max_limit),
		("related", cfg.related.default_limit, cfg.related.max_limit),
		("trending", cfg.trending.default_limit, cfg.trending.max_limit),
		("history", cfg.history.default_limit, cfg.history.max_limit),
	] {
		if default_limit == 0 {
			return Err(Error::Validation {
				message: format!("{label}.default_limit must be greater than zero."),
			});
		}
		if default_limit > max_limit {
			return Err(Error::Validation {
				message: format!("{label}.default_limit must not exceed {label}.max_limit."),
			});
		}
	}

	if !matches!(cfg.search.code_match.as_str(), "prefix" | "containment") {
		return Err(Error::Validation {
			message: "search.code_match must be one of prefix or containment.".to_string(),
		});
	}
	if cfg.suggestions.min_prefix_chars == 0 {
		return Err(Error::Validation {
			message: "suggestions.min_prefix_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.related.over_fetch_factor == 0 {
		return Err(Error::Validation {
			message: "related.over_fetch_factor must be greater than zero.".to_string(),
		});
	}

	let (low, high) = (cfg.related.price_band_low, cfg.related.price_band_high);

	if !low.is_finite() || !high.is_finite() {
		return Err(Error::Validation {
			message: "related.price_band_low and related.price_band_high must be finite numbers."
				.to_string(),
		});
	}
	if low < 0.0 {
		return Err(Error::Validation {
			message: "related.price_band_low must be zero or greater.".to_string(),
		});
	}
	if low > 1.0 || high < 1.0 {
		return Err(Error::Validation {
			message: "related price band must contain the anchor price (low <= 1.0 <= high)."
				.to_string(),
		});
	}

	for (window, default_window, max_window) in [
		(
			"popular_window_days",
			cfg.trending.popular_window_days,
			cfg.trending.max_popular_window_days,
		),
		(
			"trending_window_hours",
			cfg.trending.trending_window_hours,
			cfg.trending.max_trending_window_hours,
		),
	] {
		if default_window == 0 {
			return Err(Error::Validation {
				message: format!("trending.{window} must be greater than zero."),
			});
		}
		if default_window > max_window {
			return Err(Error::Validation {
				message: format!("trending.{window} must not exceed trending.max_{window}."),
			});
		}
	}
	if cfg.history.min_query_chars == 0 {
		return Err(Error::Validation {
			message: "history.min_query_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.code_match = cfg.search.code_match.trim().to_ascii_lowercase();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
