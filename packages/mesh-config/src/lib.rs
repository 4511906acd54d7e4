mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AnswerProviderConfig, Config, EmbeddingProviderConfig, Jobs, Postgres, Providers, Qdrant,
	Search, SearchAnswer, Service, Storage, Stream,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

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
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	for (name, threshold) in [
		("search.org_score_threshold", cfg.search.org_score_threshold),
		("search.personal_score_threshold", cfg.search.personal_score_threshold),
	] {
		if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
			return Err(Error::Validation {
				message: format!("{name} must be within [0, 1]."),
			});
		}
	}
	if cfg.search.answer.preview_chars == 0 {
		return Err(Error::Validation {
			message: "search.answer.preview_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.jobs.ttl_minutes <= 0 {
		return Err(Error::Validation {
			message: "jobs.ttl_minutes must be greater than zero.".to_string(),
		});
	}
	if cfg.jobs.purge_interval_secs == 0 {
		return Err(Error::Validation {
			message: "jobs.purge_interval_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.stream.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "stream.poll_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.stream.heartbeat_every == 0 {
		return Err(Error::Validation {
			message: "stream.heartbeat_every must be greater than zero.".to_string(),
		});
	}
	if cfg.stream.max_polls == 0 {
		return Err(Error::Validation {
			message: "stream.max_polls must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in
		[&mut cfg.providers.embedding.api_base, &mut cfg.providers.answer.api_base]
	{
		while api_base.ends_with('/') {
			api_base.pop();
		}
	}
}
