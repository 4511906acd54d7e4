use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub jobs: Jobs,
	#[serde(default)]
	pub stream: Stream,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub answer: AnswerProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub top_k: u32,
	pub org_score_threshold: f32,
	pub personal_score_threshold: f32,
	pub answer: SearchAnswer,
}

#[derive(Debug, Deserialize)]
pub struct SearchAnswer {
	#[serde(default = "default_preview_chars")]
	pub preview_chars: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Jobs {
	#[serde(default = "default_ttl_minutes")]
	pub ttl_minutes: i64,
	#[serde(default = "default_purge_interval_secs")]
	pub purge_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Stream {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_heartbeat_every")]
	pub heartbeat_every: u32,
	#[serde(default = "default_max_polls")]
	pub max_polls: u32,
}

impl Default for Jobs {
	fn default() -> Self {
		Self {
			ttl_minutes: default_ttl_minutes(),
			purge_interval_secs: default_purge_interval_secs(),
		}
	}
}

impl Default for Stream {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			heartbeat_every: default_heartbeat_every(),
			max_polls: default_max_polls(),
		}
	}
}

fn default_preview_chars() -> u32 {
	300
}

fn default_ttl_minutes() -> i64 {
	15
}

fn default_purge_interval_secs() -> u64 {
	300
}

fn default_poll_interval_ms() -> u64 {
	1_000
}

fn default_heartbeat_every() -> u32 {
	5
}

fn default_max_polls() -> u32 {
	600
}
