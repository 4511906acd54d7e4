pub mod answer;
pub mod jobs;
pub mod resolve;
pub mod search;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use answer::Citation;
pub use error::{Error, Result};
pub use jobs::SearchJob;
pub use resolve::ResolvedPassage;
pub use search::{
	AnswerMode, AnswerOptions, SearchFilters, SearchRequest, SearchResponse, SearchResultItem,
};

use mesh_config::{AnswerProviderConfig, Config, EmbeddingProviderConfig};
use mesh_providers::{answer as answer_provider, embedding};
use mesh_storage::{db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait AnswerProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub answer: Arc<dyn AnswerProvider>,
}

pub struct MeshService {
	pub cfg: Config,
	pub db: Db,
	pub qdrant: QdrantStore,
	pub providers: Providers,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl AnswerProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(answer_provider::complete(cfg, messages))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, answer: Arc<dyn AnswerProvider>) -> Self {
		Self { embedding, answer }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), answer: provider }
	}
}

impl MeshService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self { cfg, db, qdrant, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, qdrant: QdrantStore, providers: Providers) -> Self {
		Self { cfg, db, qdrant, providers }
	}

	pub(crate) async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let texts = vec![query.to_string()];
		let mut vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.len() != 1 {
			return Err(Error::Provider {
				message: format!(
					"Embedding provider returned {} vectors for one query.",
					vectors.len()
				),
			});
		}

		Ok(vectors.remove(0))
	}
}
