use std::sync::Arc;

use mesh_service::MeshService;
use mesh_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MeshService>,
}
impl AppState {
	pub async fn new(config: mesh_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = MeshService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
