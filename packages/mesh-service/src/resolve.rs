use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use mesh_domain::{partition::Partition, preview::preview};
use mesh_storage::queries;

use crate::{MeshService, Result, search::fusion::FusedCandidate};

/// A fused candidate joined with its backing text and display metadata.
/// Request-scoped: built per search, never persisted.
#[derive(Debug, Clone)]
pub struct ResolvedPassage {
	pub memory_id: Uuid,
	pub score: f32,
	pub partition: Partition,
	pub text: String,
	pub preview: String,
	pub title: Option<String>,
	pub url: Option<String>,
	pub document_name: Option<String>,
	pub page_number: Option<i32>,
}

impl MeshService {
	/// One batched lookup; fused ranking order is preserved. A candidate with
	/// no backing record is dropped, not fatal - the index can briefly lead
	/// the store.
	pub(crate) async fn resolve_passages(
		&self,
		candidates: &[FusedCandidate],
	) -> Result<Vec<ResolvedPassage>> {
		let memory_ids: Vec<Uuid> = candidates.iter().map(|c| c.memory_id).collect();
		let records = queries::fetch_memories_by_ids(&self.db, &memory_ids).await?;
		let mut by_id: HashMap<Uuid, mesh_storage::models::MemoryRecord> =
			records.into_iter().map(|record| (record.memory_id, record)).collect();
		let preview_chars = self.cfg.search.answer.preview_chars;
		let mut passages = Vec::with_capacity(candidates.len());

		for candidate in candidates {
			let Some(record) = by_id.remove(&candidate.memory_id) else {
				warn!(memory_id = %candidate.memory_id, "Fused hit has no backing memory; dropped.");
				continue;
			};

			passages.push(ResolvedPassage {
				memory_id: candidate.memory_id,
				score: candidate.score,
				partition: candidate.partition,
				preview: preview(&record.text, preview_chars),
				text: record.text,
				title: record.title,
				url: record.url,
				document_name: record.document_name,
				page_number: record.page_number,
			});
		}

		Ok(passages)
	}
}
