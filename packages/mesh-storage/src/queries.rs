use uuid::Uuid;

use crate::{Result, db::Db, models::MemoryRecord};

/// Single-round-trip batched fetch; row order is unspecified and callers
/// re-order against their ranked id list.
pub async fn fetch_memories_by_ids(db: &Db, memory_ids: &[Uuid]) -> Result<Vec<MemoryRecord>> {
	if memory_ids.is_empty() {
		return Ok(Vec::new());
	}

	let records = sqlx::query_as::<_, MemoryRecord>(
		"\
SELECT memory_id, org_id, user_id, content_type, title, url, document_name, page_number, text,
	created_at
FROM memories
WHERE memory_id = ANY($1)",
	)
	.bind(memory_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(records)
}
