use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use mesh_storage::{jobs, models::SearchJobRecord};

use crate::{MeshService, Result};

/// The job record as clients see it, returned verbatim by polling and
/// carried in the stream's terminal `completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct SearchJob {
	pub job_id: Uuid,
	pub status: String,
	pub answer: Option<String>,
	pub citations: Option<Value>,
	pub results: Option<Value>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
}
impl From<SearchJobRecord> for SearchJob {
	fn from(record: SearchJobRecord) -> Self {
		Self {
			job_id: record.job_id,
			status: record.status,
			answer: record.answer,
			citations: record.citations,
			results: record.results,
			created_at: record.created_at,
			expires_at: record.expires_at,
		}
	}
}

impl MeshService {
	/// Not-found covers both "never existed" and "expired"; readers cannot
	/// tell the difference and must not try.
	pub async fn get_job(&self, job_id: Uuid) -> Result<Option<SearchJob>> {
		let now = OffsetDateTime::now_utc();
		let record = jobs::get_job(&self.db, job_id, now).await?;

		Ok(record.map(SearchJob::from))
	}

	pub async fn purge_expired_jobs(&self) -> Result<u64> {
		let now = OffsetDateTime::now_utc();
		let purged = jobs::purge_expired_jobs(&self.db, now).await?;

		if purged > 0 {
			info!(purged, "Purged expired search jobs.");
		}

		Ok(purged)
	}
}
