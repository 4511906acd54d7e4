use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use mesh_domain::ttl::job_expires_at;

use crate::{
	Result,
	db::Db,
	models::{JOB_STATUS_PENDING, SearchJobRecord},
};

/// Terminal fields written exactly once by the answer synthesizer.
#[derive(Debug, Clone)]
pub struct JobUpdate {
	pub status: String,
	pub answer: Option<String>,
	pub citations: Option<Value>,
	pub results: Option<Value>,
}

pub async fn create_job(db: &Db, now: OffsetDateTime, ttl_minutes: i64) -> Result<SearchJobRecord> {
	let job = SearchJobRecord {
		job_id: Uuid::new_v4(),
		status: JOB_STATUS_PENDING.to_string(),
		answer: None,
		citations: None,
		results: None,
		created_at: now,
		expires_at: job_expires_at(now, ttl_minutes),
	};

	sqlx::query(
		"\
INSERT INTO search_jobs (job_id, status, answer, citations, results, created_at, expires_at)
VALUES ($1, $2, NULL, NULL, NULL, $3, $4)",
	)
	.bind(job.job_id)
	.bind(job.status.as_str())
	.bind(job.created_at)
	.bind(job.expires_at)
	.execute(&db.pool)
	.await?;

	Ok(job)
}

/// An expired row is indistinguishable from a deleted one: readers see
/// not-found either way.
pub async fn get_job(
	db: &Db,
	job_id: Uuid,
	now: OffsetDateTime,
) -> Result<Option<SearchJobRecord>> {
	let record = sqlx::query_as::<_, SearchJobRecord>(
		"\
SELECT job_id, status, answer, citations, results, created_at, expires_at
FROM search_jobs
WHERE job_id = $1
	AND expires_at > $2",
	)
	.bind(job_id)
	.bind(now)
	.fetch_optional(&db.pool)
	.await?;

	Ok(record)
}

/// Moves a pending job to a terminal state, resetting the TTL window.
/// Returns false when the job is absent, expired, or already terminal; the
/// caller logs and moves on rather than recreating the row.
pub async fn update_job(
	db: &Db,
	job_id: Uuid,
	update: JobUpdate,
	now: OffsetDateTime,
	ttl_minutes: i64,
) -> Result<bool> {
	let result = sqlx::query(
		"\
UPDATE search_jobs
SET status = $2,
	answer = $3,
	citations = $4,
	results = $5,
	expires_at = $6
WHERE job_id = $1
	AND status = $7
	AND expires_at > $8",
	)
	.bind(job_id)
	.bind(update.status.as_str())
	.bind(update.answer.as_deref())
	.bind(update.citations)
	.bind(update.results)
	.bind(job_expires_at(now, ttl_minutes))
	.bind(JOB_STATUS_PENDING)
	.bind(now)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn purge_expired_jobs(db: &Db, now: OffsetDateTime) -> Result<u64> {
	let result = sqlx::query("DELETE FROM search_jobs WHERE expires_at <= $1")
		.bind(now)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}
