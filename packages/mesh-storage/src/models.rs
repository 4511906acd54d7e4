use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemoryRecord {
	pub memory_id: Uuid,
	pub org_id: Option<String>,
	pub user_id: Option<String>,
	pub content_type: String,
	pub title: Option<String>,
	pub url: Option<String>,
	pub document_name: Option<String>,
	pub page_number: Option<i32>,
	pub text: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchJobRecord {
	pub job_id: Uuid,
	pub status: String,
	pub answer: Option<String>,
	pub citations: Option<Value>,
	pub results: Option<Value>,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}

pub const JOB_STATUS_PENDING: &str = "pending";
pub const JOB_STATUS_COMPLETED: &str = "completed";
pub const JOB_STATUS_FAILED: &str = "failed";
