use time::{Duration, OffsetDateTime};

use mesh_config::Postgres;
use mesh_storage::{
	db::Db,
	jobs::{self, JobUpdate},
	models::{JOB_STATUS_COMPLETED, JOB_STATUS_FAILED, JOB_STATUS_PENDING},
};
use mesh_testkit::TestDatabase;

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

fn completed_update() -> JobUpdate {
	JobUpdate {
		status: JOB_STATUS_COMPLETED.to_string(),
		answer: Some("Revenue grew [1].".to_string()),
		citations: Some(serde_json::json!([{ "label": 1 }])),
		results: Some(serde_json::json!([])),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MESH_PG_DSN to run."]
async fn job_lifecycle_pending_to_completed() {
	let Some(base_dsn) = mesh_testkit::env_dsn() else {
		eprintln!("Skipping job_lifecycle_pending_to_completed; set MESH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let now = OffsetDateTime::now_utc();
	let job = jobs::create_job(&db, now, 15).await.expect("Failed to create job.");

	assert_eq!(job.status, JOB_STATUS_PENDING);

	let fetched = jobs::get_job(&db, job.job_id, now)
		.await
		.expect("Failed to get job.")
		.expect("Job must be readable while pending.");

	assert_eq!(fetched.job_id, job.job_id);
	assert!(fetched.answer.is_none());

	let updated = jobs::update_job(&db, job.job_id, completed_update(), now, 15)
		.await
		.expect("Failed to update job.");

	assert!(updated);

	let fetched = jobs::get_job(&db, job.job_id, now)
		.await
		.expect("Failed to get job.")
		.expect("Job must be readable after completion.");

	assert_eq!(fetched.status, JOB_STATUS_COMPLETED);
	assert_eq!(fetched.answer.as_deref(), Some("Revenue grew [1]."));
	assert!(fetched.expires_at > job.expires_at - Duration::seconds(1));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MESH_PG_DSN to run."]
async fn terminal_jobs_never_flip() {
	let Some(base_dsn) = mesh_testkit::env_dsn() else {
		eprintln!("Skipping terminal_jobs_never_flip; set MESH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let now = OffsetDateTime::now_utc();
	let job = jobs::create_job(&db, now, 15).await.expect("Failed to create job.");

	assert!(
		jobs::update_job(&db, job.job_id, completed_update(), now, 15)
			.await
			.expect("Failed to update job.")
	);

	// A second terminal write is a no-op, whatever state it asks for.
	let failed_update = JobUpdate {
		status: JOB_STATUS_FAILED.to_string(),
		answer: None,
		citations: None,
		results: None,
	};

	assert!(
		!jobs::update_job(&db, job.job_id, failed_update, now, 15)
			.await
			.expect("Failed to attempt second update.")
	);

	let fetched = jobs::get_job(&db, job.job_id, now)
		.await
		.expect("Failed to get job.")
		.expect("Job must still be readable.");

	assert_eq!(fetched.status, JOB_STATUS_COMPLETED);
	assert_eq!(fetched.answer.as_deref(), Some("Revenue grew [1]."));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MESH_PG_DSN to run."]
async fn idle_job_becomes_unreadable_after_ttl() {
	let Some(base_dsn) = mesh_testkit::env_dsn() else {
		eprintln!("Skipping idle_job_becomes_unreadable_after_ttl; set MESH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let now = OffsetDateTime::now_utc();
	let job = jobs::create_job(&db, now, 15).await.expect("Failed to create job.");

	// 16 minutes later, with no update in between, the record reads as not-found.
	let later = now + Duration::minutes(16);

	assert!(
		jobs::get_job(&db, job.job_id, later).await.expect("Failed to get job.").is_none()
	);

	// And a late writer must treat that as a hard stop.
	assert!(
		!jobs::update_job(&db, job.job_id, completed_update(), later, 15)
			.await
			.expect("Failed to attempt late update.")
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MESH_PG_DSN to run."]
async fn purge_deletes_only_expired_jobs() {
	let Some(base_dsn) = mesh_testkit::env_dsn() else {
		eprintln!("Skipping purge_deletes_only_expired_jobs; set MESH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let now = OffsetDateTime::now_utc();
	let stale = jobs::create_job(&db, now - Duration::minutes(30), 15)
		.await
		.expect("Failed to create stale job.");
	let fresh = jobs::create_job(&db, now, 15).await.expect("Failed to create fresh job.");
	let purged = jobs::purge_expired_jobs(&db, now).await.expect("Failed to purge jobs.");

	assert_eq!(purged, 1);
	assert!(
		jobs::get_job(&db, stale.job_id, now).await.expect("Failed to get job.").is_none()
	);
	assert!(
		jobs::get_job(&db, fresh.job_id, now).await.expect("Failed to get job.").is_some()
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
