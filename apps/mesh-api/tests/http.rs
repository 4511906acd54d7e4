use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use tower::util::ServiceExt;
use uuid::Uuid;

use mesh_api::{routes, state::AppState};
use mesh_config::Config;
use mesh_storage::jobs;
use mesh_testkit::TestDatabase;

fn test_config(dsn: String, qdrant_url: String, collection: String) -> Config {
	let toml = format!(
		r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "info"

[storage.postgres]
dsn            = "{dsn}"
pool_max_conns = 1

[storage.qdrant]
url        = "{qdrant_url}"
collection = "{collection}"
vector_dim = 4

[providers.embedding]
provider_id = "test"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/embeddings"
model       = "test"
dimensions  = 4
timeout_ms  = 1000

[providers.answer]
provider_id = "test"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/chat/completions"
model       = "test"
temperature = 0.1
timeout_ms  = 1000

[search]
top_k                    = 10
org_score_threshold      = 0.25
personal_score_threshold = 0.4

[search.answer]
preview_chars = 300

[jobs]
[stream]
"#
	);

	toml::from_str(&toml).expect("Failed to parse test config.")
}

async fn test_env() -> Option<(TestDatabase, String, String)> {
	let Some(base_dsn) = mesh_testkit::env_dsn() else {
		eprintln!("Skipping HTTP tests; set MESH_PG_DSN to run this test.");

		return None;
	};
	let Some(qdrant_url) = mesh_testkit::env_qdrant_url() else {
		eprintln!("Skipping HTTP tests; set MESH_QDRANT_URL to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let collection = test_db.collection_name("mesh_http");

	Some((test_db, qdrant_url, collection))
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set MESH_PG_DSN and MESH_QDRANT_URL to run."]
async fn health_ok() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set MESH_PG_DSN and MESH_QDRANT_URL to run."]
async fn search_without_a_scope_is_a_bad_request() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let payload = serde_json::json!({ "query": "revenue growth", "filters": {} });
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/mesh/search")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&body).expect("Failed to parse response.");

	assert_eq!(json["error_code"], "invalid_request");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set MESH_PG_DSN and MESH_QDRANT_URL to run."]
async fn unknown_job_is_not_found() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder()
				.uri(format!("/v1/mesh/search/job/{}", Uuid::new_v4()))
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call get_job.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set MESH_PG_DSN and MESH_QDRANT_URL to run."]
async fn pending_job_is_served_uncached() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let now = time::OffsetDateTime::now_utc();
	let job = jobs::create_job(&state.service.db, now, state.service.cfg.jobs.ttl_minutes)
		.await
		.expect("Failed to create job.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder()
				.uri(format!("/v1/mesh/search/job/{}", job.job_id))
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call get_job.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(header::CACHE_CONTROL).and_then(|value| value.to_str().ok()),
		Some("no-store")
	);

	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&body).expect("Failed to parse response.");

	assert_eq!(json["job_id"], job.job_id.to_string());
	assert_eq!(json["status"], "pending");
	assert!(json["answer"].is_null());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
