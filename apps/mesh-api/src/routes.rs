use axum::{
	Json, Router,
	extract::{Path, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use mesh_service::{Error as ServiceError, SearchRequest, SearchResponse};

use crate::{state::AppState, stream};

pub fn router(state: AppState) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::mirror_request())
		.allow_methods(Any)
		.allow_headers(Any);

	Router::new()
		.route("/health", get(health))
		.route("/v1/mesh/search", post(search))
		.route("/v1/mesh/search/job/{job_id}", get(get_job))
		.route("/v1/mesh/search/job/{job_id}/stream", get(stream::stream_job))
		.layer(cors)
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.clone().search(payload).await?;

	Ok(Json(response))
}

/// Polled by clients between search and answer; `no-store` keeps proxies from
/// serving a stale pending snapshot after the job completes.
async fn get_job(
	State(state): State<AppState>,
	Path(job_id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let Some(job) = state.service.get_job(job_id).await? else {
		return Err(ApiError::new(
			StatusCode::NOT_FOUND,
			"job_not_found",
			format!("Job {job_id} does not exist or has expired."),
		));
	};
	let mut response = Json(job).into_response();

	response
		.headers_mut()
		.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-store"));

	Ok(response)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match &err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message.clone()),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message.clone()),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message.clone()),
			ServiceError::Storage { .. } | ServiceError::Qdrant { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", err.to_string()),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
