use std::{convert::Infallible, time::Duration};

use async_stream::stream;
use axum::{
	extract::{Path, State},
	response::sse::{Event, Sse},
};
use futures_util::Stream;
use serde_json::json;
use uuid::Uuid;

use mesh_service::SearchJob;
use mesh_storage::models::{JOB_STATUS_COMPLETED, JOB_STATUS_PENDING};

use crate::state::AppState;

/// What one poll of the job store contributes to the event stream.
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
	Silent,
	Heartbeat,
	Terminal,
}

fn poll_outcome(polls: u32, heartbeat_every: u32, status: &str) -> PollOutcome {
	if status != JOB_STATUS_PENDING {
		return PollOutcome::Terminal;
	}
	if polls % heartbeat_every == 0 {
		return PollOutcome::Heartbeat;
	}

	PollOutcome::Silent
}

fn timed_out(polls: u32, max_polls: u32) -> bool {
	polls > max_polls
}

/// A completed job streams its full record; a failed one only admits failure.
/// The failure detail lives in server logs, not the client channel.
fn terminal_body(job: &SearchJob) -> String {
	if job.status == JOB_STATUS_COMPLETED {
		return serde_json::to_string(job)
			.unwrap_or_else(|_| json!({ "job_id": job.job_id }).to_string());
	}

	json!({ "message": "Answer synthesis failed." }).to_string()
}

/// Server-sent event gateway over the polling surface. The stream opens with a
/// `connected` event, emits `heartbeat` events while the job is pending, and
/// ends with exactly one terminal event: the job's terminal status, `error`,
/// or `timeout`.
pub async fn stream_job(
	State(state): State<AppState>,
	Path(job_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
	let service = state.service.clone();
	let poll_interval = Duration::from_millis(service.cfg.stream.poll_interval_ms);
	let heartbeat_every = service.cfg.stream.heartbeat_every;
	let max_polls = service.cfg.stream.max_polls;
	let events = stream! {
		yield Ok(Event::default()
			.event("connected")
			.data(json!({ "job_id": job_id }).to_string()));

		let mut polls = 0_u32;

		loop {
			tokio::time::sleep(poll_interval).await;

			polls += 1;

			if timed_out(polls, max_polls) {
				yield Ok(Event::default()
					.event("timeout")
					.data(json!({ "job_id": job_id, "polls": polls }).to_string()));

				break;
			}

			let job = match service.get_job(job_id).await {
				Ok(job) => job,
				Err(err) => {
					yield Ok(error_event(&err.to_string()));

					break;
				},
			};
			let Some(job) = job else {
				yield Ok(error_event("Job does not exist or has expired."));

				break;
			};

			match poll_outcome(polls, heartbeat_every, &job.status) {
				PollOutcome::Terminal => {
					let body = terminal_body(&job);

					yield Ok(Event::default().event(job.status.clone()).data(body));

					break;
				},
				PollOutcome::Heartbeat => {
					yield Ok(Event::default()
						.event("heartbeat")
						.data(json!({ "polls": polls }).to_string()));
				},
				PollOutcome::Silent => {},
			}
		}
	};

	Sse::new(events)
}

fn error_event(message: &str) -> Event {
	Event::default().event("error").data(json!({ "message": message }).to_string())
}
