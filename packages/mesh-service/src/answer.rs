use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use mesh_domain::citations::extract_citation_labels;
use mesh_storage::{
	jobs::{self, JobUpdate},
	models::{JOB_STATUS_COMPLETED, JOB_STATUS_FAILED},
};

use crate::{MeshService, ResolvedPassage, Result, search::SearchResultItem};

/// Answer synthesis never sees more context than this, however many hits the
/// search returned.
pub const MAX_ANSWER_PASSAGES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
	pub label: u32,
	pub memory_id: Uuid,
	pub title: Option<String>,
	pub url: Option<String>,
}

impl MeshService {
	/// One completion round trip plus citation extraction. No retries: any
	/// provider failure is the caller's to record.
	pub(crate) async fn synthesize_answer(
		&self,
		query: &str,
		passages: &[ResolvedPassage],
	) -> Result<(String, Vec<Citation>)> {
		let passages = &passages[..passages.len().min(MAX_ANSWER_PASSAGES)];
		let messages = build_messages(query, passages);
		let answer =
			self.providers.answer.complete(&self.cfg.providers.answer, &messages).await?;
		let citations = map_citations(&answer, passages);

		Ok((answer, citations))
	}

	/// The detached half of a deferred search: exactly one terminal write to
	/// the job, success or failure, and nothing rethrown to the request that
	/// spawned it.
	pub(crate) async fn run_answer_job(
		&self,
		job_id: Uuid,
		query: String,
		passages: Vec<ResolvedPassage>,
		results: Vec<SearchResultItem>,
	) {
		let update = match self.synthesize_answer(&query, &passages).await {
			Ok((answer, citations)) => JobUpdate {
				status: JOB_STATUS_COMPLETED.to_string(),
				answer: Some(answer),
				citations: serde_json::to_value(&citations).ok(),
				results: serde_json::to_value(&results).ok(),
			},
			Err(err) => {
				warn!(job_id = %job_id, error = %err, "Answer synthesis failed; marking job failed.");

				JobUpdate {
					status: JOB_STATUS_FAILED.to_string(),
					answer: None,
					citations: None,
					results: None,
				}
			},
		};
		let now = OffsetDateTime::now_utc();

		match jobs::update_job(&self.db, job_id, update, now, self.cfg.jobs.ttl_minutes).await {
			Ok(true) => {},
			Ok(false) => {
				// Expired or already terminal; a late result has nowhere to go.
				warn!(job_id = %job_id, "Job vanished before its terminal write; result dropped.");
			},
			Err(err) => {
				warn!(job_id = %job_id, error = %err, "Failed to write job result.");
			},
		}
	}
}

fn provenance_label(passage: &ResolvedPassage) -> String {
	if let Some(document_name) = &passage.document_name {
		return match passage.page_number {
			Some(page) => format!("{document_name}, p. {page}"),
			None => document_name.clone(),
		};
	}
	if let Some(title) = &passage.title {
		return title.clone();
	}

	format!("memory {}", passage.memory_id)
}

/// Numbered context block: one `[n]` provenance header per passage followed
/// by its full text.
fn build_context_block(passages: &[ResolvedPassage]) -> String {
	let mut block = String::new();

	for (index, passage) in passages.iter().enumerate() {
		block.push_str(&format!("[{}] {}\n{}\n\n", index + 1, provenance_label(passage), passage.text));
	}

	block
}

fn build_messages(query: &str, passages: &[ResolvedPassage]) -> Vec<Value> {
	let context = build_context_block(passages);
	let system = "\
You answer questions using only the numbered context passages provided. \
Cite every claim with the bracketed number of its supporting passage, e.g. [1]. \
If the context does not contain the answer, say so. \
Respond in plain text without markdown formatting.";
	let user = format!("Context:\n\n{context}Question: {query}");

	vec![
		serde_json::json!({ "role": "system", "content": system }),
		serde_json::json!({ "role": "user", "content": user }),
	]
}

/// Labels are extracted lexically; there is no semantic check that a cited
/// passage supports the claim. That is the documented contract.
fn map_citations(answer: &str, passages: &[ResolvedPassage]) -> Vec<Citation> {
	extract_citation_labels(answer, passages.len())
		.into_iter()
		.map(|label| {
			let passage = &passages[label - 1];

			Citation {
				label: label as u32,
				memory_id: passage.memory_id,
				title: passage.title.clone(),
				url: passage.url.clone(),
			}
		})
		.collect()
}
