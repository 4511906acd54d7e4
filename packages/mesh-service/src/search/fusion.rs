use std::collections::HashMap;

use uuid::Uuid;

use mesh_domain::partition::Partition;

/// One hit from a single partition query, already decoded from the index.
#[derive(Debug, Clone)]
pub struct PartitionHit {
	pub memory_id: Uuid,
	pub score: f32,
}

/// A deduplicated hit carrying the best score seen for its memory and the
/// partition that produced it.
#[derive(Debug, Clone)]
pub struct FusedCandidate {
	pub memory_id: Uuid,
	pub score: f32,
	pub partition: Partition,
}

/// Merges per-partition result lists into one ranked list.
///
/// Batches must be supplied in partition-priority order. Duplicates keep the
/// maximum score observed across partitions; a duplicate never lowers a hit's
/// rank. Ordering is deterministic: score descending, then partition
/// priority, then first-seen order.
pub fn fuse(batches: &[(Partition, Vec<PartitionHit>)], limit: usize) -> Vec<FusedCandidate> {
	let mut fused: Vec<FusedCandidate> = Vec::new();
	let mut index_by_id: HashMap<Uuid, usize> = HashMap::new();

	for (partition, hits) in batches {
		for hit in hits {
			match index_by_id.get(&hit.memory_id) {
				Some(&index) => {
					// Strictly greater: a tie keeps the higher-priority
					// partition that surfaced the hit first.
					if hit.score > fused[index].score {
						fused[index].score = hit.score;
						fused[index].partition = *partition;
					}
				},
				None => {
					index_by_id.insert(hit.memory_id, fused.len());
					fused.push(FusedCandidate {
						memory_id: hit.memory_id,
						score: hit.score,
						partition: *partition,
					});
				},
			}
		}
	}

	// Stable sort preserves first-seen order within equal keys.
	fused.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.partition.priority().cmp(&b.partition.priority()))
	});
	fused.truncate(limit);

	fused
}
