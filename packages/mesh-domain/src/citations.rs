use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

static CITATION_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("Citation marker pattern must compile."));

/// Scans generated answer text for bracketed `[n]` markers and returns the
/// labels in first-appearance order, deduplicated.
///
/// Labels outside `1..=passage_count` are hallucinated references; they are
/// dropped silently rather than treated as errors.
pub fn extract_citation_labels(text: &str, passage_count: usize) -> Vec<usize> {
	let mut seen = HashSet::new();
	let mut labels = Vec::new();

	for capture in CITATION_MARKER.captures_iter(text) {
		let Ok(label) = capture[1].parse::<usize>() else {
			continue;
		};

		if label == 0 || label > passage_count {
			continue;
		}
		if seen.insert(label) {
			labels.push(label);
		}
	}

	labels
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_first_appearance_order() {
		let labels = extract_citation_labels("See [2], then [1], then [2] again.", 3);

		assert_eq!(labels, vec![2, 1]);
	}

	#[test]
	fn drops_out_of_range_labels() {
		let labels = extract_citation_labels("Revenue grew [1] due to expansion [2].", 1);

		assert_eq!(labels, vec![1]);
	}

	#[test]
	fn ignores_zero_and_non_numeric_brackets() {
		let labels = extract_citation_labels("Edge cases [0], [x], [10].", 10);

		assert_eq!(labels, vec![10]);
	}

	#[test]
	fn huge_labels_do_not_crash_extraction() {
		let labels = extract_citation_labels("[99999999999999999999999999]", 5);

		assert!(labels.is_empty());
	}

	#[test]
	fn empty_text_yields_no_labels() {
		assert!(extract_citation_labels("", 4).is_empty());
	}
}
