//! Seed-word mutation: binds a [`FrequencyModel`] to the enumeration
//! engine and streams candidate passwords in likelihood order.

use std::io::{self, Write};

use crate::error::ModelError;
use crate::freqdata::FrequencyModel;
use crate::model::{CombinationEnumerator, Event, EventSet};

/// One candidate password and its estimated joint log-probability.
///
/// Candidates are byte strings: replacement bytes from the frequency data
/// pass through unreinterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub bytes: Vec<u8>,
	pub log_probability: f64,
}

/// Ranked mutations of one seed word under a frequency model.
///
/// Builds one event per decision position: the prefix choice, the
/// leading-character replacement of the first seed byte, one body
/// replacement per remaining seed byte, and the suffix choice. Outcome
/// identifiers are table indices for the affix events and the replacement
/// byte itself for the character events.
///
/// # Responsibilities
/// - Validate the seed against the model before any enumeration starts
/// - Assemble each emitted combination into `<prefix><mutated><suffix>`
///
/// # Invariants
/// - The event set has `seed length + 2` events
/// - Candidate streams are exhaustive and strictly deduplicated, in
///   non-increasing log-probability order
#[derive(Debug)]
pub struct SeedMutator {
	prefixes: Vec<Vec<u8>>,
	suffixes: Vec<Vec<u8>>,
	events: EventSet,
}

impl SeedMutator {
	/// Builds the mutator for `seed`.
	///
	/// # Errors
	/// - [`ModelError::EmptySeed`] for an empty seed word
	/// - [`ModelError::EmptyTable`] if the model has no prefixes or no
	///   suffixes
	/// - [`ModelError::NoReplacements`] if some seed byte was never seen
	///   in the mined corpus; its event would have an empty sample space
	pub fn new(model: &FrequencyModel, seed: &str) -> Result<Self, ModelError> {
		let seed_bytes = seed.as_bytes();
		if seed_bytes.is_empty() {
			return Err(ModelError::EmptySeed);
		}

		let mut events = Vec::with_capacity(seed_bytes.len() + 2);

		if model.prefixes.is_empty() {
			return Err(ModelError::EmptyTable { role: "prefix" });
		}
		let prefix_ids: Vec<u32> = (0..model.prefixes.len() as u32).collect();
		events.push(Event::from_frequencies(&prefix_ids, &model.prefix_frequencies)?);

		events.push(replacement_event(model.leading_row(seed_bytes[0]), seed_bytes[0], "leading")?);
		for &byte in &seed_bytes[1..] {
			events.push(replacement_event(model.normal_row(byte), byte, "normal")?);
		}

		if model.suffixes.is_empty() {
			return Err(ModelError::EmptyTable { role: "suffix" });
		}
		let suffix_ids: Vec<u32> = (0..model.suffixes.len() as u32).collect();
		events.push(Event::from_frequencies(&suffix_ids, &model.suffix_frequencies)?);

		Ok(Self {
			prefixes: model.prefixes.iter().map(|p| p.as_bytes().to_vec()).collect(),
			suffixes: model.suffixes.iter().map(|s| s.as_bytes().to_vec()).collect(),
			events: EventSet::new(events)?,
		})
	}

	pub fn event_set(&self) -> &EventSet {
		&self.events
	}

	/// Total number of distinct candidates the stream will emit.
	pub fn candidate_count(&self) -> u128 {
		self.events.combination_count()
	}

	/// Lazy stream of candidates, most likely first. Dropping the
	/// iterator mid-stream abandons the search with no residual state.
	pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
		CombinationEnumerator::new(&self.events).map(|ranked| Candidate {
			bytes: self.assemble(&ranked.outcome_ids),
			log_probability: ranked.log_probability,
		})
	}

	/// Writes every candidate to `writer`, one per line, in likelihood
	/// order.
	pub fn write_candidates<W: Write>(&self, mut writer: W) -> io::Result<()> {
		for candidate in self.candidates() {
			writer.write_all(&candidate.bytes)?;
			writer.write_all(b"\n")?;
		}
		Ok(())
	}

	fn assemble(&self, outcome_ids: &[u32]) -> Vec<u8> {
		let n = outcome_ids.len();
		let mut bytes = self.prefixes[outcome_ids[0] as usize].clone();
		bytes.push(outcome_ids[1] as u8);
		for &id in &outcome_ids[2..n - 1] {
			bytes.push(id as u8);
		}
		bytes.extend_from_slice(&self.suffixes[outcome_ids[n - 1] as usize]);
		bytes
	}
}

fn replacement_event(
	row: &crate::freqdata::ReplacementRow,
	byte: u8,
	role: &'static str,
) -> Result<Event, ModelError> {
	if row.replacements.is_empty() {
		return Err(ModelError::NoReplacements { byte, role });
	}
	let ids: Vec<u32> = row.replacements.iter().map(|&b| b as u32).collect();
	Event::from_frequencies(&ids, &row.frequencies)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::freqdata::ReplacementRow;

	fn model_for(seed: &str) -> FrequencyModel {
		let mut model = FrequencyModel::empty();
		model.prefixes = vec![String::new(), "my".to_owned()];
		model.prefix_frequencies = vec![10, 2];
		model.suffixes = vec![String::new(), "1".to_owned()];
		model.suffix_frequencies = vec![8, 4];
		let bytes = seed.as_bytes();
		model.leading[bytes[0] as usize] = ReplacementRow {
			replacements: vec![bytes[0], bytes[0].to_ascii_uppercase()],
			frequencies: vec![9, 3],
		};
		for &b in &bytes[1..] {
			model.normal[b as usize] = ReplacementRow {
				replacements: vec![b],
				frequencies: vec![5],
			};
		}
		model
	}

	#[test]
	fn first_candidate_is_the_most_likely_assembly() {
		let model = model_for("ab");
		let mutator = SeedMutator::new(&model, "ab").unwrap();
		let first = mutator.candidates().next().unwrap();
		// Most likely: empty prefix, unchanged seed, empty suffix.
		assert_eq!(first.bytes, b"ab".to_vec());
	}

	#[test]
	fn stream_is_exhaustive_and_ordered() {
		let model = model_for("ab");
		let mutator = SeedMutator::new(&model, "ab").unwrap();
		let candidates: Vec<Candidate> = mutator.candidates().collect();
		// 2 prefixes x 2 leading x 1 body x 2 suffixes.
		assert_eq!(candidates.len() as u128, mutator.candidate_count());
		assert_eq!(candidates.len(), 8);
		for pair in candidates.windows(2) {
			assert!(pair[0].log_probability >= pair[1].log_probability - 1e-12);
		}
	}

	#[test]
	fn candidates_concatenate_prefix_mutation_suffix() {
		let model = model_for("ab");
		let mutator = SeedMutator::new(&model, "ab").unwrap();
		let all: Vec<Vec<u8>> = mutator.candidates().map(|c| c.bytes).collect();
		assert!(all.contains(&b"myAb1".to_vec()));
		assert!(all.contains(&b"Ab".to_vec()));
		assert!(all.contains(&b"myab".to_vec()));
	}

	#[test]
	fn single_byte_seed_has_no_body_events() {
		let model = model_for("a");
		let mutator = SeedMutator::new(&model, "a").unwrap();
		assert_eq!(mutator.event_set().len(), 3);
		assert_eq!(mutator.candidates().count(), 8);
	}

	#[test]
	fn empty_seed_is_rejected() {
		let model = model_for("a");
		assert_eq!(
			SeedMutator::new(&model, "").unwrap_err(),
			ModelError::EmptySeed
		);
	}

	#[test]
	fn unseen_seed_byte_is_a_configuration_error() {
		let model = model_for("ab");
		assert_eq!(
			SeedMutator::new(&model, "az").unwrap_err(),
			ModelError::NoReplacements { byte: b'z', role: "normal" }
		);
		assert_eq!(
			SeedMutator::new(&model, "zb").unwrap_err(),
			ModelError::NoReplacements { byte: b'z', role: "leading" }
		);
	}

	#[test]
	fn empty_affix_tables_are_rejected() {
		let mut model = model_for("a");
		model.prefixes.clear();
		model.prefix_frequencies.clear();
		assert_eq!(
			SeedMutator::new(&model, "a").unwrap_err(),
			ModelError::EmptyTable { role: "prefix" }
		);
	}

	#[test]
	fn write_candidates_emits_one_line_each() {
		let model = model_for("ab");
		let mutator = SeedMutator::new(&model, "ab").unwrap();
		let mut out = Vec::new();
		mutator.write_candidates(&mut out).unwrap();
		let lines: Vec<&[u8]> = out.split(|&b| b == b'\n').filter(|l| !l.is_empty()).collect();
		assert_eq!(lines.len(), 8);
		assert_eq!(lines[0], b"ab");
	}
}
