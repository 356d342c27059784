use crate::error::ModelError;
use super::combination::Combination;

/// One possible value of an event, with its estimated log-probability.
///
/// The identifier is opaque to the enumeration machinery: for affix
/// events it is an index into a string table, for character events it is
/// the replacement byte itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
	pub id: u32,
	/// `ln(freq) - ln(Σ freq)` over the event's sample space; always <= 0.
	pub log_probability: f64,
	/// Position in the source frequency table before sorting. Secondary
	/// sort key, so exactly-tied probabilities still enumerate in a
	/// reproducible order.
	corpus_rank: u32,
}

impl Outcome {
	pub fn corpus_rank(&self) -> u32 {
		self.corpus_rank
	}
}

/// One independent decision position: an ordered sample space of
/// outcomes, most likely first.
///
/// # Invariants
/// - At least one outcome
/// - `outcomes[i].log_probability >= outcomes[j].log_probability` for i < j
/// - Ties are broken by ascending corpus rank
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	outcomes: Vec<Outcome>,
}

impl Event {
	/// Builds an event from parallel identifier and raw-frequency arrays.
	///
	/// Frequencies are normalized into log-probabilities against their own
	/// sum, then sorted descending.
	///
	/// # Errors
	/// - [`ModelError::LengthMismatch`] if the arrays differ in length
	/// - [`ModelError::NoOutcomes`] for an empty sample space
	/// - [`ModelError::ZeroFrequency`] for a zero count, whose
	///   log-probability would be undefined
	pub fn from_frequencies(ids: &[u32], freqs: &[u64]) -> Result<Self, ModelError> {
		if ids.len() != freqs.len() {
			return Err(ModelError::LengthMismatch {
				ids: ids.len(),
				freqs: freqs.len(),
			});
		}
		if ids.is_empty() {
			return Err(ModelError::NoOutcomes);
		}
		if let Some(index) = freqs.iter().position(|&f| f == 0) {
			return Err(ModelError::ZeroFrequency { index });
		}

		let total: u64 = freqs.iter().sum();
		let log_total = (total as f64).ln();

		let mut outcomes: Vec<Outcome> = ids
			.iter()
			.zip(freqs)
			.enumerate()
			.map(|(rank, (&id, &freq))| Outcome {
				id,
				log_probability: (freq as f64).ln() - log_total,
				corpus_rank: rank as u32,
			})
			.collect();
		outcomes.sort_by(|a, b| {
			b.log_probability
				.total_cmp(&a.log_probability)
				.then_with(|| a.corpus_rank.cmp(&b.corpus_rank))
		});

		Ok(Self { outcomes })
	}

	pub fn outcomes(&self) -> &[Outcome] {
		&self.outcomes
	}

	pub fn len(&self) -> usize {
		self.outcomes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.outcomes.is_empty()
	}

	/// The most likely outcome.
	pub fn best(&self) -> &Outcome {
		&self.outcomes[0]
	}
}

/// A fixed set of independent events, one per decision position.
///
/// Immutable once built; the enumeration engine only ever borrows it, so
/// several searches over the same set can run concurrently.
///
/// # Responsibilities
/// - Validate the set once, so downstream search code cannot fail
/// - Define expansion and step cost over [`Combination`]s
/// - Decode combinations back into outcome identifiers
#[derive(Debug, Clone)]
pub struct EventSet {
	events: Vec<Event>,
}

impl EventSet {
	/// Wraps the events, rejecting an empty set.
	///
	/// Events themselves are guaranteed non-empty by construction
	/// ([`Event::from_frequencies`]), so a valid `EventSet` can always be
	/// enumerated starting from the all-zero combination.
	pub fn new(events: Vec<Event>) -> Result<Self, ModelError> {
		if events.is_empty() {
			return Err(ModelError::NoEvents);
		}
		Ok(Self { events })
	}

	pub fn events(&self) -> &[Event] {
		&self.events
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Number of distinct combinations over this set (product of the
	/// per-event sample-space sizes).
	pub fn combination_count(&self) -> u128 {
		self.events.iter().map(|e| e.len() as u128).product()
	}

	/// Joint log-probability of the all-zero combination, the best any
	/// combination can achieve.
	pub fn best_log_probability(&self) -> f64 {
		self.events.iter().map(|e| e.best().log_probability).sum()
	}

	/// Joint log-probability of an arbitrary combination.
	pub fn log_probability(&self, combination: &Combination) -> f64 {
		self.check_dimensionality(combination);
		combination
			.indices()
			.iter()
			.enumerate()
			.map(|(i, &idx)| self.events[i].outcomes[idx as usize].log_probability)
			.sum()
	}

	/// Decodes a combination into the outcome identifiers it selects.
	pub fn outcome_ids(&self, combination: &Combination) -> Vec<u32> {
		self.check_dimensionality(combination);
		combination
			.indices()
			.iter()
			.enumerate()
			.map(|(i, &idx)| self.events[i].outcomes[idx as usize].id)
			.collect()
	}

	/// Successors of a combination: one per dimension that still has a
	/// less likely outcome to fall back to. Branching factor <= number of
	/// events.
	pub(crate) fn expand(&self, combination: &Combination) -> Vec<Combination> {
		self.check_dimensionality(combination);
		let mut successors = Vec::new();
		for (dim, &idx) in combination.indices().iter().enumerate() {
			if (idx as usize) + 1 < self.events[dim].len() {
				successors.push(combination.bump(dim));
			}
		}
		successors
	}

	/// Log-probability drop of a single-dimension increment. Non-negative
	/// because every event is sorted descending, and additive per
	/// dimension, which makes cumulative costs path-independent.
	///
	/// # Panics
	/// If the combinations differ in dimensionality or in anything other
	/// than exactly one dimension; both indicate a caller bug, not data.
	pub(crate) fn step_cost(&self, prev: &Combination, next: &Combination) -> f64 {
		self.check_dimensionality(prev);
		self.check_dimensionality(next);
		let mut changed: Option<usize> = None;
		for (dim, (&a, &b)) in prev.indices().iter().zip(next.indices()).enumerate() {
			if a != b {
				assert!(
					changed.is_none(),
					"combinations differ in more than one dimension"
				);
				changed = Some(dim);
			}
		}
		let dim = changed.expect("combinations do not differ in any dimension");
		let outcomes = self.events[dim].outcomes();
		outcomes[prev.indices()[dim] as usize].log_probability
			- outcomes[next.indices()[dim] as usize].log_probability
	}

	fn check_dimensionality(&self, combination: &Combination) {
		assert_eq!(
			combination.len(),
			self.events.len(),
			"combination dimensionality does not match event count"
		);
	}
}
