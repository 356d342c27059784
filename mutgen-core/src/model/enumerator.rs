use crate::search::RankedSearch;
use super::combination::Combination;
use super::event::EventSet;

type ExpandFn<'a> = Box<dyn Fn(&Combination) -> Vec<Combination> + 'a>;
type CostFn<'a> = Box<dyn Fn(&Combination, &Combination) -> f64 + 'a>;

/// One emission of the enumerator: a combination, the outcome identifiers
/// it selects, and its joint log-probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCombination {
	pub combination: Combination,
	pub outcome_ids: Vec<u32>,
	pub log_probability: f64,
}

/// Lazy, best-first enumeration of every combination of an [`EventSet`],
/// in non-increasing order of joint log-probability.
///
/// Binds the event set to a [`RankedSearch`]: expansion increments one
/// event's outcome index, the edge cost is the log-probability drop of
/// that increment. Those costs are additive per dimension, so cumulative
/// cost is a pure function of the combination and the engine's
/// enqueue-time deduplication applies.
///
/// The search starts from the all-zero combination, which the descending
/// outcome order makes the global optimum. The full stream visits
/// `Π sample-space sizes` combinations, each exactly once; consumers that
/// stop pulling simply drop the enumerator, frontier and all.
///
/// The event set enters the expansion and cost closures by capture; no
/// state is shared between enumerators, so independent enumerations of
/// the same set may run concurrently.
pub struct CombinationEnumerator<'a> {
	events: &'a EventSet,
	search: RankedSearch<Combination, ExpandFn<'a>, CostFn<'a>>,
}

impl<'a> CombinationEnumerator<'a> {
	/// Seeds an enumeration over `events`.
	///
	/// [`EventSet::new`] has already rejected empty configurations, so
	/// construction cannot fail and the all-zero start is always in range.
	pub fn new(events: &'a EventSet) -> Self {
		let expand: ExpandFn<'a> = Box::new(move |c| events.expand(c));
		let cost: CostFn<'a> = Box::new(move |prev, next| events.step_cost(prev, next));
		let mut search = RankedSearch::new(expand, cost);
		search.set_start(Combination::zeros(events.len()));
		Self { events, search }
	}

	/// Runs the enumeration to exhaustion, handing each combination's
	/// outcome identifiers to `on_combination` in likelihood order.
	pub fn enumerate<F>(events: &'a EventSet, mut on_combination: F)
	where
		F: FnMut(&[u32]),
	{
		for ranked in Self::new(events) {
			on_combination(&ranked.outcome_ids);
		}
	}
}

impl Iterator for CombinationEnumerator<'_> {
	type Item = RankedCombination;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.search.next()?;
		Some(RankedCombination {
			outcome_ids: self.events.outcome_ids(&node.value),
			log_probability: self.events.best_log_probability() - node.cost,
			combination: node.value,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::event::Event;
	use std::collections::HashSet;

	fn three_event_set() -> EventSet {
		EventSet::new(vec![
			Event::from_frequencies(&[1, 2, 3, 4], &[100, 100, 100, 100]).unwrap(),
			Event::from_frequencies(&[5, 6], &[75, 25]).unwrap(),
			Event::from_frequencies(&[7, 8, 9], &[80, 80, 640]).unwrap(),
		])
		.unwrap()
	}

	#[test]
	fn first_emission_is_the_most_likely_combination() {
		let set = three_event_set();
		let first = CombinationEnumerator::new(&set).next().unwrap();
		assert_eq!(first.combination.indices(), &[0, 0, 0]);
		assert_eq!(first.outcome_ids, vec![1, 5, 9]);
		assert!((first.log_probability - set.best_log_probability()).abs() < 1e-12);
	}

	#[test]
	fn emits_every_combination_exactly_once() {
		let set = three_event_set();
		let emitted: Vec<_> = CombinationEnumerator::new(&set).collect();
		assert_eq!(emitted.len() as u128, set.combination_count());
		assert_eq!(emitted.len(), 24);
		let unique: HashSet<_> = emitted.iter().map(|r| r.combination.clone()).collect();
		assert_eq!(unique.len(), emitted.len());
	}

	#[test]
	fn joint_log_probability_never_increases() {
		let set = three_event_set();
		let emitted: Vec<_> = CombinationEnumerator::new(&set).collect();
		for pair in emitted.windows(2) {
			assert!(pair[0].log_probability >= pair[1].log_probability - 1e-12);
		}
	}

	#[test]
	fn tied_worst_combinations_both_come_last() {
		let set = three_event_set();
		let emitted: Vec<_> = CombinationEnumerator::new(&set).collect();
		// {4,6,7} and {4,6,8} share the worst joint probability and must
		// close the stream; index order fixes which of the two goes first.
		assert_eq!(emitted[22].outcome_ids, vec![4, 6, 7]);
		assert_eq!(emitted[23].outcome_ids, vec![4, 6, 8]);
	}

	#[test]
	fn tied_probabilities_resolve_by_index_order() {
		let set = three_event_set();
		let emitted: Vec<_> = CombinationEnumerator::new(&set).collect();
		// {3,6,8} ties with {4,6,7} on joint probability and on depth;
		// combination (2,1,2) orders before (3,1,1), so it emits first.
		let pos = |ids: &[u32]| {
			emitted.iter().position(|r| r.outcome_ids == ids).unwrap()
		};
		assert!(pos(&[3, 6, 8]) < pos(&[4, 6, 7]));
	}

	#[test]
	fn reported_probability_matches_the_direct_sum() {
		// base - cumulative_cost must equal the per-dimension sum no
		// matter which expansion path discovered the combination.
		let set = three_event_set();
		for ranked in CombinationEnumerator::new(&set) {
			let direct = set.log_probability(&ranked.combination);
			assert!((ranked.log_probability - direct).abs() < 1e-9);
		}
	}

	#[test]
	fn callback_driver_sees_the_same_stream() {
		let set = three_event_set();
		let mut collected = Vec::new();
		CombinationEnumerator::enumerate(&set, |ids| collected.push(ids.to_vec()));
		let iterated: Vec<_> = CombinationEnumerator::new(&set)
			.map(|r| r.outcome_ids)
			.collect();
		assert_eq!(collected, iterated);
	}

	#[test]
	fn concurrent_enumerations_do_not_interfere() {
		let set = three_event_set();
		let mut a = CombinationEnumerator::new(&set);
		let mut b = CombinationEnumerator::new(&set);
		a.next();
		a.next();
		// b still starts at the optimum regardless of a's progress.
		assert_eq!(b.next().unwrap().outcome_ids, vec![1, 5, 9]);
	}

	#[test]
	fn single_event_set_enumerates_its_outcomes_in_order() {
		let set =
			EventSet::new(vec![Event::from_frequencies(&[3, 1, 2], &[10, 60, 30]).unwrap()])
				.unwrap();
		let ids: Vec<_> = CombinationEnumerator::new(&set)
			.map(|r| r.outcome_ids[0])
			.collect();
		assert_eq!(ids, vec![1, 2, 3]);
	}
}
