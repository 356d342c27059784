use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

/// A value emitted by [`RankedSearch`], together with the cumulative cost
/// of the cheapest expansion path that reached it and the length of the
/// chain of expansions that first discovered it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode<T> {
	pub value: T,
	pub cost: f64,
	pub depth: u64,
}

/// One frontier entry. Ordered by cumulative cost, then discovery depth,
/// then the value's own ordering, so full ties still pop in one
/// well-defined order no matter how the frontier was filled.
struct FrontierEntry<T> {
	cost: f64,
	depth: u64,
	value: T,
}

impl<T: Ord> Ord for FrontierEntry<T> {
	fn cmp(&self, rhs: &Self) -> Ordering {
		self.cost
			.total_cmp(&rhs.cost)
			.then_with(|| self.depth.cmp(&rhs.depth))
			.then_with(|| self.value.cmp(&rhs.value))
	}
}

impl<T: Ord> PartialOrd for FrontierEntry<T> {
	fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
		Some(self.cmp(rhs))
	}
}

impl<T: Ord> PartialEq for FrontierEntry<T> {
	fn eq(&self, rhs: &Self) -> bool {
		self.cmp(rhs) == Ordering::Equal
	}
}

impl<T: Ord> Eq for FrontierEntry<T> {}

/// Best-first traversal of an implicit graph, yielding every value
/// reachable from the start exactly once, in ascending cumulative cost.
///
/// The graph is never materialized: it exists only through the `expand`
/// function (successors of a value) and the `edge_cost` function
/// (non-negative cost of one expansion step). Both receive all of their
/// context through closure capture, so independent searches over the same
/// data can run concurrently.
///
/// # Responsibilities
/// - Maintain a cost-ordered frontier of discovered but unemitted values
/// - Expand the cheapest frontier entry and enqueue unseen successors
/// - Yield values lazily through the [`Iterator`] implementation
///
/// # Correctness precondition
/// Any value reachable via two distinct expansion paths must accumulate
/// identical cost. Under that precondition a value can be marked as
/// discovered when it is first enqueued rather than when it is finalized,
/// which removes the need for a decrease-key operation. Feeding this
/// engine a graph with path-dependent costs produces wrong emission order.
///
/// # Invariants
/// - Every enqueued value is in the discovered set
/// - The discovered set only grows within one run; [`Self::set_start`]
///   resets it
/// - Emitted costs are non-decreasing; entries tied on cost and depth
///   emit in the order defined by `T`'s `Ord`
pub struct RankedSearch<T, E, C>
where
	T: Clone + Eq + Hash + Ord,
	E: Fn(&T) -> Vec<T>,
	C: Fn(&T, &T) -> f64,
{
	expand: E,
	edge_cost: C,
	frontier: BinaryHeap<Reverse<FrontierEntry<T>>>,
	discovered: HashSet<T>,
}

impl<T, E, C> RankedSearch<T, E, C>
where
	T: Clone + Eq + Hash + Ord,
	E: Fn(&T) -> Vec<T>,
	C: Fn(&T, &T) -> f64,
{
	/// Creates an engine over the implicit graph described by `expand`
	/// and `edge_cost`. No traversal state exists until
	/// [`Self::set_start`] seeds it.
	pub fn new(expand: E, edge_cost: C) -> Self {
		Self {
			expand,
			edge_cost,
			frontier: BinaryHeap::new(),
			discovered: HashSet::new(),
		}
	}

	/// Resets the traversal to begin at `start` with cost zero.
	///
	/// Frontier and discovered set from any previous run are dropped.
	pub fn set_start(&mut self, start: T) {
		self.frontier.clear();
		self.discovered.clear();
		self.discovered.insert(start.clone());
		self.frontier.push(Reverse(FrontierEntry {
			cost: 0.0,
			depth: 0,
			value: start,
		}));
	}

	/// True once the frontier is exhausted (or before any start is set).
	pub fn is_complete(&self) -> bool {
		self.frontier.is_empty()
	}
}

impl<T, E, C> Iterator for RankedSearch<T, E, C>
where
	T: Clone + Eq + Hash + Ord,
	E: Fn(&T) -> Vec<T>,
	C: Fn(&T, &T) -> f64,
{
	type Item = RankedNode<T>;

	/// Pops the cheapest frontier entry, enqueues its unseen successors
	/// and yields it. Returns `None` once every reachable value has been
	/// emitted.
	fn next(&mut self) -> Option<Self::Item> {
		let Reverse(entry) = self.frontier.pop()?;

		for child in (self.expand)(&entry.value) {
			if self.discovered.contains(&child) {
				continue;
			}
			let step = (self.edge_cost)(&entry.value, &child);
			assert!(step >= 0.0, "edge cost must be non-negative, got {step}");
			self.discovered.insert(child.clone());
			self.frontier.push(Reverse(FrontierEntry {
				cost: entry.cost + step,
				depth: entry.depth + 1,
				value: child,
			}));
		}

		Some(RankedNode {
			value: entry.value,
			cost: entry.cost,
			depth: entry.depth,
		})
	}
}
