/// One full assignment of outcome indices across all events of a set.
///
/// A combination is a plain value: structural equality and hashing over
/// the index array, no shared state, cheap to clone. Index `i` selects an
/// outcome from event `i` of the [`super::EventSet`] the combination was
/// produced for; combinations are meaningless outside that set.
///
/// Combinations order lexicographically over their indices; the search
/// frontier falls back to that ordering for entries tied on cost and
/// depth, keeping the emission order well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination(Vec<u32>);

impl Combination {
	/// The all-zero combination over `n_events` dimensions. Because every
	/// event keeps its outcomes sorted by descending probability, this is
	/// always the globally most likely assignment.
	pub fn zeros(n_events: usize) -> Self {
		Self(vec![0; n_events])
	}

	pub fn indices(&self) -> &[u32] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// A copy of this combination with dimension `dim` incremented by one.
	pub(crate) fn bump(&self, dim: usize) -> Self {
		let mut indices = self.0.clone();
		indices[dim] += 1;
		Self(indices)
	}
}

impl From<Vec<u32>> for Combination {
	fn from(indices: Vec<u32>) -> Self {
		Self(indices)
	}
}
