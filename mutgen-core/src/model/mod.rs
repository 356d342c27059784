//! Probability-event model and its ranked enumeration.
//!
//! [`event`] holds the per-position sample spaces, [`combination`] the
//! index tuples the search walks over, and [`enumerator`] ties both to the
//! generic engine in [`crate::search`].

pub mod combination;
pub mod enumerator;
pub mod event;

pub use combination::Combination;
pub use enumerator::{CombinationEnumerator, RankedCombination};
pub use event::{Event, EventSet, Outcome};
