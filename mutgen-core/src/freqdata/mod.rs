//! Frequency data: the statistical substitution model mined from real
//! password corpora.
//!
//! [`model`] is the in-memory form, [`loader`]/[`writer`] the text file
//! format it travels in, and [`miner`] the offline corpus analysis that
//! produces it in the first place.

pub mod loader;
pub mod miner;
pub mod model;
pub mod writer;

pub use miner::{CorpusMiner, MinerOptions};
pub use model::{FrequencyModel, ReplacementRow, REPLACEMENT_ROWS};
