use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FreqDataError;
use crate::io::build_output_path;
use super::{loader, writer};

/// Number of rows in the character-replacement tables: one per byte value.
pub const REPLACEMENT_ROWS: usize = 256;

/// Replacement candidates observed for one original byte, as parallel
/// arrays of replacement byte and occurrence count. May be empty for
/// bytes the corpus never exercised.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ReplacementRow {
	pub replacements: Vec<u8>,
	pub frequencies: Vec<u64>,
}

/// The full substitution statistics mined from a corpus: prefix and
/// suffix tables plus per-byte replacement tables for the leading and the
/// non-leading (normal) position of a word.
///
/// # Invariants
/// - `prefixes` / `prefix_frequencies` are parallel, same for suffixes
/// - `leading` and `normal` always hold exactly [`REPLACEMENT_ROWS`] rows
///
/// The model is plain data; probability normalization happens when events
/// are built from its raw counts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyModel {
	pub prefixes: Vec<String>,
	pub prefix_frequencies: Vec<u64>,
	pub suffixes: Vec<String>,
	pub suffix_frequencies: Vec<u64>,
	pub leading: Vec<ReplacementRow>,
	pub normal: Vec<ReplacementRow>,
}

impl FrequencyModel {
	/// An empty model: no affixes, 256 empty replacement rows per table.
	pub fn empty() -> Self {
		Self {
			prefixes: Vec::new(),
			prefix_frequencies: Vec::new(),
			suffixes: Vec::new(),
			suffix_frequencies: Vec::new(),
			leading: vec![ReplacementRow::default(); REPLACEMENT_ROWS],
			normal: vec![ReplacementRow::default(); REPLACEMENT_ROWS],
		}
	}

	/// Replacement candidates for `byte` at the leading position.
	pub fn leading_row(&self, byte: u8) -> &ReplacementRow {
		&self.leading[byte as usize]
	}

	/// Replacement candidates for `byte` at a non-leading position.
	pub fn normal_row(&self, byte: u8) -> &ReplacementRow {
		&self.normal[byte as usize]
	}

	/// Parses a frequency data file from its text form.
	///
	/// # Errors
	/// Any [`FreqDataError`]; nothing of a malformed file is kept.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FreqDataError> {
		let text = fs::read_to_string(path)?;
		loader::parse(&text)
	}

	/// Loads a model, going through a binary fast-load cache beside the
	/// text file (`<stem>.bin`) when one exists.
	///
	/// On a cache miss the text file is parsed and the cache written
	/// best-effort; a read-only location simply stays uncached.
	pub fn load_cached<P: AsRef<Path>>(path: P) -> Result<Self, FreqDataError> {
		let cache_path = build_output_path(&path, "bin")?;
		if cache_path.exists() {
			let bytes = fs::read(cache_path)?;
			return Ok(postcard::from_bytes(&bytes)?);
		}

		let model = Self::load(&path)?;
		if let Ok(bytes) = postcard::to_stdvec(&model) {
			let _ = fs::write(cache_path, bytes);
		}
		Ok(model)
	}

	/// Serializes the model in the text file format, sections in the
	/// canonical order: `:prefix:`, `:suffix:`, `:leading:`, `:normal:`.
	pub fn write<W: Write>(&self, out: W) -> io::Result<()> {
		writer::write_model(self, out)
	}
}
