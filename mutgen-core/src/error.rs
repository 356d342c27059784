use thiserror::Error;

/// Configuration errors raised while assembling an event model.
///
/// All of these are rejected before any search work begins: a model that
/// fails construction can never reach the enumeration engine.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
	/// The seed word was empty; there is nothing to mutate.
	#[error("empty seed word")]
	EmptySeed,

	/// An event set was built with no events at all.
	#[error("event set has no events")]
	NoEvents,

	/// An event was built with an empty sample space. The all-zero start
	/// combination would index out of range, so this is refused outright.
	#[error("event has no outcomes")]
	NoOutcomes,

	/// Identifier and frequency arrays for one event differ in length.
	#[error("outcome identifier/frequency count mismatch: {ids} ids, {freqs} frequencies")]
	LengthMismatch { ids: usize, freqs: usize },

	/// A zero frequency has no defined log-probability and would poison
	/// the cost arithmetic of the search.
	#[error("outcome {index} has zero frequency")]
	ZeroFrequency { index: usize },

	/// The frequency data holds no replacements for one of the seed bytes.
	#[error("no {role} replacements recorded for byte {byte:#04x}")]
	NoReplacements { byte: u8, role: &'static str },

	/// The prefix or suffix table of the frequency data is empty.
	#[error("no {role} entries in frequency data")]
	EmptyTable { role: &'static str },
}

/// Errors raised while reading or caching a frequency data file.
///
/// Parsing fails wholesale: a malformed file never yields a partially
/// populated model. Each variant names the section being read so corrupt
/// files can be located by hand.
#[derive(Debug, Error)]
pub enum FreqDataError {
	#[error("failed to read frequency data: {0}")]
	Io(#[from] std::io::Error),

	/// A section tag other than the four known ones.
	#[error("unknown section {name:?}")]
	UnknownSection { name: String },

	/// The same section appeared twice.
	#[error("duplicate section {section}")]
	DuplicateSection { section: &'static str },

	/// One of the four mandatory sections never appeared.
	#[error("{section}: section missing")]
	MissingSection { section: &'static str },

	/// The token stream ended inside a section.
	#[error("{section}: unexpected end of input")]
	UnexpectedEof { section: &'static str },

	/// A `START`/`END` sentinel was expected but something else was read.
	#[error("{section}: expected {expected:?}, found {found:?}")]
	BadTag { section: &'static str, expected: &'static str, found: String },

	/// A token could not be parsed as the expected unsigned integer.
	#[error("{section}: bad integer token {token:?}")]
	BadInteger { section: &'static str, token: String },

	/// The replacement sections must carry one row per byte value.
	#[error("{section}: expected 256 rows, found {found}")]
	BadRowCount { section: &'static str, found: usize },

	/// An entry token did not have the expected shape.
	#[error("{section}: malformed entry {token:?}")]
	BadEntry { section: &'static str, token: String },

	/// The binary fast-load cache beside the text file was unreadable.
	#[error("frequency data cache: {0}")]
	Cache(#[from] postcard::Error),
}
