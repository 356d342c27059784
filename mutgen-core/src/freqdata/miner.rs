//! Offline corpus mining: aligns each corpus password against a wordlist
//! and tallies the prefixes, suffixes and per-position character
//! substitutions that turn a word into a password.
//!
//! Mining works on raw bytes throughout; affixes are rendered lossily to
//! UTF-8 only when the model is assembled.

use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use super::model::{FrequencyModel, ReplacementRow, REPLACEMENT_ROWS};

/// Minimum character-match fraction at the best alignment offset for a
/// password to count as a derivative of a wordlist word.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Knobs for the mining pass.
#[derive(Debug, Clone, Copy)]
pub struct MinerOptions {
	/// Alignment acceptance threshold in `[0.0, 1.0]`.
	pub match_threshold: f64,
	/// Skip identity observations: the empty prefix/suffix and
	/// replacements of a byte by itself.
	pub skip_identity: bool,
}

impl Default for MinerOptions {
	fn default() -> Self {
		Self {
			match_threshold: DEFAULT_MATCH_THRESHOLD,
			skip_identity: false,
		}
	}
}

/// Accumulates substitution statistics from (word, password) matches.
///
/// # Responsibilities
/// - Find the best alignment of each wordlist word in a password
/// - Tally prefix/suffix occurrences in ordered maps and per-byte
///   replacement counts in 256-row tables
/// - Merge partial miners produced by parallel chunks
/// - Convert the final tallies into a [`FrequencyModel`]
#[derive(Debug, Clone)]
pub struct CorpusMiner {
	options: MinerOptions,
	prefixes: BTreeMap<Vec<u8>, u64>,
	suffixes: BTreeMap<Vec<u8>, u64>,
	leading: Vec<BTreeMap<u8, u64>>,
	normal: Vec<BTreeMap<u8, u64>>,
}

impl CorpusMiner {
	pub fn new(options: MinerOptions) -> Self {
		Self {
			options,
			prefixes: BTreeMap::new(),
			suffixes: BTreeMap::new(),
			leading: vec![BTreeMap::new(); REPLACEMENT_ROWS],
			normal: vec![BTreeMap::new(); REPLACEMENT_ROWS],
		}
	}

	/// Records one corpus password against every word of the wordlist.
	///
	/// A word contributes only when its best alignment reaches the match
	/// threshold; one password may contribute through several words.
	pub fn record_password(&mut self, words: &[Vec<u8>], password: &[u8]) {
		for word in words {
			let Some((offset, score)) = best_alignment(word, password) else {
				continue;
			};
			if score < self.options.match_threshold {
				continue;
			}
			self.record_match(word, password, offset);
		}
	}

	fn record_match(&mut self, word: &[u8], password: &[u8], offset: usize) {
		let skip_identity = self.options.skip_identity;

		let prefix = &password[..offset];
		if !(skip_identity && prefix.is_empty()) {
			*self.prefixes.entry(prefix.to_vec()).or_insert(0) += 1;
		}

		let suffix = &password[offset + word.len()..];
		if !(skip_identity && suffix.is_empty()) {
			*self.suffixes.entry(suffix.to_vec()).or_insert(0) += 1;
		}

		let matched = &password[offset..];
		if !(skip_identity && word[0] == matched[0]) {
			*self.leading[word[0] as usize].entry(matched[0]).or_insert(0) += 1;
		}
		for i in 1..word.len() {
			if skip_identity && word[i] == matched[i] {
				continue;
			}
			*self.normal[word[i] as usize].entry(matched[i]).or_insert(0) += 1;
		}
	}

	/// Sums another miner's tallies into this one. Used to fold the
	/// partial miners built by parallel corpus chunks.
	pub fn merge(&mut self, other: Self) {
		for (prefix, count) in other.prefixes {
			*self.prefixes.entry(prefix).or_insert(0) += count;
		}
		for (suffix, count) in other.suffixes {
			*self.suffixes.entry(suffix).or_insert(0) += count;
		}
		for (mine, theirs) in self.leading.iter_mut().zip(other.leading) {
			for (byte, count) in theirs {
				*mine.entry(byte).or_insert(0) += count;
			}
		}
		for (mine, theirs) in self.normal.iter_mut().zip(other.normal) {
			for (byte, count) in theirs {
				*mine.entry(byte).or_insert(0) += count;
			}
		}
	}

	/// Converts the tallies into a frequency model. Affixes come out in
	/// the ordered-map iteration order, so repeated mining runs over the
	/// same corpus produce byte-identical files.
	pub fn into_model(self) -> FrequencyModel {
		let mut model = FrequencyModel::empty();
		for (prefix, count) in self.prefixes {
			model.prefixes.push(String::from_utf8_lossy(&prefix).into_owned());
			model.prefix_frequencies.push(count);
		}
		for (suffix, count) in self.suffixes {
			model.suffixes.push(String::from_utf8_lossy(&suffix).into_owned());
			model.suffix_frequencies.push(count);
		}
		for (row, counts) in model.leading.iter_mut().zip(self.leading) {
			*row = row_from_counts(counts);
		}
		for (row, counts) in model.normal.iter_mut().zip(self.normal) {
			*row = row_from_counts(counts);
		}
		model
	}
}

fn row_from_counts(counts: BTreeMap<u8, u64>) -> ReplacementRow {
	let mut row = ReplacementRow::default();
	for (byte, count) in counts {
		row.replacements.push(byte);
		row.frequencies.push(count);
	}
	row
}

/// ASCII-case-insensitive fraction of word bytes matching the password
/// window starting at the candidate offset.
fn match_fraction(word: &[u8], window: &[u8]) -> f64 {
	let matching = word
		.iter()
		.zip(window)
		.filter(|(a, b)| a.eq_ignore_ascii_case(b))
		.count();
	matching as f64 / word.len() as f64
}

/// Best offset of `word` inside `password` and its match fraction.
/// `None` when the word is empty or longer than the password.
fn best_alignment(word: &[u8], password: &[u8]) -> Option<(usize, f64)> {
	if word.is_empty() || password.len() < word.len() {
		return None;
	}
	let mut best: Option<(usize, f64)> = None;
	for offset in 0..=password.len() - word.len() {
		let score = match_fraction(word, &password[offset..]);
		match best {
			Some((_, best_score)) if best_score >= score => {}
			_ => best = Some((offset, score)),
		}
	}
	best
}

/// Mines a corpus read line by line from `reader`, sequentially.
///
/// Lines are raw byte strings; passwords that are not valid UTF-8 are
/// mined like any other.
pub fn mine_corpus<R: BufRead>(
	words: &[Vec<u8>],
	reader: R,
	options: MinerOptions,
) -> io::Result<CorpusMiner> {
	let mut miner = CorpusMiner::new(options);
	for line in reader.split(b'\n') {
		let line = line?;
		miner.record_password(words, trim_cr(&line));
	}
	Ok(miner)
}

fn trim_cr(line: &[u8]) -> &[u8] {
	line.strip_suffix(b"\r").unwrap_or(line)
}

/// Mines an in-memory corpus across all CPU cores.
///
/// The lines are split into chunks, each chunk mined on its own thread
/// into a partial miner, and the partials folded together over an MPSC
/// channel. Mining is embarrassingly parallel; only the fold is
/// sequential.
pub fn mine_corpus_parallel(
	words: &[Vec<u8>],
	lines: Vec<Vec<u8>>,
	options: MinerOptions,
) -> CorpusMiner {
	if lines.is_empty() {
		return CorpusMiner::new(options);
	}

	let words = Arc::new(words.to_vec());
	let cpus = num_cpus::get();
	let factor = 8;
	let chunks = cpus * factor;
	let chunk_size = ((lines.len() + chunks - 1) / chunks).max(1);

	let (tx, rx) = mpsc::channel();
	for chunk in lines.chunks(chunk_size) {
		let tx = tx.clone();
		let words = Arc::clone(&words);
		let chunk: Vec<Vec<u8>> = chunk.to_vec();

		thread::spawn(move || {
			let mut partial = CorpusMiner::new(options);
			for password in chunk {
				partial.record_password(&words, trim_cr(&password));
			}
			tx.send(partial).expect("Failed to send from thread");
		});
	}
	drop(tx);

	let mut miner = CorpusMiner::new(options);
	for partial in rx.iter() {
		miner.merge(partial);
	}
	miner
}
