//! Text-format parser for frequency data files.
//!
//! The format is a stream of ASCII-whitespace-delimited tokens; line
//! structure is cosmetic. Four sections, each introduced by its tag
//! (`:prefix:`, `:suffix:`, `:leading:`, `:normal:`), then `START <count>`,
//! the entries, then `END`. Affix entries are a `>`-sigiled token followed
//! by an integer count (the sigil keeps the empty affix representable);
//! replacement sections carry exactly one row per byte value, each row an
//! entry count followed by that many `<byte>:<frequency>` pairs.
//!
//! Sections may appear in any order but each exactly once. Parsing fails
//! wholesale on the first malformed token.

use crate::error::FreqDataError;
use super::model::{FrequencyModel, ReplacementRow, REPLACEMENT_ROWS};

const PREFIX_TAG: &str = ":prefix:";
const SUFFIX_TAG: &str = ":suffix:";
const LEADING_TAG: &str = ":leading:";
const NORMAL_TAG: &str = ":normal:";

/// Parses a complete frequency data file.
pub fn parse(text: &str) -> Result<FrequencyModel, FreqDataError> {
	let mut tokens = Tokens::new(text);
	let mut prefixes: Option<(Vec<String>, Vec<u64>)> = None;
	let mut suffixes: Option<(Vec<String>, Vec<u64>)> = None;
	let mut leading: Option<Vec<ReplacementRow>> = None;
	let mut normal: Option<Vec<ReplacementRow>> = None;

	while let Some(tag) = tokens.next_opt() {
		match tag {
			PREFIX_TAG => {
				store_once(&mut prefixes, parse_affix_section(&mut tokens, PREFIX_TAG)?, PREFIX_TAG)?
			}
			SUFFIX_TAG => {
				store_once(&mut suffixes, parse_affix_section(&mut tokens, SUFFIX_TAG)?, SUFFIX_TAG)?
			}
			LEADING_TAG => store_once(
				&mut leading,
				parse_replacement_section(&mut tokens, LEADING_TAG)?,
				LEADING_TAG,
			)?,
			NORMAL_TAG => store_once(
				&mut normal,
				parse_replacement_section(&mut tokens, NORMAL_TAG)?,
				NORMAL_TAG,
			)?,
			unknown => {
				return Err(FreqDataError::UnknownSection {
					name: unknown.to_owned(),
				});
			}
		}
	}

	let (prefixes, prefix_frequencies) = prefixes.ok_or(FreqDataError::MissingSection {
		section: PREFIX_TAG,
	})?;
	let (suffixes, suffix_frequencies) = suffixes.ok_or(FreqDataError::MissingSection {
		section: SUFFIX_TAG,
	})?;
	let leading = leading.ok_or(FreqDataError::MissingSection {
		section: LEADING_TAG,
	})?;
	let normal = normal.ok_or(FreqDataError::MissingSection {
		section: NORMAL_TAG,
	})?;

	Ok(FrequencyModel {
		prefixes,
		prefix_frequencies,
		suffixes,
		suffix_frequencies,
		leading,
		normal,
	})
}

fn store_once<T>(
	slot: &mut Option<T>,
	value: T,
	section: &'static str,
) -> Result<(), FreqDataError> {
	if slot.is_some() {
		return Err(FreqDataError::DuplicateSection { section });
	}
	*slot = Some(value);
	Ok(())
}

/// `:prefix:` / `:suffix:` body: `START <n>`, `n` sigiled-token/count
/// pairs, `END`.
fn parse_affix_section(
	tokens: &mut Tokens<'_>,
	section: &'static str,
) -> Result<(Vec<String>, Vec<u64>), FreqDataError> {
	tokens.expect(section, "START")?;
	let n_items = tokens.next_usize(section)?;

	// The count is untrusted file data; cap the preallocation and let a
	// genuinely large section grow as it parses.
	let mut items = Vec::with_capacity(n_items.min(1024));
	let mut freqs = Vec::with_capacity(n_items.min(1024));
	for _ in 0..n_items {
		let token = tokens.next(section)?;
		let Some(affix) = token.strip_prefix('>') else {
			return Err(FreqDataError::BadEntry {
				section,
				token: token.to_owned(),
			});
		};
		items.push(affix.to_owned());
		freqs.push(tokens.next_u64(section)?);
	}
	tokens.expect(section, "END")?;

	Ok((items, freqs))
}

/// `:leading:` / `:normal:` body: `START 256`, 256 rows of
/// `<k> <byte>:<freq> ...`, `END`.
fn parse_replacement_section(
	tokens: &mut Tokens<'_>,
	section: &'static str,
) -> Result<Vec<ReplacementRow>, FreqDataError> {
	tokens.expect(section, "START")?;
	let n_rows = tokens.next_usize(section)?;
	if n_rows != REPLACEMENT_ROWS {
		return Err(FreqDataError::BadRowCount {
			section,
			found: n_rows,
		});
	}

	let mut rows = Vec::with_capacity(REPLACEMENT_ROWS);
	for _ in 0..REPLACEMENT_ROWS {
		let n_entries = tokens.next_usize(section)?;
		let mut row = ReplacementRow::default();
		for _ in 0..n_entries {
			let pair = tokens.next(section)?;
			let Some((byte_text, freq_text)) = pair.split_once(':') else {
				return Err(FreqDataError::BadEntry {
					section,
					token: pair.to_owned(),
				});
			};
			let byte: u8 = byte_text.parse().map_err(|_| FreqDataError::BadInteger {
				section,
				token: byte_text.to_owned(),
			})?;
			let freq: u64 = freq_text.parse().map_err(|_| FreqDataError::BadInteger {
				section,
				token: freq_text.to_owned(),
			})?;
			row.replacements.push(byte);
			row.frequencies.push(freq);
		}
		rows.push(row);
	}
	tokens.expect(section, "END")?;

	Ok(rows)
}

/// Whitespace token stream with section-aware error reporting.
struct Tokens<'a> {
	inner: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
	fn new(text: &'a str) -> Self {
		Self {
			inner: text.split_ascii_whitespace(),
		}
	}

	fn next_opt(&mut self) -> Option<&'a str> {
		self.inner.next()
	}

	fn next(&mut self, section: &'static str) -> Result<&'a str, FreqDataError> {
		self.inner
			.next()
			.ok_or(FreqDataError::UnexpectedEof { section })
	}

	fn expect(&mut self, section: &'static str, expected: &'static str) -> Result<(), FreqDataError> {
		let token = self.next(section)?;
		if token != expected {
			return Err(FreqDataError::BadTag {
				section,
				expected,
				found: token.to_owned(),
			});
		}
		Ok(())
	}

	fn next_u64(&mut self, section: &'static str) -> Result<u64, FreqDataError> {
		let token = self.next(section)?;
		token.parse().map_err(|_| FreqDataError::BadInteger {
			section,
			token: token.to_owned(),
		})
	}

	fn next_usize(&mut self, section: &'static str) -> Result<usize, FreqDataError> {
		let token = self.next(section)?;
		token.parse().map_err(|_| FreqDataError::BadInteger {
			section,
			token: token.to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn minimal_file() -> String {
		let mut text = String::new();
		text.push_str(":prefix:\nSTART 2\n>\n10\n>my\n5\nEND\n");
		text.push_str(":suffix:\nSTART 1\n>123\n7\nEND\n");
		for tag in [":leading:", ":normal:"] {
			text.push_str(tag);
			text.push_str("\nSTART 256\n");
			for byte in 0..256usize {
				if byte == b'a' as usize {
					text.push_str("2 97:30 64:3\n");
				} else {
					text.push_str("0\n");
				}
			}
			text.push_str("END\n");
		}
		text
	}

	#[test]
	fn parses_a_complete_file() {
		let model = parse(&minimal_file()).unwrap();
		assert_eq!(model.prefixes, vec!["".to_owned(), "my".to_owned()]);
		assert_eq!(model.prefix_frequencies, vec![10, 5]);
		assert_eq!(model.suffixes, vec!["123".to_owned()]);
		assert_eq!(model.suffix_frequencies, vec![7]);
		assert_eq!(model.leading_row(b'a').replacements, vec![b'a', b'@']);
		assert_eq!(model.leading_row(b'a').frequencies, vec![30, 3]);
		assert_eq!(model.normal_row(b'b').replacements, Vec::<u8>::new());
	}

	#[test]
	fn sections_may_come_in_any_order() {
		let text = minimal_file();
		let sections: Vec<&str> = text
			.split_inclusive("END\n")
			.collect();
		let reordered = format!(
			"{}{}{}{}",
			sections[3], sections[0], sections[2], sections[1]
		);
		assert!(parse(&reordered).is_ok());
	}

	#[test]
	fn missing_end_sentinel_fails_with_the_section_name() {
		let text = ":prefix:\nSTART 0\nEND\n:suffix:\nSTART 1\n>abc\n4\n";
		match parse(text) {
			Err(FreqDataError::UnexpectedEof { section }) => assert_eq!(section, ":suffix:"),
			other => panic!("expected suffix EOF error, got {other:?}"),
		}
	}

	#[test]
	fn absurd_entry_count_fails_without_allocating_for_it() {
		let text = ":prefix:\nSTART 99999999999999\n";
		match parse(text) {
			Err(FreqDataError::UnexpectedEof { section }) => assert_eq!(section, ":prefix:"),
			other => panic!("expected prefix EOF error, got {other:?}"),
		}
	}

	#[test]
	fn unknown_section_is_rejected() {
		assert!(matches!(
			parse(":bogus:\nSTART 0\nEND\n"),
			Err(FreqDataError::UnknownSection { .. })
		));
	}

	#[test]
	fn duplicate_section_is_rejected() {
		let text = ":prefix:\nSTART 0\nEND\n:prefix:\nSTART 0\nEND\n";
		assert!(matches!(
			parse(text),
			Err(FreqDataError::DuplicateSection { section: ":prefix:" })
		));
	}

	#[test]
	fn missing_section_is_rejected() {
		let text = ":prefix:\nSTART 0\nEND\n";
		assert!(matches!(
			parse(text),
			Err(FreqDataError::MissingSection { section: ":suffix:" })
		));
	}

	#[test]
	fn bad_integer_token_names_the_section() {
		let text = ":prefix:\nSTART 1\n>abc\nnotanumber\nEND\n";
		match parse(text) {
			Err(FreqDataError::BadInteger { section, token }) => {
				assert_eq!(section, ":prefix:");
				assert_eq!(token, "notanumber");
			}
			other => panic!("expected bad integer error, got {other:?}"),
		}
	}

	#[test]
	fn affix_entry_without_sigil_is_rejected() {
		let text = ":prefix:\nSTART 1\nabc\n4\nEND\n";
		assert!(matches!(
			parse(text),
			Err(FreqDataError::BadEntry { section: ":prefix:", .. })
		));
	}

	#[test]
	fn replacement_sections_must_have_a_row_per_byte() {
		let text = ":leading:\nSTART 3\n0\n0\n0\nEND\n";
		assert!(matches!(
			parse(text),
			Err(FreqDataError::BadRowCount { section: ":leading:", found: 3 })
		));
	}

	#[test]
	fn malformed_replacement_pair_is_rejected() {
		let mut text = String::from(":leading:\nSTART 256\n");
		text.push_str("1 97-30\n");
		for _ in 1..256 {
			text.push_str("0\n");
		}
		text.push_str("END\n");
		assert!(matches!(
			parse(&text),
			Err(FreqDataError::BadEntry { section: ":leading:", .. })
		));
	}
}
