//! Text-format serializer for frequency data files.
//!
//! Mirror image of [`super::loader`]: writing a model and loading the
//! result reproduces the model exactly.

use std::io::{self, Write};

use super::model::{FrequencyModel, ReplacementRow};

/// Writes the four sections in canonical order: `:prefix:`, `:suffix:`,
/// `:leading:`, `:normal:`.
pub fn write_model<W: Write>(model: &FrequencyModel, mut writer: W) -> io::Result<()> {
	write_affix_section(&mut writer, ":prefix:", &model.prefixes, &model.prefix_frequencies)?;
	write_affix_section(&mut writer, ":suffix:", &model.suffixes, &model.suffix_frequencies)?;
	write_replacement_section(&mut writer, ":leading:", &model.leading)?;
	write_replacement_section(&mut writer, ":normal:", &model.normal)?;
	Ok(())
}

fn write_affix_section<W: Write>(
	writer: &mut W,
	tag: &str,
	items: &[String],
	freqs: &[u64],
) -> io::Result<()> {
	writeln!(writer, "{tag}")?;
	writeln!(writer, "START {}", items.len())?;
	for (item, freq) in items.iter().zip(freqs) {
		// The sigil keeps the empty affix a readable token.
		writeln!(writer, ">{item}")?;
		writeln!(writer, "{freq}")?;
	}
	writeln!(writer, "END")?;
	Ok(())
}

fn write_replacement_section<W: Write>(
	writer: &mut W,
	tag: &str,
	rows: &[ReplacementRow],
) -> io::Result<()> {
	writeln!(writer, "{tag}")?;
	writeln!(writer, "START {}", rows.len())?;
	for row in rows {
		write!(writer, "{}", row.replacements.len())?;
		for (byte, freq) in row.replacements.iter().zip(&row.frequencies) {
			write!(writer, " {byte}:{freq}")?;
		}
		writeln!(writer)?;
	}
	writeln!(writer, "END")?;
	Ok(())
}
