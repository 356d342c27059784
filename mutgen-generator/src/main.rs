use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mutgen_core::freqdata::miner::{self, DEFAULT_MATCH_THRESHOLD};
use mutgen_core::freqdata::MinerOptions;
use mutgen_core::io::read_file;

/// Mine password-mutation frequency data.
///
/// Reads a password corpus from standard input, aligns it against the
/// given wordlist, and writes the frequency data file to standard
/// output. Progress goes to standard error.
#[derive(Parser)]
#[command(name = "freqdata-generator")]
struct Args {
	/// Wordlist of seed words to align the corpus against
	wordlist: PathBuf,

	/// Minimum character-match fraction to accept an alignment
	#[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
	threshold: f64,

	/// Do not count identity prefixes, suffixes and replacements
	#[arg(long)]
	skip_identity: bool,
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	if !(0.0..=1.0).contains(&args.threshold) {
		log::error!("Threshold must be between 0.0 and 1.0, got {}", args.threshold);
		return ExitCode::FAILURE;
	}

	let words: Vec<Vec<u8>> = match read_file(&args.wordlist) {
		Ok(lines) => lines
			.into_iter()
			.filter(|line| !line.is_empty())
			.map(String::into_bytes)
			.collect(),
		Err(e) => {
			log::error!("Failed to read wordlist {}: {e}", args.wordlist.display());
			return ExitCode::FAILURE;
		}
	};
	if words.is_empty() {
		log::warn!("Wordlist {} is empty; nothing will match", args.wordlist.display());
	}

	// Raw byte lines: password corpora are not reliably UTF-8.
	let corpus: Vec<Vec<u8>> = match io::stdin().lock().split(b'\n').collect() {
		Ok(lines) => lines,
		Err(e) => {
			log::error!("Failed to read corpus from stdin: {e}");
			return ExitCode::FAILURE;
		}
	};

	log::info!(
		"Mining {} corpus lines against {} words...",
		corpus.len(),
		words.len()
	);
	let options = MinerOptions {
		match_threshold: args.threshold,
		skip_identity: args.skip_identity,
	};
	let model = miner::mine_corpus_parallel(&words, corpus, options).into_model();

	let stdout = io::stdout();
	let mut out = BufWriter::new(stdout.lock());
	if let Err(e) = model.write(&mut out).and_then(|()| out.flush()) {
		log::error!("Failed writing frequency data: {e}");
		return ExitCode::FAILURE;
	}
	log::info!("All recorded");

	ExitCode::SUCCESS
}
