use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mutgen_core::freqdata::FrequencyModel;
use mutgen_core::mutation::SeedMutator;

const FREQDATA_DEFAULT_PATH: &str = "/usr/share/mutgen/freqdata.frq";

/// Emit ranked mutations of a seed word, most likely password first.
///
/// Candidates go to standard output, one per line, each of the form
/// `<prefix><mutated seed><suffix>`. Diagnostics go to standard error.
#[derive(Parser)]
#[command(name = "mutator")]
struct Args {
	/// Seed word to mutate
	seed: String,

	/// Frequency data file mined from a password corpus
	#[arg(default_value = FREQDATA_DEFAULT_PATH)]
	freqdata: PathBuf,
}

fn main() -> ExitCode {
	env_logger::init();
	let args = Args::parse();

	let model = match FrequencyModel::load_cached(&args.freqdata) {
		Ok(model) => model,
		Err(e) => {
			log::error!("No frequency data loaded from {}: {e}", args.freqdata.display());
			return ExitCode::FAILURE;
		}
	};

	let mutator = match SeedMutator::new(&model, &args.seed) {
		Ok(mutator) => mutator,
		Err(e) => {
			log::error!("Cannot mutate {:?}: {e}", args.seed);
			return ExitCode::FAILURE;
		}
	};

	let stdout = io::stdout();
	let mut out = BufWriter::new(stdout.lock());
	match mutator.write_candidates(&mut out).and_then(|()| out.flush()) {
		Ok(()) => ExitCode::SUCCESS,
		// The consumer stopped pulling; that is a normal end of stream.
		Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("Failed writing candidates: {e}");
			ExitCode::FAILURE
		}
	}
}
