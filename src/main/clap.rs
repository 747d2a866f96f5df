//! Integration with `clap`

use std::path::PathBuf;

use clap::Parser;

/// Commandline arguments
#[derive(Parser, Debug)]
#[clap(version = transerv_core::info::version(), about, long_about = None)]
pub(crate) struct Args {
	#[arg(short, long)]
	/// Optional argument to the path of a transerv config TOML file
	pub(crate) config: Option<PathBuf>,

	/// Number of tokio worker threads; defaults to available parallelism
	#[arg(long, default_value_t = transerv_core::utils::available_parallelism())]
	pub(crate) worker_threads: usize,

	/// Pin each tokio worker thread to a distinct core
	#[arg(long, default_value_t = false)]
	pub(crate) worker_affinity: bool,
}

/// Parse commandline arguments into structured data
#[must_use]
pub(crate) fn parse() -> Args { Args::parse() }
