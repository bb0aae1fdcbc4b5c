#[macro_use] extern crate log;

use serde_json::Value;
use simplelog::*;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::process;
use thiserror::Error;

use disjointset::{write_outcomes, DisjointSetError, Workload, WorkloadError};

#[derive(Debug, Error)]
enum SetupError {
	#[error("Failed to read stdin: {0}")]
	Io(#[from] io::Error),

	#[error("Failed to parse workload: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Unknown log level `{0}`")]
	LogLevel(String),

	#[error("Cannot create log file `{path}`: {error}")]
	LogFile { path: String, error: io::Error },

	#[error("Failed to install logger: {0}")]
	Logger(#[from] log::SetLoggerError),
}

// Reads one JSON workload from stdin, replays it and prints one outcome per line.
fn main() {
	let settings = match read_settings() {
		Ok(settings) => settings,
		Err(err) => {
			eprintln!("{}", err);
			process::exit(2);
		}
	};

	let outcomes = match Workload::from_value(&settings).and_then(|workload| workload.replay()) {
		Ok(outcomes) => outcomes,
		Err(err) => {
			if let WorkloadError::Replay { source: DisjointSetError::CorruptStructure(_), .. } = &err {
				error!("the forest is corrupt, this is a bug");
			}
			error!("{}", err);
			process::exit(1);
		}
	};

	let stdout = io::stdout();
	if let Err(err) = write_outcomes(BufWriter::new(stdout.lock()), &outcomes) {
		error!("Failed to write outcomes: {}", err);
		process::exit(1);
	}
}

fn read_settings() -> Result<Value, SetupError> {
	let mut input = String::new();
	io::stdin().read_to_string(&mut input)?;
	let settings: Value = serde_json::from_str(&input)?;
	init_logging(&settings)?;
	Ok(settings)
}

fn init_logging(settings: &Value) -> Result<(), SetupError> {
	let level = match settings["log_level"].as_str() {
		Some(name) => name.parse::<LevelFilter>().map_err(|_| SetupError::LogLevel(name.to_string()))?,
		None => LevelFilter::Info,
	};
	let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();

	let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
		TermLogger::new(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto),
	];
	if let Some(path) = settings["log_file"].as_str() {
		let file = File::create(path)
			.map_err(|error| SetupError::LogFile { path: path.to_string(), error })?;
		loggers.push(WriteLogger::new(level, config, file));
	}
	CombinedLogger::init(loggers)?;
	Ok(())
}
