use std::process::ExitCode;

use clap::Parser;
use log::error;
use mts_config::{RunDefaults, YamlGeometryRegistry};
use mts_core::MtsError;
use mts_gen::KinematicCheck;
use mts_sim::{execute, logging, Cli, ExternalKernel, LogSink};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let sink = LogSink::default();
    let logger = logging::init(cli.debug, &sink);
    if let Err(err) = &logger {
        eprintln!("{err}");
    }
    match run(&cli, &sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if logger.is_ok() {
                error!("{err}");
            } else {
                eprintln!("{err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli, sink: &LogSink) -> Result<(), MtsError> {
    let defaults = match &cli.defaults {
        Some(path) => RunDefaults::load(path)?,
        None => RunDefaults::default(),
    };
    let registry = YamlGeometryRegistry::new(cli.geometry_path());
    let mut controller = ExternalKernel::new(cli.kernel.clone());
    execute(
        &cli.raw_options(),
        &defaults,
        &registry,
        &mut controller,
        &KinematicCheck,
        sink,
    )?;
    Ok(())
}
