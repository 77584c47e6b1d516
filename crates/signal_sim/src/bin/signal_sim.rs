//! # Signal Simulation Runner
//!
//! Usage: `signal_sim [-v|-vv] [config.toml]`
//!
//! Without a config file the default setup runs: 4 intersections,
//! 3 vehicles each, 30 seconds, lights cycling every 4-7 seconds.

use signal_sim::{init_logging, SimConfig, SimResult, Simulation};
use std::process::ExitCode;

fn run(config_path: Option<&str>) -> SimResult<()> {
    let config = match config_path {
        Some(path) => {
            tracing::info!("loading config from {path}");
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };

    let report = Simulation::new(config)?.run()?;
    println!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    let mut verbosity = 1u8;
    let mut config_path = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "-q" => verbosity = 0,
            _ => config_path = Some(arg),
        }
    }

    init_logging(verbosity);

    match run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("simulation failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
