use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use lantern::core::command::NullProcessor;
use lantern::core::config::{self, Overrides};
use lantern::signal::{SignalBridge, SignalRegistry};
use lantern::tui::Console;

#[derive(Parser)]
#[command(name = "lantern", about = "Terminal console for interactive text applications")]
struct Args {
    /// Path to the config file (default: ~/.lantern/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render loop pacing in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Log file path (logs never go to the terminal; the UI owns it)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match config::resolve(Overrides {
        config_path: args.config,
        tick_ms: args.tick_ms,
        log_file: args.log_file,
        log_level: args.log_level,
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lantern: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
    log::info!("lantern starting up");

    let registry = Arc::new(SignalRegistry::new());
    let _bridge = match SignalBridge::install(Arc::clone(&registry)) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("lantern: cannot install signal handlers: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut console = match Console::new(&config, Box::new(NullProcessor), Arc::clone(&registry)) {
        Ok(console) => console,
        Err(e) => {
            // Console::new restored the terminal before returning the error.
            log::warn!("startup failed: {e}");
            eprintln!("lantern: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = console.run();
    drop(console); // restore the terminal before reporting anything

    if let Err(e) = result {
        eprintln!("lantern: {e}");
        return ExitCode::FAILURE;
    }
    log::info!("lantern exited cleanly");
    ExitCode::SUCCESS
}
