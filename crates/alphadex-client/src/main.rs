#![forbid(unsafe_code)]

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use alphadex_client::{
    ClientConfig, FilterMsg, FilterViewModel, HttpQueryClient, Input, TerminalSession, map_event,
};
use alphadex_runtime::Program;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Input poll interval; fetch completions are applied between polls.
const TICK: Duration = Duration::from_millis(50);

fn main() -> ExitCode {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("alphadex: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &config.log_file {
        if let Err(e) = init_file_logging(path) {
            eprintln!("alphadex: cannot open log file {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "client failed");
            eprintln!("alphadex: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber installed elsewhere keeps receiving events.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn run(config: &ClientConfig) -> Result<(), Box<dyn Error>> {
    let client = HttpQueryClient::new(config)?;
    let mut program = Program::new(FilterViewModel::with_config(client, config));
    program.init();

    let session = TerminalSession::new()?;
    let (mut width, mut height) = session.size()?;
    program.dispatch(FilterMsg::Resize { width, height });
    info!(base_url = %config.base_url, width, height, "client started");

    let mut dirty = true;
    loop {
        if dirty {
            session.draw(&program.render(width, height))?;
            dirty = false;
        }
        if session.poll_event(TICK)? {
            match map_event(session.read_event()?, config.row_height) {
                Some(Input::Quit) => break,
                Some(Input::Msg(msg)) => {
                    if let FilterMsg::Resize { width: w, height: h } = msg {
                        width = w;
                        height = h;
                    }
                    program.dispatch(msg);
                    dirty = true;
                }
                None => {}
            }
        }
        if program.pump() > 0 {
            dirty = true;
        }
    }
    info!("client exiting");
    Ok(())
}
