//! netprompt - a menu-driven command line
//!
//! Usage:
//!   netprompt              Start the interactive prompt
//!   netprompt -c "line"    Run a single line

mod cli;
mod demo;
mod rcfile;
mod repl;

use cli::{parse_args, print_help, print_version};
use netprompt::{Config, Engine, Outcome};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.trace);

    let config = Config::discover(cli.config.as_deref());
    let engine = match demo::build(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(line) = cli.command {
        return execute_line(engine, &line);
    }

    match repl::run_repl(engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("REPL error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one line; succeeds only when every statement ran
fn execute_line(mut engine: Engine, line: &str) -> ExitCode {
    match engine.evaluate(line, &mut io::stdout()) {
        Ok(Outcome::Executed(_)) | Ok(Outcome::Empty) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
