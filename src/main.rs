use clap::Parser;
use std::process::ExitCode;

mod commands;

use catmp4::CatError;
use commands::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match commands::concat::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cfg!(debug_assertions) || verbose {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {}", err);
            }

            match err.downcast_ref::<CatError>() {
                Some(e) => {
                    if e.is_usage() {
                        eprintln!("Run with -h for help.");
                    }
                    e.exit_code()
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}
