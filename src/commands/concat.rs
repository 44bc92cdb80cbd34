use anyhow::{Context, Result};
use clap::CommandFactory;
use log::{debug, info};
use std::io::{self, Write};

use catmp4::{concat_videos, parse, Config, Parsed, ProcessRunner};

use super::Cli;

const SYNTAX: &str = "Syntax
  catmp4 [OPTIONS] <input> [-ss <startTime>] [-t <duration>] [-to <endTime>] ... -out <fileName>

Concatenates multiple .mp4 files or snippets thereof into one video using ffmpeg.

Per-input flags (must follow an input filename):
  -ss <time>    start offset
  -t <time>     duration
  -to <time>    end offset

  -out <file>   output file; must not exist yet
  -h, -?        show this help
";

pub fn print_help() -> io::Result<()> {
    write_help(&mut io::stdout().lock())
}

/// Write the syntax block and option help. A closed pipe is not an error.
fn write_help(out: &mut impl Write) -> io::Result<()> {
    match write_help_text(out) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn write_help_text(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", SYNTAX)?;
    writeln!(out, "{}", Cli::command().render_help())?;
    out.flush()
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    if cli.job.is_empty() {
        return print_help().context("Failed to print help");
    }

    // Validate the job before touching config or ffmpeg
    let job = match parse(&cli.job)? {
        Parsed::Help => {
            return print_help().context("Failed to print help");
        }
        Parsed::Job(job) => job,
    };

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default()?,
    };
    config.merge_cli(cli.ffmpeg, cli.temp_dir);
    config.validate()?;
    debug!("Using configuration {:?}", config);

    let ffmpeg = config.ffmpeg();
    ffmpeg.check_ffmpeg()?;

    concat_videos(&job, &ffmpeg, &mut ProcessRunner, config.temp_settings())?;

    info!(
        "Concatenated {} inputs into {}",
        job.inputs().len(),
        job.output().display()
    );
    Ok(())
}
