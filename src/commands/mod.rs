use clap::Parser;
use std::path::PathBuf;

pub mod concat;

/// Concatenates multiple video files or snippets thereof into one video using ffmpeg
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    override_usage = "catmp4 [OPTIONS] <input> [-ss <start>] [-t <duration>] [-to <end>] ... -out <output>"
)]
pub struct Cli {
    /// Path to config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// FFmpeg executable to run
    #[arg(long, value_name = "PROGRAM")]
    pub ffmpeg: Option<PathBuf>,

    /// Directory for intermediate streams
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Input files with their trim flags, and -out <output>
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub job: Vec<String>,
}
