mod config;
mod ffmpeg;
mod temp;

pub use config::{Config, FFmpegConfig, TempConfig};
pub use ffmpeg::{FFmpeg, Invocation, ProcessRunner, ToolRunner};
pub use temp::{TempSettings, TempStream, TempStreams};
