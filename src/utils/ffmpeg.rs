use log::{debug, info};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::CatError;
use crate::job::InputSpec;

/// A fully built external tool command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Program name used in messages
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

impl fmt::Display for Invocation {
    /// Human-readable command line, quoting arguments that contain spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Executes invocations. The pipeline only talks to ffmpeg through this seam.
pub trait ToolRunner {
    /// Run to completion; `Ok` only when the tool exited with status 0
    fn run(&mut self, invocation: &Invocation) -> Result<(), CatError>;
}

/// Runs each invocation as a blocking child process sharing our console
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), CatError> {
        info!("{}", invocation);

        let status = Command::new(invocation.program())
            .args(invocation.get_args())
            .status()
            .map_err(|source| CatError::ToolSpawn {
                program: invocation.program_name(),
                source,
            })?;

        debug!("{} finished with {}", invocation.program_name(), status);

        if status.success() {
            Ok(())
        } else {
            Err(CatError::ExternalTool {
                program: invocation.program_name(),
                code: status.code(),
            })
        }
    }
}

/// Builds the FFmpeg command lines used to cut and join videos
#[derive(Debug, Clone)]
pub struct FFmpeg {
    program: PathBuf,
    hide_banner: bool,
}

impl Default for FFmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FFmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            hide_banner: true,
        }
    }

    pub fn with_hide_banner(mut self, hide_banner: bool) -> Self {
        self.hide_banner = hide_banner;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Checks if FFmpeg is available on the system
    pub fn check_ffmpeg(&self) -> Result<(), CatError> {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| CatError::ToolUnavailable {
                program: self.program.display().to_string(),
                source,
            })?;
        Ok(())
    }

    fn base(&self) -> Invocation {
        let mut invocation = Invocation::new(&self.program);
        if self.hide_banner {
            invocation.arg("-hide_banner");
        }
        invocation
    }

    /// Cuts `input` and remuxes it into a bare MPEG-TS stream at `stream_path`
    ///
    /// # Arguments
    /// * `input` - The input file with its optional trim range
    /// * `stream_path` - Temporary file the stream is written to (overwritten)
    pub fn extract_stream(&self, input: &InputSpec, stream_path: &Path) -> Invocation {
        let mut invocation = self.base();

        if let Some(start) = &input.start_time {
            invocation.args(["-ss", start.as_str()]);
        }
        if let Some(duration) = &input.duration {
            invocation.args(["-t", duration.as_str()]);
        }
        if let Some(end) = &input.end_time {
            invocation.args(["-to", end.as_str()]);
        }

        invocation
            .arg("-i")
            .arg(input.path())
            .args(["-c", "copy", "-bsf:v", "h264_mp4toannexb", "-f", "mpegts"])
            .arg(stream_path)
            .arg("-y");
        invocation
    }

    /// Joins the streams, in order, into an mp4 laid out for progressive playback
    ///
    /// # Arguments
    /// * `stream_paths` - Streams produced by [`FFmpeg::extract_stream`]
    /// * `output_path` - Final output; never overwritten
    pub fn concat_streams(&self, stream_paths: &[&Path], output_path: &Path) -> Invocation {
        let mut invocation = self.base();
        invocation
            .arg("-n")
            .arg("-i")
            .arg(concat_source(stream_paths))
            .args([
                "-c",
                "copy",
                "-bsf:a",
                "aac_adtstoasc",
                "-movflags",
                "faststart",
                "-f",
                "mp4",
            ])
            .arg(output_path);
        invocation
    }
}

/// `concat:<a>|<b>|...` pseudo-input
fn concat_source(stream_paths: &[&Path]) -> OsString {
    let mut source = OsString::from("concat:");
    for (i, path) in stream_paths.iter().enumerate() {
        if i > 0 {
            source.push("|");
        }
        source.push(path.as_os_str());
    }
    source
}
