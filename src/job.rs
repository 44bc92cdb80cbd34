use std::path::{Path, PathBuf};

/// One requested input clip.
///
/// The time specifications are opaque strings handed to ffmpeg untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    path: PathBuf,
    /// Seek offset (`-ss`)
    pub start_time: Option<String>,
    /// Clip duration (`-t`)
    pub duration: Option<String>,
    /// End offset (`-to`)
    pub end_time: Option<String>,
}

impl InputSpec {
    /// Create an untrimmed input for an absolute `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            start_time: None,
            duration: None,
            end_time: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when any of the trim flags was given
    pub fn is_trimmed(&self) -> bool {
        self.start_time.is_some() || self.duration.is_some() || self.end_time.is_some()
    }
}

/// The whole parsed invocation: inputs in concatenation order and the output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    inputs: Vec<InputSpec>,
    output: PathBuf,
}

impl JobConfig {
    /// Only the parser builds jobs, after it validated both halves.
    pub(crate) fn new(inputs: Vec<InputSpec>, output: PathBuf) -> Self {
        debug_assert!(!inputs.is_empty());
        Self { inputs, output }
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
