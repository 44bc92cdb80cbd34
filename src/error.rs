//! Error types and exit code handling for catmp4.
//!
//! Parse-time variants are raised before any external process is started.
//! Execution-time variants abort the remaining pipeline, after which the
//! temporary streams are still cleaned up.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Every way a catmp4 run can fail.
#[derive(Error, Debug)]
pub enum CatError {
    /// A positional argument does not name an existing file.
    #[error("File not found: '{arg}'")]
    FileNotFound { arg: String },

    /// A trim flag appeared before any input file.
    #[error("{flag} must come after an input filename")]
    Ordering { flag: String },

    /// Unrecognized flag.
    #[error("Unexpected argument '{arg}'")]
    UnknownArgument { arg: String },

    /// A flag that takes a value was the last token.
    #[error("Missing value for {flag}")]
    MissingValue { flag: String },

    #[error("No input files specified")]
    NoInputs,

    #[error("No output filename specified")]
    NoOutput,

    #[error("Invalid output filename '{path}'. Directory does not exist")]
    InvalidOutputDirectory { path: PathBuf },

    /// catmp4 never overwrites an existing output.
    #[error("Output filename '{path}' already exists")]
    OutputExists { path: PathBuf },

    /// The external tool ran but reported failure.
    #[error("{program} exited with error code {}", describe_code(.code))]
    ExternalTool { program: String, code: Option<i32> },

    /// The external tool could not be started.
    #[error("Failed to run {program}")]
    ToolSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The availability check before the first invocation failed.
    #[error("{program} is not installed or not available in system PATH")]
    ToolUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl CatError {
    /// True for the errors detected while scanning the command line.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CatError::FileNotFound { .. }
                | CatError::Ordering { .. }
                | CatError::UnknownArgument { .. }
                | CatError::MissingValue { .. }
                | CatError::NoInputs
                | CatError::NoOutput
                | CatError::InvalidOutputDirectory { .. }
                | CatError::OutputExists { .. }
        )
    }

    /// Map error to a BSD sysexits.h style exit code.
    ///
    /// - `64` (EX_USAGE): malformed command line
    /// - `66` (EX_NOINPUT): input file not found
    /// - `69` (EX_UNAVAILABLE): external tool missing
    /// - `70` (EX_SOFTWARE): external tool failed
    /// - `73` (EX_CANTCREAT): output exists or its directory is missing
    /// - `74` (EX_IOERR): temp file or other I/O failure
    pub fn code(&self) -> u8 {
        match self {
            CatError::Ordering { .. }
            | CatError::UnknownArgument { .. }
            | CatError::MissingValue { .. }
            | CatError::NoInputs
            | CatError::NoOutput => 64,
            CatError::FileNotFound { .. } => 66,
            CatError::ToolSpawn { .. } | CatError::ToolUnavailable { .. } => 69,
            CatError::ExternalTool { .. } => 70,
            CatError::InvalidOutputDirectory { .. } | CatError::OutputExists { .. } => 73,
            CatError::Io(_) => 74,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
