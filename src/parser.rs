//! Command-line parser for the job tokens.
//!
//! Syntax:
//!
//! ```text
//! <input> [-ss <start>] [-t <duration>] [-to <end>] ... -out <output>
//! ```
//!
//! Each bare token starts a new input; the trim flags that follow it apply
//! to that input until the next bare token. `-out` may appear anywhere.

use std::path::{Path, PathBuf};

use crate::error::CatError;
use crate::job::{InputSpec, JobConfig};

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// `-h`, `-?` or `--help` was present; nothing else was validated.
    Help,
    Job(JobConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Help,
    Out,
    StartTime,
    Duration,
    EndTime,
}

impl Flag {
    fn lookup(token: &str) -> Option<Flag> {
        match token.to_ascii_lowercase().as_str() {
            "-h" | "-?" | "--help" => Some(Flag::Help),
            "-out" => Some(Flag::Out),
            "-ss" => Some(Flag::StartTime),
            "-t" => Some(Flag::Duration),
            "-to" => Some(Flag::EndTime),
            _ => None,
        }
    }
}

fn is_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Walks the tokens one at a time, handing out flag values on request.
struct Lexer<'a, S> {
    tokens: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Lexer<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let tokens = self.tokens;
        let token = tokens.get(self.pos)?.as_ref();
        self.pos += 1;
        Some(token)
    }

    /// The token after `flag`, taken verbatim even if it looks like a flag.
    fn value_for(&mut self, flag: &str) -> Result<String, CatError> {
        self.next_token()
            .map(str::to_string)
            .ok_or_else(|| CatError::MissingValue {
                flag: flag.to_string(),
            })
    }
}

/// Parse the job tokens into a [`JobConfig`].
///
/// Only reads the filesystem: inputs must be existing files, the output's
/// parent directory must exist and the output itself must not.
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Parsed, CatError> {
    if wants_help(tokens) {
        return Ok(Parsed::Help);
    }

    let mut lexer = Lexer::new(tokens);
    let mut inputs: Vec<InputSpec> = Vec::new();
    let mut output: Option<String> = None;

    while let Some(token) = lexer.next_token() {
        if !is_flag(token) {
            inputs.push(InputSpec::new(resolve_input(token)?));
            continue;
        }

        let flag = Flag::lookup(token).ok_or_else(|| CatError::UnknownArgument {
            arg: token.to_string(),
        })?;

        match flag {
            Flag::Help => return Ok(Parsed::Help),
            Flag::Out => output = Some(lexer.value_for(token)?),
            Flag::StartTime | Flag::Duration | Flag::EndTime => {
                let current = inputs.last_mut().ok_or_else(|| CatError::Ordering {
                    flag: token.to_string(),
                })?;
                let value = lexer.value_for(token)?;
                match flag {
                    Flag::StartTime => current.start_time = Some(value),
                    Flag::Duration => current.duration = Some(value),
                    _ => current.end_time = Some(value),
                }
            }
        }
    }

    if inputs.is_empty() {
        return Err(CatError::NoInputs);
    }

    let output = match output {
        Some(output) if !output.is_empty() => output,
        _ => return Err(CatError::NoOutput),
    };

    Ok(Parsed::Job(JobConfig::new(inputs, resolve_output(&output)?)))
}

/// Dry scan for a help flag in flag position; skips the value of each value flag.
fn wants_help<S: AsRef<str>>(tokens: &[S]) -> bool {
    let mut lexer = Lexer::new(tokens);
    while let Some(token) = lexer.next_token() {
        if !is_flag(token) {
            continue;
        }
        match Flag::lookup(token) {
            Some(Flag::Help) => return true,
            Some(_) => {
                lexer.next_token();
            }
            None => {}
        }
    }
    false
}

fn resolve_input(arg: &str) -> Result<PathBuf, CatError> {
    let not_found = || CatError::FileNotFound {
        arg: arg.to_string(),
    };
    let path = std::path::absolute(arg).map_err(|_| not_found())?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(not_found())
    }
}

fn resolve_output(arg: &str) -> Result<PathBuf, CatError> {
    let path = std::path::absolute(arg)?;

    let dir_exists = path.parent().map(Path::is_dir).unwrap_or(false);
    if !dir_exists {
        return Err(CatError::InvalidOutputDirectory { path });
    }

    // symlink_metadata so a dangling link also counts as taken
    if path.symlink_metadata().is_ok() {
        return Err(CatError::OutputExists { path });
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let dir = TempDir::new().unwrap();
            for name in files {
                fs::write(dir.path().join(name), b"video").unwrap();
            }
            Self { dir }
        }

        fn path(&self, name: &str) -> String {
            self.dir.path().join(name).to_string_lossy().into_owned()
        }
    }

    fn parse_job(tokens: &[String]) -> JobConfig {
        match parse(tokens).unwrap() {
            Parsed::Job(job) => job,
            Parsed::Help => panic!("expected a job"),
        }
    }

    #[test]
    fn test_inputs_keep_command_line_order() {
        let fx = Fixture::new(&["a.mp4", "b.mp4", "c.mp4"]);
        let tokens = vec![
            fx.path("b.mp4"),
            fx.path("a.mp4"),
            "-out".to_string(),
            fx.path("out.mp4"),
            fx.path("c.mp4"),
        ];

        let job = parse_job(&tokens);
        let names: Vec<_> = job
            .inputs()
            .iter()
            .map(|i| i.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["b.mp4", "a.mp4", "c.mp4"]);
        assert_eq!(job.output(), fx.dir.path().join("out.mp4"));
    }

    #[test]
    fn test_trim_flags_apply_to_preceding_input() {
        let fx = Fixture::new(&["a.mp4", "b.mp4"]);
        let tokens = vec![
            fx.path("a.mp4"),
            "-ss".to_string(),
            "00:00:10".to_string(),
            "-t".to_string(),
            "00:00:05".to_string(),
            fx.path("b.mp4"),
            "-TO".to_string(),
            "90".to_string(),
            "-out".to_string(),
            fx.path("c.mp4"),
        ];

        let job = parse_job(&tokens);
        let a = &job.inputs()[0];
        assert_eq!(a.start_time.as_deref(), Some("00:00:10"));
        assert_eq!(a.duration.as_deref(), Some("00:00:05"));
        assert_eq!(a.end_time, None);

        let b = &job.inputs()[1];
        assert_eq!(b.start_time, None);
        assert_eq!(b.end_time.as_deref(), Some("90"));
    }

    #[test]
    fn test_last_flag_wins() {
        let fx = Fixture::new(&["a.mp4"]);
        let tokens = vec![
            fx.path("a.mp4"),
            "-t".to_string(),
            "5".to_string(),
            "-to".to_string(),
            "20".to_string(),
            "-t".to_string(),
            "7".to_string(),
            "-out".to_string(),
            fx.path("first.mp4"),
            "-out".to_string(),
            fx.path("second.mp4"),
        ];

        let job = parse_job(&tokens);
        assert_eq!(job.inputs()[0].duration.as_deref(), Some("7"));
        assert_eq!(job.inputs()[0].end_time.as_deref(), Some("20"));
        assert_eq!(job.output(), fx.dir.path().join("second.mp4"));
    }

    #[test]
    fn test_help_short_circuits_validation() {
        let tokens = ["/does/not/exist.mp4", "-bogus", "-?"];
        assert_eq!(parse(&tokens).unwrap(), Parsed::Help);
        assert_eq!(parse(&["-H"]).unwrap(), Parsed::Help);
    }

    #[test]
    fn test_help_in_value_position_is_a_value() {
        let fx = Fixture::new(&["a.mp4"]);
        let tokens = vec![
            fx.path("a.mp4"),
            "-to".to_string(),
            "-h".to_string(),
            "-out".to_string(),
            fx.path("c.mp4"),
        ];
        assert_eq!(parse_job(&tokens).inputs()[0].end_time.as_deref(), Some("-h"));

        // After the value, a help flag still counts
        let tokens = ["-out", "-?", "-?"];
        assert_eq!(parse(&tokens).unwrap(), Parsed::Help);
    }

    #[test]
    fn test_trim_flag_before_input_is_ordering_error() {
        // The output check would also fail here; ordering is reported first.
        let tokens = ["-ss", "1", "/does/not/exist.mp4", "-out", "/no/such/dir/c.mp4"];
        assert!(matches!(
            parse(&tokens),
            Err(CatError::Ordering { flag }) if flag == "-ss"
        ));
    }

    #[test]
    fn test_no_inputs() {
        let empty: [&str; 0] = [];
        assert!(matches!(parse(&empty), Err(CatError::NoInputs)));
        assert!(matches!(
            parse(&["-out", "c.mp4"]),
            Err(CatError::NoInputs)
        ));
    }

    #[test]
    fn test_no_output() {
        let fx = Fixture::new(&["a.mp4"]);
        assert!(matches!(
            parse(&[fx.path("a.mp4")]),
            Err(CatError::NoOutput)
        ));
        assert!(matches!(
            parse(&[fx.path("a.mp4"), "-out".to_string(), String::new()]),
            Err(CatError::NoOutput)
        ));
    }

    #[test]
    fn test_missing_file() {
        let fx = Fixture::new(&[]);
        let missing = fx.path("missing.mp4");
        assert!(matches!(
            parse(&[missing.clone()]),
            Err(CatError::FileNotFound { arg }) if arg == missing
        ));

        // A directory is not an input file
        let dir = fx.dir.path().to_string_lossy().into_owned();
        assert!(matches!(
            parse(&[dir]),
            Err(CatError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_flag() {
        let fx = Fixture::new(&["a.mp4"]);
        assert!(matches!(
            parse(&[fx.path("a.mp4"), "-vf".to_string()]),
            Err(CatError::UnknownArgument { arg }) if arg == "-vf"
        ));
    }

    #[test]
    fn test_flag_value_missing() {
        let fx = Fixture::new(&["a.mp4"]);
        assert!(matches!(
            parse(&[fx.path("a.mp4"), "-ss".to_string()]),
            Err(CatError::MissingValue { flag }) if flag == "-ss"
        ));
    }

    #[test]
    fn test_flag_value_may_start_with_dash() {
        let fx = Fixture::new(&["a.mp4"]);
        let tokens = vec![
            fx.path("a.mp4"),
            "-to".to_string(),
            "-5".to_string(),
            "-out".to_string(),
            fx.path("c.mp4"),
        ];
        assert_eq!(parse_job(&tokens).inputs()[0].end_time.as_deref(), Some("-5"));
    }

    #[test]
    fn test_output_directory_must_exist() {
        let fx = Fixture::new(&["a.mp4"]);
        let tokens = vec![
            fx.path("a.mp4"),
            "-out".to_string(),
            fx.path("nested/c.mp4"),
        ];
        assert!(matches!(
            parse(&tokens),
            Err(CatError::InvalidOutputDirectory { .. })
        ));
    }

    #[test]
    fn test_existing_output_is_rejected() {
        let fx = Fixture::new(&["a.mp4", "c.mp4"]);
        let tokens = vec![fx.path("a.mp4"), "-out".to_string(), fx.path("c.mp4")];
        assert!(matches!(
            parse(&tokens),
            Err(CatError::OutputExists { path }) if path == fx.dir.path().join("c.mp4")
        ));
        assert_eq!(fs::read(fx.dir.path().join("c.mp4")).unwrap(), b"video");
    }
}
