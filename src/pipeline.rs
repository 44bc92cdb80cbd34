//! Cut every input into an intermediate stream, then join the streams.

use log::{debug, info};
use std::fs;

use crate::error::CatError;
use crate::job::JobConfig;
use crate::utils::{FFmpeg, TempSettings, TempStreams, ToolRunner};

/// Run the whole job: one extraction per input in order, then one concatenation.
///
/// The temporary streams are removed on every exit path, whichever step failed.
pub fn concat_videos(
    job: &JobConfig,
    ffmpeg: &FFmpeg,
    runner: &mut dyn ToolRunner,
    temp: TempSettings,
) -> Result<(), CatError> {
    let mut streams = TempStreams::new(temp);
    let result = run_steps(job, ffmpeg, runner, &mut streams);
    streams.cleanup();
    result
}

fn run_steps(
    job: &JobConfig,
    ffmpeg: &FFmpeg,
    runner: &mut dyn ToolRunner,
    streams: &mut TempStreams,
) -> Result<(), CatError> {
    let total = job.inputs().len();

    for (i, input) in job.inputs().iter().enumerate() {
        let trim = if input.is_trimmed() { " (trimmed)" } else { "" };
        info!(
            "[{}/{}] Extracting {}{}",
            i + 1,
            total,
            input.path().display(),
            trim
        );
        let stream = streams.allocate()?;
        let invocation = ffmpeg.extract_stream(input, stream.path());
        runner.run(&invocation)?;
    }

    // Extraction can take long enough for something else to claim the output
    if job.output().symlink_metadata().is_ok() {
        return Err(CatError::OutputExists {
            path: job.output().to_path_buf(),
        });
    }

    info!(
        "Joining {} streams into {}",
        streams.len(),
        job.output().display()
    );
    let invocation = ffmpeg.concat_streams(&streams.paths(), job.output());
    if let Err(e) = runner.run(&invocation) {
        // The path was free right before the join, so anything here is ours
        match fs::remove_file(job.output()) {
            Ok(()) => debug!("Removed partial output {}", job.output().display()),
            Err(err) => debug!("No partial output to remove: {}", err),
        }
        return Err(e);
    }

    Ok(())
}
