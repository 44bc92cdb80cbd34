use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::error::CatError;

/// Where and how intermediate streams are named
#[derive(Debug, Clone)]
pub struct TempSettings {
    /// Directory for the streams; the system temp dir when `None`
    pub directory: Option<PathBuf>,
    pub prefix: String,
}

impl Default for TempSettings {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: "catmp4-".to_string(),
        }
    }
}

/// One intermediate stream file. Only the path is held open.
#[derive(Debug)]
pub struct TempStream {
    path: TempPath,
}

impl TempStream {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Owns every intermediate stream of one run and removes them all at the end
#[derive(Debug)]
pub struct TempStreams {
    settings: TempSettings,
    streams: Vec<TempStream>,
}

impl TempStreams {
    pub fn new(settings: TempSettings) -> Self {
        Self {
            settings,
            streams: Vec::new(),
        }
    }

    /// Create a new, empty, uniquely named stream file
    pub fn allocate(&mut self) -> Result<&TempStream, CatError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.settings.prefix).suffix(".ts");

        let file = match &self.settings.directory {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        // Close our handle so ffmpeg can replace the file on any platform
        let path = file.into_temp_path();
        debug!("Allocated temporary stream {}", path.display());

        self.streams.push(TempStream { path });
        Ok(&self.streams[self.streams.len() - 1])
    }

    /// Paths of all allocated streams, in allocation order
    pub fn paths(&self) -> Vec<&Path> {
        self.streams.iter().map(TempStream::path).collect()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Delete every stream. Failures are logged and otherwise ignored.
    pub fn cleanup(&mut self) {
        if self.is_empty() {
            return;
        }
        for stream in self.streams.drain(..) {
            let display = stream.path.display().to_string();
            match stream.path.close() {
                Ok(()) => debug!("Removed temporary stream {}", display),
                Err(e) => debug!("Could not remove temporary stream {}: {}", display, e),
            }
        }
    }
}

impl Drop for TempStreams {
    fn drop(&mut self) {
        self.cleanup();
    }
}
