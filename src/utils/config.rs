use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::ffmpeg::FFmpeg;
use super::temp::TempSettings;

/// Main configuration structure for catmp4
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// External tool configuration
    #[serde(default)]
    pub ffmpeg: FFmpegConfig,
    /// Intermediate stream configuration
    #[serde(default)]
    pub temp: TempConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FFmpegConfig {
    /// Executable to run, looked up in PATH unless it contains a separator
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Pass -hide_banner to every invocation
    #[serde(default = "default_hide_banner")]
    pub hide_banner: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TempConfig {
    /// Directory for intermediate streams (system temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// File name prefix of intermediate streams
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_hide_banner() -> bool {
    true
}

fn default_prefix() -> String {
    String::from("catmp4-")
}

impl Default for FFmpegConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            hide_banner: default_hide_banner(),
        }
    }
}

impl Default for TempConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: default_prefix(),
        }
    }
}

impl Config {
    /// Location of the per-user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catmp4").join("config.toml"))
    }

    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the per-user configuration file, or defaults when there is none
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a TOML file
    ///
    /// # Arguments
    /// * `path` - Path where the configuration will be saved
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml).context("Failed to write config file")?;
        Ok(())
    }

    /// Merge command line overrides into this configuration
    ///
    /// # Arguments
    /// * `program` - External tool executable
    /// * `temp_dir` - Directory for intermediate streams
    pub fn merge_cli(&mut self, program: Option<PathBuf>, temp_dir: Option<PathBuf>) {
        if let Some(program) = program {
            self.ffmpeg.program = program;
        }

        if let Some(dir) = temp_dir {
            self.temp.directory = Some(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg.program.as_os_str().is_empty() {
            anyhow::bail!("No ffmpeg program specified");
        }

        if self.temp.prefix.is_empty() {
            anyhow::bail!("Temporary file prefix must not be empty");
        }

        if let Some(dir) = &self.temp.directory {
            if !dir.is_dir() {
                anyhow::bail!("Temporary directory does not exist: {}", dir.display());
            }
        }

        Ok(())
    }

    pub fn ffmpeg(&self) -> FFmpeg {
        FFmpeg::new(&self.ffmpeg.program).with_hide_banner(self.ffmpeg.hide_banner)
    }

    pub fn temp_settings(&self) -> TempSettings {
        TempSettings {
            directory: self.temp.directory.clone(),
            prefix: self.temp.prefix.clone(),
        }
    }
}
