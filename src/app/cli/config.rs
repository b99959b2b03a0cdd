//! TOML configuration file parsing and settings merging
//!
//! Settings come from two layers: an optional TOML file, then the command
//! line. A value given on the command line always wins. Nothing here is
//! validated beyond value types; [`RawSettings::validate`] applies the
//! pipeline rules.

use super::args::Args;
use crate::core::validation::ValidationError;
use crate::pipeline::PipelineConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUFFER_SIZE: i64 = 10;
pub const DEFAULT_PRODUCERS: i64 = 1;
pub const DEFAULT_CONSUMERS: i64 = 1;
pub const DEFAULT_UID: u32 = 0;

/// Unvalidated settings from one layer (file or command line)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    pub buffer_size: Option<i64>,
    pub producers: Option<i64>,
    pub consumers: Option<i64>,
    pub uid: Option<u32>,
    pub run_for: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl RawSettings {
    /// Default location of the configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Proctally").join("proctally.toml"))
    }

    /// Load the configuration file layer
    ///
    /// An explicitly named file must exist. Without one, the default path is
    /// used if present, otherwise the layer is empty.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ValidationError> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ValidationError::new(&format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        log::debug!("Loading configuration from {}", path.display());
        Self::load_file(&path)
    }

    /// Read and parse one TOML file
    pub fn load_file(path: &Path) -> Result<Self, ValidationError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::new(&format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ValidationError::new(&format!(
                "Error parsing configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&table)
    }

    /// Extract known keys from a TOML table, ignoring unknown ones
    pub fn from_toml(config: &toml::Table) -> Result<Self, ValidationError> {
        let uid = integer_field(config, "uid")?
            .map(|uid| {
                u32::try_from(uid).map_err(|_| {
                    ValidationError::new(&format!(
                        "uid must be between 0 and {} (got {})",
                        u32::MAX,
                        uid
                    ))
                })
            })
            .transpose()?;
        let run_for = integer_field(config, "run_for")?
            .map(|secs| {
                u64::try_from(secs).map_err(|_| {
                    ValidationError::new(&format!(
                        "run_for must be greater than or equal to 0 (got {})",
                        secs
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            buffer_size: integer_field(config, "buffer_size")?,
            producers: integer_field(config, "producers")?,
            consumers: integer_field(config, "consumers")?,
            uid,
            run_for,
            log_level: string_field(config, "log_level")?,
            log_format: string_field(config, "log_format")?,
            log_file: string_field(config, "log_file")?.map(PathBuf::from),
        })
    }

    /// Layer `other` on top of `self`; values set in `other` win
    pub fn overlay(self, other: RawSettings) -> Self {
        Self {
            buffer_size: other.buffer_size.or(self.buffer_size),
            producers: other.producers.or(self.producers),
            consumers: other.consumers.or(self.consumers),
            uid: other.uid.or(self.uid),
            run_for: other.run_for.or(self.run_for),
            log_level: other.log_level.or(self.log_level),
            log_format: other.log_format.or(self.log_format),
            log_file: other.log_file.or(self.log_file),
        }
    }

    /// Apply defaults and the pipeline parameter rules
    pub fn validate(&self) -> Result<PipelineConfig, ValidationError> {
        PipelineConfig::validate(
            self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE),
            self.producers.unwrap_or(DEFAULT_PRODUCERS),
            self.consumers.unwrap_or(DEFAULT_CONSUMERS),
            self.uid.unwrap_or(DEFAULT_UID),
        )
    }

    pub fn run_for(&self) -> Option<Duration> {
        self.run_for.map(Duration::from_secs)
    }

    /// Log file, with the magic value `none` meaning no file
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|path| !path.as_os_str().eq_ignore_ascii_case("none"))
    }
}

impl From<&Args> for RawSettings {
    fn from(args: &Args) -> Self {
        Self {
            buffer_size: args.buffer_size,
            producers: args.producers,
            consumers: args.consumers,
            uid: args.uid,
            run_for: args.run_for,
            log_level: args.log_level.clone(),
            log_format: args.log_format.clone(),
            log_file: args.log_file.clone(),
        }
    }
}

fn integer_field(config: &toml::Table, key: &str) -> Result<Option<i64>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| ValidationError::new(&format!("{} must be an integer", key))),
    }
}

fn string_field(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ValidationError::new(&format!("{} must be a string", key))),
    }
}
