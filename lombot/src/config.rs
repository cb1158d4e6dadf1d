use std::collections::HashMap;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing_core::LevelFilter;

/// Everything needed to connect and register; fixed for the lifetime of the
/// process and re-read on every reconnect.
#[derive(Clone,Debug)]
pub struct SessionConfig
{
    pub server: String,
    pub port: u16,
    pub nickname: String,
    pub username: String,
    pub channel: String,
    pub idle_timeout: Duration,
}

/// Settings for the chat command handlers.
#[derive(Clone,Debug)]
pub struct RouterConfig
{
    /// Directory holding per-channel quote files
    pub data_dir: PathBuf,
    /// Upper bound on fetching one linked page, connection included
    pub fetch_timeout: Duration,
}

#[derive(Debug,Error)]
pub enum ConfigError
{
    #[error("I/O error on {1}: {0}")]
    IoError(std::io::Error, PathBuf),
    #[error("JSON parse error in {1}: {0}")]
    JsonError(serde_json::Error, PathBuf),
}

#[derive(Clone,Debug,serde::Serialize,serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinLogTarget
{
    Stdout,
    Stderr,
}

/// How often a file target starts a new file.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,serde::Serialize,serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation
{
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Clone,Debug,serde::Serialize,serde::Deserialize)]
#[serde(untagged)]
pub enum LogTarget
{
    File
    {
        filename: PathBuf,
        #[serde(default)]
        rotation: LogRotation,
    },
    Builtin(BuiltinLogTarget),
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,serde::Serialize,serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel
{
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

#[derive(Clone,Debug,serde::Deserialize)]
pub struct LogEntry
{
    pub target: LogTarget,
    #[serde(default)]
    pub modules: Vec<String>,
    pub level: Option<LogLevel>,
}

#[derive(Clone,Debug,serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig
{
    /// Directory for file log targets
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    pub default_level: Option<LogLevel>,
    /// Per-module overrides, applied on top of the defaults for the HTTP stack
    #[serde(default)]
    pub module_levels: HashMap<String, LogLevel>,
    pub targets: Vec<LogEntry>,
}

fn default_log_dir() -> PathBuf
{
    PathBuf::from(".")
}

impl LoggingConfig
{
    /// Load a logging configuration from a JSON file.
    pub fn load_file(filename: impl AsRef<Path>) -> Result<Self, ConfigError>
    {
        let path = filename.as_ref();
        let file = File::open(path).map_err(|e| ConfigError::IoError(e, path.to_owned()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| ConfigError::JsonError(e, path.to_owned()))
    }
}

impl Default for LoggingConfig
{
    /// Everything at `info` and above, to standard error.
    fn default() -> Self
    {
        Self {
            dir: default_log_dir(),
            default_level: Some(LogLevel::Info),
            module_levels: HashMap::new(),
            targets: vec![LogEntry {
                target: LogTarget::Builtin(BuiltinLogTarget::Stderr),
                modules: Vec::new(),
                level: None,
            }],
        }
    }
}

impl From<LogLevel> for LevelFilter
{
    fn from(arg: LogLevel) -> LevelFilter
    {
        match arg
        {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}
