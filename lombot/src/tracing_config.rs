use crate::config::*;

use std::{
    collections::HashMap,
    io::Error as IoError,
    path::Path,
};
use tracing::Subscriber;
use tracing_appender::rolling::{
    RollingFileAppender,
    Rotation,
};
use tracing_core::LevelFilter;
use tracing_subscriber::{
    filter::{
        filter_fn,
        Targets,
    },
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// The HTTP client used for link titles logs every connection at `debug` and
/// `trace`; keep it quiet unless a config file asks otherwise.
const DEPENDENCY_LEVELS: &[(&str, LogLevel)] = &[
    ("hyper", LogLevel::Warn),
    ("hyper_util", LogLevel::Warn),
    ("reqwest", LogLevel::Warn),
    ("rustls", LogLevel::Warn),
    ("h2", LogLevel::Warn),
];

impl From<LogRotation> for Rotation
{
    fn from(arg: LogRotation) -> Rotation
    {
        match arg
        {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

fn build_target<S>(conf: LogEntry, dir: &Path) -> Result<Box<dyn Layer<S> + Send + Sync + 'static>, IoError>
    where S: Subscriber + Send + Sync,
          for<'span> S: LookupSpan<'span>
{
    let layer = match &conf.target
    {
        LogTarget::File { filename, rotation } =>
        {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new((*rotation).into(), dir, filename);
            tracing_subscriber::fmt::layer().with_writer(appender).with_ansi(false).boxed()
        }
        LogTarget::Builtin(BuiltinLogTarget::Stdout) => tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed(),
        LogTarget::Builtin(BuiltinLogTarget::Stderr) => tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    let level: LevelFilter = conf.level.map(Into::into).unwrap_or(LevelFilter::TRACE);
    let modules = conf.modules;
    let filter = filter_fn(move |metadata| {
        metadata.level() <= &level
            && (modules.is_empty() || metadata.module_path().map_or(true, |path| modules.iter().any(|m| path.starts_with(m.as_str()))))
    });

    Ok(layer.with_filter(filter).boxed())
}

/// Module levels for the global filter: quiet defaults for the HTTP stack,
/// overridden by anything the config names explicitly.
fn module_levels(configured: HashMap<String, LogLevel>) -> HashMap<String, LogLevel>
{
    let mut levels: HashMap<String, LogLevel> =
        DEPENDENCY_LEVELS.iter().map(|(module, level)| (module.to_string(), *level)).collect();
    levels.extend(configured);
    levels
}

/// Build the global subscriber described by `conf`.
///
/// Each target gets its own layer and filter; the global filter only trims
/// overly verbose modules, so its default stays permissive.
pub fn build_subscriber(conf: LoggingConfig) -> Result<impl Subscriber, IoError>
{
    let mut layers = Vec::new();
    for target in conf.targets
    {
        layers.push(build_target(target, &conf.dir)?);
    }

    let filter = Targets::new()
        .with_default(conf.default_level.unwrap_or(LogLevel::Trace))
        .with_targets(module_levels(conf.module_levels));

    Ok(tracing_subscriber::registry().with(filter).with(layers))
}
