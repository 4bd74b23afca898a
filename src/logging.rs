use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for log files. If None, no file logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log rotation: "hourly", "daily", "never".
    #[serde(default = "default_rotation")]
    pub rotation: String,

    #[serde(default)]
    pub json_format: bool,
}

fn default_level() -> String {
    "info".into()
}

fn default_rotation() -> String {
    "daily".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
            log_dir: None,
            rotation: default_rotation(),
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Raise the level for `-v` (debug) and `-vv` (trace).
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        match verbose {
            0 => {}
            1 => self.level = "debug".into(),
            _ => self.level = "trace".into(),
        }
        self
    }

    fn rotation(&self) -> rolling::Rotation {
        match self.rotation.as_str() {
            "hourly" => rolling::Rotation::HOURLY,
            "never" => rolling::Rotation::NEVER,
            _ => rolling::Rotation::DAILY,
        }
    }
}

/// Initialize the logging system. Should be called once at program startup.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer and must be held for the life of the program.
pub fn init_logging(
    config: &LogConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json_format
    {
        Box::new(fmt::layer().json().with_writer(std::io::stderr))
    } else {
        Box::new(fmt::layer().with_writer(std::io::stderr))
    };

    let (file_layer, guard): (
        Option<Box<dyn tracing_subscriber::Layer<_> + Send + Sync>>,
        Option<tracing_appender::non_blocking::WorkerGuard>,
    ) = if let Some(ref log_dir) = config.log_dir {
        let file_appender = rolling::RollingFileAppender::builder()
            .rotation(config.rotation())
            .filename_prefix("tmpclean")
            .filename_suffix("log")
            .build(log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json_format {
            Box::new(fmt::layer().json().with_writer(non_blocking))
        } else {
            Box::new(fmt::layer().with_ansi(false).with_writer(non_blocking))
        };

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
