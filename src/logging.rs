use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level or filter directive (error, warn, info, debug, trace, `pmkb_bot=debug`)
    pub level: String,

    /// Log format (json, human)
    pub format: LogFormat,

    /// ファイル出力（未設定ならコンソールのみ）
    pub file: Option<FileLogConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Human,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub rotation: LogRotation,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "pmkb-bot.log".to_string(),
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// 日次ローテーション
    Daily,
    /// 時間毎ローテーション
    Hourly,
    /// ローテーションなし
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: if cfg!(debug_assertions) {
                LogFormat::Human
            } else {
                LogFormat::Json
            },
            file: None,
        }
    }
}

impl LogConfig {
    /// Overrides the level, e.g. from the command line
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// ログシステムを初期化
///
/// The returned guard flushes the file writer on drop and must be held by the
/// caller for the lifetime of the process.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let console = match config.format {
        LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
        LogFormat::Human => fmt::layer().with_target(true).boxed(),
    };

    let (file_layer, guard) = match &config.file {
        Some(file) => {
            fs::create_dir_all(&file.directory).with_context(|| {
                format!("failed to create log directory {}", file.directory.display())
            })?;
            let appender = match file.rotation {
                LogRotation::Daily => rolling::daily(&file.directory, &file.file_prefix),
                LogRotation::Hourly => rolling::hourly(&file.directory, &file.file_prefix),
                LogRotation::Never => rolling::never(&file.directory, &file.file_prefix),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(console)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(guard)
}
