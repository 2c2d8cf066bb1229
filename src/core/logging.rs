//! Diagnostic logging to stderr (or a file).
//!
//! Level precedence: `RUST_LOG` > `--log-level` > `MODELSYNC_LOG` > config
//! `general.log_level` > `error`. `--verbose` promotes the default to `debug`.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_LEVEL_ENV: &str = "MODELSYNC_LOG";
pub const LOG_FORMAT_ENV: &str = "MODELSYNC_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "MODELSYNC_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logs.
    #[default]
    Human,
    /// JSON logs (one event per line).
    Json,
    /// Compact logs (single line, terse).
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log level names accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" | "crit" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert to tracing filter string.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingOptions {
    pub level: LogLevel,
    pub format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl LoggingOptions {
    /// Merge CLI flags, environment, and the config file's level.
    ///
    /// `json_output` forces JSON format. Unparseable values are ignored.
    #[must_use]
    pub fn resolve(
        cli_level: Option<&str>,
        json_output: bool,
        verbose: bool,
        config_level: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let level = cli_level
            .and_then(LogLevel::from_arg)
            .or_else(|| non_empty(LOG_LEVEL_ENV).as_deref().and_then(LogLevel::from_arg))
            .or_else(|| config_level.and_then(LogLevel::from_arg));
        let level = match level {
            Some(level) => level,
            None if verbose => LogLevel::Debug,
            None => LogLevel::Error,
        };

        let format = if json_output {
            LogFormat::Json
        } else {
            non_empty(LOG_FORMAT_ENV)
                .as_deref()
                .and_then(LogFormat::from_arg)
                .unwrap_or_default()
        };

        let log_file = non_empty(LOG_FILE_ENV).map(|p| PathBuf::from(p.trim()));

        Self {
            level,
            format,
            log_file,
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(options: &LoggingOptions) {
    let file = options.log_file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    let writer = || -> BoxMakeWriter {
        if let Some(file) = file.as_ref().and_then(|inner| inner.try_clone().ok()) {
            BoxMakeWriter::new(file)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("modelsync={}", options.level.as_filter())));

    match options.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(writer())
                .with_span_events(FmtSpan::CLOSE)
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_writer(writer())
                .with_target(true)
                .try_init()
                .ok();
        }
        LogFormat::Human => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer())
                .with_target(false)
                .without_time()
                .try_init()
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_to_error_human() {
        let options = LoggingOptions::resolve(None, false, false, None, env_with(&[]));
        assert_eq!(options.level, LogLevel::Error);
        assert_eq!(options.format, LogFormat::Human);
        assert!(options.log_file.is_none());
    }

    #[test]
    fn cli_level_beats_env_and_config() {
        let env = env_with(&[(LOG_LEVEL_ENV, "warn")]);
        let options = LoggingOptions::resolve(Some("trace"), false, false, Some("info"), env);
        assert_eq!(options.level, LogLevel::Trace);
    }

    #[test]
    fn env_level_beats_config() {
        let env = env_with(&[(LOG_LEVEL_ENV, "warn")]);
        let options = LoggingOptions::resolve(None, false, false, Some("info"), env);
        assert_eq!(options.level, LogLevel::Warn);

        let options = LoggingOptions::resolve(None, false, false, Some("info"), env_with(&[]));
        assert_eq!(options.level, LogLevel::Info);
    }

    #[test]
    fn verbose_promotes_default_only() {
        let options = LoggingOptions::resolve(None, false, true, None, env_with(&[]));
        assert_eq!(options.level, LogLevel::Debug);

        let options = LoggingOptions::resolve(Some("warn"), false, true, None, env_with(&[]));
        assert_eq!(options.level, LogLevel::Warn);
    }

    #[test]
    fn json_output_forces_json() {
        let env = env_with(&[(LOG_FORMAT_ENV, "compact"), (LOG_FILE_ENV, " /tmp/ms.log ")]);
        let options = LoggingOptions::resolve(None, true, false, None, env);
        assert_eq!(options.format, LogFormat::Json);
        assert_eq!(options.log_file, Some(PathBuf::from("/tmp/ms.log")));
    }

    #[test]
    fn level_aliases() {
        assert_eq!(LogLevel::from_arg("VERBOSE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_arg("critical"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_arg("loud"), None);
        assert_eq!(LogLevel::Warn.as_tracing_level(), Level::WARN);
    }
}
