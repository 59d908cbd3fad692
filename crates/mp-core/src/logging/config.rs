//! Logging configuration.
//!
//! Level precedence, highest first: `-q`/`-v` flags, `MARKPACK_LOG`, then a
//! full `RUST_LOG` filter. `MARKPACK_LOG_FORMAT` picks the format unless
//! `--format json` forces JSONL.

use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {s}")),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        f.write_str(name)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives, kept only when nothing set the level.
    pub rust_log: Option<String>,
    /// Whether ANSI colors are allowed (still only used on a terminal).
    pub color: bool,
}

/// Environment values the log configuration reads.
#[derive(Debug, Clone, Default)]
pub struct LogEnv {
    pub markpack_log: Option<String>,
    pub rust_log: Option<String>,
    pub log_format: Option<String>,
}

impl LogEnv {
    pub fn from_process() -> Self {
        Self {
            markpack_log: std::env::var("MARKPACK_LOG").ok(),
            rust_log: std::env::var("RUST_LOG").ok(),
            log_format: std::env::var("MARKPACK_LOG_FORMAT").ok(),
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(&LogEnv::from_process(), cli_level, cli_format)
    }

    pub fn resolve(env: &LogEnv, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let env_level = env
            .markpack_log
            .as_deref()
            .and_then(|val| val.parse::<LogLevel>().ok());
        let level = cli_level.or(env_level);
        let rust_log = match level {
            Some(_) => None,
            None => env.rust_log.clone().filter(|val| !val.trim().is_empty()),
        };

        let format = cli_format
            .or_else(|| env.log_format.as_deref().and_then(|val| val.parse().ok()))
            .unwrap_or_default();

        LogConfig {
            format,
            level: level.unwrap_or_default(),
            rust_log,
            color: true,
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }
}
