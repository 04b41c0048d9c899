//! Structured logging
//!
//! `RUST_LOG` overrides the default level. Output goes to stdout and,
//! when a log file is configured, is appended to that file as well.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" (case-insensitive); anything else is `Pretty`
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

type FileLayer<S> = fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>;

fn file_layer<S>(path: Option<&Path>) -> io::Result<Option<FileLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(path) = path else {
        return Ok(None);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))))
}

/// Install the global subscriber. Call once, early in `main()`.
pub fn init_logging(
    default_level: &str,
    format: LogFormat,
    log_file: Option<&Path>,
) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer(log_file)?)
                .with(fmt::layer().with_target(true).with_line_number(true))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer(log_file)?)
                .with(fmt::layer().json().with_target(true))
                .init();
        }
    }

    tracing::info!(?format, file = ?log_file, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_lossy("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_file_layer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let layer = file_layer::<tracing_subscriber::Registry>(Some(&path)).unwrap();
        assert!(layer.is_some());
        assert!(path.exists());

        let none = file_layer::<tracing_subscriber::Registry>(None).unwrap();
        assert!(none.is_none());
    }
}
