//! Logging initialization for the CLI
//!
//! Human-readable or JSON output on stderr, optional rolling log files, and
//! `RUST_LOG` overrides. Stdout is left to command output.

use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the file writer flushing; hold it for the life of the program.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging from configuration.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    let file_guard = if config.json {
        let console_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);

        if config.file_enabled {
            let (file_appender, file_guard) = create_file_appender(config)?;
            let file_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender);
            subscriber.with(console_layer).with(file_layer).init();
            Some(file_guard)
        } else {
            subscriber.with(console_layer).init();
            None
        }
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);

        if config.file_enabled {
            let (file_appender, file_guard) = create_file_appender(config)?;
            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_appender);
            subscriber.with(console_layer).with(file_layer).init();
            Some(file_guard)
        } else {
            subscriber.with(console_layer).init();
            None
        }
    };

    tracing::debug!(
        level = %config.level,
        json = config.json,
        file = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

/// Filter directives for the workspace crates at `level`; dependencies stay at warn.
pub fn default_directives(level: &str) -> String {
    [
        "ocldm_cli",
        "ocldm_client",
        "ocldm_store",
        "ocldm_forms",
        "ocldm_models",
    ]
    .iter()
    .map(|target| format!("{}={}", target, level))
    .chain(std::iter::once("reqwest=warn".to_string()))
    .collect::<Vec<_>>()
    .join(",")
}

fn create_file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let file_appender = match config.file_rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.file_directory, &config.file_prefix),
        "minutely" => {
            tracing_appender::rolling::minutely(&config.file_directory, &config.file_prefix)
        }
        "never" => tracing_appender::rolling::never(
            &config.file_directory,
            format!("{}.log", config.file_prefix),
        ),
        _ => tracing_appender::rolling::daily(&config.file_directory, &config.file_prefix),
    };

    Ok(tracing_appender::non_blocking(file_appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_workspace_crates() {
        let directives = default_directives("debug");
        assert!(directives.contains("ocldm_store=debug"));
        assert!(directives.contains("ocldm_client=debug"));
        assert!(directives.ends_with("reqwest=warn"));
    }
}
