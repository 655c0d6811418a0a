//! Tracing setup for the profiling service.
//!
//! `RUST_LOG` wins when set; otherwise the configured level is applied
//! globally and repeated for this crate so roster processing stays visible
//! even when the global level is raised.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "log filter '{directive}' is not a valid tracing directive")
            }
            TelemetryError::Init(err) => write!(f, "tracing subscriber failed to start: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

fn configured_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = format!("{log_level},student_insight={log_level}");
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::Filter { directive, source })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_a_crate_scoped_filter() {
        let filter = configured_filter("debug").expect("level parses");
        assert!(format!("{filter}").contains("student_insight"));
    }

    #[test]
    fn invalid_level_reports_the_directive() {
        let err = configured_filter("not a level").expect_err("directive rejected");
        assert!(err.to_string().contains("not a level"));
        assert!(matches!(err, TelemetryError::Filter { .. }));
    }
}
