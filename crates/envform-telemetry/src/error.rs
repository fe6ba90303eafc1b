//! Failures while installing logging or building and rendering the metrics registry.
//!
//! Messages are constant; the metric name travels as a field.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use prometheus::Error as PrometheusError;

/// Result alias for logging and metrics setup.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by [`init_logging`](crate::init_logging) and [`Metrics`](crate::Metrics).
#[derive(Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    SubscriberInstall {
        /// Error from `try_init`.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A counter definition was rejected.
    MetricsCollector {
        /// Counter name.
        name: &'static str,
        /// Registry error.
        source: PrometheusError,
    },
    /// A counter clashed with one already in the registry.
    MetricsRegister {
        /// Counter name.
        name: &'static str,
        /// Registry error.
        source: PrometheusError,
    },
    /// The `/metrics` text could not be encoded.
    MetricsEncode {
        /// Registry error.
        source: PrometheusError,
    },
    /// The encoded `/metrics` text was not UTF-8.
    MetricsUtf8 {
        /// Conversion error.
        source: std::string::FromUtf8Error,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriberInstall { .. } => {
                formatter.write_str("log subscriber already installed")
            }
            Self::MetricsCollector { name, .. } => {
                write!(formatter, "invalid counter definition `{name}`")
            }
            Self::MetricsRegister { name, .. } => {
                write!(formatter, "counter already registered `{name}`")
            }
            Self::MetricsEncode { .. } => formatter.write_str("failed to encode metrics text"),
            Self::MetricsUtf8 { .. } => formatter.write_str("metrics text was not valid utf-8"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::MetricsCollector { source, .. }
            | Self::MetricsRegister { source, .. }
            | Self::MetricsEncode { source } => Some(source),
            Self::MetricsUtf8 { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tracing_subscriber::util::SubscriberInitExt;

    fn try_init_error()
    -> std::result::Result<tracing_subscriber::util::TryInitError, Box<dyn Error>> {
        match tracing_subscriber::registry().try_init() {
            Ok(()) => match tracing_subscriber::registry().try_init() {
                Ok(()) => Err(io::Error::other("expected init error").into()),
                Err(err) => Ok(err),
            },
            Err(err) => Ok(err),
        }
    }

    #[test]
    fn messages_are_constant_and_keep_sources() -> std::result::Result<(), Box<dyn Error>> {
        let init_error = try_init_error()?;
        let utf8_error = String::from_utf8(vec![0, 159])
            .err()
            .ok_or_else(|| io::Error::other("expected utf8 error"))?;
        let cases = vec![
            (
                TelemetryError::SubscriberInstall { source: init_error },
                "log subscriber already installed",
            ),
            (
                TelemetryError::MetricsCollector {
                    name: "config_store_ops_total",
                    source: PrometheusError::Msg("metrics".to_string()),
                },
                "invalid counter definition `config_store_ops_total`",
            ),
            (
                TelemetryError::MetricsRegister {
                    name: "http_requests_total",
                    source: PrometheusError::Msg("metrics".to_string()),
                },
                "counter already registered `http_requests_total`",
            ),
            (
                TelemetryError::MetricsEncode {
                    source: PrometheusError::Msg("metrics".to_string()),
                },
                "failed to encode metrics text",
            ),
            (
                TelemetryError::MetricsUtf8 { source: utf8_error },
                "metrics text was not valid utf-8",
            ),
        ];

        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
            assert!(err.source().is_some());
        }
        Ok(())
    }
}
