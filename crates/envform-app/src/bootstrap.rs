use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use envform_api::ApiServer;
use envform_config::{DEFAULT_ENV_FILE, EnvFileStore, EnvStore};
use envform_telemetry::{AppSpan, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

const ENV_FILE_VAR: &str = "ENVFORM_ENV_FILE";
const BIND_ADDR_VAR: &str = "ENVFORM_BIND_ADDR";
const HTTP_PORT_VAR: &str = "ENVFORM_HTTP_PORT";
const LOG_LEVEL_VAR: &str = "ENVFORM_LOG_LEVEL";
const LOG_FORMAT_VAR: &str = "ENVFORM_LOG_FORMAT";

const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_HTTP_PORT: u16 = 3000;
const BUILD_SHA: &str = match option_env!("ENVFORM_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Process settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppSettings {
    env_file: PathBuf,
    bind_addr: IpAddr,
    http_port: u16,
    log_level: String,
    log_format: LogFormat,
}

impl AppSettings {
    /// Resolve settings through `lookup`, applying defaults for unset or blank variables.
    pub(crate) fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let env_file =
            read(ENV_FILE_VAR).map_or_else(|| PathBuf::from(DEFAULT_ENV_FILE), PathBuf::from);
        let bind_addr = match read(BIND_ADDR_VAR) {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| AppError::InvalidConfig {
                    field: BIND_ADDR_VAR,
                    reason: "not_an_ip_address",
                    value: Some(value),
                })?,
            None => DEFAULT_BIND_ADDR,
        };
        let http_port = match read(HTTP_PORT_VAR) {
            Some(value) => parse_port(&value)?,
            None => DEFAULT_HTTP_PORT,
        };
        let log_level = read(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = LogFormat::from_name(read(LOG_FORMAT_VAR).as_deref());

        Ok(Self {
            env_file,
            bind_addr,
            http_port,
            log_level,
            log_format,
        })
    }

    const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

fn parse_port(value: &str) -> AppResult<u16> {
    let invalid = |reason| AppError::InvalidConfig {
        field: HTTP_PORT_VAR,
        reason,
        value: Some(value.to_string()),
    };
    match value.trim().parse::<u16>() {
        Ok(0) => Err(invalid("zero")),
        Ok(port) => Ok(port),
        Err(_) => Err(invalid("not_a_port")),
    }
}

/// Dependencies required to bootstrap the application.
pub(crate) struct BootstrapDependencies {
    settings: AppSettings,
    store: Arc<dyn EnvStore>,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let settings = AppSettings::from_lookup(|name| std::env::var(name).ok())?;
        let store: Arc<dyn EnvStore> = Arc::new(EnvFileStore::new(settings.env_file.clone()));
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self {
            settings,
            store,
            telemetry,
        })
    }
}

/// Entry point for the application boot sequence.
///
/// # Errors
///
/// Returns an error if settings are invalid, telemetry cannot be installed or
/// the API server fails to bind or terminates unexpectedly.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        settings,
        store,
        telemetry,
    } = dependencies;

    envform_telemetry::init_logging(&LoggingConfig {
        level: &settings.log_level,
        format: settings.log_format,
        build_sha: BUILD_SHA,
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let app_span = AppSpan::enter("bootstrap");

    info!(env_file = %settings.env_file.display(), "application bootstrap starting");

    // Seeds a missing file; an unusable path is reported again on every request.
    match store.load().await {
        Ok(map) => info!(keys = map.len(), "configuration store ready"),
        Err(err) => warn!(error = %err, "configuration store not yet usable"),
    }

    let api = ApiServer::new(store, telemetry);
    let addr = settings.socket_addr();
    app_span.set_phase("serving");
    info!(addr = %addr, "Launching API listener");
    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}
