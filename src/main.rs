//! prdigest CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use ortho_config::OrthoConfig;
use prdigest::{DigestError, OctocrabGateway, OperationMode, PrDigestConfig, TeamDigest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(kind = error.kind().label(), "digest failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

async fn run() -> Result<(), DigestError> {
    let config = load_config()?;
    let settings = config.aggregator_settings()?;
    let gateway = OctocrabGateway::for_token(settings.token(), settings.api_base())?;

    let digest = TeamDigest::new(Arc::new(gateway), settings, config.digest_options())
        .with_formatter(config.summary_formatter()?)
        .with_summaries(config.summary_source());

    let now = Utc::now();
    let message = match config.operation_mode() {
        OperationMode::TeamSummary => digest.summary(now).await?,
        OperationMode::GroupedTeamListing => digest.grouped(now).await?,
        OperationMode::RepositoryListing => digest.repository(config.require_repo()?, now).await?,
    };

    write_message(&message)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`DigestError::InvalidConfiguration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<PrDigestConfig, DigestError> {
    PrDigestConfig::load().map_err(|error| DigestError::InvalidConfiguration {
        message: error.to_string(),
    })
}

fn write_message(message: &str) -> Result<(), DigestError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{message}").map_err(|error| DigestError::Io {
        message: error.to_string(),
    })
}
