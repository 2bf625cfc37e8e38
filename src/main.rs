//! Session Client - Entry Point
//!
//! An interactive shell that logs in, signs up and logs out against an
//! identity service, resuming the previous session from a stored token.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use session_client::config::{Backend, ClientConfig};
use session_client::service::{HttpIdentityService, IdentityService, MemoryIdentityService};
use session_client::store::FileTokenStore;
use session_client::utils::setup_logging;
use session_client::{ServiceError, SessionClient, shell};

fn identity_service(config: &ClientConfig) -> Result<Arc<dyn IdentityService>, ServiceError> {
    let service: Arc<dyn IdentityService> = match config.backend {
        Backend::Memory => {
            Arc::new(MemoryIdentityService::new().uncertainty(config.uncertainty()))
        }
        Backend::Http => Arc::new(HttpIdentityService::new(config.service_url.as_str())?),
    };
    Ok(service)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&config);
    info!("Launching session client ({:?} backend)...", config.backend);

    let service = match identity_service(&config) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to create identity service: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = FileTokenStore::new(&config.token_file);
    let client = SessionClient::with_timeout(store, service, config.timeout());

    match shell::run(client, tokio::io::stdin(), tokio::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Shell terminated: {}", e);
            ExitCode::FAILURE
        }
    }
}
