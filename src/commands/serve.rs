//! Serve command - Starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use super::Core;
use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::domain::TokenService;
use crate::errors::{AppError, AppResult};
use crate::jobs::{HtmlTemplateService, MessagingService, SmtpMessagingService, TemplateService};
use crate::security::JwtTokenService;
use crate::services::{Authenticator, UserManager};

/// Messaging is optional: without SMTP settings, or with broken ones,
/// users are still created, just without a welcome email.
fn messaging(config: &Config) -> Option<Arc<dyn MessagingService>> {
    let Some(settings) = &config.smtp else {
        tracing::warn!("SMTP_HOST not set, messaging disabled");
        return None;
    };

    match SmtpMessagingService::new(settings) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            tracing::warn!("Messaging disabled: {}", e);
            None
        }
    }
}

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_files(
        &config.rsa_private_key_path,
        &config.rsa_public_key_path,
        config.jwt_issuer.clone(),
    )?);

    let core = Core::connect(&config).await?;

    let templates: Arc<dyn TemplateService> = Arc::new(HtmlTemplateService::new());
    let users = Arc::new(
        UserManager::new(core.factory.clone(), core.hasher.clone())
            .with_messaging(messaging(&config), Some(templates)),
    );
    let email_tasks = users.tracker();

    core.migrate(users.clone(), &config).await?;

    let auth = Arc::new(Authenticator::new(
        core.factory.clone(),
        core.hasher.clone(),
        tokens.clone(),
    ));
    let state = AppState::new(auth, users, tokens).with_database(core.database.clone());
    let app = create_router(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // Let in-flight welcome emails finish, up to the grace period
    email_tasks.close();
    let grace = Duration::from_secs(config.shutdown_grace_seconds);
    if tokio::time::timeout(grace, email_tasks.wait()).await.is_err() {
        tracing::warn!(
            pending = email_tasks.len(),
            "Abandoning email deliveries still running after {:?}",
            grace
        );
    }

    core.close().await?;
    tracing::info!("Server stopped gracefully");
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
