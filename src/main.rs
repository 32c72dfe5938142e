// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;

use eduos_server::{
    api::router,
    config::AppConfig,
    providers::GroqClient,
    state::AppState,
    storage::{schema::ensure_schema, seed::seed_default_users, Database},
    telemetry::init_tracing,
};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let database_url = config.require_database_url()?;
    let db = Database::connect(database_url, config.database_max_connections).await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Connected to PostgreSQL"
    );

    ensure_schema(&db).await?;
    seed_default_users(&db).await?;

    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; login and authenticated routes will fail");
    }
    if config.groq.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; /ai routes will fail");
    }

    let llm = GroqClient::new(&config.groq)?;
    tracing::info!(model = %llm.model(), endpoint = %llm.endpoint(), "LLM provider configured");

    let address = config.bind_address();
    let app = router(AppState::new(config, db, llm));

    let listener = TcpListener::bind(&address).await?;
    tracing::info!("EduOS server listening on http://{address} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
