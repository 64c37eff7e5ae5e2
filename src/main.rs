/// Middleware do CRM de chatbot: disparo em massa de templates WhatsApp
///
/// - Diretório de clientes/contatos/templates carregado de YAML (recarregável)
/// - Três gatilhos HTTP (genérico, VIP, por tags) + preview
/// - Envio individual via WhatsApp Cloud API, falhas isoladas por contato

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use chatbot_crm_middleware::{build_router, config, services, utils, AppState};

use config::Settings;
use services::TenantDirectory;
use utils::{AppError, logging::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()));

    // Diretório de clientes (YAML)
    let directory = TenantDirectory::load(&settings.directory.path)
        .await
        .map_err(|e| AppError::ConfigError(format!("Failed to load directory: {}", e)))?;

    let stats = directory.stats().await;
    log_directory_loaded(&settings.directory.path, stats.tenants, stats.contacts);
    if stats.tenants == 0 {
        log_warning("⚠️ Diretório sem clientes - /ready responderá 503 até um reload");
    }

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let host = settings.server.host.clone();

    let app_state = Arc::new(AppState::new(settings, Arc::new(directory))?);
    log_info(&format!(
        "⚡ Disparo configurado: {} envios simultâneos, timeout {}s por contato",
        app_state.settings.bulk_send.max_concurrency,
        app_state.settings.bulk_send.per_contact_timeout_seconds
    ));

    let app = build_router(app_state);

    // Iniciar servidor
    // No Cloud Run, usar a variável de ambiente PORT
    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Failed to install Ctrl+C handler: {}", e));
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
                log_error(&format!("Failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
