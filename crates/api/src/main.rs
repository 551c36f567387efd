use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dosemate_api::bootstrap::{build_state, listen_addr, StartupError};
use dosemate_api::config::{LogFormat, ServerConfig};
use dosemate_api::router::build_app_router;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let state = build_state(&config).await?;
    let app = build_app_router(state, &config);

    let addr = listen_addr(&config)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, timeout_secs = config.request_timeout_secs, "DoseMate API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` overrides the default per-crate filter.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dosemate_api=debug,dosemate_db=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Resolve on Ctrl-C or SIGTERM so in-flight requests can drain.
///
/// If a signal handler cannot be installed, that source is logged and ignored.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let source = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal = source, "Shutting down");
}
