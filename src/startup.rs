use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(feature = "web-interface")]
use crate::{cosmic::CosmicHandle, shutdown, web};
#[cfg(feature = "web-interface")]
use rust_i18n::t;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config and apply its locale
pub async fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            rust_i18n::set_locale(&config.site_locale);
            info!("Setting locale to {}", config.site_locale);
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the web server and serve until a shutdown signal arrives
#[cfg(feature = "web-interface")]
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    // Spawn the Cosmic actor
    let store = CosmicHandle::new(Arc::clone(&config));

    let state = web::AppState::new(Arc::clone(&config), Arc::new(store.clone()));
    let app = web::router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!(
        "{}",
        t!("server_starting", name = &config.site.title, addr = &addr)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::handle_signals(store))
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
