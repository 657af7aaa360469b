#![cfg_attr(not(feature = "web-interface"), allow(unused_imports))]

use eventboard::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    #[cfg(not(feature = "web-interface"))]
    {
        println!("Web interface feature not enabled. Please compile with --features web-interface");
        return Ok(());
    }

    #[cfg(feature = "web-interface")]
    {
        // Initialize logging
        startup::init_logging()?;

        info!("Starting eventboard");

        // Load configuration
        let config = startup::load_config().await?;

        // Start the web server
        startup::start_server(config).await
    }
}
