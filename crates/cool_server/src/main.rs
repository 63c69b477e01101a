//! Entry point: load configuration, set up logging, then run the console
//! session until it is stopped.

use anyhow::Context;
use cool_server::{logging::setup_logging, AppConfig, CliArgs, CoolServer};
use std::time::Duration;
use tracing::{error, info};

fn display_banner() {
    println!(
        r#"
  ❄  Cool Server v{}
     simulated host for the cool plugin
"#,
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .with_context(|| format!("loading {}", args.config_path.display()))?;
    config.apply_cli(&args);

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration validation failed: {}", e);
    }

    setup_logging(&config.logging)?;
    display_banner();

    info!("📂 Config: {}", args.config_path.display());
    info!(
        "⏱️ Tick interval: {}ms | Teleport requests expire after {} ticks",
        config.server.tick_interval_ms, config.plugins.cool.teleport.expiry_ticks
    );

    let tick_interval = Duration::from_millis(config.server.tick_interval_ms);
    let mut server = CoolServer::new(config);
    server.start().await?;

    let outcome = match &args.script {
        Some(path) => server.run_script(path).await,
        None => server.run_interactive(tick_interval).await,
    };
    if let Err(e) = &outcome {
        error!("❌ Session ended with an error: {}", e);
    }

    server.shutdown().await?;
    info!("👋 Cool Server stopped");
    outcome.map_err(Into::into)
}
