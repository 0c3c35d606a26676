use anyhow::Result;
use clap::Parser;
use gemini_relay::app;
use gemini_relay::models::{Config, Variant};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-relay")]
#[command(about = "Relay text and image prompts to the Gemini API")]
struct CliArgs {
    /// Listen host (overrides RELAY_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides RELAY_PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Response contract: `multimodal` or `text` (overrides RELAY_VARIANT).
    #[arg(long, value_name = "VARIANT", value_parser = parse_variant_arg)]
    variant: Option<Variant>,
}

impl CliArgs {
    /// CLI values, keyed by the environment variable each one replaces.
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(host) = &self.host {
            overrides.push(("RELAY_HOST", host.clone()));
        }
        if let Some(port) = self.port {
            overrides.push(("RELAY_PORT", port.to_string()));
        }
        if let Some(variant) = self.variant {
            overrides.push(("RELAY_VARIANT", variant.to_string()));
        }
        overrides
    }
}

fn parse_variant_arg(input: &str) -> std::result::Result<Variant, String> {
    input.parse().map_err(|e: gemini_relay::Error| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gemini-relay");

    let args = CliArgs::parse();

    let config = match Config::from_env_with_overrides(&args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(config).await {
        error!("Relay server stopped: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
