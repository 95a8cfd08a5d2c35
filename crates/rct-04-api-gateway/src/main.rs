//! RCT-Manager gateway binary.

use rct_04_api_gateway::{ApiGatewayService, GatewayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = GatewayConfig::from_env()?;
    let mut service = ApiGatewayService::new(config)?;
    service.start().await?;
    Ok(())
}
