use std::sync::Arc;

use mcp_server_template::{catalog, config::Config, logging, transport, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let registry = catalog::default_registry()?;
    info!(
        tools = registry.tools().count(),
        resources = registry.resources().count(),
        resource_templates = registry.resource_templates().count(),
        prompts = registry.prompts().count(),
        "capability registry populated"
    );

    let transport = transport::from_config(&config)?;
    let state = AppState::new(
        Arc::new(registry),
        config.server_name.clone(),
        config.api_token.clone(),
    );

    info!(
        transport = transport.name(),
        server_name = %config.server_name,
        "server starting"
    );

    transport.serve(state).await?;
    Ok(())
}
