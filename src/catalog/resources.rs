//! Example read-only resources addressed by URI

use serde::Deserialize;

use crate::registry::{NoParams, Registry, RegistryError, ResourceInfo};

pub const CONFIG_RESOURCE_URI: &str = "config://app";
pub const GREETING_RESOURCE_TEMPLATE: &str = "greeting://{name}";

#[derive(Debug, Deserialize)]
pub struct GreetingParams {
    pub name: String,
}

pub fn get_config() -> String {
    "This is the application configuration data".to_string()
}

pub fn get_greeting(name: &str) -> String {
    format!("Hello, {name}! Welcome to the MCP server.")
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_resource(
        CONFIG_RESOURCE_URI,
        ResourceInfo {
            name: "app_config",
            description: Some("Get application configuration"),
            mime_type: None,
        },
        |_: NoParams| Ok(get_config()),
    )?;
    registry.register_resource(
        GREETING_RESOURCE_TEMPLATE,
        ResourceInfo {
            name: "greeting",
            description: Some("Get a personalized greeting"),
            mime_type: None,
        },
        |params: GreetingParams| Ok(get_greeting(&params.name)),
    )?;
    Ok(())
}
