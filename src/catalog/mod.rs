//! Example capabilities shipped with the template
//!
//! Replace these tools, resources and prompts with domain-specific ones; keep
//! `default_registry` as the single place where everything gets registered.

pub mod models;
pub mod prompts;
pub mod resources;
pub mod tools;

use crate::registry::{Registry, RegistryError};

pub fn default_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    tools::register(&mut registry)?;
    resources::register(&mut registry)?;
    prompts::register(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::default_registry;

    #[test]
    fn registers_every_example_capability() {
        let registry = default_registry().expect("default registry");

        let tools: Vec<_> = registry
            .tools()
            .map(|entry| entry.tool().name.clone())
            .collect();
        let resources: Vec<_> = registry
            .resources()
            .map(|entry| entry.template().as_str())
            .collect();
        let templates: Vec<_> = registry
            .resource_templates()
            .map(|entry| entry.template().as_str())
            .collect();
        let prompts: Vec<_> = registry.prompts().map(|entry| entry.info().name).collect();

        assert_eq!(tools, ["add_numbers", "echo_message"]);
        assert_eq!(resources, ["config://app"]);
        assert_eq!(templates, ["greeting://{name}"]);
        assert_eq!(prompts, ["review_code", "explain_concept"]);
    }
}
