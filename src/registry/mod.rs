//! Capability registry binding identifiers to tool, resource and prompt handlers
//!
//! The registry is filled once at startup and only read afterwards. Each kind has
//! its own namespace, so a tool and a prompt may share a name.

mod fields;
pub mod uri_template;

use std::collections::{BTreeSet, HashMap};

use rust_mcp_sdk::schema::Tool;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::errors::AppError;

pub use uri_template::{TemplateError, UriParams, UriTemplate};

pub const DEFAULT_MIME_TYPE: &str = "text/plain";

type ToolHandler = Box<dyn Fn(Value) -> Result<Value, AppError> + Send + Sync>;
type ResourceHandler = Box<dyn Fn(&UriParams) -> Result<String, AppError> + Send + Sync>;
type PromptHandler = Box<dyn Fn(Value) -> Result<String, AppError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),
    #[error("resource `{0}` is already registered")]
    DuplicateResource(String),
    #[error("prompt `{0}` is already registered")]
    DuplicatePrompt(String),
    #[error("invalid resource template `{template}`")]
    InvalidTemplate {
        template: String,
        #[source]
        source: TemplateError,
    },
    #[error(
        "resource template `{template}` placeholders {placeholders:?} do not match handler parameters {parameters:?}"
    )]
    ParameterMismatch {
        template: String,
        placeholders: Vec<String>,
        parameters: Vec<String>,
    },
    #[error(
        "prompt `{prompt}` declares arguments {declared:?} but its handler takes {parameters:?}"
    )]
    ArgumentMismatch {
        prompt: String,
        declared: Vec<String>,
        parameters: Vec<String>,
    },
}

/// Argument type for resources whose template has no placeholders.
#[derive(Debug, Default, Deserialize)]
pub struct NoParams {}

#[derive(Debug, Clone, Copy)]
pub struct ResourceInfo {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub mime_type: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptArgumentInfo {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptInfo {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub arguments: &'static [PromptArgumentInfo],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub description: Option<&'static str>,
    pub text: String,
}

pub struct ToolEntry {
    tool: Tool,
    handler: ToolHandler,
}

impl ToolEntry {
    pub fn tool(&self) -> &Tool {
        &self.tool
    }
}

pub struct ResourceEntry {
    template: UriTemplate,
    info: ResourceInfo,
    handler: ResourceHandler,
}

impl ResourceEntry {
    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }

    pub fn mime_type(&self) -> &'static str {
        self.info.mime_type.unwrap_or(DEFAULT_MIME_TYPE)
    }
}

pub struct PromptEntry {
    info: PromptInfo,
    handler: PromptHandler,
}

impl PromptEntry {
    pub fn info(&self) -> &PromptInfo {
        &self.info
    }
}

#[derive(Default)]
pub struct Registry {
    tools: Vec<ToolEntry>,
    resources: Vec<ResourceEntry>,
    prompts: Vec<PromptEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool<A, R, F>(&mut self, tool: Tool, handler: F) -> Result<(), RegistryError>
    where
        A: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> Result<R, AppError> + Send + Sync + 'static,
    {
        if self.tools.iter().any(|entry| entry.tool.name == tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }

        let handler: ToolHandler = Box::new(move |arguments: Value| {
            let arguments = decode_arguments::<A>(arguments)?;
            let output = handler(arguments)?;
            serde_json::to_value(output)
                .map_err(|err| AppError::internal(format!("tool output serialization: {err}")))
        });

        self.tools.push(ToolEntry { tool, handler });
        Ok(())
    }

    pub fn register_resource<P, F>(
        &mut self,
        uri_template: &str,
        info: ResourceInfo,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        P: DeserializeOwned + 'static,
        F: Fn(P) -> Result<String, AppError> + Send + Sync + 'static,
    {
        let template =
            UriTemplate::parse(uri_template).map_err(|source| RegistryError::InvalidTemplate {
                template: uri_template.to_string(),
                source,
            })?;

        let parameters = fields::struct_fields::<P>().unwrap_or_default();
        if !same_names(template.placeholders().iter().map(String::as_str), parameters) {
            return Err(RegistryError::ParameterMismatch {
                template: uri_template.to_string(),
                placeholders: template.placeholders().to_vec(),
                parameters: parameters.iter().map(|name| name.to_string()).collect(),
            });
        }

        if self
            .resources
            .iter()
            .any(|entry| entry.template.is_equivalent(&template))
        {
            return Err(RegistryError::DuplicateResource(uri_template.to_string()));
        }

        let handler: ResourceHandler = Box::new(move |params: &UriParams| {
            let params = serde_json::to_value(params)
                .map_err(|err| AppError::internal(format!("uri params serialization: {err}")))?;
            handler(decode_arguments::<P>(params)?)
        });

        self.resources.push(ResourceEntry {
            template,
            info,
            handler,
        });
        Ok(())
    }

    pub fn register_prompt<A, F>(
        &mut self,
        info: PromptInfo,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        A: DeserializeOwned + 'static,
        F: Fn(A) -> Result<String, AppError> + Send + Sync + 'static,
    {
        if self.prompts.iter().any(|entry| entry.info.name == info.name) {
            return Err(RegistryError::DuplicatePrompt(info.name.to_string()));
        }

        let parameters = fields::struct_fields::<A>().unwrap_or_default();
        if !same_names(info.arguments.iter().map(|argument| argument.name), parameters) {
            return Err(RegistryError::ArgumentMismatch {
                prompt: info.name.to_string(),
                declared: info
                    .arguments
                    .iter()
                    .map(|argument| argument.name.to_string())
                    .collect(),
                parameters: parameters.iter().map(|name| name.to_string()).collect(),
            });
        }

        let handler: PromptHandler =
            Box::new(move |arguments: Value| handler(decode_arguments::<A>(arguments)?));

        self.prompts.push(PromptEntry { info, handler });
        Ok(())
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.iter()
    }

    /// Resources addressable by a single fixed URI.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources
            .iter()
            .filter(|entry| entry.template.is_static())
    }

    /// Resources whose URI carries placeholders.
    pub fn resource_templates(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources
            .iter()
            .filter(|entry| !entry.template.is_static())
    }

    pub fn prompts(&self) -> impl Iterator<Item = &PromptEntry> {
        self.prompts.iter()
    }

    pub fn call_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Value, AppError> {
        let entry = self
            .tools
            .iter()
            .find(|entry| entry.tool.name == name)
            .ok_or_else(|| {
                AppError::not_found("tool_not_found", "unknown tool name", json!({ "name": name }))
            })?;

        (entry.handler)(Value::Object(arguments.unwrap_or_default()))
    }

    pub fn read_resource(&self, uri: &str) -> Result<ResourceContent, AppError> {
        let (entry, params) = self
            .resources()
            .find(|entry| entry.template.as_str() == uri)
            .map(|entry| (entry, UriParams::new()))
            .or_else(|| {
                self.resource_templates()
                    .find_map(|entry| entry.template.matches(uri).map(|params| (entry, params)))
            })
            .ok_or_else(|| {
                AppError::not_found(
                    "resource_not_found",
                    "unknown resource uri",
                    json!({ "uri": uri }),
                )
            })?;

        Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: entry.mime_type().to_string(),
            text: (entry.handler)(&params)?,
        })
    }

    pub fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<RenderedPrompt, AppError> {
        let entry = self
            .prompts
            .iter()
            .find(|entry| entry.info.name == name)
            .ok_or_else(|| {
                AppError::not_found(
                    "prompt_not_found",
                    "unknown prompt name",
                    json!({ "name": name }),
                )
            })?;

        let arguments = arguments.unwrap_or_default();
        if let Some(missing) = entry
            .info
            .arguments
            .iter()
            .find(|argument| argument.required && !arguments.contains_key(argument.name))
        {
            return Err(AppError::bad_request(
                "missing_argument",
                format!("missing required argument: {}", missing.name),
            ));
        }

        let arguments = Value::Object(
            arguments
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        );

        Ok(RenderedPrompt {
            description: entry.info.description,
            text: (entry.handler)(arguments)?,
        })
    }
}

/// Whether `names` lists exactly the handler parameters, each once.
fn same_names<'a>(names: impl Iterator<Item = &'a str>, parameters: &[&str]) -> bool {
    let names: Vec<&str> = names.collect();
    let unique: BTreeSet<&str> = names.iter().copied().collect();
    unique.len() == names.len()
        && names.len() == parameters.len()
        && unique == parameters.iter().copied().collect::<BTreeSet<_>>()
}

fn decode_arguments<A: DeserializeOwned>(arguments: Value) -> Result<A, AppError> {
    serde_json::from_value(arguments)
        .map_err(|err| AppError::bad_request("invalid_arguments", format!("invalid arguments: {err}")))
}
