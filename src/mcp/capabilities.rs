//! MCP method handlers backed by the capability registry
//!
//! Translates `tools/*`, `resources/*` and `prompts/*` requests into registry
//! lookups and shapes the results into MCP payloads.

use std::collections::HashMap;

use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, ContentBlock, GetPromptResult,
    ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, Prompt,
    PromptArgument, PromptMessage, ReadResourceContent, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceTemplate, Role, TextContent, TextResourceContents,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_result, INTERNAL_ERROR, INVALID_PARAMS,
};
use crate::registry::Registry;

#[derive(Debug, Deserialize)]
pub struct GetPromptParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<HashMap<String, String>>,
}

pub fn build_tools_list(registry: &Registry) -> ListToolsResult {
    ListToolsResult {
        meta: None,
        next_cursor: None,
        tools: registry.tools().map(|entry| entry.tool().clone()).collect(),
    }
}

pub fn build_resources_list(registry: &Registry) -> ListResourcesResult {
    ListResourcesResult {
        meta: None,
        next_cursor: None,
        resources: registry
            .resources()
            .map(|entry| Resource {
                annotations: None,
                description: entry.info().description.map(str::to_string),
                icons: vec![],
                meta: None,
                mime_type: Some(entry.mime_type().to_string()),
                name: entry.info().name.to_string(),
                size: None,
                title: None,
                uri: entry.template().as_str().to_string(),
            })
            .collect(),
    }
}

pub fn build_resource_templates_list(registry: &Registry) -> ListResourceTemplatesResult {
    ListResourceTemplatesResult {
        meta: None,
        next_cursor: None,
        resource_templates: registry
            .resource_templates()
            .map(|entry| ResourceTemplate {
                annotations: None,
                description: entry.info().description.map(str::to_string),
                icons: vec![],
                meta: None,
                mime_type: Some(entry.mime_type().to_string()),
                name: entry.info().name.to_string(),
                title: None,
                uri_template: entry.template().as_str().to_string(),
            })
            .collect(),
    }
}

pub fn build_prompts_list(registry: &Registry) -> ListPromptsResult {
    ListPromptsResult {
        meta: None,
        next_cursor: None,
        prompts: registry
            .prompts()
            .map(|entry| {
                let info = entry.info();
                Prompt {
                    arguments: info
                        .arguments
                        .iter()
                        .map(|argument| PromptArgument {
                            description: argument.description.map(str::to_string),
                            name: argument.name.to_string(),
                            required: Some(argument.required),
                            title: None,
                        })
                        .collect(),
                    description: info.description.map(str::to_string),
                    icons: vec![],
                    meta: None,
                    name: info.name.to_string(),
                    title: None,
                }
            })
            .collect(),
    }
}

pub fn handle_tools_call(registry: &Registry, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    let output = match registry.call_tool(&tool_call.name, tool_call.arguments) {
        Ok(output) => output,
        Err(err) => return app_error_to_json_rpc(id, err),
    };

    let text = match &output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let structured_content = match output {
        Value::Object(map) => map,
        other => Map::from_iter([("result".to_string(), other)]),
    };

    serialize_result(
        id,
        &CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error: None,
            meta: None,
            structured_content: Some(structured_content),
        },
    )
}

pub fn handle_resources_read(
    registry: &Registry,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    match registry.read_resource(&resource_read.uri) {
        Ok(content) => serialize_result(
            id,
            &ReadResourceResult {
                contents: vec![ReadResourceContent::from(TextResourceContents {
                    meta: None,
                    mime_type: Some(content.mime_type),
                    text: content.text,
                    uri: content.uri,
                })],
                meta: None,
            },
        ),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

pub fn handle_prompts_get(registry: &Registry, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let prompt_get: GetPromptParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    match registry.get_prompt(&prompt_get.name, prompt_get.arguments) {
        Ok(prompt) => serialize_result(
            id,
            &GetPromptResult {
                description: prompt.description.map(str::to_string),
                messages: vec![PromptMessage {
                    content: ContentBlock::from(TextContent::new(prompt.text, None, None)),
                    role: Role::User,
                }],
                meta: None,
            },
        ),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

pub fn serialize_result<T: Serialize>(id: Option<Value>, result: &T) -> Value {
    match serde_json::to_value(result) {
        Ok(value) => json_rpc_result(id, value),
        Err(err) => {
            tracing::error!(error = %err, "mcp result serialization failed");
            json_rpc_error(id, INTERNAL_ERROR, "Internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::catalog::default_registry;

    fn registry() -> Registry {
        default_registry().expect("default registry")
    }

    #[test]
    fn tool_call_wraps_scalar_output() {
        let response = handle_tools_call(
            &registry(),
            Some(json!(1)),
            Some(json!({ "name": "add_numbers", "arguments": { "a": 2, "b": 3 } })),
        );

        assert_eq!(response["result"]["content"][0]["type"], "text");
        assert_eq!(response["result"]["content"][0]["text"], "5");
        assert_eq!(response["result"]["structuredContent"]["result"], 5);
    }

    #[test]
    fn tool_call_returns_string_text_verbatim() {
        let response = handle_tools_call(
            &registry(),
            Some(json!(2)),
            Some(json!({ "name": "echo_message", "arguments": { "message": "Hello" } })),
        );

        assert_eq!(response["result"]["content"][0]["text"], "You said: Hello");
        assert_eq!(
            response["result"]["structuredContent"]["result"],
            "You said: Hello"
        );
    }

    #[test]
    fn tool_call_without_params_is_invalid() {
        let response = handle_tools_call(&registry(), Some(json!(3)), None);
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn resource_read_returns_text_contents() {
        let response = handle_resources_read(
            &registry(),
            Some(json!(4)),
            Some(json!({ "uri": "config://app" })),
        );

        let contents = &response["result"]["contents"][0];
        assert_eq!(contents["uri"], "config://app");
        assert_eq!(contents["mimeType"], "text/plain");
        assert!(contents["text"]
            .as_str()
            .is_some_and(|text| text.contains("configuration")));
    }

    #[test]
    fn templates_list_describes_placeholders() {
        let templates = serde_json::to_value(build_resource_templates_list(&registry()))
            .expect("templates json");

        assert_eq!(
            templates["resourceTemplates"][0]["uriTemplate"],
            "greeting://{name}"
        );
        assert_eq!(templates["resourceTemplates"][0]["name"], "greeting");
        assert_eq!(templates["resourceTemplates"][0]["mimeType"], "text/plain");
    }

    #[test]
    fn prompts_list_includes_arguments() {
        let prompts = serde_json::to_value(build_prompts_list(&registry())).expect("prompts json");

        assert_eq!(prompts["prompts"][0]["name"], "review_code");
        assert_eq!(prompts["prompts"][0]["arguments"][0]["name"], "code");
        assert_eq!(prompts["prompts"][0]["arguments"][0]["required"], true);
        assert_eq!(prompts["prompts"][1]["name"], "explain_concept");
    }

    #[test]
    fn prompt_get_returns_user_message() {
        let response = handle_prompts_get(
            &registry(),
            Some(json!(5)),
            Some(json!({ "name": "explain_concept", "arguments": { "concept": "recursion" } })),
        );

        let message = &response["result"]["messages"][0];
        assert_eq!(message["role"], "user");
        assert_eq!(message["content"]["type"], "text");
        assert!(message["content"]["text"]
            .as_str()
            .is_some_and(|text| text.contains("recursion")));
        assert_eq!(
            response["result"]["description"],
            "Create a prompt to explain a concept"
        );
    }

    #[test]
    fn prompt_params_accept_missing_arguments() {
        let params: GetPromptParams =
            serde_json::from_value(json!({ "name": "review_code" })).expect("params");
        assert_eq!(params.arguments, None::<HashMap<String, String>>);
    }
}
