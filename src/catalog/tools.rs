//! Example tools callable by the model client

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::registry::{Registry, RegistryError};

#[macros::mcp_tool(
    name = "add_numbers",
    description = "Add two numbers together. Both numbers and their sum must fit in a signed 64-bit integer."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AddNumbersTool {
    pub a: i64,
    pub b: i64,
}

#[macros::mcp_tool(name = "echo_message", description = "Echo back a message")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct EchoMessageTool {
    pub message: String,
}

/// Sum of `a` and `b`. A sum outside the `i64` range is a bad request rather
/// than a wrapped value.
pub fn add_numbers(a: i64, b: i64) -> Result<i64, AppError> {
    a.checked_add(b).ok_or_else(|| {
        AppError::bad_request("integer_overflow", "sum does not fit in a 64-bit integer")
    })
}

pub fn echo_message(message: &str) -> String {
    format!("You said: {message}")
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_tool(AddNumbersTool::tool(), |args: AddNumbersTool| {
        add_numbers(args.a, args.b)
    })?;
    registry.register_tool(EchoMessageTool::tool(), |args: EchoMessageTool| {
        Ok(echo_message(&args.message))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_numbers() {
        assert_eq!(add_numbers(2, 3).expect("sum"), 5);
        assert_eq!(add_numbers(-7, 7).expect("sum"), 0);
    }

    #[test]
    fn rejects_overflowing_sum() {
        let error = add_numbers(i64::MAX, 1).expect_err("overflow");
        assert!(matches!(
            error,
            AppError::BadRequest {
                code: "integer_overflow",
                ..
            }
        ));
    }

    #[test]
    fn add_numbers_description_states_its_range() {
        let description = AddNumbersTool::tool().description.unwrap_or_default();
        assert!(description.starts_with("Add two numbers together"));
        assert!(description.contains("64-bit"));
    }

    #[test]
    fn echoes_message() {
        assert_eq!(echo_message("Hello"), "You said: Hello");
    }

    #[test]
    fn tool_schemas_declare_arguments() {
        assert_eq!(AddNumbersTool::tool_name(), "add_numbers");
        assert_eq!(EchoMessageTool::tool_name(), "echo_message");

        let schema = serde_json::to_value(AddNumbersTool::tool()).expect("tool serialization");
        assert_eq!(schema["inputSchema"]["type"], "object");
        assert!(schema["inputSchema"]["properties"]["a"].is_object());
        assert!(schema["inputSchema"]["properties"]["b"].is_object());
    }
}
