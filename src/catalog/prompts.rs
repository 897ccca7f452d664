//! Example prompt templates

use serde::Deserialize;

use crate::registry::{PromptArgumentInfo, PromptInfo, Registry, RegistryError};

#[derive(Debug, Deserialize)]
pub struct ReviewCodeArgs {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainConceptArgs {
    pub concept: String,
}

const REVIEW_CODE: PromptInfo = PromptInfo {
    name: "review_code",
    description: Some("Create a prompt for code review"),
    arguments: &[PromptArgumentInfo {
        name: "code",
        description: Some("Source code to review"),
        required: true,
    }],
};

const EXPLAIN_CONCEPT: PromptInfo = PromptInfo {
    name: "explain_concept",
    description: Some("Create a prompt to explain a concept"),
    arguments: &[PromptArgumentInfo {
        name: "concept",
        description: Some("Concept to explain"),
        required: true,
    }],
};

pub fn review_code(code: &str) -> String {
    format!("Please review this code and provide feedback:\n\n{code}")
}

pub fn explain_concept(concept: &str) -> String {
    format!("Please explain the concept of '{concept}' in simple terms with examples.")
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_prompt(REVIEW_CODE, |args: ReviewCodeArgs| {
        Ok(review_code(&args.code))
    })?;
    registry.register_prompt(EXPLAIN_CONCEPT, |args: ExplainConceptArgs| {
        Ok(explain_concept(&args.concept))
    })?;
    Ok(())
}
