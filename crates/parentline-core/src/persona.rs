//! Persona name generation.
//!
//! On first contact with a session, one small completion call asks the model
//! for a JSON object naming the parent and the child it will role-play.
//! Any failure (network, non-JSON, missing or blank fields) falls back to
//! [`fallback_persona`] so session creation never fails.

use parentline_types::llm::CompletionRequest;
use parentline_types::session::PersonaNames;
use serde::Deserialize;

use crate::llm::box_provider::BoxLlmProvider;

/// Names used whenever generation fails.
pub const FALLBACK_PARENT: &str = "Alex";
pub const FALLBACK_CHILD: &str = "Jordan";

pub fn fallback_persona() -> PersonaNames {
    PersonaNames::new(FALLBACK_PARENT, FALLBACK_CHILD)
}

const PERSONA_SYSTEM_PROMPT: &str = "You create realistic first names for a role-play. \
Respond with ONLY a JSON object of the form {\"parent\": \"<first name>\", \"child\": \"<first name>\"} \
and nothing else.";

const PERSONA_USER_PROMPT: &str = "Pick a first name for a parent and a first name for their \
eight-year-old child who has autism.";

#[derive(Deserialize)]
struct RawPersona {
    parent: String,
    child: String,
}

/// Ask the model for a parent/child name pair.
#[tracing::instrument(name = "generate_persona_names", skip(provider), fields(provider = %provider.name()))]
pub async fn generate_persona_names(
    provider: &BoxLlmProvider,
    model: &str,
    max_tokens: u32,
) -> PersonaNames {
    let request = CompletionRequest {
        model: model.to_string(),
        system: Some(PERSONA_SYSTEM_PROMPT.to_string()),
        prompt: PERSONA_USER_PROMPT.to_string(),
        max_tokens,
        temperature: Some(1.0),
    };

    match provider.complete(&request).await {
        Ok(response) => parse_persona_names(&response.content).unwrap_or_else(|| {
            tracing::warn!(raw = %response.content, "Persona reply was not usable JSON, using fallback names");
            fallback_persona()
        }),
        Err(err) => {
            tracing::warn!(error = %err, "Persona generation failed, using fallback names");
            fallback_persona()
        }
    }
}

/// Extract `{parent, child}` from a model reply.
///
/// Tolerates surrounding prose or a fenced code block by parsing the span
/// between the first `{` and the last `}`. Blank names are rejected.
pub fn parse_persona_names(content: &str) -> Option<PersonaNames> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }

    let raw: RawPersona = serde_json::from_str(&content[start..=end]).ok()?;
    let parent = raw.parent.trim();
    let child = raw.child.trim();
    if parent.is_empty() || child.is_empty() {
        return None;
    }
    Some(PersonaNames::new(parent, child))
}
