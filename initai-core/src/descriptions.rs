//! Human-readable descriptions for catalog entries and manifests.
//!
//! Known scope and variant names come from small static tables; anything
//! else gets a templated fallback so new folders show up without code
//! changes.

use crate::models::PackageNode;
use crate::UNIVERSAL;

pub fn framework_description(framework: &str) -> String {
    format!("{} initialization packages", framework)
}

pub fn scope_description(scope: &str) -> String {
    match scope {
        "backend" => "Server-side development, APIs, databases".to_string(),
        "frontend" => "Client-side development, UI/UX".to_string(),
        "fullstack" => "Complete application development".to_string(),
        other => format!("{} development", other),
    }
}

pub fn variant_description(variant: &str) -> String {
    match variant {
        UNIVERSAL => "Works with any LLM".to_string(),
        "claude" => "Optimized for Claude (Anthropic)".to_string(),
        "gemini" => "Optimized for Gemini (Google)".to_string(),
        "gpt" | "openai" | "chatgpt" => "Optimized for ChatGPT (OpenAI)".to_string(),
        other => format!("Optimized for {}", other),
    }
}

/// Description embedded in a package manifest.
pub fn package_description(node: &PackageNode) -> String {
    format!(
        "{} {} development for {}",
        node.framework, node.scope, node.variant
    )
}

/// Install instructions embedded in a package manifest.
pub fn install_instructions(node: &PackageNode) -> String {
    format!(
        "Extract this archive into initai/{}-{}-{}/ in your project and instruct \
         your LLM to read the framework files from that folder at session start. \
         Treat the folder as read-only reference material.",
        node.framework, node.scope, node.variant
    )
}
