//! System prompt loading.
//!
//! The prompt is read once at startup: from a file when one is configured,
//! otherwise the built-in digital twin persona is used.

use std::path::Path;

use anyhow::{Context, bail};
use tracing::info;

/// Persona used when no prompt file is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a digital twin: an AI that speaks on behalf of the person you represent, \
in the first person, to visitors of their website. Be professional and engaging, \
as if talking to a potential client or future employer. Stay in character, keep \
answers concise, and if you do not know something, say so rather than inventing it. \
You have a memory of the earlier turns of this conversation; use it to stay consistent.";

/// Resolve the system prompt.
///
/// A configured file that cannot be read, or that is blank, is an error.
pub async fn load_system_prompt(path: Option<&Path>) -> anyhow::Result<String> {
    let Some(path) = path else {
        info!("Using built-in system prompt");
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read prompt file {}", path.display()))?;

    let prompt = content.trim();
    if prompt.is_empty() {
        bail!("prompt file {} is empty", path.display());
    }

    info!(path = %path.display(), chars = prompt.len(), "Loaded system prompt");
    Ok(prompt.to_string())
}
