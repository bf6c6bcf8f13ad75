//! Permit-gated calls to the text generator.

use krishi_core::prompt::Prompt;
use krishi_llm::{LlmError, LlmResult};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::state::AppState;

/// Runs `prompt` through the configured generator.
///
/// Holds one permit from `llm_permits` for the duration of the call, so the
/// number of in-flight provider requests never exceeds
/// `LLM_MAX_CONCURRENCY`.
pub async fn generate(state: &AppState, prompt: &Prompt) -> LlmResult<String> {
    let generator = state.generator.as_ref().ok_or(LlmError::NotConfigured)?;

    let _permit = state
        .llm_permits
        .acquire()
        .await
        .map_err(|_| LlmError::Request("generation permits closed".to_string()))?;

    debug!(
        available_permits = state.llm_permits.available_permits(),
        "Generation permit acquired"
    );
    generator.generate(prompt).await
}

/// Envelope returned when narrative generation cannot be served.
pub fn unavailable(message: &str) -> Value {
    json!({ "available": false, "message": message })
}

/// Logs a failed generation at the right level.
pub fn log_failure(what: &str, crop: &str, err: &LlmError) {
    match err {
        LlmError::NotConfigured => debug!(crop, "{} skipped: generator not configured", what),
        e if e.is_transient() => warn!(crop, error = %e, "{} failed, provider unavailable", what),
        e => warn!(crop, error = %e, "{} failed", what),
    }
}
