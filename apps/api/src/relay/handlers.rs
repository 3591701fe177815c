use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::llm_client::{Message, Usage};
use crate::relay::compose::{compose_prompt, Improvement};
use crate::state::AppState;

/// Ongoing conversations get the larger budget; the comparison view only
/// needs short samples.
const CHAT_MAX_TOKENS: u32 = 8000;
const COMPARE_MAX_TOKENS: u32 = 1000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub enhanced_prompt: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub usage: Usage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub basic_prompt: Option<String>,
    pub enhanced_prompt: Option<String>,
}

#[derive(Serialize)]
pub struct PromptResult {
    pub text: String,
    pub usage: Usage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub basic_response: PromptResult,
    pub enhanced_response: PromptResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    pub basic_prompt: Option<String>,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub enhanced_prompt: String,
}

/// POST /api/chat
///
/// New conversations are seeded with the enhanced prompt as the sole user
/// turn; ongoing conversations forward the message history verbatim.
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let conversation = resolve_conversation(req.messages, req.enhanced_prompt)?;
    info!("Chat relay: {} turn(s)", conversation.len());

    let completion = state.llm.complete(&conversation, CHAT_MAX_TOKENS).await?;

    Ok(Json(ChatResponse {
        message: completion.text,
        usage: completion.usage,
    }))
}

/// POST /api/compare
///
/// Issues both completions together; either failure fails the whole request
/// with no partial data.
pub async fn handle_compare(
    State(state): State<AppState>,
    AppJson(req): AppJson<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    let basic_prompt = require_prompt(req.basic_prompt, "basicPrompt")?;
    let enhanced_prompt = require_prompt(req.enhanced_prompt, "enhancedPrompt")?;

    let basic_turn = [Message::user(basic_prompt)];
    let enhanced_turn = [Message::user(enhanced_prompt)];

    info!("Comparison relay: issuing parallel completions");
    let (basic, enhanced) = tokio::try_join!(
        state.llm.complete(&basic_turn, COMPARE_MAX_TOKENS),
        state.llm.complete(&enhanced_turn, COMPARE_MAX_TOKENS),
    )?;

    Ok(Json(CompareResponse {
        basic_response: PromptResult {
            text: basic.text,
            usage: basic.usage,
        },
        enhanced_response: PromptResult {
            text: enhanced.text,
            usage: enhanced.usage,
        },
    }))
}

/// POST /api/prompt/compose
pub async fn handle_compose(
    AppJson(req): AppJson<ComposeRequest>,
) -> Result<Json<ComposeResponse>, AppError> {
    let basic_prompt = require_prompt(req.basic_prompt, "basicPrompt")?;

    Ok(Json(ComposeResponse {
        enhanced_prompt: compose_prompt(&basic_prompt, &req.improvements),
    }))
}

/// Turns the chat request body into the conversation to forward.
fn resolve_conversation(
    messages: Option<Vec<Message>>,
    enhanced_prompt: Option<String>,
) -> Result<Vec<Message>, AppError> {
    let messages =
        messages.ok_or_else(|| AppError::Validation("Messages array is required".to_string()))?;

    if !messages.is_empty() {
        // Ongoing conversation: history is forwarded verbatim, the enhanced
        // prompt (if any) is ignored.
        return Ok(messages);
    }

    match enhanced_prompt.filter(|p| !p.is_empty()) {
        Some(prompt) => Ok(vec![Message::user(prompt)]),
        None => Err(AppError::Validation(
            "Either message history or enhanced prompt is required".to_string(),
        )),
    }
}

fn require_prompt(prompt: Option<String>, field: &str) -> Result<String, AppError> {
    prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}
