//! Google Gemini `generateContent` client.
//!
//! Differences from OpenAI-style chat APIs that matter here:
//! - Turns are `contents` with `parts`; roles are `user` and `model`.
//! - System prompts go in the top-level `system_instruction`.
//! - Tools are declared as `functionDeclarations`; calls come back as
//!   `functionCall` parts and results go in as `functionResponse` parts.
//! - The API key travels in the `x-goog-api-key` header.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, Role, ToolCall, ToolSchema};

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client. `timeout` bounds every individual HTTP call.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Build the `generateContent` body for a conversation.
    pub(crate) fn build_request_body(messages: &[ChatMessage], tools: Option<&[ToolSchema]>) -> Value {
        let mut system_parts: Vec<String> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();
        // Consecutive tool results are answered in a single `user` content.
        let mut pending_responses: Vec<Value> = Vec::new();
        // Ids the model chose itself; only those are echoed back.
        let mut model_ids: HashSet<&str> = HashSet::new();

        for m in messages {
            if m.role != Role::Tool && !pending_responses.is_empty() {
                contents.push(json!({
                    "role": "user",
                    "parts": std::mem::take(&mut pending_responses),
                }));
            }

            match m.role {
                Role::System => {
                    if let Some(text) = &m.content {
                        system_parts.push(text.clone());
                    }
                }
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": m.content.clone().unwrap_or_default() }],
                    }));
                }
                Role::Assistant => {
                    let mut parts = Vec::new();
                    if let Some(text) = m.content.as_deref().filter(|t| !t.is_empty()) {
                        parts.push(json!({ "text": text }));
                    }
                    for call in m.tool_calls.iter().flatten() {
                        let mut part = json!({
                            "functionCall": {
                                "name": call.function.name,
                                "args": call.function.arguments,
                            }
                        });
                        if call.model_assigned_id {
                            part["functionCall"]["id"] = json!(call.id);
                            model_ids.insert(call.id.as_str());
                        }
                        if let Some(sig) = &call.thought_signature {
                            part["thoughtSignature"] = json!(sig);
                        }
                        parts.push(part);
                    }
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
                Role::Tool => {
                    let mut part = json!({
                        "functionResponse": {
                            "name": m.name.clone().unwrap_or_default(),
                            "response": { "result": m.content.clone().unwrap_or_default() },
                        }
                    });
                    if let Some(id) = m.tool_call_id.as_deref().filter(|id| model_ids.contains(id)) {
                        part["functionResponse"]["id"] = json!(id);
                    }
                    pending_responses.push(part);
                }
            }
        }

        if !pending_responses.is_empty() {
            contents.push(json!({ "role": "user", "parts": pending_responses }));
        }

        let mut body = json!({ "contents": contents });

        if !system_parts.is_empty() {
            body["system_instruction"] = json!({
                "parts": [{ "text": system_parts.join("\n\n") }]
            });
        }

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    /// Extract text and tool calls from a `generateContent` response.
    pub(crate) fn parse_response(body: &Value) -> Result<ChatResponse, LlmError> {
        let Some(candidate) = body.pointer("/candidates/0") else {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .and_then(|v| v.as_str())
                .unwrap_or("no candidates returned");
            return Err(LlmError::InvalidResponse(format!(
                "Gemini returned no candidates: {}",
                reason
            )));
        };

        let parts = candidate
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .cloned()
            .unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in &parts {
            if let Some(call) = part.get("functionCall") {
                let name = call
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| {
                        LlmError::InvalidResponse("functionCall part without a name".to_string())
                    })?;
                let model_id = call.get("id").and_then(|v| v.as_str());
                let id = model_id
                    .map(String::from)
                    .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
                let args = call.get("args").cloned().unwrap_or_else(|| json!({}));

                let mut tool_call = ToolCall::new(id, name, args);
                tool_call.model_assigned_id = model_id.is_some();
                tool_call.thought_signature = part
                    .get("thoughtSignature")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                tool_calls.push(tool_call);
                continue;
            }

            // Thought summaries are not part of the answer.
            if part.get("thought").and_then(|t| t.as_bool()) == Some(true) {
                continue;
            }

            if let Some(t) = part.get("text").and_then(|t| t.as_str()) {
                text.push_str(t);
            }
        }

        if parts.is_empty() {
            if let Some(reason) = candidate.get("finishReason").and_then(|r| r.as_str()) {
                if reason != "STOP" {
                    return Err(LlmError::InvalidResponse(format!(
                        "Gemini stopped without content: {}",
                        reason
                    )));
                }
            }
        }

        Ok(ChatResponse {
            content: (!text.is_empty()).then_some(text),
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError> {
        let url = self.endpoint(model);
        let body = Self::build_request_body(messages, tools);

        tracing::debug!(
            model = %model,
            turns = messages.len(),
            "Calling Gemini generateContent"
        );

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Gemini request failed");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        Self::parse_response(&value)
    }
}
