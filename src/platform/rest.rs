//! REST implementation of the agents platform protocol.
//!
//! Drives the assistants-style HTTP surface: agent create/delete, thread and
//! message creation, run polling with inline tool dispatch, and ordered
//! message listing. All failures surface immediately; nothing retries.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::tools::{ToolDefinition, ToolRegistry};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{
    AgentHandle, AgentsBackend, ContentBlock, ListOrder, MessagePayload, Role, RunOutcome,
    ThreadHandle, ThreadMessage,
};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// HTTP backend for the hosted agents platform.
pub struct RestBackend {
    endpoint: String,
    api_key: String,
}

impl RestBackend {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}{path}", self.endpoint);
        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value> {
        let url = format!("{}{path}", self.endpoint);
        let resp = shared_client()
            .get(&url)
            .headers(bearer_headers(&self.api_key))
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value> {
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    /// Execute the tool calls a run is blocked on and submit their outputs.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run: &RunWire,
        registry: &ToolRegistry,
    ) -> Result<RunWire> {
        let calls = run
            .required_action
            .as_ref()
            .map(|ra| ra.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or_default();

        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            // Arguments arrive as a JSON-encoded string; a non-JSON string
            // degrades to a plain string value rather than aborting the run.
            let arguments = serde_json::from_str(&call.function.arguments)
                .unwrap_or_else(|_| serde_json::Value::String(call.function.arguments.clone()));

            let output = match registry.dispatch(&call.function.name, arguments).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(tool = %call.function.name, error = %e, "tool call failed");
                    e.to_string()
                }
            };
            outputs.push(serde_json::json!({
                "tool_call_id": call.id,
                "output": output,
            }));
        }

        debug!(run = %run.id, count = outputs.len(), "submitting tool outputs");

        let value = self
            .post(
                &format!(
                    "/threads/{thread_id}/runs/{}/submit_tool_outputs",
                    run.id
                ),
                serde_json::json!({ "tool_outputs": outputs }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl AgentsBackend for RestBackend {
    async fn create_agent(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
        tools: &[ToolDefinition],
    ) -> Result<AgentHandle> {
        let tool_decls: Vec<serde_json::Value> = tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect();

        debug!(model, name, tools = tools.len(), "creating agent");

        let value = self
            .post(
                "/assistants",
                serde_json::json!({
                    "model": model,
                    "name": name,
                    "instructions": instructions,
                    "tools": tool_decls,
                }),
            )
            .await?;
        let wire: AgentWire = serde_json::from_value(value)?;
        Ok(AgentHandle {
            id: wire.id,
            name: wire.name.unwrap_or_else(|| name.to_string()),
        })
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        let url = format!("{}/assistants/{agent_id}", self.endpoint);
        let resp = shared_client()
            .delete(&url)
            .headers(bearer_headers(&self.api_key))
            .send()
            .await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }

    async fn create_thread(&self) -> Result<ThreadHandle> {
        let value = self.post("/threads", serde_json::json!({})).await?;
        let wire: ThreadWire = serde_json::from_value(value)?;
        Ok(ThreadHandle { id: wire.id })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: Role,
        payload: MessagePayload,
    ) -> Result<ThreadMessage> {
        let body = match payload {
            MessagePayload::Text(text) => serde_json::json!({
                "role": role,
                "content": text,
            }),
            MessagePayload::Blocks {
                blocks,
                attachments,
            } => {
                let block_values: Vec<serde_json::Value> =
                    blocks.iter().map(block_to_wire).collect();
                let attachment_values: Vec<serde_json::Value> = attachments
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "id": a.id,
                            "name": a.name,
                            "mime_type": a.mime_type,
                            "content": BASE64.encode(&a.data),
                        })
                    })
                    .collect();
                serde_json::json!({
                    "role": role,
                    "content": block_values,
                    "attachments": attachment_values,
                })
            }
        };

        let value = self
            .post(&format!("/threads/{thread_id}/messages"), body)
            .await?;
        let wire: MessageWire = serde_json::from_value(value)?;
        Ok(wire.into_message())
    }

    async fn run_and_wait(
        &self,
        thread_id: &str,
        agent_id: &str,
        registry: &ToolRegistry,
    ) -> Result<RunOutcome> {
        let value = self
            .post(
                &format!("/threads/{thread_id}/runs"),
                serde_json::json!({ "assistant_id": agent_id }),
            )
            .await?;
        let mut run: RunWire = serde_json::from_value(value)?;

        loop {
            if run.status == "completed" {
                return Ok(RunOutcome::completed());
            }
            if run.status == "failed" {
                let message = run
                    .last_error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "run failed without error detail".to_string());
                return Ok(RunOutcome::failed(message));
            }
            // Other terminal states the wire can report collapse into failed.
            if run.status == "cancelled" || run.status == "expired" {
                return Ok(RunOutcome::failed(format!("run {}", run.status)));
            }
            if run.status == "requires_action" {
                run = self.submit_tool_outputs(thread_id, &run, registry).await?;
                continue;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
            let value = self
                .get(&format!("/threads/{thread_id}/runs/{}", run.id))
                .await?;
            run = serde_json::from_value(value)?;
        }
    }

    async fn last_message_by_role(
        &self,
        thread_id: &str,
        role: Role,
    ) -> Result<Option<ThreadMessage>> {
        let messages = self.list_messages(thread_id, ListOrder::Descending).await?;
        Ok(messages.into_iter().find(|m| m.role == role))
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<ThreadMessage>> {
        let value = self
            .get(&format!(
                "/threads/{thread_id}/messages?order={}",
                order.as_query()
            ))
            .await?;
        let wire: MessageListWire = serde_json::from_value(value)?;
        Ok(wire.data.into_iter().map(MessageWire::into_message).collect())
    }
}

fn block_to_wire(block: &ContentBlock) -> serde_json::Value {
    match block {
        ContentBlock::Text { text } => serde_json::json!({
            "type": "text",
            "text": text,
        }),
        ContentBlock::ImageFile {
            attachment_id,
            description,
        } => serde_json::json!({
            "type": "image_file",
            "image_file": {
                "attachment_id": attachment_id,
                "description": description,
            }
        }),
    }
}

// Wire shapes.

#[derive(Deserialize)]
struct AgentWire {
    id: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct ThreadWire {
    id: String,
}

#[derive(Deserialize)]
struct MessageListWire {
    data: Vec<MessageWire>,
}

#[derive(Deserialize)]
struct MessageWire {
    id: String,
    role: Role,
    #[serde(default)]
    content: Vec<ContentWire>,
    #[serde(default)]
    created_at: i64,
}

impl MessageWire {
    fn into_message(self) -> ThreadMessage {
        ThreadMessage {
            id: self.id,
            role: self.role,
            content: self.content.into_iter().map(ContentWire::into_block).collect(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentWire {
    Text { text: TextWire },
    ImageFile { image_file: ImageFileWire },
}

impl ContentWire {
    fn into_block(self) -> ContentBlock {
        match self {
            ContentWire::Text { text } => ContentBlock::Text { text: text.value },
            ContentWire::ImageFile { image_file } => ContentBlock::ImageFile {
                attachment_id: image_file.attachment_id.unwrap_or_default(),
                description: image_file.description,
            },
        }
    }
}

#[derive(Deserialize)]
struct TextWire {
    value: String,
}

#[derive(Deserialize)]
struct ImageFileWire {
    #[serde(default, alias = "file_id")]
    attachment_id: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct RunWire {
    id: String,
    status: String,
    #[serde(default)]
    last_error: Option<RunErrorWire>,
    #[serde(default)]
    required_action: Option<RequiredActionWire>,
}

#[derive(Deserialize)]
struct RunErrorWire {
    message: String,
}

#[derive(Deserialize)]
struct RequiredActionWire {
    submit_tool_outputs: SubmitToolOutputsWire,
}

#[derive(Deserialize)]
struct SubmitToolOutputsWire {
    tool_calls: Vec<ToolCallWire>,
}

#[derive(Deserialize)]
struct ToolCallWire {
    id: String,
    function: FunctionCallWire,
}

#[derive(Deserialize)]
struct FunctionCallWire {
    name: String,
    arguments: String,
}
