//! Shared test helpers: an in-memory agents backend with scripted runs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use courier::error::{CourierError, Result};
use courier::platform::{
    AgentHandle, AgentsBackend, Attachment, ContentBlock, ListOrder, MessagePayload, Role,
    RunOutcome, ThreadHandle, ThreadMessage,
};
use courier::tools::{ToolDefinition, ToolRegistry};

/// What the fake agent does when the next run starts.
pub enum ScriptedRun {
    /// Complete the run with this agent reply.
    Reply(String),
    /// Request a tool call, then reply after the output comes back.
    ToolCall {
        name: String,
        arguments: serde_json::Value,
        reply: String,
    },
    /// Terminate the run with failed status.
    Fail(String),
}

#[derive(Default)]
pub struct MockState {
    pub created_agents: Vec<AgentHandle>,
    pub deleted_agents: Vec<String>,
    pub threads: Vec<String>,
    pub messages: Vec<ThreadMessage>,
    pub attachments: Vec<Attachment>,
    pub runs_started: usize,
    pub script: Vec<ScriptedRun>,
    pub registered_tools: Vec<ToolDefinition>,
    /// Tool outputs fed back to the platform: (tool name, output string).
    pub tool_outputs: Vec<(String, String)>,
    /// When set, the next create_message call fails with this message.
    pub fail_next_message: Option<String>,
    next_id: usize,
}

/// In-memory [`AgentsBackend`] with scripted agent behavior.
#[derive(Default)]
pub struct MockBackend {
    pub state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, runs: Vec<ScriptedRun>) {
        self.state.lock().unwrap().script = runs;
    }

    pub fn fail_next_message(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_next_message = Some(message.into());
    }

    fn push_message(
        state: &mut MockState,
        role: Role,
        content: Vec<ContentBlock>,
    ) -> ThreadMessage {
        state.next_id += 1;
        let message = ThreadMessage {
            id: format!("msg-{}", state.next_id),
            role,
            content,
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000 + state.next_id as i64, 0)
                .unwrap(),
        };
        state.messages.push(message.clone());
        message
    }
}

#[async_trait]
impl AgentsBackend for MockBackend {
    async fn create_agent(
        &self,
        _model: &str,
        name: &str,
        _instructions: &str,
        tools: &[ToolDefinition],
    ) -> Result<AgentHandle> {
        let mut state = self.state.lock().unwrap();
        state.registered_tools = tools.to_vec();
        let handle = AgentHandle {
            id: format!("agent-{}", state.created_agents.len() + 1),
            name: name.to_string(),
        };
        state.created_agents.push(handle.clone());
        Ok(handle)
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .deleted_agents
            .push(agent_id.to_string());
        Ok(())
    }

    async fn create_thread(&self) -> Result<ThreadHandle> {
        let mut state = self.state.lock().unwrap();
        let id = format!("thread-{}", state.threads.len() + 1);
        state.threads.push(id.clone());
        Ok(ThreadHandle { id })
    }

    async fn create_message(
        &self,
        _thread_id: &str,
        role: Role,
        payload: MessagePayload,
    ) -> Result<ThreadMessage> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_next_message.take() {
            return Err(CourierError::api(500, message));
        }
        let content = match payload {
            MessagePayload::Text(text) => vec![ContentBlock::Text { text }],
            MessagePayload::Blocks {
                blocks,
                attachments,
            } => {
                state.attachments.extend(attachments);
                blocks
            }
        };
        Ok(Self::push_message(&mut state, role, content))
    }

    async fn run_and_wait(
        &self,
        _thread_id: &str,
        _agent_id: &str,
        registry: &ToolRegistry,
    ) -> Result<RunOutcome> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.runs_started += 1;
            if state.script.is_empty() {
                ScriptedRun::Reply("Mock reply".to_string())
            } else {
                state.script.remove(0)
            }
        };

        match scripted {
            ScriptedRun::Reply(text) => {
                let mut state = self.state.lock().unwrap();
                Self::push_message(&mut state, Role::Agent, vec![ContentBlock::Text { text }]);
                Ok(RunOutcome::completed())
            }
            ScriptedRun::ToolCall {
                name,
                arguments,
                reply,
            } => {
                // Inline dispatch, exactly like the real backend under
                // requires_action; errors become outputs, not run aborts.
                let output = match registry.dispatch(&name, arguments).await {
                    Ok(output) => output,
                    Err(e) => e.to_string(),
                };
                let mut state = self.state.lock().unwrap();
                state.tool_outputs.push((name, output));
                Self::push_message(
                    &mut state,
                    Role::Agent,
                    vec![ContentBlock::Text { text: reply }],
                );
                Ok(RunOutcome::completed())
            }
            ScriptedRun::Fail(message) => Ok(RunOutcome::failed(message)),
        }
    }

    async fn last_message_by_role(
        &self,
        _thread_id: &str,
        role: Role,
    ) -> Result<Option<ThreadMessage>> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().rev().find(|m| m.role == role).cloned())
    }

    async fn list_messages(
        &self,
        _thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<ThreadMessage>> {
        let state = self.state.lock().unwrap();
        let mut messages = state.messages.clone();
        if order == ListOrder::Descending {
            messages.reverse();
        }
        Ok(messages)
    }
}
