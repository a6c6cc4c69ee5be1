//! Remote agents platform: data model and the capability trait.
//!
//! Everything the client needs from the hosted platform is expressed as
//! [`AgentsBackend`], so the session and conversation loop can run against
//! an in-memory fake in tests. [`RestBackend`] is the real implementation.

pub mod http;
pub mod rest;

pub use rest::RestBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tools::{ToolDefinition, ToolRegistry};

/// Remote agent resource: opaque id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentHandle {
    pub id: String,
    pub name: String,
}

/// Remote conversation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadHandle {
    pub id: String,
}

/// Conversation role.
///
/// The platform's wire name for the agent side is `assistant`; some
/// listings use `agent`, so both deserialize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(rename = "assistant", alias = "agent")]
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ImageFile {
        attachment_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A message within a thread. Append-only, immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    pub created_at: DateTime<Utc>,
}

impl ThreadMessage {
    /// Extract the text content, concatenating all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A named, MIME-typed binary payload referenced by content blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Id unique within the message; content blocks reference it.
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create an attachment with a fresh id.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// User-supplied message content: plain text, or blocks with attachments.
#[derive(Debug, Clone)]
pub enum MessagePayload {
    Text(String),
    Blocks {
        blocks: Vec<ContentBlock>,
        attachments: Vec<Attachment>,
    },
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Result of one remote reasoning pass over a thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Platform-reported error description for failed runs.
    pub error: Option<String>,
}

impl RunOutcome {
    pub fn completed() -> Self {
        Self {
            status: RunStatus::Completed,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == RunStatus::Failed
    }
}

/// Listing order for thread messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Ascending,
    Descending,
}

impl ListOrder {
    pub fn as_query(self) -> &'static str {
        match self {
            ListOrder::Ascending => "asc",
            ListOrder::Descending => "desc",
        }
    }
}

/// Capability interface to the hosted agents platform.
///
/// One method per remote operation the client performs; no retries anywhere.
/// `run_and_wait` blocks until the run reaches a terminal status, executing
/// any requested tool calls through the registry inline.
#[async_trait]
pub trait AgentsBackend: Send + Sync {
    /// Create an agent from a model id, instructions, and tool declarations.
    async fn create_agent(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
        tools: &[ToolDefinition],
    ) -> Result<AgentHandle>;

    /// Delete an agent resource.
    async fn delete_agent(&self, agent_id: &str) -> Result<()>;

    /// Create a fresh, empty thread.
    async fn create_thread(&self) -> Result<ThreadHandle>;

    /// Append a message to a thread.
    async fn create_message(
        &self,
        thread_id: &str,
        role: Role,
        payload: MessagePayload,
    ) -> Result<ThreadMessage>;

    /// Start a run and block until it completes or fails, dispatching any
    /// requested tool calls through `registry` as they arrive.
    async fn run_and_wait(
        &self,
        thread_id: &str,
        agent_id: &str,
        registry: &ToolRegistry,
    ) -> Result<RunOutcome>;

    /// The most recent message with the given role, if any.
    async fn last_message_by_role(
        &self,
        thread_id: &str,
        role: Role,
    ) -> Result<Option<ThreadMessage>>;

    /// All messages in the thread in the given creation order.
    async fn list_messages(&self, thread_id: &str, order: ListOrder)
        -> Result<Vec<ThreadMessage>>;
}
