//! Session client: owns one agent and one thread for the process lifetime.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{CourierError, Result};
use crate::platform::{
    AgentHandle, AgentsBackend, Attachment, ContentBlock, ListOrder, MessagePayload, Role,
    RunOutcome, ThreadHandle,
};
use crate::tools::ToolRegistry;

const DEFAULT_AGENT_NAME: &str = "label-agent";
const DEFAULT_INSTRUCTIONS: &str = "You are an image analysis agent. \
You will be given the size of an image and you use one of two tools available to you. \
Tell the user the size of the file and which tool was used.";

/// Options for opening a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub model: String,
    pub agent_name: String,
    pub instructions: String,
}

impl SessionOptions {
    /// Default persona and name for the given model deployment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// One conversational session: an agent, a thread, and the registered tools.
///
/// Opening the session creates the remote agent (the first network call, so
/// an invalid credential fails here, before the loop starts) and a fresh
/// thread. `close` deletes the agent; the thread is left to the platform's
/// garbage collection.
pub struct AgentSession {
    backend: Arc<dyn AgentsBackend>,
    registry: Arc<ToolRegistry>,
    agent: AgentHandle,
    thread: ThreadHandle,
    closed: bool,
}

impl AgentSession {
    /// Authenticate, register tools, create the agent and a fresh thread.
    pub async fn open(
        backend: Arc<dyn AgentsBackend>,
        registry: Arc<ToolRegistry>,
        options: SessionOptions,
    ) -> Result<Self> {
        let agent = backend
            .create_agent(
                &options.model,
                &options.agent_name,
                &options.instructions,
                &registry.definitions(),
            )
            .await?;
        debug!(agent = %agent.id, "agent created");

        let thread = backend.create_thread().await?;
        debug!(thread = %thread.id, "thread created");

        Ok(Self {
            backend,
            registry,
            agent,
            thread,
            closed: false,
        })
    }

    /// The remote agent handle.
    pub fn agent(&self) -> &AgentHandle {
        &self.agent
    }

    /// The open thread handle.
    pub fn thread(&self) -> &ThreadHandle {
        &self.thread
    }

    /// Append a user text message and run the agent over it.
    ///
    /// Tool calls the agent requests execute inline through the registry
    /// before the run resolves. A failed run is a normal return value, not
    /// an error; the caller decides how to report it.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<RunOutcome> {
        self.ensure_open()?;
        self.backend
            .create_message(
                &self.thread.id,
                Role::User,
                MessagePayload::Text(text.into()),
            )
            .await?;
        self.backend
            .run_and_wait(&self.thread.id, &self.agent.id, &self.registry)
            .await
    }

    /// Send an image attachment message built from the user-supplied path,
    /// then run the agent over it.
    pub async fn send_image(
        &mut self,
        path: &std::path::Path,
        mime_type: &str,
        description: impl Into<String>,
    ) -> Result<RunOutcome> {
        self.ensure_open()?;
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let attachment = Attachment::new(name, mime_type, data);
        let blocks = vec![ContentBlock::ImageFile {
            attachment_id: attachment.id.clone(),
            description: Some(description.into()),
        }];

        self.backend
            .create_message(
                &self.thread.id,
                Role::User,
                MessagePayload::Blocks {
                    blocks,
                    attachments: vec![attachment],
                },
            )
            .await?;
        self.backend
            .run_and_wait(&self.thread.id, &self.agent.id, &self.registry)
            .await
    }

    /// Text of the most recent agent message, if any.
    pub async fn last_agent_reply(&self) -> Result<Option<String>> {
        let message = self
            .backend
            .last_message_by_role(&self.thread.id, Role::Agent)
            .await?;
        Ok(message.map(|m| m.text()))
    }

    /// Role and text of every message, ascending creation order.
    pub async fn transcript(&self) -> Result<Vec<(Role, String)>> {
        let messages = self
            .backend
            .list_messages(&self.thread.id, ListOrder::Ascending)
            .await?;
        Ok(messages.into_iter().map(|m| (m.role, m.text())).collect())
    }

    /// Delete the remote agent. Call on every exit path.
    pub async fn close(mut self) -> Result<()> {
        self.closed = true;
        self.backend.delete_agent(&self.agent.id).await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(CourierError::InvalidState(
                "session already closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for AgentSession {
    fn drop(&mut self) {
        // Deletion needs an await, so Drop can only make the leak visible.
        if !self.closed {
            warn!(agent = %self.agent.id, "session dropped without close; agent leaked");
        }
    }
}
