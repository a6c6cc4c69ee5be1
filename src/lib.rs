//! Courier — interactive client for a hosted agents platform.
//!
//! Opens a conversational session against a remote agent service, registers
//! two local file-pipeline functions as callable tools, and relays user-typed
//! file paths so the agent can decide which pipeline to invoke. The remote
//! platform sits behind the [`platform::AgentsBackend`] trait, so the session
//! and loop logic run unchanged against a fake backend in tests.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use courier::config::Config;
//! use courier::platform::RestBackend;
//! use courier::session::{AgentSession, SessionOptions};
//! use courier::tools::pipelines::pipeline_registry;
//!
//! # async fn example() -> courier::error::Result<()> {
//! let config = Config::from_env()?;
//! let backend = Arc::new(RestBackend::new(config.endpoint.clone(), config.api_key.clone()));
//! let registry = Arc::new(pipeline_registry());
//! let mut session = AgentSession::open(
//!     backend,
//!     registry,
//!     SessionOptions::new(config.model_deployment.clone()),
//! )
//! .await?;
//! session.send_text("The size of the file is 15.0 megabytes").await?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod inspect;
pub mod platform;
pub mod session;
pub mod tools;
