//! Courier binary entry point.

use std::io;
use std::sync::Arc;

use courier::chat;
use courier::config::Config;
use courier::error::Result;
use courier::platform::RestBackend;
use courier::session::{AgentSession, SessionOptions};
use courier::tools::pipelines::pipeline_registry;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("courier=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let backend = Arc::new(RestBackend::new(config.endpoint, config.api_key));
    let registry = Arc::new(pipeline_registry());

    let mut session = AgentSession::open(
        backend,
        registry,
        SessionOptions::new(config.model_deployment),
    )
    .await?;
    println!(
        "You're chatting with: {} ({})",
        session.agent().name,
        session.agent().id
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let loop_result = chat::run_loop(&mut session, &mut input, &mut output).await;

    // Agent teardown runs on every exit path, including loop errors.
    let close_result = session.close().await;
    if close_result.is_ok() {
        println!("Deleted agent");
    }
    loop_result.and(close_result)
}
