//! Conversation loop: RUNNING until "quit", then transcript dump.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::Result;
use crate::inspect;
use crate::session::AgentSession;

/// Prompt printed before each input line.
pub const PROMPT: &str = "Enter file path (or type 'quit' to exit): ";

/// Drive the conversation over the given input/output streams.
///
/// Reads one line per iteration. "quit" (case-insensitive) or end of input
/// terminates the loop and prints the conversation log; teardown of the
/// remote agent is the caller's job so it runs on error paths too.
pub async fn run_loop(
    session: &mut AgentSession,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // end of input behaves like quit
        }
        let line = line.trim();

        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            writeln!(output, "Please enter a prompt.")?;
            continue;
        }

        let path = Path::new(line);
        let report = inspect::file_size_report(path);

        let outcome = match inspect::guess_mime(path).filter(|_| report.is_some()) {
            // Existing image files go up as attachments; a send failure here
            // is reported and the loop continues without the message.
            Some(mime) => {
                let description = report.unwrap_or_else(|| "Please see this image".to_string());
                match session.send_image(path, mime, description).await {
                    Ok(outcome) => {
                        writeln!(output, "Sent message with image attachment successfully")?;
                        outcome
                    }
                    Err(e) => {
                        writeln!(output, "Error sending message: {e}")?;
                        continue;
                    }
                }
            }
            // Everything else is a text message: the size report when the
            // file exists, the raw input otherwise (the inspector already
            // printed its diagnostic).
            None => {
                let text = report.unwrap_or_else(|| line.to_string());
                session.send_text(text).await?
            }
        };

        if outcome.is_failed() {
            writeln!(
                output,
                "Run failed: {}",
                outcome.error.as_deref().unwrap_or("unknown error")
            )?;
        }

        if let Some(reply) = session.last_agent_reply().await? {
            writeln!(output, "Last Message: {reply}")?;
        }
    }

    writeln!(output, "\nConversation Log:\n")?;
    for (role, text) in session.transcript().await? {
        writeln!(output, "{role}: {text}\n")?;
    }

    Ok(())
}
