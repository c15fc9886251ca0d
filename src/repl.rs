//! Read-eval-print loop
//!
//! Reads commands line by line, dispatches them through the [`CommandRegistry`]
//! and prints their output. Command errors are printed and the loop continues.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::commands::{CommandError, CommandOutcome, CommandRegistry};
use crate::data::PokeApiClient;
use crate::session::Session;

pub const PROMPT: &str = "Pokedex > ";

/// Splits input on whitespace and lower-cases every word
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Runs the loop until `exit` or end of input
///
/// # Arguments
/// * `input` - Source of command lines (stdin in the binary)
/// * `out` - Where prompts, command output and errors are written
/// * `registry` - Commands available to the user
/// * `session` - State carried between commands
/// * `client` - PokeAPI client the commands fetch through
pub async fn run<R>(
    input: R,
    out: &mut dyn Write,
    registry: &CommandRegistry,
    session: &mut Session,
    client: &PokeApiClient,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };
        debug!(command = %name, ?args, "dispatching command");

        match registry.dispatch(name, args, session, client, out).await {
            Ok(CommandOutcome::Exit) => break,
            Ok(CommandOutcome::Continue) => {}
            Err(CommandError::Io(err)) => return Err(err),
            Err(err) => writeln!(out, "{}", err)?,
        }
        writeln!(out)?;
    }

    Ok(())
}
