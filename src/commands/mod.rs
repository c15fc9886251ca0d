//! REPL command registry
//!
//! Commands are registered in a [`CommandRegistry`] built at startup and handed
//! to the REPL, which looks them up by name and invokes their callbacks.

mod handlers;

use std::collections::BTreeMap;
use std::io::Write;

use futures::future::LocalBoxFuture;
use thiserror::Error;

use crate::data::{ApiError, PokeApiClient};
use crate::session::Session;

/// Errors a command can report back to the REPL
#[derive(Debug, Error)]
pub enum CommandError {
    /// No command is registered under this name
    #[error("Unknown command: '{0}'. Type 'help' to see a list of valid commands")]
    Unknown(String),

    /// A required argument was not given
    #[error("Usage: {usage}")]
    MissingArgument { usage: &'static str },

    /// Fetching from PokeAPI failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// What the REPL should do after a command finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

/// Everything a command callback may use
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub client: &'a PokeApiClient,
    /// The registry the command was dispatched from
    pub registry: &'a CommandRegistry,
    /// Words after the command name
    pub args: &'a [String],
    pub out: &'a mut dyn Write,
}

pub type CommandResult = Result<CommandOutcome, CommandError>;

/// Callback invoked when a command is dispatched
pub type Callback = for<'a> fn(CommandContext<'a>) -> LocalBoxFuture<'a, CommandResult>;

/// A named REPL command
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub callback: Callback,
}

/// Table of commands available to the REPL, ordered by name
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Command>,
}

impl CommandRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in command
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for command in handlers::builtins() {
            registry.register(command);
        }
        registry
    }

    /// Adds `command`, replacing any command with the same name
    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name, command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered commands in name order
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Runs the command called `name`
    ///
    /// # Returns
    /// * The command's outcome
    /// * `Err(CommandError::Unknown)` if no such command is registered
    /// * Any error the command itself reports
    pub async fn dispatch(
        &self,
        name: &str,
        args: &[String],
        session: &mut Session,
        client: &PokeApiClient,
        out: &mut dyn Write,
    ) -> CommandResult {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;

        let ctx = CommandContext {
            session,
            client,
            registry: self,
            args,
            out,
        };
        (command.callback)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
        Box::pin(async { Ok(CommandOutcome::Continue) })
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = CommandRegistry::with_builtins();
        let names: Vec<&str> = registry.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["catch", "exit", "explore", "help", "inspect", "map", "mapb", "pokedex"]
        );
    }

    #[test]
    fn test_register_replaces_existing_name() {
        let mut registry = CommandRegistry::new();
        registry.register(Command {
            name: "help",
            description: "first",
            callback: noop,
        });
        registry.register(Command {
            name: "help",
            description: "second",
            callback: noop,
        });

        assert_eq!(registry.iter().count(), 1);
        assert_eq!(registry.get("help").unwrap().description, "second");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let registry = CommandRegistry::new();
        let mut session = Session::new();
        let client = PokeApiClient::new("http://127.0.0.1:9");
        let mut out = Vec::new();

        let result = registry
            .dispatch("fly", &[], &mut session, &client, &mut out)
            .await;

        assert!(matches!(result, Err(CommandError::Unknown(name)) if name == "fly"));
    }
}
