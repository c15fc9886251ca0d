//! Built-in REPL commands

use futures::future::LocalBoxFuture;

use super::{Command, CommandContext, CommandError, CommandOutcome, CommandResult};

/// Every built-in command
pub(super) fn builtins() -> [Command; 8] {
    [
        Command {
            name: "help",
            description: "Displays a help message",
            callback: help,
        },
        Command {
            name: "exit",
            description: "Exit the Pokedex",
            callback: exit,
        },
        Command {
            name: "map",
            description: "Displays the next 20 location areas of the Pokemon world",
            callback: map,
        },
        Command {
            name: "mapb",
            description: "Displays the previous 20 location areas of the Pokemon world",
            callback: map_back,
        },
        Command {
            name: "explore",
            description: "Lists the Pokemon found in a location area: explore <area-name>",
            callback: explore,
        },
        Command {
            name: "catch",
            description: "Throws Pokeballs at a Pokemon: catch <pokemon-name>",
            callback: catch,
        },
        Command {
            name: "inspect",
            description: "Shows details of a caught Pokemon: inspect <pokemon-name>",
            callback: inspect,
        },
        Command {
            name: "pokedex",
            description: "Lists the Pokemon you have caught",
            callback: pokedex,
        },
    ]
}

/// First argument, or a usage error
fn required_arg<'a>(args: &'a [String], usage: &'static str) -> Result<&'a str, CommandError> {
    args.first()
        .map(String::as_str)
        .ok_or(CommandError::MissingArgument { usage })
}

fn help(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        writeln!(ctx.out, "Welcome to the Pokedex!")?;
        writeln!(ctx.out, "Usage:")?;
        writeln!(ctx.out)?;
        for command in ctx.registry.iter() {
            writeln!(ctx.out, "{}: {}", command.name, command.description)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

fn exit(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        writeln!(ctx.out, "Closing the Pokedex... Goodbye!")?;
        Ok(CommandOutcome::Exit)
    })
}

fn map(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        if ctx.session.on_last_page() {
            writeln!(ctx.out, "You're on the last page already!")?;
            return Ok(CommandOutcome::Continue);
        }

        let page = ctx.client.location_areas(ctx.session.next.as_deref()).await?;
        ctx.session.update_cursor(&page);
        for area in &page.results {
            writeln!(ctx.out, "{}", area.name)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

fn map_back(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        let Some(previous) = ctx.session.previous.clone() else {
            writeln!(ctx.out, "You're on the first page already!")?;
            return Ok(CommandOutcome::Continue);
        };

        let page = ctx.client.location_areas(Some(&previous)).await?;
        ctx.session.update_cursor(&page);
        for area in &page.results {
            writeln!(ctx.out, "{}", area.name)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

fn explore(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        let area = required_arg(ctx.args, "explore <area-name>")?;
        writeln!(ctx.out, "Exploring {}...", area)?;

        let detail = ctx.client.location_area(area).await?;
        writeln!(ctx.out, "Found Pokemon:")?;
        for encounter in &detail.pokemon_encounters {
            writeln!(ctx.out, " - {}", encounter.pokemon.name)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

fn catch(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        let name = required_arg(ctx.args, "catch <pokemon-name>")?;
        let pokemon = ctx.client.pokemon(name).await?;

        let outcome = ctx.session.attempt_catch(&pokemon);
        for throw in 1..=outcome.rolls.len() {
            writeln!(ctx.out, "Throwing a Pokeball at {}...", pokemon.name)?;
            let final_throw = throw == outcome.rolls.len();
            if !(final_throw && outcome.caught) {
                writeln!(ctx.out, "{} broke free!", pokemon.name)?;
            }
        }

        if outcome.caught {
            writeln!(ctx.out, "{} was caught!", pokemon.name)?;
            writeln!(ctx.out, "You may now inspect it with the inspect command.")?;
        } else {
            writeln!(ctx.out, "{} escaped!", pokemon.name)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

fn inspect(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        let name = required_arg(ctx.args, "inspect <pokemon-name>")?;
        let Some(caught) = ctx.session.caught(name) else {
            writeln!(ctx.out, "You have not caught that pokemon")?;
            return Ok(CommandOutcome::Continue);
        };

        let pokemon = &caught.pokemon;
        writeln!(ctx.out, "Name: {}", pokemon.name)?;
        writeln!(ctx.out, "Height: {}", pokemon.height)?;
        writeln!(ctx.out, "Weight: {}", pokemon.weight)?;
        writeln!(ctx.out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(ctx.out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(ctx.out, "Types:")?;
        for pokemon_type in &pokemon.types {
            writeln!(ctx.out, "  - {}", pokemon_type.type_.name)?;
        }
        writeln!(
            ctx.out,
            "Caught: {}",
            caught.caught_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(CommandOutcome::Continue)
    })
}

fn pokedex(ctx: CommandContext<'_>) -> LocalBoxFuture<'_, CommandResult> {
    Box::pin(async move {
        let mut caught = ctx.session.pokedex().peekable();
        if caught.peek().is_none() {
            writeln!(ctx.out, "Your Pokedex is empty. Try catching something!")?;
            return Ok(CommandOutcome::Continue);
        }

        writeln!(ctx.out, "Your Pokedex:")?;
        for entry in caught {
            writeln!(ctx.out, " - {}", entry.pokemon.name)?;
        }
        Ok(CommandOutcome::Continue)
    })
}

#[cfg(test)]
mod tests {
    use super::super::CommandRegistry;
    use super::*;
    use crate::data::{
        LocationAreaPage, NamedResource, PokeApiClient, Pokemon, PokemonStat, PokemonType,
    };
    use crate::session::Session;

    /// Nothing listens here; tests using it must not reach the network
    const OFFLINE_URL: &str = "http://127.0.0.1:9";

    async fn run(session: &mut Session, line: &[&str]) -> (CommandResult, String) {
        let registry = CommandRegistry::with_builtins();
        let client = PokeApiClient::new(OFFLINE_URL);
        let args: Vec<String> = line[1..].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let result = registry
            .dispatch(line[0], &args, session, &client, &mut out)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    fn resource(name: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let (result, output) = run(&mut Session::new(), &["help"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.starts_with("Welcome to the Pokedex!"));
        for command in builtins() {
            assert!(output.contains(&format!("{}: {}", command.name, command.description)));
        }
    }

    #[tokio::test]
    async fn test_exit_ends_the_loop() {
        let (result, output) = run(&mut Session::new(), &["exit"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Exit);
        assert!(output.contains("Goodbye"));
    }

    #[tokio::test]
    async fn test_mapb_on_first_page_does_not_fetch() {
        let (result, output) = run(&mut Session::new(), &["mapb"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.contains("first page"));
    }

    fn page(next: Option<&str>, previous: Option<&str>) -> LocationAreaPage {
        LocationAreaPage {
            count: 1,
            next: next.map(str::to_string),
            previous: previous.map(str::to_string),
            results: vec![resource("only-area")],
        }
    }

    #[tokio::test]
    async fn test_map_past_last_page_does_not_fetch() {
        let mut session = Session::new();
        session.update_cursor(&page(None, Some("previous-url")));

        let (result, output) = run(&mut session, &["map"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.contains("last page"));
    }

    #[tokio::test]
    async fn test_map_after_single_page_listing_does_not_fetch() {
        let mut session = Session::new();
        session.update_cursor(&page(None, None));

        let (result, output) = run(&mut session, &["map"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.contains("last page"));
        assert!(!output.contains("only-area"));
    }

    #[tokio::test]
    async fn test_explore_without_area_is_usage_error() {
        let (result, _) = run(&mut Session::new(), &["explore"]).await;

        match result {
            Err(CommandError::MissingArgument { usage }) => assert!(usage.starts_with("explore")),
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_catch_without_name_is_usage_error() {
        let (result, _) = run(&mut Session::new(), &["catch"]).await;
        assert!(matches!(result, Err(CommandError::MissingArgument { .. })));
    }

    #[tokio::test]
    async fn test_inspect_uncaught_pokemon() {
        let (result, output) = run(&mut Session::new(), &["inspect", "pikachu"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.contains("You have not caught that pokemon"));
    }

    #[tokio::test]
    async fn test_inspect_caught_pokemon_prints_stats_and_types() {
        let mut session = Session::new();
        session.record_catch(Pokemon {
            id: 25,
            name: "pikachu".to_string(),
            base_experience: 112,
            height: 4,
            weight: 60,
            stats: vec![PokemonStat {
                base_stat: 35,
                effort: 0,
                stat: resource("hp"),
            }],
            types: vec![PokemonType {
                slot: 1,
                type_: resource("electric"),
            }],
        });

        let (result, output) = run(&mut session, &["inspect", "pikachu"]).await;

        assert_eq!(result.unwrap(), CommandOutcome::Continue);
        assert!(output.contains("Name: pikachu"));
        assert!(output.contains("Height: 4"));
        assert!(output.contains("Weight: 60"));
        assert!(output.contains("  -hp: 35"));
        assert!(output.contains("  - electric"));
    }

    #[tokio::test]
    async fn test_pokedex_empty_and_filled() {
        let mut session = Session::new();

        let (_, output) = run(&mut session, &["pokedex"]).await;
        assert!(output.contains("empty"));

        session.record_catch(Pokemon {
            id: 16,
            name: "pidgey".to_string(),
            base_experience: 50,
            height: 3,
            weight: 18,
            stats: Vec::new(),
            types: Vec::new(),
        });
        let (_, output) = run(&mut session, &["pokedex"]).await;
        assert!(output.contains("Your Pokedex:"));
        assert!(output.contains(" - pidgey"));
    }
}
