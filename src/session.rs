//! Per-session state for the REPL
//!
//! Tracks the location-area pagination cursor and the Pokemon caught so far,
//! and runs the catch simulation.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{LocationAreaPage, Pokemon};

/// Throws allowed per catch attempt
pub const MAX_THROWS: u32 = 3;

/// Rolls are drawn uniformly from `0..CATCH_ROLL_CEILING`
pub const CATCH_ROLL_CEILING: u32 = 150;

/// A Pokemon in the Pokedex
#[derive(Debug, Clone)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Local>,
}

/// Result of a catch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchOutcome {
    /// Roll of every throw made, in order
    pub rolls: Vec<u32>,
    /// Whether the last throw caught the Pokemon
    pub caught: bool,
}

/// Mutable state carried between commands
pub struct Session {
    /// URL of the next location-area page
    pub next: Option<String>,
    /// URL of the previous location-area page
    pub previous: Option<String>,
    /// Whether any location-area page has been fetched yet
    listing_started: bool,
    /// Pokemon caught this session, by name
    pokedex: BTreeMap<String, CaughtPokemon>,
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a session with a fixed RNG (for testing)
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            next: None,
            previous: None,
            listing_started: false,
            pokedex: BTreeMap::new(),
            rng,
        }
    }

    /// Moves the pagination cursor to the links of `page`
    pub fn update_cursor(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
        self.listing_started = true;
    }

    /// True once a page has been fetched and it had no next link
    pub fn on_last_page(&self) -> bool {
        self.listing_started && self.next.is_none()
    }

    /// Throws up to [`MAX_THROWS`] balls at `pokemon`, adding it to the Pokedex if caught
    pub fn attempt_catch(&mut self, pokemon: &Pokemon) -> CatchOutcome {
        let mut rolls = Vec::new();
        for _ in 0..MAX_THROWS {
            let roll = self.rng.gen_range(0..CATCH_ROLL_CEILING);
            rolls.push(roll);
            if throw_succeeds(roll, pokemon.base_experience) {
                self.record_catch(pokemon.clone());
                return CatchOutcome { rolls, caught: true };
            }
        }
        CatchOutcome {
            rolls,
            caught: false,
        }
    }

    /// Stores `pokemon` in the Pokedex, replacing an earlier catch of the same name
    pub fn record_catch(&mut self, pokemon: Pokemon) {
        self.pokedex.insert(
            pokemon.name.clone(),
            CaughtPokemon {
                pokemon,
                caught_at: Local::now(),
            },
        );
    }

    pub fn caught(&self, name: &str) -> Option<&CaughtPokemon> {
        self.pokedex.get(name)
    }

    /// Caught Pokemon in name order
    pub fn pokedex(&self) -> impl Iterator<Item = &CaughtPokemon> {
        self.pokedex.values()
    }
}

/// A throw catches the Pokemon when the roll reaches its base experience
pub fn throw_succeeds(roll: u32, base_experience: u32) -> bool {
    roll >= base_experience
}
