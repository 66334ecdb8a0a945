//! Authoritative game state.
//!
//! ## GameState
//!
//! One instance per game, owned by the driver and handed `&mut` to every
//! engine operation:
//! - Roster (names, roles, alive flags)
//! - Round counter and phase
//! - Transcript with the day-window marker
//! - Last line per speaker (anti-repetition)
//! - Event log (audit strings)
//! - Injected RNG
//!
//! Starting a new game means building a new `GameState`; nothing is global.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::EngineConfig;
use super::player::{Player, Role, Roster};
use super::rng::GameRng;
use crate::transcript::{Line, Transcript};

/// Game phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Night,
    DayDiscuss,
    DayVote,
    End,
}

/// Full state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    config: EngineConfig,
    players: Roster,

    /// Round number (starts at 1, only increases).
    round: u32,

    /// Current phase.
    pub phase: Phase,

    transcript: Transcript,
    last_line_by_name: FxHashMap<String, String>,
    log: Vec<String>,

    /// Random source for every tie-break and filler choice.
    pub rng: GameRng,
}

/// Create the standard seven-seat game with a randomly chosen mafia.
#[must_use]
pub fn create_default_game(rng: GameRng) -> GameState {
    create_game(EngineConfig::default(), rng)
}

/// Create a game from a configured roster.
///
/// Exactly one AI seat is drawn uniformly to be the mafia; the human seat
/// and every other AI seat are citizens.
#[must_use]
pub fn create_game(config: EngineConfig, mut rng: GameRng) -> GameState {
    let mafia = rng.choose(&config.ai_names).cloned();
    let players: Vec<Player> = config
        .roster()
        .into_iter()
        .map(|name| {
            let role = if Some(&name) == mafia.as_ref() {
                Role::Mafia
            } else {
                Role::Citizen
            };
            Player::new(name, role)
        })
        .collect();

    info!(seed = rng.seed(), players = players.len(), "new game created");
    GameState::from_players(config, players, rng)
}

impl GameState {
    /// Build a state from an explicit player list (round 1, night).
    #[must_use]
    pub fn from_players(
        config: EngineConfig,
        players: impl IntoIterator<Item = Player>,
        rng: GameRng,
    ) -> Self {
        Self {
            config,
            players: Roster::new(players),
            round: 1,
            phase: Phase::Night,
            transcript: Transcript::new(),
            last_line_by_name: FxHashMap::default(),
            log: Vec::new(),
            rng,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Roster ===

    /// The roster.
    #[must_use]
    pub fn players(&self) -> &Roster {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    /// Whether `name` is the human seat.
    #[must_use]
    pub fn is_human(&self, name: &str) -> bool {
        name == self.config.human_name
    }

    /// Living names in roster order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<String> {
        self.players.alive().map(|p| p.name.clone()).collect()
    }

    /// Living AI-controlled names in roster order.
    #[must_use]
    pub fn alive_ai(&self) -> Vec<String> {
        self.players
            .alive()
            .filter(|p| !self.is_human(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Eliminated names in roster order.
    #[must_use]
    pub fn dead_players(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| !p.alive)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Living mafia count.
    #[must_use]
    pub fn mafia_alive(&self) -> usize {
        self.players.alive().filter(|p| p.role == Role::Mafia).count()
    }

    /// Living citizen count.
    #[must_use]
    pub fn citizen_alive(&self) -> usize {
        self.players.alive().filter(|p| p.role == Role::Citizen).count()
    }

    /// The living mafia, if any.
    #[must_use]
    pub fn current_mafia(&self) -> Option<&str> {
        self.players
            .alive()
            .find(|p| p.role == Role::Mafia)
            .map(|p| p.name.as_str())
    }

    /// Flip a living player's alive flag.
    ///
    /// Returns false if the name is unknown or already dead.
    pub fn eliminate(&mut self, name: &str) -> bool {
        match self.players.get_mut(name) {
            Some(player) if player.alive => {
                player.alive = false;
                true
            }
            _ => false,
        }
    }

    // === Progression ===

    /// Current round (1-based).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Move to the next round.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    /// Set the phase.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    // === Transcript ===

    /// The dialogue transcript.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Append a line and remember it as the speaker's latest.
    pub fn say(&mut self, speaker: impl Into<String>, text: impl Into<String>) {
        let line = Line::new(speaker, text);
        self.last_line_by_name
            .insert(line.speaker.clone(), line.text.clone());
        self.transcript.push(line);
    }

    /// The speaker's previous line, if any.
    #[must_use]
    pub fn last_line(&self, speaker: &str) -> Option<&str> {
        self.last_line_by_name.get(speaker).map(String::as_str)
    }

    /// A uniformly chosen fallback phrase from the configured pool.
    pub fn pick_fallback(&mut self) -> Option<String> {
        self.rng.choose(&self.config.fallback_phrases).cloned()
    }

    /// Open today's discussion window at the end of the transcript.
    pub fn start_new_day(&mut self) {
        self.transcript.start_new_day();
    }

    // === Event Log ===

    /// Append an audit entry.
    pub fn log_event(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }

    /// Audit entries, oldest first.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }
}
