//! # mafia-engine
//!
//! Game state and turn engine for a small Mafia party game: one human
//! player against AI characters whose dialogue comes from an external
//! generation service.
//!
//! ## Design Principles
//!
//! 1. **Service-Agnostic**: The engine never calls a model. It builds
//!    requests, parses whatever text comes back, and falls back to
//!    deterministic rules when the reply is empty or malformed.
//!
//! 2. **Injectable Randomness**: Every random choice draws from the
//!    `GameRng` owned by `GameState`. A seed replays a game exactly.
//!
//! 3. **Configuration Over Convention**: Names, labels, phrase lists and
//!    windows live in `EngineConfig`, loadable from TOML.
//!
//! ## Round Structure
//!
//! Night (kill) → day discussion (any number of turns) → vote → next night,
//! until `check_win` reports an outcome. See [`rules::engine`].
//!
//! ## Modules
//!
//! - `core`: Players, roster, configuration, RNG, game state
//! - `transcript`: Append-only dialogue log with a day window
//! - `dialogue`: Request building and reply parsing for the service
//! - `rules`: Night, discussion, mentions, vote, win detection
//! - `memory`: Derived cross-round memory and its JSON persistence
//! - `error`: Errors from the filesystem and configuration edges

pub mod core;
pub mod dialogue;
pub mod error;
pub mod memory;
pub mod rules;
pub mod transcript;

// Re-export commonly used types
pub use crate::core::{
    create_default_game, create_game, EngineConfig, GameRng, GameState, Phase,
    Player, Role, Roster,
};

pub use crate::dialogue::{
    parse_reply, CharacterLine, DialogueRequest, DialogueSource, DiscussReply, GameSummary, Goal,
    Reply, SilentSource, VoteIntent, VoteReply,
};

pub use crate::error::{MafiaError, Result};

pub use crate::memory::{MemoryRecord, MemorySnapshot, MemoryStore};

pub use crate::rules::{
    apply_discussion, begin_vote, cast_votes, check_win, collect_ai_votes, discuss_turn,
    filter_line, mention_counts_for_today, night_phase, record_player_line, resolve_night,
    resolve_vote, rule_votes, start_new_day, tally_plurality, top_two_mentions, vote_choices,
    vote_phase, Ballots, NightReport, Outcome, VoteReport, VoteTally,
};

pub use crate::transcript::{Line, Transcript};
