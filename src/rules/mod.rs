//! Turn engine.
//!
//! Pure operations over a borrowed `GameState`:
//! - Night elimination
//! - Discussion filtering and backfill
//! - Mention aggregation
//! - Ballot collection and plurality tally
//! - Win detection
//!
//! `engine` strings them into the round sequence the driver follows.

pub mod discussion;
pub mod engine;
pub mod mentions;
pub mod night;
pub mod vote;
pub mod win;

pub use discussion::{
    apply_discussion, discuss_turn, fallback_phrase, filter_line, record_player_line,
    start_new_day,
};
pub use engine::{begin_vote, night_phase, vote_phase, NightReport, VoteReport};
pub use mentions::{mention_counts_for_today, top_two_mentions};
pub use night::resolve_night;
pub use vote::{
    cast_votes, coerce_choice, collect_ai_votes, resolve_vote, rule_votes, tally_plurality,
    vote_choices, Ballots, VoteTally,
};
pub use win::{check_win, Outcome};
