//! Phase sequencing.
//!
//! The driver calls these in order each round:
//!
//! 1. `night_phase`: resolve the kill, check for a win, open the day
//! 2. `discuss_turn` (any number of times)
//! 3. `begin_vote`
//! 4. `vote_phase`: tally, execute, check for a win, advance the round
//!
//! Once an outcome is reported the phase is `End` and the game is over.

use tracing::info;

use super::night::resolve_night;
use super::vote::{resolve_vote, tally_plurality, Ballots, VoteTally};
use super::win::{check_win, Outcome};
use crate::core::{GameState, Phase};

/// What happened during the night.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NightReport {
    /// Who died, if anyone.
    pub victim: Option<String>,
    /// Set when the night ended the game.
    pub outcome: Option<Outcome>,
}

/// What happened at the vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteReport {
    pub tally: VoteTally,
    /// Set when the vote ended the game.
    pub outcome: Option<Outcome>,
}

fn finish(state: &mut GameState, outcome: Outcome) -> Option<Outcome> {
    state.set_phase(Phase::End);
    info!(round = state.round(), %outcome, "game over");
    Some(outcome)
}

/// Run the night: kill, then check for a win.
///
/// A dead human is an immediate mafia win. Otherwise the day window opens
/// and the phase moves to discussion.
pub fn night_phase(state: &mut GameState) -> NightReport {
    state.set_phase(Phase::Night);
    let victim = resolve_night(state);

    let human_killed = victim.as_deref().is_some_and(|v| state.is_human(v));
    let outcome = if human_killed {
        Some(Outcome::MafiaWin)
    } else {
        check_win(state)
    };

    let outcome = match outcome {
        Some(outcome) => finish(state, outcome),
        None => {
            state.set_phase(Phase::DayDiscuss);
            state.start_new_day();
            None
        }
    };
    NightReport { victim, outcome }
}

/// Close discussion and open the vote.
pub fn begin_vote(state: &mut GameState) {
    state.set_phase(Phase::DayVote);
}

/// Tally `ballots`, execute, then check for a win.
///
/// If the game continues the round advances and the phase returns to night.
pub fn vote_phase(state: &mut GameState, ballots: &Ballots) -> VoteReport {
    let living = state.alive_players();
    let tally = tally_plurality(ballots, &living, true, &state.config().no_lynch_label);
    resolve_vote(state, &tally);

    let outcome = match check_win(state) {
        Some(outcome) => finish(state, outcome),
        None => {
            state.advance_round();
            state.set_phase(Phase::Night);
            None
        }
    };
    VoteReport { tally, outcome }
}
