//! Day vote: ballot collection and plurality tally.
//!
//! ## Ballots
//!
//! One entry per voter. The human's ballot is coerced to the no-lynch label
//! when it is not a legal choice; AI ballots come from the service when valid
//! and from the mention rule otherwise.
//!
//! ## Tally
//!
//! Simple plurality. A tie for the top count, or a no-lynch plurality,
//! executes nobody. There is no runoff.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::core::GameState;
use crate::dialogue::{Reply, VoteReply};

/// Voter name → chosen target.
pub type Ballots = BTreeMap<String, String>;

/// Outcome of a plurality count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// Player to execute, if any.
    pub executed: Option<String>,
    /// Valid votes per target (including the no-lynch label).
    pub counts: FxHashMap<String, usize>,
}

impl VoteTally {
    /// Counts in display order: count descending, then name ascending.
    ///
    /// Display only; never consulted for the execution decision.
    #[must_use]
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut rows: Vec<(String, usize)> =
            self.counts.iter().map(|(name, &c)| (name.clone(), c)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }
}

/// Count ballots by simple plurality.
///
/// Targets that are neither living nor the no-lynch label are discarded
/// without invalidating anything else.
#[must_use]
pub fn tally_plurality(
    votes: &Ballots,
    living: &[String],
    allow_no_lynch: bool,
    no_lynch_label: &str,
) -> VoteTally {
    let living: FxHashSet<&str> = living.iter().map(String::as_str).collect();
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for target in votes.values() {
        if target == no_lynch_label || living.contains(target.as_str()) {
            *counts.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let Some(&top) = counts.values().max() else {
        return VoteTally::default();
    };
    let mut leaders = counts
        .iter()
        .filter(|(_, count)| **count == top)
        .map(|(name, _)| name);
    let executed = match (leaders.next(), leaders.next()) {
        (Some(only), None) if only == no_lynch_label => {
            debug!(allow_no_lynch, "no-lynch plurality");
            None
        }
        (Some(only), None) if living.contains(only.as_str()) => Some(only.clone()),
        _ => None,
    };

    VoteTally { executed, counts }
}

/// Legal ballot choices: living AI players, then the no-lynch label.
#[must_use]
pub fn vote_choices(state: &GameState) -> Vec<String> {
    let mut choices = state.alive_ai();
    choices.push(state.config().no_lynch_label.clone());
    choices
}

/// Coerce a human selection to a legal choice.
///
/// Anything not in `choices` becomes the no-lynch label.
#[must_use]
pub fn coerce_choice(state: &GameState, choice: &str, choices: &[String]) -> String {
    let choice = choice.trim();
    if choices.iter().any(|c| c == choice) {
        choice.to_string()
    } else {
        state.config().no_lynch_label.clone()
    }
}

/// Rule-based AI ballots: every living AI votes for the choice mentioned in
/// the most lines today.
///
/// Only today's window is scanned, not the whole transcript, so earlier
/// days' accusations do not carry over. Ties go to the alphabetically first
/// name. With no mentions the first candidate is used, and with no
/// candidates the no-lynch label.
#[must_use]
pub fn rule_votes(state: &GameState, choices: &[String]) -> Ballots {
    let label = &state.config().no_lynch_label;
    let candidates: Vec<&String> = choices.iter().filter(|c| *c != label).collect();

    let mut counts = vec![0usize; candidates.len()];
    for line in state.transcript().today() {
        let rendered = line.render();
        for (count, name) in counts.iter_mut().zip(&candidates) {
            if !name.is_empty() && rendered.contains(name.as_str()) {
                *count += 1;
            }
        }
    }

    let best = candidates
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .min_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(name, _)| (*name).clone());
    let pick = best
        .or_else(|| candidates.first().map(|n| (*n).clone()))
        .unwrap_or_else(|| label.clone());

    state.alive_ai().into_iter().map(|voter| (voter, pick.clone())).collect()
}

/// AI ballots from a service reply, completed by the mention rule.
///
/// An intent counts only if its voter is a living AI and its target is a
/// legal choice; the first valid intent per voter wins.
#[must_use]
pub fn collect_ai_votes(state: &GameState, reply: Reply<VoteReply>, choices: &[String]) -> Ballots {
    let alive_ai = state.alive_ai();
    let mut ballots = Ballots::new();
    for intent in reply.into_payload().unwrap_or_default().votes {
        if alive_ai.contains(&intent.voter)
            && choices.contains(&intent.target)
            && !ballots.contains_key(&intent.voter)
        {
            ballots.insert(intent.voter, intent.target);
        }
    }

    let generated = ballots.len();
    if generated < alive_ai.len() {
        for (voter, target) in rule_votes(state, choices) {
            ballots.entry(voter).or_insert(target);
        }
    }
    debug!(generated, total = ballots.len(), "AI ballots collected");
    ballots
}

/// Full ballot map: AI ballots plus the human's coerced choice.
///
/// A dead human does not vote.
#[must_use]
pub fn cast_votes(state: &GameState, human_choice: &str, ai_votes: Ballots) -> Ballots {
    let mut ballots = ai_votes;
    let human = state.config().human_name.clone();
    if state.player(&human).is_some_and(|p| p.alive) {
        let choice = coerce_choice(state, human_choice, &vote_choices(state));
        ballots.insert(human, choice);
    }
    ballots
}

/// Apply a tally: eliminate the executed player and log the result.
pub fn resolve_vote(state: &mut GameState, tally: &VoteTally) {
    match &tally.executed {
        Some(name) if state.eliminate(name) => {
            state.log_event(format!("낮 투표로 {name}이(가) 처형되었습니다."));
            info!(round = state.round(), executed = %name, "vote executed player");
        }
        _ => {
            state.log_event("낮 투표 무처형.");
            info!(round = state.round(), "vote ended without execution");
        }
    }
}
