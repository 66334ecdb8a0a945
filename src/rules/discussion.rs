//! Day discussion: anti-repetition filtering and completeness backfill.
//!
//! Generated lines are accepted only if they say something new. After a
//! turn every living AI character has exactly one fresh transcript line,
//! whatever the service returned.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::GameState;
use crate::dialogue::{parse_reply, DialogueRequest, DialogueSource, DiscussReply, Goal, Reply};
use crate::transcript::Line;

/// Recorded in place of a blank human line.
pub const SILENT_PLAYER_LINE: &str = "(...)";

/// Open today's discussion window.
pub fn start_new_day(state: &mut GameState) {
    state.start_new_day();
}

/// Append the human player's utterance. Blank input is recorded as silence.
pub fn record_player_line(state: &mut GameState, text: &str) -> Line {
    let text = match text.trim() {
        "" => SILENT_PLAYER_LINE,
        trimmed => trimmed,
    };
    let speaker = state.config().human_name.clone();
    state.say(speaker.clone(), text);
    Line::new(speaker, text)
}

/// A random fallback phrase.
pub fn fallback_phrase(state: &mut GameState) -> String {
    state
        .pick_fallback()
        .unwrap_or_else(|| SILENT_PLAYER_LINE.to_string())
}

/// Accept or replace a proposed line for `speaker`.
///
/// Empty lines, generic filler, and exact repeats of the speaker's previous
/// line are replaced with a random fallback phrase.
pub fn filter_line(state: &mut GameState, speaker: &str, proposed: &str) -> String {
    let line = proposed.trim();
    let repeated = state.last_line(speaker) == Some(line);
    if line.is_empty() || state.config().is_generic(line) || repeated {
        debug!(%speaker, repeated, "generated line rejected");
        return fallback_phrase(state);
    }
    line.to_string()
}

/// Apply one discussion turn's reply to the transcript.
///
/// Entries for unknown, dead or human speakers are dropped, as are second
/// entries for the same speaker. Living AI characters left silent are
/// backfilled in roster order. Returns the lines appended.
pub fn apply_discussion(state: &mut GameState, reply: Reply<DiscussReply>) -> Vec<Line> {
    let alive_ai = state.alive_ai();
    let proposed = reply.into_payload().unwrap_or_default().character_lines;

    let mut spoken = FxHashSet::default();
    let mut pairs = Vec::with_capacity(alive_ai.len());
    for entry in proposed {
        if !alive_ai.contains(&entry.name) || !spoken.insert(entry.name.clone()) {
            continue;
        }
        let text = filter_line(state, &entry.name, &entry.line);
        pairs.push(Line::new(entry.name, text));
    }

    let generated = pairs.len();
    for name in alive_ai {
        if !spoken.contains(&name) {
            let text = fallback_phrase(state);
            pairs.push(Line::new(name, text));
        }
    }
    debug!(generated, backfilled = pairs.len() - generated, "discussion turn applied");

    for line in &pairs {
        state.say(line.speaker.clone(), line.text.clone());
    }
    pairs
}

/// Run one full discussion turn against `source`.
///
/// Records the human line, asks the service for character lines, and applies
/// the reply with filtering and backfill.
pub fn discuss_turn(
    state: &mut GameState,
    source: &mut impl DialogueSource,
    player_said: &str,
    memory_snapshot: Option<&str>,
) -> Vec<Line> {
    let player_line = record_player_line(state, player_said);

    let mut request = DialogueRequest::new(Goal::Discuss, state).with_player_said(player_line.text);
    if let Some(snapshot) = memory_snapshot {
        request = request.with_memory(snapshot);
    }

    let reply = parse_reply::<DiscussReply>(&source.generate(&request));
    apply_discussion(state, reply)
}
