//! Night resolution: the mafia picks a victim.
//!
//! The first night is always peaceful. From round 2 the mafia targets
//! whoever has been talked about most in the recent transcript, breaking
//! ties uniformly at random.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::GameState;
use crate::transcript::Line;

/// Audit entry for the peaceful first night.
pub const PEACEFUL_NIGHT: &str = "첫 밤은 평화롭게 지나갔습니다.";

/// Resolve the night kill.
///
/// Returns the victim, whose alive flag has already been cleared. Returns
/// `None` on round 1, when no mafia is alive, or when nobody is left to
/// target. Eliminating the human is a mafia win; the caller checks that.
pub fn resolve_night(state: &mut GameState) -> Option<String> {
    if state.round() == 1 {
        state.log_event(PEACEFUL_NIGHT);
        debug!("first night, no victim");
        return None;
    }

    let mafia = state.current_mafia()?.to_string();
    let candidates: Vec<String> = state
        .alive_players()
        .into_iter()
        .filter(|name| *name != mafia)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let counts = line_mentions(
        state.transcript().tail(state.config().night_mention_window),
        &candidates,
    );
    let top = counts.iter().copied().max().unwrap_or(0);
    let pool: SmallVec<[&String; 8]> = candidates
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count == top)
        .map(|(name, _)| name)
        .collect();

    let victim = (*state.rng.choose(&pool)?).clone();
    if !state.eliminate(&victim) {
        return None;
    }

    state.log_event(format!("밤에 {victim}이(가) 사망했습니다."));
    info!(round = state.round(), %victim, mentions = top, "night victim chosen");
    Some(victim)
}

/// Per candidate, the number of lines whose rendered form contains the name.
fn line_mentions<'a>(lines: impl Iterator<Item = &'a Line>, candidates: &[String]) -> Vec<usize> {
    let mut counts = vec![0; candidates.len()];
    for line in lines {
        let rendered = line.render();
        for (count, name) in counts.iter_mut().zip(candidates) {
            if rendered.contains(name.as_str()) {
                *count += 1;
            }
        }
    }
    counts
}
