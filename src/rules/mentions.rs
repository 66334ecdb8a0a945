//! Mention aggregation over today's discussion window.

use rustc_hash::FxHashMap;

use crate::core::GameState;
use crate::transcript::count_occurrences;

/// Occurrences of each living AI name in today's window.
///
/// Every occurrence counts, including several in one line and the
/// speaker prefix of the rendered line.
#[must_use]
pub fn mention_counts_for_today(state: &GameState) -> FxHashMap<String, usize> {
    let alive = state.alive_ai();
    let mut counts: FxHashMap<String, usize> = alive.iter().map(|n| (n.clone(), 0)).collect();
    for line in state.transcript().today() {
        let rendered = line.render();
        for name in &alive {
            if let Some(count) = counts.get_mut(name) {
                *count += count_occurrences(name, &rendered);
            }
        }
    }
    counts
}

/// The two most-mentioned living AI players today.
///
/// Ranked by count (descending) then name (ascending). Only positive counts
/// rank; remaining slots are filled by random sampling from the rest of the
/// pool. A pool of two or fewer is returned as is.
pub fn top_two_mentions(state: &mut GameState) -> Vec<String> {
    let alive = state.alive_ai();
    if alive.len() <= 2 {
        return alive;
    }

    let counts = mention_counts_for_today(state);
    let count_of = |name: &String| counts.get(name).copied().unwrap_or(0);

    let mut ranked = alive.clone();
    ranked.sort_by(|a, b| count_of(b).cmp(&count_of(a)).then_with(|| a.cmp(b)));

    let mut top: Vec<String> = ranked
        .into_iter()
        .filter(|name| count_of(name) > 0)
        .take(2)
        .collect();

    if top.len() < 2 {
        let rest: Vec<String> = alive.into_iter().filter(|n| !top.contains(n)).collect();
        let needed = 2 - top.len();
        top.extend(state.rng.sample(&rest, needed));
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, GameRng, Player};

    fn state() -> GameState {
        GameState::from_players(
            EngineConfig::default().with_roster("me", &["a", "b", "c", "d"]),
            vec![
                Player::citizen("me"),
                Player::mafia("a"),
                Player::citizen("b"),
                Player::citizen("c"),
                Player::citizen("d"),
            ],
            GameRng::new(21),
        )
    }

    #[test]
    fn test_counts_every_occurrence() {
        let mut s = state();
        s.start_new_day();
        s.say("me", "c c");
        s.say("d", "c?");

        let counts = mention_counts_for_today(&s);
        assert_eq!(counts["c"], 3);
        assert_eq!(counts["d"], 1);
        assert_eq!(counts["a"], 0);
        assert!(!counts.contains_key("me"));
    }

    #[test]
    fn test_counts_ignore_previous_days() {
        let mut s = state();
        s.say("me", "b b b");
        s.start_new_day();

        let counts = mention_counts_for_today(&s);
        assert!(counts.values().all(|&c| c == 0));
    }

    #[test]
    fn test_top_two_ranked_with_name_tiebreak() {
        let mut s = state();
        s.start_new_day();
        s.say("me", "d, c, b");
        s.say("me", "d");

        assert_eq!(top_two_mentions(&mut s), vec!["d", "b"]);
    }

    #[test]
    fn test_top_two_fills_randomly() {
        let mut s = state();
        s.start_new_day();
        s.say("me", "c");

        let top = top_two_mentions(&mut s);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], "c");
        assert_ne!(top[1], "c");
        assert!(s.alive_ai().contains(&top[1]));
    }

    #[test]
    fn test_small_pool_returned_unchanged() {
        let mut s = state();
        s.eliminate("a");
        s.eliminate("b");

        assert_eq!(top_two_mentions(&mut s), vec!["c", "d"]);
    }
}
