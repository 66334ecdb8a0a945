//! The derived cross-round memory record.
//!
//! Everything here can be recomputed from the transcript and the vote
//! history; it is a cache that lets the dialogue service see suspicions,
//! quietness and summaries without replaying the whole game.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::sanitize::{clean_str, sanitize_value};
use crate::core::{GameState, Role};
use crate::dialogue::VoteIntent;
use crate::rules::Ballots;
use crate::transcript::Line;

/// Quietness reported for a player with no recorded value.
pub const DEFAULT_QUIETNESS: f64 = 0.5;

/// Suspicions included in a prompt snapshot.
const SNAPSHOT_SUSPICIONS: usize = 5;

/// Settled facts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    #[serde(default)]
    pub dead: Vec<String>,
    #[serde(default)]
    pub revealed_roles: BTreeMap<String, String>,
}

/// Persisted memory document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub dialogue_history: Vec<String>,
    #[serde(default)]
    pub facts: Facts,
    /// `"speaker->target"` → times the speaker voiced suspicion of the target.
    #[serde(default)]
    pub suspicions: BTreeMap<String, u32>,
    /// Name → 1 − share of recent lines (higher is quieter).
    #[serde(default)]
    pub quietness: BTreeMap<String, f64>,
    /// `"Round{n}"` → ballots cast that round.
    #[serde(default)]
    pub votes: BTreeMap<String, Vec<VoteIntent>>,
    /// `"Round{n}"` → short free-text summary.
    #[serde(default)]
    pub round_summaries: BTreeMap<String, String>,
}

fn round_key(round: u32) -> String {
    format!("Round{round}")
}

fn suspicion_key(speaker: &str, target: &str) -> String {
    format!("{speaker}->{target}")
}

/// Decode one field, falling back to its default when it is the wrong shape.
fn field<T: DeserializeOwned + Default>(fields: &mut Map<String, Value>, key: &str) -> T {
    match fields.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field = key, error = %e, "discarding corrupt memory field");
            T::default()
        }),
    }
}

impl MemoryRecord {
    /// Decode a (possibly damaged) document field by field.
    ///
    /// Strings are sanitized first; any field of the wrong shape falls back
    /// to its default while the rest are kept.
    #[must_use]
    pub fn from_value_lenient(value: Value) -> Self {
        let Value::Object(mut fields) = sanitize_value(value) else {
            warn!("memory document is not an object, starting empty");
            return Self::default();
        };

        let facts = match fields.remove("facts") {
            Some(Value::Object(mut facts)) => Facts {
                dead: field(&mut facts, "dead"),
                revealed_roles: field(&mut facts, "revealed_roles"),
            },
            _ => Facts::default(),
        };

        Self {
            dialogue_history: field(&mut fields, "dialogue_history"),
            facts,
            suspicions: field(&mut fields, "suspicions"),
            quietness: field(&mut fields, "quietness"),
            votes: field(&mut fields, "votes"),
            round_summaries: field(&mut fields, "round_summaries"),
        }
    }

    /// Sanitized JSON form of this record.
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded.
    pub fn to_sanitized_value(&self) -> serde_json::Result<Value> {
        Ok(sanitize_value(serde_json::to_value(self)?))
    }

    // === Updates ===

    /// Append a rendered line, keeping only the most recent `max_keep`.
    pub fn append_dialogue(&mut self, line: &str, max_keep: usize) {
        self.dialogue_history.push(clean_str(line));
        let excess = self.dialogue_history.len().saturating_sub(max_keep);
        self.dialogue_history.drain(..excess);
    }

    /// Record a round's ballots, skipping entries with an empty side.
    pub fn add_votes(&mut self, round: u32, ballots: &Ballots) {
        let items = ballots
            .iter()
            .map(|(voter, target)| VoteIntent {
                voter: clean_str(voter),
                target: clean_str(target),
            })
            .filter(|v| !v.voter.is_empty() && !v.target.is_empty())
            .collect();
        self.votes.insert(round_key(round), items);
    }

    /// Add a name to the death list once.
    pub fn mark_dead(&mut self, name: &str) {
        let name = clean_str(name);
        if !self.facts.dead.contains(&name) {
            self.facts.dead.push(name);
        }
    }

    /// Record a publicly revealed role.
    pub fn reveal_role(&mut self, name: &str, role: Role) {
        self.facts
            .revealed_roles
            .insert(clean_str(name), role.label().to_string());
    }

    /// Count suspicion voiced in `lines`.
    ///
    /// A rendered line `speaker: text` whose text contains any marker word
    /// adds one to `speaker->name` for every other `name` in the text.
    pub fn update_suspicions<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
        names: &[String],
        markers: &[String],
    ) {
        for raw in lines {
            let Some(line) = Line::parse(&clean_str(raw)) else {
                continue;
            };
            if !markers.iter().any(|m| line.text.contains(m.as_str())) {
                continue;
            }
            for name in names {
                if *name != line.speaker && line.text.contains(name.as_str()) {
                    *self
                        .suspicions
                        .entry(suspicion_key(&line.speaker, name))
                        .or_insert(0) += 1;
                }
            }
        }
    }

    /// Recompute quietness over the last `window` rendered lines.
    ///
    /// Replaces the previous values; only `alive` names are reported.
    pub fn update_quietness(&mut self, alive: &[String], recent: &[String], window: usize) {
        let start = recent.len().saturating_sub(window);
        let mut spoken: BTreeMap<String, usize> = BTreeMap::new();
        for raw in &recent[start..] {
            if let Some(line) = Line::parse(&clean_str(raw)) {
                *spoken.entry(line.speaker).or_insert(0) += 1;
            }
        }

        let total = spoken.values().sum::<usize>().max(1) as f64;
        self.quietness = alive
            .iter()
            .map(|name| {
                let share = spoken.get(name).copied().unwrap_or(0) as f64 / total;
                (name.clone(), ((1.0 - share) * 1000.0).round() / 1000.0)
            })
            .collect();
    }

    /// Store a round summary, cut to `max_chars` with a trailing ellipsis.
    pub fn set_round_summary(&mut self, round: u32, summary: &str, max_chars: usize) {
        let text = clean_str(summary).trim().to_string();
        let text = if text.chars().count() > max_chars {
            let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            cut.push('…');
            cut
        } else {
            text
        };
        self.round_summaries.insert(round_key(round), text);
    }

    /// Absorb a finished round from the game state.
    ///
    /// Appends today's lines, counts suspicions in them toward living AI
    /// players, recomputes quietness over the transcript tail, refreshes the
    /// death list and records the round's ballots under `round`.
    ///
    /// A round whose ballots are already recorded is skipped, so repeating
    /// the call for the same round changes nothing.
    pub fn observe_round(&mut self, state: &GameState, round: u32, ballots: &Ballots) {
        if self.votes.contains_key(&round_key(round)) {
            debug!(round, "round already observed");
            return;
        }

        let config = state.config();
        let today: Vec<String> = state.transcript().today().map(Line::render).collect();

        for line in &today {
            self.append_dialogue(line, config.memory_dialogue_keep);
        }
        self.update_suspicions(
            today.iter().map(String::as_str),
            &state.alive_ai(),
            &config.suspicion_markers,
        );
        self.update_quietness(
            &state.alive_players(),
            &state.transcript().rendered_tail(config.quietness_window),
            config.quietness_window,
        );
        for name in state.dead_players() {
            self.mark_dead(&name);
        }
        self.add_votes(round, ballots);
    }

    // === Queries ===

    /// Suspicion count from `speaker` toward `target`.
    #[must_use]
    pub fn suspicion(&self, speaker: &str, target: &str) -> u32 {
        self.suspicions
            .get(&suspicion_key(speaker, target))
            .copied()
            .unwrap_or(0)
    }

    /// Strongest suspicions, count descending (key ascending on ties).
    #[must_use]
    pub fn top_suspicions(&self, limit: usize) -> Vec<(String, u32)> {
        let mut rows: Vec<(String, u32)> =
            self.suspicions.iter().map(|(k, &v)| (k.clone(), v)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.truncate(limit);
        rows
    }

    /// Summary for `round`, if recorded.
    #[must_use]
    pub fn round_summary(&self, round: u32) -> Option<&str> {
        self.round_summaries.get(&round_key(round)).map(String::as_str)
    }

    /// Prompt-ready view for the given living players and round.
    #[must_use]
    pub fn snapshot(&self, alive: &[String], round: u32) -> MemorySnapshot {
        MemorySnapshot {
            alive: alive.to_vec(),
            dead: self.facts.dead.clone(),
            revealed_roles: self.facts.revealed_roles.clone(),
            top_suspicions: self.top_suspicions(SNAPSHOT_SUSPICIONS),
            quietness: alive
                .iter()
                .map(|name| {
                    let q = self.quietness.get(name).copied().unwrap_or(DEFAULT_QUIETNESS);
                    (name.clone(), q)
                })
                .collect(),
            last_round_summary: round
                .checked_sub(1)
                .and_then(|prev| self.round_summary(prev))
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Memory view sent along with dialogue requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub alive: Vec<String>,
    pub dead: Vec<String>,
    pub revealed_roles: BTreeMap<String, String>,
    pub top_suspicions: Vec<(String, u32)>,
    pub quietness: BTreeMap<String, f64>,
    pub last_round_summary: String,
}

impl MemorySnapshot {
    /// Sanitized JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_value(self)
            .map(sanitize_value)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn markers() -> Vec<String> {
        names(&["수상", "의심"])
    }

    #[test]
    fn test_suspicions_need_marker() {
        let mut record = MemoryRecord::default();
        record.update_suspicions(
            ["민수: 지연이 수상합니다", "민수: 지연 안녕", "지연: 민수를 의심해요, 현우도"],
            &names(&["민수", "지연", "현우"]),
            &markers(),
        );

        assert_eq!(record.suspicion("민수", "지연"), 1);
        assert_eq!(record.suspicion("지연", "민수"), 1);
        assert_eq!(record.suspicion("지연", "현우"), 1);
        assert_eq!(record.suspicion("민수", "민수"), 0);
    }

    #[test]
    fn test_suspicions_accumulate_and_skip_unattributed() {
        let mut record = MemoryRecord::default();
        let names = names(&["a", "b"]);
        record.update_suspicions(["a: b 수상", "no separator b 수상"], &names, &markers());
        record.update_suspicions(["a: b 의심"], &names, &markers());

        assert_eq!(record.suspicion("a", "b"), 2);
        assert_eq!(record.suspicions.len(), 1);
    }

    #[test]
    fn test_quietness_fresh_each_call() {
        let mut record = MemoryRecord::default();
        let alive = names(&["a", "b"]);
        let recent = names(&["a: 1", "a: 2", "a: 3", "b: 4"]);

        record.update_quietness(&alive, &recent, 20);
        assert_eq!(record.quietness["a"], 0.25);
        assert_eq!(record.quietness["b"], 0.75);

        record.update_quietness(&names(&["a"]), &[], 20);
        assert_eq!(record.quietness["a"], 1.0);
        assert!(!record.quietness.contains_key("b"));
    }

    #[test]
    fn test_quietness_window() {
        let mut record = MemoryRecord::default();
        let recent = names(&["a: old", "b: new", "b: newer"]);
        record.update_quietness(&names(&["a", "b"]), &recent, 2);

        assert_eq!(record.quietness["a"], 1.0);
        assert_eq!(record.quietness["b"], 0.0);
    }

    #[test]
    fn test_quietness_rounding() {
        let mut record = MemoryRecord::default();
        let recent = names(&["a: 1", "b: 2", "c: 3"]);
        record.update_quietness(&names(&["a"]), &recent, 20);
        assert_eq!(record.quietness["a"], 0.667);
    }

    #[test]
    fn test_round_summary_truncation() {
        let mut record = MemoryRecord::default();
        record.set_round_summary(1, "  짧은 요약  ", 10);
        record.set_round_summary(2, "가나다라마바사아자차카", 5);

        assert_eq!(record.round_summary(1), Some("짧은 요약"));
        assert_eq!(record.round_summary(2), Some("가나다라…"));
        assert_eq!(record.round_summary(2).unwrap().chars().count(), 5);
    }

    #[test]
    fn test_dialogue_bounded() {
        let mut record = MemoryRecord::default();
        for i in 0..10 {
            record.append_dialogue(&format!("a: {i}"), 4);
        }
        assert_eq!(record.dialogue_history, names(&["a: 6", "a: 7", "a: 8", "a: 9"]));
    }

    #[test]
    fn test_facts() {
        let mut record = MemoryRecord::default();
        record.mark_dead("a");
        record.mark_dead("a");
        record.reveal_role("a", Role::Mafia);

        assert_eq!(record.facts.dead, names(&["a"]));
        assert_eq!(record.facts.revealed_roles["a"], "MAFIA");
    }

    #[test]
    fn test_add_votes_skips_empty() {
        let mut record = MemoryRecord::default();
        let mut ballots = Ballots::new();
        ballots.insert("a".into(), "b".into());
        ballots.insert("c".into(), String::new());
        record.add_votes(3, &ballots);

        assert_eq!(record.votes["Round3"], vec![VoteIntent { voter: "a".into(), target: "b".into() }]);
    }

    #[test]
    fn test_lenient_decode_keeps_good_fields() {
        let value = json!({
            "dialogue_history": ["a: hi"],
            "facts": {"dead": "not a list", "revealed_roles": {"a": "CITIZEN"}},
            "suspicions": {"a->b": "three"},
            "quietness": {"a": 0.5},
            "unknown": 1
        });

        let record = MemoryRecord::from_value_lenient(value);
        assert_eq!(record.dialogue_history, names(&["a: hi"]));
        assert!(record.facts.dead.is_empty());
        assert_eq!(record.facts.revealed_roles["a"], "CITIZEN");
        assert!(record.suspicions.is_empty());
        assert_eq!(record.quietness["a"], 0.5);
        assert!(record.votes.is_empty());
    }

    #[test]
    fn test_lenient_decode_non_object() {
        assert_eq!(MemoryRecord::from_value_lenient(json!([1, 2])), MemoryRecord::default());
    }

    #[test]
    fn test_snapshot() {
        let mut record = MemoryRecord::default();
        record.set_round_summary(1, "a accused b", 220);
        for _ in 0..3 {
            record.update_suspicions(["a: b 수상"], &names(&["a", "b"]), &markers());
        }
        record.update_suspicions(["b: a 의심"], &names(&["a", "b"]), &markers());
        record.quietness.insert("a".into(), 0.2);

        let snap = record.snapshot(&names(&["a", "b"]), 2);
        assert_eq!(snap.last_round_summary, "a accused b");
        assert_eq!(snap.top_suspicions[0], ("a->b".to_string(), 3));
        assert_eq!(snap.quietness["a"], 0.2);
        assert_eq!(snap.quietness["b"], DEFAULT_QUIETNESS);
        assert!(snap.to_json().contains("\"last_round_summary\":\"a accused b\""));

        assert_eq!(record.snapshot(&[], 1).last_round_summary, "");
    }

    fn table() -> GameState {
        use crate::core::{EngineConfig, GameRng, Player};

        GameState::from_players(
            EngineConfig::default().with_roster("me", &["a", "b", "c"]),
            vec![
                Player::citizen("me"),
                Player::mafia("a"),
                Player::citizen("b"),
                Player::citizen("c"),
            ],
            GameRng::new(6),
        )
    }

    #[test]
    fn test_observe_ignores_dead_targets() {
        let mut state = table();
        state.eliminate("c");
        state.start_new_day();
        state.say("b", "c 수상해요");
        state.say("b", "a 수상해요");

        let mut record = MemoryRecord::default();
        record.observe_round(&state, 1, &Ballots::new());

        assert_eq!(record.suspicion("b", "c"), 0);
        assert_eq!(record.suspicion("b", "a"), 1);
        assert_eq!(record.facts.dead, names(&["c"]));
    }

    #[test]
    fn test_observe_round_once() {
        let mut state = table();
        state.start_new_day();
        state.say("b", "a 의심");
        let mut ballots = Ballots::new();
        ballots.insert("b".into(), "a".into());

        let mut record = MemoryRecord::default();
        record.observe_round(&state, 1, &ballots);
        let first = record.clone();
        record.observe_round(&state, 1, &ballots);

        assert_eq!(record, first);
        assert_eq!(record.dialogue_history.len(), 1);
        assert_eq!(record.suspicion("b", "a"), 1);
    }
}
