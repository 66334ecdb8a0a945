//! Contract with the external dialogue-generation service.
//!
//! The engine never talks to a model directly. It builds a
//! [`DialogueRequest`], hands it to a [`DialogueSource`], and parses whatever
//! text comes back into a [`Reply`]. An empty or unparseable reply is an
//! ordinary value, not an error: the turn engine fills the gaps with
//! fallback lines and rule-based votes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameState, Phase};

/// Snapshot of the public game situation sent with every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub round: u32,
    pub phase: Phase,
    pub alive: Vec<String>,
    pub dead: Vec<String>,
    pub alive_ai: Vec<String>,
    pub dialogue_recent: Vec<String>,
}

impl GameSummary {
    /// Summarize `state`, including the configured transcript tail.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        Self {
            round: state.round(),
            phase: state.phase,
            alive: state.alive_players(),
            dead: state.dead_players(),
            alive_ai: state.alive_ai(),
            dialogue_recent: state.transcript().rendered_tail(state.config().summary_tail),
        }
    }

    /// Compact JSON form.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// What the service is asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// One line per speaking AI character.
    Discuss,
    /// One sentence of night atmosphere.
    Night,
    /// One ballot per living AI character.
    Vote,
    /// Closing narration.
    End,
}

/// A request to the dialogue service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DialogueRequest {
    pub goal: Goal,
    pub summary: GameSummary,
    pub player_said: Option<String>,
    pub memory_snapshot: Option<String>,
    /// Legal ballot targets (vote requests only).
    pub legal_targets: Vec<String>,
}

impl DialogueRequest {
    /// Build a request for `goal` from the current state.
    #[must_use]
    pub fn new(goal: Goal, state: &GameState) -> Self {
        Self {
            goal,
            summary: GameSummary::of(state),
            player_said: None,
            memory_snapshot: None,
            legal_targets: Vec::new(),
        }
    }

    /// Attach the human's latest utterance.
    #[must_use]
    pub fn with_player_said(mut self, text: impl Into<String>) -> Self {
        self.player_said = Some(text.into());
        self
    }

    /// Attach a serialized memory snapshot.
    #[must_use]
    pub fn with_memory(mut self, snapshot: impl Into<String>) -> Self {
        self.memory_snapshot = Some(snapshot.into());
        self
    }

    /// Restrict ballots to these choices.
    #[must_use]
    pub fn with_legal_targets(mut self, targets: Vec<String>) -> Self {
        self.legal_targets = targets;
        self
    }

    /// Render the sectioned prompt text.
    #[must_use]
    pub fn to_prompt(&self) -> String {
        let request = match self.goal {
            Goal::Night => {
                "지금은 밤입니다. 분위기만 1문장으로 묘사하세요. \
                 특정 인물의 행동/의심/정보는 밝히지 마세요. \
                 JSON key는 narration 하나만 포함."
            }
            Goal::Discuss => {
                "지금은 낮 토론입니다. summary.alive_ai 중 3~5명이 발언하거나 행동합니다. \
                 dialogue_recent, PLAYER_SAID, MEMORY_SNAPSHOT을 참고하여 \
                 의심 제기, 반박, 자기 방어, 짧은 행동묘사를 만드세요. \
                 최소 2명은 반드시 문장 발언이어야 합니다. \
                 JSON key는 character_lines 하나만 포함하고, 각 항목은 {\"name\":\"이름\",\"line\":\"대사\"}."
            }
            Goal::Vote => {
                "지금은 투표 단계입니다. summary.alive_ai의 각 이름이 VOTE_CHOICES 중 하나에만 1표를 던집니다. \
                 JSON key는 votes 하나만 포함하고, 각 항목은 {\"voter\":\"이름\",\"target\":\"선택지\"}."
            }
            Goal::End => "게임 종료. narration 1문장만 포함한 JSON으로 출력.",
        };

        let mut prompt = format!(
            "[GAME_SUMMARY]\n{}\n\n[MEMORY_SNAPSHOT]\n{}\n\n[PLAYER_SAID]\n{}\n",
            self.summary.to_json(),
            self.memory_snapshot.as_deref().unwrap_or(""),
            self.player_said.as_deref().unwrap_or("없음"),
        );
        if self.goal == Goal::Vote {
            prompt.push_str(&format!("\n[VOTE_CHOICES]\n{}\n", self.legal_targets.join(", ")));
        }
        prompt.push_str(&format!("\n[REQUEST]\n{request}\n"));
        prompt
    }
}

/// Anything that can answer a dialogue request with raw text.
///
/// Implementations wrap the real service; failures should come back as
/// empty text so the engine falls back uniformly.
pub trait DialogueSource {
    /// Produce the raw reply text for `request`.
    fn generate(&mut self, request: &DialogueRequest) -> String;
}

/// A source that never answers. Every turn runs on fallbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSource;

impl DialogueSource for SilentSource {
    fn generate(&mut self, _request: &DialogueRequest) -> String {
        String::new()
    }
}

/// Parsed service output.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    /// Exactly one well-formed object.
    Parsed(T),
    /// Nothing was produced.
    Empty,
    /// Something was produced but it was not one object of the expected shape.
    Malformed(String),
}

impl<T> Reply<T> {
    /// The payload, if the reply parsed.
    pub fn into_payload(self) -> Option<T> {
        match self {
            Reply::Parsed(value) => Some(value),
            Reply::Empty | Reply::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Reply::Parsed(_))
    }
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse raw service text into a typed reply.
///
/// Surrounding prose and code fences are ignored; the outermost braces must
/// hold exactly one JSON object of shape `T`.
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Reply<T> {
    let text = raw.trim();
    if text.is_empty() {
        return Reply::Empty;
    }
    let Some(object) = extract_json_object(text) else {
        debug!("reply has no JSON object");
        return Reply::Malformed("no JSON object found".to_string());
    };
    match serde_json::from_str::<T>(object) {
        Ok(value) => Reply::Parsed(value),
        Err(e) => {
            debug!(error = %e, "reply did not match expected shape");
            Reply::Malformed(e.to_string())
        }
    }
}

/// One generated line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterLine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line: String,
}

/// Reply to a `discuss` request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussReply {
    #[serde(default)]
    pub character_lines: Vec<CharacterLine>,
}

/// One AI ballot intent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteIntent {
    #[serde(default)]
    pub voter: String,
    #[serde(default)]
    pub target: String,
}

/// Reply to a `vote` request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReply {
    #[serde(default)]
    pub votes: Vec<VoteIntent>,
}
