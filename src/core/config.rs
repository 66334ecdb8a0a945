//! Engine configuration.
//!
//! Defaults reproduce the standard seven-seat game: one human seat, six AI
//! characters, one of whom is secretly the mafia. Every field has a serde
//! default so a TOML file only needs the keys it overrides:
//!
//! ```
//! use mafia_engine::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml("night_mention_window = 10").unwrap();
//! assert_eq!(config.night_mention_window, 10);
//! assert_eq!(config.ai_names.len(), 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MafiaError, Result};

/// Tunable constants and phrase pools for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the human player's seat. Always a citizen.
    pub human_name: String,

    /// AI-controlled character names, in roster order.
    pub ai_names: Vec<String>,

    /// Ballot label meaning "execute nobody".
    pub no_lynch_label: String,

    /// Recent transcript lines the mafia scans when choosing a victim.
    pub night_mention_window: usize,

    /// Transcript lines included in a game summary.
    pub summary_tail: usize,

    /// Filler lines substituted for missing or rejected dialogue.
    pub fallback_phrases: Vec<String>,

    /// Generated lines rejected as uninformative.
    pub generic_phrases: Vec<String>,

    /// Words that turn a name mention into a suspicion.
    pub suspicion_markers: Vec<String>,

    /// Lines considered when computing quietness.
    pub quietness_window: usize,

    /// Maximum characters kept for a round summary.
    pub summary_max_chars: usize,

    /// Dialogue lines retained in the memory record.
    pub memory_dialogue_keep: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            human_name: "당신".to_string(),
            ai_names: strings(&["민수", "지연", "현우", "수아", "하린", "태훈"]),
            no_lynch_label: "무처형".to_string(),
            night_mention_window: 30,
            summary_tail: 12,
            fallback_phrases: strings(&[
                "(주위를 살핀다.)",
                "(눈을 피한다.)",
                "(작게 한숨을 쉰다.)",
                "(입술을 깨문다.)",
                "(아무 말 없이 분위기를 살핀다.)",
                "(잠시 침묵이 흐른다...)",
                "(의심스러운 표정으로 주변을 바라본다.)",
            ]),
            generic_phrases: strings(&[
                "저도 마찬가지입니다.",
                "동의합니다.",
                "단결해서 이 위기를 헤쳐나가자구요.",
                "항상 경계심을 가져야 합니다.",
                "조심해야 해요.",
                "믿고 단합합시다.",
            ]),
            suspicion_markers: strings(&["수상", "의심"]),
            quietness_window: 20,
            summary_max_chars: 220,
            memory_dialogue_keep: 120,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MafiaError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MafiaError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Replace the roster names.
    #[must_use]
    pub fn with_roster(mut self, human: impl Into<String>, ai: &[&str]) -> Self {
        self.human_name = human.into();
        self.ai_names = strings(ai);
        self
    }

    /// Replace the no-lynch ballot label.
    #[must_use]
    pub fn with_no_lynch_label(mut self, label: impl Into<String>) -> Self {
        self.no_lynch_label = label.into();
        self
    }

    /// Set the night victim scan window.
    #[must_use]
    pub fn with_night_window(mut self, lines: usize) -> Self {
        self.night_mention_window = lines;
        self
    }

    /// Every seat, human first.
    #[must_use]
    pub fn roster(&self) -> Vec<String> {
        std::iter::once(self.human_name.clone())
            .chain(self.ai_names.iter().cloned())
            .collect()
    }

    /// Whether `line` is in the generic filler denylist.
    #[must_use]
    pub fn is_generic(&self, line: &str) -> bool {
        self.generic_phrases.iter().any(|p| p == line)
    }
}
