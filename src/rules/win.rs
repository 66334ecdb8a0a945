//! Win detection.

use serde::{Deserialize, Serialize};

use crate::core::GameState;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The mafia has been eliminated.
    CitizenWin,
    /// The mafia reached parity with the citizens (or killed the human).
    MafiaWin,
}

impl Outcome {
    /// `CITIZEN_WIN` / `MAFIA_WIN`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::CitizenWin => "CITIZEN_WIN",
            Outcome::MafiaWin => "MAFIA_WIN",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Check the win condition among living players.
///
/// The mafia wins as soon as it is not outnumbered, before the last citizen
/// falls. Returns `None` while the game continues.
#[must_use]
pub fn check_win(state: &GameState) -> Option<Outcome> {
    let mafia = state.mafia_alive();
    let citizens = state.citizen_alive();
    if mafia == 0 {
        return Some(Outcome::CitizenWin);
    }
    if mafia >= citizens {
        return Some(Outcome::MafiaWin);
    }
    None
}
