//! Append-only dialogue transcript.
//!
//! Lines are never edited or removed. Two windowed views feed the
//! heuristics:
//!
//! - `tail(n)`: the most recent `n` lines (night victim choice, summaries)
//! - `today()`: everything since the current day started (mention counts)
//!
//! Heuristics match names against the rendered `"speaker: text"` form, so a
//! speaker's own name counts as a mention of that speaker.

use im::Vector;
use serde::{Deserialize, Serialize};

/// One speaker-attributed line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub speaker: String,
    pub text: String,
}

impl Line {
    #[must_use]
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// `"speaker: text"`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker, self.text)
    }

    /// Split a rendered line back into speaker and text.
    ///
    /// Returns `None` for lines without a `": "` separator.
    #[must_use]
    pub fn parse(rendered: &str) -> Option<Self> {
        let (speaker, text) = rendered.split_once(": ")?;
        Some(Self::new(speaker, text))
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Number of non-overlapping occurrences of `name` in `haystack`.
///
/// Plain substring matching: names have no reliable word boundary.
#[must_use]
pub fn count_occurrences(name: &str, haystack: &str) -> usize {
    if name.is_empty() || haystack.is_empty() {
        return 0;
    }
    haystack.matches(name).count()
}

/// The game's dialogue log with the current day's start marker.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vector<Line>,
    day_start: usize,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, line: Line) {
        self.lines.push_back(line);
    }

    /// Total lines recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// The most recent `n` lines (all of them if fewer exist), oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &Line> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n))
    }

    /// Lines spoken since the current day started.
    pub fn today(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().skip(self.day_start)
    }

    /// Index where the current day's window begins.
    #[must_use]
    pub fn day_start(&self) -> usize {
        self.day_start
    }

    /// Start a new day window at the current end of the log.
    pub fn start_new_day(&mut self) {
        self.day_start = self.lines.len();
    }

    /// Rendered form of the last `n` lines.
    #[must_use]
    pub fn rendered_tail(&self, n: usize) -> Vec<String> {
        self.tail(n).map(Line::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_of(lines: &[(&str, &str)]) -> Transcript {
        let mut t = Transcript::new();
        for (s, x) in lines {
            t.push(Line::new(*s, *x));
        }
        t
    }

    #[test]
    fn test_render_and_parse() {
        let line = Line::new("민수", "지연: 수상해요");
        assert_eq!(line.render(), "민수: 지연: 수상해요");

        let parsed = Line::parse("민수: 지연: 수상해요").unwrap();
        assert_eq!(parsed, line);
        assert!(Line::parse("no separator").is_none());
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("민수", "민수는 민수다"), 2);
        assert_eq!(count_occurrences("aa", "aaaa"), 2);
        assert_eq!(count_occurrences("", "abc"), 0);
        assert_eq!(count_occurrences("x", ""), 0);
    }

    #[test]
    fn test_tail_window() {
        let t = transcript_of(&[("a", "1"), ("b", "2"), ("c", "3")]);

        let last_two: Vec<_> = t.tail(2).map(|l| l.text.as_str()).collect();
        assert_eq!(last_two, vec!["2", "3"]);
        assert_eq!(t.tail(10).count(), 3);
        assert_eq!(t.tail(0).count(), 0);
    }

    #[test]
    fn test_day_window() {
        let mut t = transcript_of(&[("a", "old")]);
        assert_eq!(t.today().count(), 1);

        t.start_new_day();
        assert_eq!(t.day_start(), 1);
        assert_eq!(t.today().count(), 0);

        t.push(Line::new("b", "new"));
        let today: Vec<_> = t.today().map(|l| l.text.as_str()).collect();
        assert_eq!(today, vec!["new"]);
        assert!(t.day_start() <= t.len());
    }

    #[test]
    fn test_rendered_tail() {
        let t = transcript_of(&[("a", "1"), ("b", "2")]);
        assert_eq!(t.rendered_tail(1), vec!["b: 2".to_string()]);
    }
}
