//! Client for external Hex engines speaking a GTP-style text protocol
//!
//! One command per line on stdin; each response is a line starting with
//! `=` (success) or `?` (failure), terminated by an empty line. Search
//! statistics such as the evaluation score arrive on stderr.
//!
//! Everything textual stays in this module: callers get typed moves and
//! optional scores.

mod process;

pub use process::ProcessClient;

use hex_core::{MoveData, PlayerIndex};
use serde::Serialize;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine {path}: {source}")]
    Spawn {
        path: String,
        source: std::io::Error,
    },

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine closed its output")]
    Closed,

    #[error("engine rejected command {command:?}: {message}")]
    Command { command: String, message: String },

    #[error("unexpected engine response {0:?}")]
    UnexpectedResponse(String),

    #[error("move {0} has no engine coordinate")]
    NoCoordinate(MoveData),
}

/// Raw command transport
pub trait EngineClient {
    /// Send one command line and return the success payload
    fn send(&mut self, command: &str) -> Result<String, EngineError>;

    /// Diagnostic lines the engine printed while handling the last command
    fn diagnostics(&mut self) -> Vec<String>;
}

/// Move proposed by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMove {
    Cell(MoveData),
    Swap,
    Resign,
}

impl EngineMove {
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "resign" => Ok(EngineMove::Resign),
            "swap" | "swap-pieces" => Ok(EngineMove::Swap),
            coord => coord
                .parse()
                .map(EngineMove::Cell)
                .map_err(|_| EngineError::UnexpectedResponse(text.to_string())),
        }
    }
}

impl fmt::Display for EngineMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMove::Cell(mv) => write!(f, "{}", mv),
            EngineMove::Swap => f.write_str("swap"),
            EngineMove::Resign => f.write_str("resign"),
        }
    }
}

/// Engine's preferred move with its evaluation, when it reported one
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Suggestion {
    pub mv: EngineMove,
    pub score: Option<f64>,
}

/// Protocol color of a seat. The first player is black.
pub fn color(player: PlayerIndex) -> &'static str {
    match player {
        PlayerIndex::First => "black",
        PlayerIndex::Second => "white",
    }
}

/// Typed operations on top of an [`EngineClient`]
pub struct Engine<C> {
    client: C,
}

impl<C: EngineClient> Engine<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    pub fn set_board_size(&mut self, size: usize) -> Result<(), EngineError> {
        self.client.send(&format!("boardsize {} {}", size, size))?;
        Ok(())
    }

    pub fn play(&mut self, player: PlayerIndex, mv: MoveData) -> Result<(), EngineError> {
        let coord = mv.notation().ok_or(EngineError::NoCoordinate(mv))?;
        self.client.send(&format!("play {} {}", color(player), coord))?;
        Ok(())
    }

    /// Ask for the best move without playing it
    pub fn suggest(&mut self, player: PlayerIndex) -> Result<Suggestion, EngineError> {
        let response = self.client.send(&format!("reg_genmove {}", color(player)))?;
        let mv = EngineMove::parse(&response)?;
        let score = parse_score(&self.client.diagnostics().join("\n"));
        Ok(Suggestion { mv, score })
    }

    pub fn quit(&mut self) -> Result<(), EngineError> {
        self.client.send("quit")?;
        Ok(())
    }
}

/// Turn the lines of one response (without the terminating blank line)
/// into its payload.
pub fn parse_response(command: &str, lines: &[String]) -> Result<String, EngineError> {
    let first = lines
        .first()
        .ok_or_else(|| EngineError::UnexpectedResponse(String::new()))?;

    let (success, rest) = if let Some(rest) = first.strip_prefix('=') {
        (true, rest)
    } else if let Some(rest) = first.strip_prefix('?') {
        (false, rest)
    } else {
        return Err(EngineError::UnexpectedResponse(first.clone()));
    };

    // Optional numeric command id right after the marker
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    let mut payload = rest.trim().to_string();
    for line in &lines[1..] {
        payload.push('\n');
        payload.push_str(line);
    }

    if success {
        Ok(payload)
    } else {
        Err(EngineError::Command {
            command: command.to_string(),
            message: payload,
        })
    }
}

/// First `Score <number>` figure in the engine's diagnostics. Occurrences
/// of `Score` without a number after them are skipped.
pub fn parse_score(diagnostics: &str) -> Option<f64> {
    diagnostics.match_indices("Score").find_map(|(start, word)| {
        let digits: String = diagnostics[start + word.len()..]
            .trim_start_matches(' ')
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        digits.parse().ok()
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// In-memory engine answering from a script
    #[derive(Default)]
    pub struct ScriptedClient {
        pub sent: Vec<String>,
        pub replies: VecDeque<(Result<String, EngineError>, Vec<String>)>,
        last_diagnostics: Vec<String>,
    }

    impl ScriptedClient {
        pub fn reply(mut self, payload: &str, diagnostics: &[&str]) -> Self {
            self.replies.push_back((
                Ok(payload.to_string()),
                diagnostics.iter().map(|s| s.to_string()).collect(),
            ));
            self
        }
    }

    impl EngineClient for ScriptedClient {
        fn send(&mut self, command: &str) -> Result<String, EngineError> {
            self.sent.push(command.to_string());
            let (reply, diagnostics) = self
                .replies
                .pop_front()
                .unwrap_or_else(|| (Ok(String::new()), Vec::new()));
            self.last_diagnostics = diagnostics;
            reply
        }

        fn diagnostics(&mut self) -> Vec<String> {
            self.last_diagnostics.clone()
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_response() {
        assert_eq!(parse_response("x", &lines(&["= k7"])).unwrap(), "k7");
        assert_eq!(parse_response("x", &lines(&["="])).unwrap(), "");
        assert_eq!(parse_response("x", &lines(&["=12 a1"])).unwrap(), "a1");
        assert_eq!(
            parse_response("x", &lines(&["= first", "second"])).unwrap(),
            "first\nsecond"
        );
    }

    #[test]
    fn test_parse_failure_response() {
        let err = parse_response("play black z99", &lines(&["? invalid move"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "engine rejected command \"play black z99\": invalid move"
        );
        assert!(matches!(
            parse_response("x", &lines(&["garbage"])),
            Err(EngineError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("Nodes 1200\nScore 0.58\nPV k7"), Some(0.58));
        assert_eq!(parse_score("Score    0.5"), Some(0.5));
        assert_eq!(parse_score("Score"), None);
        assert_eq!(parse_score("no evaluation"), None);
    }

    #[test]
    fn test_parse_score_skips_bare_mentions() {
        assert_eq!(parse_score("Scores pending\nScore 0.61"), Some(0.61));
        assert_eq!(parse_score("Score: n/a\nNodes 900\nScore 0.2"), Some(0.2));
        assert_eq!(parse_score("Score .\nScore"), None);
    }

    #[test]
    fn test_engine_move_parse() {
        assert_eq!(EngineMove::parse("k7").unwrap(), EngineMove::Cell(MoveData::new(6, 10)));
        assert_eq!(EngineMove::parse("resign").unwrap(), EngineMove::Resign);
        assert_eq!(EngineMove::parse("swap-pieces").unwrap(), EngineMove::Swap);
        assert!(EngineMove::parse("pass!").is_err());
    }

    #[test]
    fn test_engine_commands() {
        let client = ScriptedClient::default()
            .reply("", &[])
            .reply("", &[])
            .reply("g7", &["Score 0.58"]);
        let mut engine = Engine::new(client);

        engine.set_board_size(13).unwrap();
        engine.play(PlayerIndex::First, MoveData::new(6, 10)).unwrap();
        let suggestion = engine.suggest(PlayerIndex::Second).unwrap();

        assert_eq!(suggestion.mv, EngineMove::Cell(MoveData::new(6, 6)));
        assert_eq!(suggestion.score, Some(0.58));
        assert_eq!(
            engine.client().sent,
            vec!["boardsize 13 13", "play black k7", "reg_genmove white"]
        );
    }

    #[test]
    fn test_suggestion_without_score() {
        let client = ScriptedClient::default().reply("h4", &["thinking..."]);
        let mut engine = Engine::new(client);
        assert_eq!(engine.suggest(PlayerIndex::First).unwrap().score, None);
    }
}
