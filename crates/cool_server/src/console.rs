//! The operator console language.
//!
//! Each line drives the simulated world one step: players join, talk, walk,
//! dig and issue slash commands; `wait` lets ticks pass.

use cool_events::{ItemKind, Position};
use std::fmt;

/// Who a `cmd` line is issued as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issuer {
    Console,
    Player(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Join {
        name: String,
        /// Falls back to the configured spawn
        position: Option<Position>,
    },
    Quit {
        name: String,
    },
    Say {
        name: String,
        message: String,
    },
    Move {
        name: String,
        to: Position,
        sprint: bool,
    },
    Break {
        name: String,
        block: Position,
    },
    Place {
        name: String,
        block: Position,
    },
    Use {
        name: String,
        item: ItemKind,
        block: Position,
    },
    /// A slash command line, without the leading slash
    Command {
        issuer: Issuer,
        line: String,
    },
    Wait {
        ticks: u64,
    },
    Players,
    Help,
    Stop,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Unknown console command '{0}'. Type 'help' for a list.")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

const JOIN_USAGE: &str = "join <name> [x y z]";
const QUIT_USAGE: &str = "quit <name>";
const SAY_USAGE: &str = "say <name> <message...>";
const MOVE_USAGE: &str = "move <name> <x> <y> <z> [sprint]";
const BREAK_USAGE: &str = "break <name> <x> <y> <z>";
const PLACE_USAGE: &str = "place <name> <x> <y> <z>";
const USE_USAGE: &str = "use <name> <item> <x> <y> <z>";
const CMD_USAGE: &str = "cmd <name|console> <command> [args...]";
const WAIT_USAGE: &str = "wait <ticks>";

/// One line per console command, for `help`.
pub const HELP_LINES: [&str; 12] = [
    JOIN_USAGE,
    QUIT_USAGE,
    SAY_USAGE,
    MOVE_USAGE,
    BREAK_USAGE,
    PLACE_USAGE,
    USE_USAGE,
    CMD_USAGE,
    WAIT_USAGE,
    "players",
    "help",
    "stop",
];

/// Parses one console line.
///
/// Blank lines and lines starting with `#` yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(line);
    let words: Vec<&str> = rest.split_whitespace().collect();

    let command = match keyword.to_lowercase().as_str() {
        "join" => match words.as_slice() {
            [name] => ConsoleCommand::Join {
                name: name.to_string(),
                position: None,
            },
            [name, x, y, z] => ConsoleCommand::Join {
                name: name.to_string(),
                position: Some(position(x, y, z)?),
            },
            _ => return Err(ConsoleError::Usage(JOIN_USAGE)),
        },
        "quit" => match words.as_slice() {
            [name] => ConsoleCommand::Quit {
                name: name.to_string(),
            },
            _ => return Err(ConsoleError::Usage(QUIT_USAGE)),
        },
        "say" => {
            let (name, message) = split_word(rest);
            if name.is_empty() || message.is_empty() {
                return Err(ConsoleError::Usage(SAY_USAGE));
            }
            ConsoleCommand::Say {
                name: name.to_string(),
                message: message.to_string(),
            }
        }
        "move" => match words.as_slice() {
            [name, x, y, z] => ConsoleCommand::Move {
                name: name.to_string(),
                to: position(x, y, z)?,
                sprint: false,
            },
            [name, x, y, z, flag] if flag.eq_ignore_ascii_case("sprint") => ConsoleCommand::Move {
                name: name.to_string(),
                to: position(x, y, z)?,
                sprint: true,
            },
            _ => return Err(ConsoleError::Usage(MOVE_USAGE)),
        },
        "break" => match words.as_slice() {
            [name, x, y, z] => ConsoleCommand::Break {
                name: name.to_string(),
                block: position(x, y, z)?,
            },
            _ => return Err(ConsoleError::Usage(BREAK_USAGE)),
        },
        "place" => match words.as_slice() {
            [name, x, y, z] => ConsoleCommand::Place {
                name: name.to_string(),
                block: position(x, y, z)?,
            },
            _ => return Err(ConsoleError::Usage(PLACE_USAGE)),
        },
        "use" => match words.as_slice() {
            [name, item, x, y, z] => ConsoleCommand::Use {
                name: name.to_string(),
                item: ItemKind::from_name(item),
                block: position(x, y, z)?,
            },
            _ => return Err(ConsoleError::Usage(USE_USAGE)),
        },
        "cmd" => {
            let (issuer, line) = split_word(rest);
            let line = line.strip_prefix('/').unwrap_or(line).trim();
            if issuer.is_empty() || line.is_empty() {
                return Err(ConsoleError::Usage(CMD_USAGE));
            }
            let issuer = if issuer.eq_ignore_ascii_case("console") {
                Issuer::Console
            } else {
                Issuer::Player(issuer.to_string())
            };
            ConsoleCommand::Command {
                issuer,
                line: line.to_string(),
            }
        }
        "wait" => match words.as_slice() {
            [ticks] => ConsoleCommand::Wait {
                ticks: ticks
                    .parse()
                    .map_err(|_| ConsoleError::InvalidNumber(ticks.to_string()))?,
            },
            _ => return Err(ConsoleError::Usage(WAIT_USAGE)),
        },
        "players" => ConsoleCommand::Players,
        "help" => ConsoleCommand::Help,
        "stop" | "exit" => ConsoleCommand::Stop,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn coordinate(s: &str) -> Result<f64, ConsoleError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConsoleError::InvalidNumber(s.to_string()))
}

fn position(x: &str, y: &str, z: &str) -> Result<Position, ConsoleError> {
    Ok(Position::new(coordinate(x)?, coordinate(y)?, coordinate(z)?))
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issuer::Console => write!(f, "console"),
            Issuer::Player(name) => write!(f, "{}", name),
        }
    }
}
