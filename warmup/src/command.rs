//! Text commands shared by the `/` prompt and headless mode.

use std::str::FromStr;

use anyhow::{anyhow, bail};
use warmup_core::{FilterAxis, TimeBucket};

/// A user command, parsed from one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Reset,
    Favorite,
    Presentation,
    /// Start the timer; `None` uses the current prompt's time.
    Timer(Option<u32>),
    StopTimer,
    ClearFilters,
    Filter(FilterAxis, String),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().trim_start_matches('/');
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" => bail!("Empty command"),
            "n" | "next" => Command::Next,
            "b" | "back" => Command::Back,
            "r" | "reset" => Command::Reset,
            "f" | "fav" | "favorite" => Command::Favorite,
            "p" | "present" | "presentation" => Command::Presentation,
            "t" | "timer" => {
                if rest.is_empty() {
                    Command::Timer(None)
                } else {
                    let minutes = rest
                        .trim_end_matches("min")
                        .trim()
                        .parse()
                        .map_err(|_| anyhow!("Invalid timer length: {rest}"))?;
                    Command::Timer(Some(minutes))
                }
            }
            "s" | "stop" => Command::StopTimer,
            "c" | "clear" => Command::ClearFilters,
            "status" => Command::Status,
            "?" | "h" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => {
                let axis: FilterAxis = other
                    .parse()
                    .map_err(|_| anyhow!("Unknown command: {word}"))?;
                if rest.is_empty() {
                    bail!("Usage: {axis} <value>");
                }
                let value = match axis {
                    FilterAxis::Time => rest.parse::<TimeBucket>()?.to_string(),
                    FilterAxis::Tag | FilterAxis::Mode => rest.to_string(),
                };
                Command::Filter(axis, value)
            }
        };

        Ok(command)
    }
}

/// One line per command, for help screens.
pub const COMMAND_HELP: &[(&str, &str)] = &[
    ("next", "Show the next prompt"),
    ("back", "Return to the previous prompt"),
    ("reset", "Reshuffle the deck"),
    ("fav", "Star or unstar the current prompt"),
    ("present", "Toggle presentation mode"),
    ("timer [min]", "Start the timer"),
    ("stop", "Stop the timer"),
    ("tag <name>", "Toggle a tag filter"),
    ("mode <name>", "Toggle a mode filter"),
    ("time <N|N-M>", "Toggle a time filter"),
    ("clear", "Remove every filter"),
    ("status", "Show the deck status"),
    ("quit", "Exit"),
];
