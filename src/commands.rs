use std::str::FromStr;
use thiserror::Error;

use crate::playback::{clamp_interval, INTERVAL_STEP_MS};

/// Action requested from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Play,
    Pause,
    Reset,
    /// Set the advance interval in milliseconds
    Speed(u64),
    /// Shorten the interval by one step
    SpeedUp,
    /// Lengthen the interval by one step
    SpeedDown,
    Retry,
    Status,
    /// Dump the map layers as JSON
    Map,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("speed expects an interval in milliseconds, got '{0}'")]
    BadInterval(String),
}

/// Command words, aliases and help text
pub const COMMANDS: &[(&str, &[&str], &str)] = &[
    ("play", &["p"], "Start or resume playback (restarts at the end)"),
    ("pause", &["s"], "Pause playback"),
    ("reset", &["r"], "Stop and rewind to the first point"),
    ("speed <ms>", &[], "Set the interval between points (500-3000)"),
    ("faster", &["+"], "Shorten the interval by 100 ms"),
    ("slower", &["-"], "Lengthen the interval by 100 ms"),
    ("retry", &[], "Reload the route after a failure"),
    ("status", &[], "Print the status panel"),
    ("map", &["m"], "Print paths, markers and bounds as JSON"),
    ("help", &["?"], "Show this list"),
    ("quit", &["q", "exit"], "Exit"),
];

impl FromStr for CommandAction {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().unwrap_or_default().to_lowercase();

        let action = match word.as_str() {
            "play" | "p" => CommandAction::Play,
            "pause" | "s" => CommandAction::Pause,
            "reset" | "r" => CommandAction::Reset,
            "speed" => {
                let arg = words.next().unwrap_or_default();
                let ms = arg
                    .parse::<u64>()
                    .map_err(|_| CommandError::BadInterval(arg.to_string()))?;
                CommandAction::Speed(ms)
            }
            "faster" | "+" => CommandAction::SpeedUp,
            "slower" | "-" => CommandAction::SpeedDown,
            "retry" => CommandAction::Retry,
            "status" | "" => CommandAction::Status,
            "map" | "m" => CommandAction::Map,
            "help" | "?" => CommandAction::Help,
            "quit" | "q" | "exit" => CommandAction::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

/// Interval that results from applying a speed action to `current`
pub fn adjusted_interval(action: CommandAction, current: u64) -> Option<u64> {
    let interval = match action {
        CommandAction::Speed(ms) => ms,
        CommandAction::SpeedUp => current.saturating_sub(INTERVAL_STEP_MS),
        CommandAction::SpeedDown => current + INTERVAL_STEP_MS,
        _ => return None,
    };
    Some(clamp_interval(interval))
}

pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(name, aliases, description)| {
            if aliases.is_empty() {
                format!("  {:<12} {}", name, description)
            } else {
                format!("  {:<12} {} (also: {})", name, description, aliases.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words_and_aliases() {
        assert_eq!("play".parse::<CommandAction>(), Ok(CommandAction::Play));
        assert_eq!(" P ".parse::<CommandAction>(), Ok(CommandAction::Play));
        assert_eq!("pause".parse::<CommandAction>(), Ok(CommandAction::Pause));
        assert_eq!("r".parse::<CommandAction>(), Ok(CommandAction::Reset));
        assert_eq!("exit".parse::<CommandAction>(), Ok(CommandAction::Quit));
        assert_eq!("".parse::<CommandAction>(), Ok(CommandAction::Status));
        assert_eq!("map".parse::<CommandAction>(), Ok(CommandAction::Map));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!("speed 1500".parse::<CommandAction>(), Ok(CommandAction::Speed(1500)));
        assert_eq!(
            "speed fast".parse::<CommandAction>(),
            Err(CommandError::BadInterval("fast".to_string()))
        );
        assert!("speed".parse::<CommandAction>().is_err());
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            "rewind".parse::<CommandAction>(),
            Err(CommandError::Unknown("rewind".to_string()))
        );
    }

    #[test]
    fn test_adjusted_interval() {
        assert_eq!(adjusted_interval(CommandAction::SpeedUp, 2000), Some(1900));
        assert_eq!(adjusted_interval(CommandAction::SpeedUp, 500), Some(500));
        assert_eq!(adjusted_interval(CommandAction::SpeedDown, 3000), Some(3000));
        assert_eq!(adjusted_interval(CommandAction::Speed(10), 2000), Some(500));
        assert_eq!(adjusted_interval(CommandAction::Play, 2000), None);
    }

    #[test]
    fn test_repeated_steps_accumulate() {
        let mut interval = 2000;
        for action in [CommandAction::SpeedUp, CommandAction::SpeedUp, CommandAction::SpeedDown] {
            interval = adjusted_interval(action, interval).unwrap();
        }
        assert_eq!(interval, 1900);
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for (name, _, _) in COMMANDS {
            assert!(help.contains(name));
        }
    }
}
