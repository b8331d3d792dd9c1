//! Command system for the headless shell
//!
//! - `@open <title>`: open a wiki page by title
//! - `@go <url>`: navigate to a URL (subject to interception)
//! - `@back`, `@reload`, `@home`, `@quit`

use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandType {
    /// Open a page from the title list
    Open,
    /// Navigate to an arbitrary URL
    Go,
    /// Step back in the rendering surface's history
    Back,
    Reload,
    /// Return to the resolved main page
    Home,
    Quit,
}

impl CommandType {
    fn takes_argument(self) -> bool {
        matches!(self, CommandType::Open | CommandType::Go)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub command_type: CommandType,
    /// Title or URL after the command word
    pub argument: Option<String>,
}

impl Command {
    /// Parse a command string (must start with @)
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let without_prefix = input
            .strip_prefix('@')
            .ok_or_else(|| NavigationError::UnknownCommand(input.to_string()))?;

        let mut parts = without_prefix.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let command_type = match command.as_str() {
            "open" | "o" => CommandType::Open,
            "go" | "g" => CommandType::Go,
            "back" | "b" => CommandType::Back,
            "reload" | "r" => CommandType::Reload,
            "home" => CommandType::Home,
            "quit" | "q" | "exit" => CommandType::Quit,
            _ => return Err(NavigationError::UnknownCommand(command)),
        };

        if command_type.takes_argument() && argument.is_none() {
            return Err(NavigationError::MissingArgument(command));
        }

        Ok(Self {
            command_type,
            argument,
        })
    }

    /// Get the command prefix for display
    pub fn prefix(&self) -> &'static str {
        match self.command_type {
            CommandType::Open => "@open",
            CommandType::Go => "@go",
            CommandType::Back => "@back",
            CommandType::Reload => "@reload",
            CommandType::Home => "@home",
            CommandType::Quit => "@quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        let cmd = Command::parse("@open Main Page").unwrap();
        assert_eq!(cmd.command_type, CommandType::Open);
        assert_eq!(cmd.argument, Some("Main Page".to_string()));
        assert_eq!(cmd.prefix(), "@open");
    }

    #[test]
    fn test_parse_shortcuts() {
        assert_eq!(Command::parse("@b").unwrap().command_type, CommandType::Back);
        assert_eq!(Command::parse("@R").unwrap().command_type, CommandType::Reload);
        assert_eq!(Command::parse("@q").unwrap().command_type, CommandType::Quit);
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            Command::parse("@open   "),
            Err(NavigationError::MissingArgument("open".to_string()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            Command::parse("@unknown"),
            Err(NavigationError::UnknownCommand(_))
        ));
        assert!(Command::parse("not a command").is_err());
    }
}
