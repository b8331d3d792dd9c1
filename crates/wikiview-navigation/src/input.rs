//! Input resolution for the headless shell
//!
//! 1. `@command` → command mode
//! 2. Anything else → live search query

use url::Url;

use crate::command::Command;
use crate::error::NavigationError;
use crate::Result;

/// Result of resolving one line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    /// Filter the title list (may be blank, which clears the results)
    Query(String),
    Command(Command),
}

impl ShellInput {
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        if trimmed.starts_with('@') {
            return Command::parse(trimmed).map(ShellInput::Command);
        }

        Ok(ShellInput::Query(trimmed.to_string()))
    }
}

/// Turn user-typed navigation input into an absolute http(s) URL.
///
/// Bare hosts such as `wiki.example.org/wiki/Home` get an `https://` scheme.
pub fn normalize_url(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() || input.contains(char::is_whitespace) {
        return Err(NavigationError::InvalidUrl(input.to_string()));
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return Url::parse(input)
            .map(|url| url.to_string())
            .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", input, e)));
    }

    if looks_like_host(input) {
        let with_https = format!("https://{}", input);
        if let Ok(url) = Url::parse(&with_https) {
            return Ok(url.to_string());
        }
    }

    Err(NavigationError::InvalidUrl(input.to_string()))
}

fn looks_like_host(input: &str) -> bool {
    let host = input
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();

    if host == "localhost" {
        return true;
    }

    let Some((_, tld)) = host.rsplit_once('.') else {
        return false;
    };

    // Basic TLD validation (2-6 chars)
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;

    #[test]
    fn test_parse_query() {
        assert_eq!(
            ShellInput::parse("  apple pie \n").unwrap(),
            ShellInput::Query("apple pie".to_string())
        );
        assert_eq!(ShellInput::parse("").unwrap(), ShellInput::Query(String::new()));
    }

    #[test]
    fn test_parse_command() {
        match ShellInput::parse("@go wiki.example.org").unwrap() {
            ShellInput::Command(cmd) => assert_eq!(cmd.command_type, CommandType::Go),
            other => panic!("Expected Command, got {:?}", other),
        }
        assert!(ShellInput::parse("@nope").is_err());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://wiki.example.org/wiki/Home").unwrap(),
            "https://wiki.example.org/wiki/Home"
        );
        assert_eq!(
            normalize_url("wiki.example.org/wiki/Home").unwrap(),
            "https://wiki.example.org/wiki/Home"
        );
        assert_eq!(
            normalize_url("localhost:8080").unwrap(),
            "https://localhost:8080/"
        );
        assert!(normalize_url("two words").is_err());
        assert!(normalize_url("nodots").is_err());
    }
}
