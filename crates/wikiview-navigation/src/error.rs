//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command @{0} needs an argument")]
    MissingArgument(String),
}
