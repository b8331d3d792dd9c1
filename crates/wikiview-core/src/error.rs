//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("API error: {0}")]
    Api(#[from] wikiview_api::ApiError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] wikiview_navigation::NavigationError),

    #[error("Session error: {0}")]
    Session(#[from] wikiview_session::SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
