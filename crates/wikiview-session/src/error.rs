//! Session error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has ended")]
    Ended,

    #[error("Title list was already loaded for this session")]
    TitlesAlreadyLoaded,
}
