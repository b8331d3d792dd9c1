//! WikiView Session
//!
//! A session lives from app start to app teardown and owns:
//! - The title set, written once when the listing finishes, read-only after
//! - The resolved main page, if any
//! - The page currently shown by the rendering surface
//! - A cancellation token that stops in-flight fetches when the session ends

mod error;
mod search;
mod session;
mod titles;

pub use error::SessionError;
pub use search::SearchFilter;
pub use session::{PageView, Session};
pub use titles::TitleSet;

pub type Result<T> = std::result::Result<T, SessionError>;
