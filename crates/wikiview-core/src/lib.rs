//! WikiView Core
//!
//! Central coordination layer. The rendering surface and the UI shell are
//! collaborators: they report events here and are told what to show.

mod config;
mod controller;
mod error;
mod surface;

pub use config::{Config, FetchConfig};
pub use controller::{Collaborators, NavigationController};
pub use error::CoreError;
pub use surface::{ExternalPrompt, LinkOpener, PromptChoice, RenderSurface, ShellMessage, UiShell};

// Re-export core components
pub use wikiview_api::{
    ApiClient, ApiError, ApiErrorKind, ListingStop, MainPageInfo, PageTitle, TitleListing, WikiApi,
};
pub use wikiview_navigation::{
    normalize_url, Command, CommandType, DisplayHint, HostMatching, Interception,
    NavigationError, ShellInput, UrlClass, UrlPolicy,
};
pub use wikiview_session::{PageView, SearchFilter, Session, SessionError, TitleSet};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
