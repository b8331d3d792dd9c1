//! Collaborator interfaces
//!
//! The rendering surface, the UI shell, the external-link prompt and the
//! system link opener live outside the core. Each is handed to the
//! controller at construction and called synchronously, at most once per
//! event.

use wikiview_api::PageTitle;
use wikiview_navigation::DisplayHint;

use crate::Result;

/// Embedded web content view.
pub trait RenderSurface: Send + Sync {
    fn load_url(&self, url: &str);

    fn can_go_back(&self) -> bool;

    fn go_back(&self);

    fn reload(&self);

    /// Zoom/viewport adjustment for the page about to render.
    fn apply_display_hint(&self, hint: DisplayHint);
}

/// Static messages the shell shows instead of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMessage {
    NoPagesFound,
    FailedToFetchContent,
}

impl ShellMessage {
    pub fn text(self) -> &'static str {
        match self {
            ShellMessage::NoPagesFound => "No pages found",
            ShellMessage::FailedToFetchContent => "Failed to fetch content",
        }
    }
}

/// Search box, result list and chrome around the rendering surface.
pub trait UiShell: Send + Sync {
    fn show_titles(&self, titles: &[PageTitle]);

    fn show_message(&self, message: ShellMessage);

    fn set_search_enabled(&self, enabled: bool);

    fn set_page_title(&self, title: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    OpenExternally,
    Cancel,
}

/// Asks the user before leaving the wiki.
pub trait ExternalPrompt: Send + Sync {
    fn confirm_external(&self, url: &str) -> PromptChoice;
}

/// Hands a URL to the system (default browser, app chooser).
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}
