//! Session data structure

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use wikiview_api::MainPageInfo;

use crate::error::SessionError;
use crate::titles::TitleSet;
use crate::Result;

/// What the rendering surface is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub url: String,
    /// Document title reported by the surface, empty while loading
    pub title: String,
    pub loading: bool,
    pub updated_at: DateTime<Utc>,
}

/// Per-run state shared by the controller and its background task.
///
/// Cloning yields another handle to the same session.
pub struct Session {
    /// Unique identifier
    id: String,
    /// When the session was created
    started_at: DateTime<Utc>,
    /// Set exactly once, when the listing finishes
    titles: Arc<RwLock<Option<Arc<TitleSet>>>>,
    main_page: Arc<RwLock<Option<MainPageInfo>>>,
    current_page: Arc<RwLock<Option<PageView>>>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new() -> Self {
        let session = Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            titles: Arc::new(RwLock::new(None)),
            main_page: Arc::new(RwLock::new(None)),
            current_page: Arc::new(RwLock::new(None)),
            cancel: CancellationToken::new(),
        };

        tracing::info!(session_id = %session.id, "Session started");

        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Token cancelled when the session ends; background work selects on it.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_ended(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // === Titles ===

    /// Publish the fetched title set. Allowed once per session.
    pub fn install_titles(&self, titles: TitleSet) -> Result<Arc<TitleSet>> {
        // `end()` cancels before it clears the slot, so checking under the
        // lock means an install either fails or is cleared afterwards.
        let mut slot = self.titles.write();
        if self.is_ended() {
            return Err(SessionError::Ended);
        }
        if slot.is_some() {
            return Err(SessionError::TitlesAlreadyLoaded);
        }

        let titles = Arc::new(titles);
        *slot = Some(Arc::clone(&titles));

        tracing::info!(
            session_id = %self.id,
            title_count = titles.len(),
            "Installed title set"
        );

        Ok(titles)
    }

    pub fn titles(&self) -> Option<Arc<TitleSet>> {
        self.titles.read().clone()
    }

    /// Search opens once the title fetch has completed.
    pub fn search_enabled(&self) -> bool {
        self.titles.read().is_some()
    }

    // === Pages ===

    pub fn set_main_page(&self, info: Option<MainPageInfo>) {
        *self.main_page.write() = info;
    }

    pub fn main_page(&self) -> Option<MainPageInfo> {
        self.main_page.read().clone()
    }

    pub fn page_started(&self, url: &str) {
        *self.current_page.write() = Some(PageView {
            url: url.to_string(),
            title: String::new(),
            loading: true,
            updated_at: Utc::now(),
        });
    }

    pub fn page_finished(&self, url: &str, title: &str) {
        let mut current = self.current_page.write();
        match current.as_mut() {
            Some(page) if page.url == url => {
                if !title.trim().is_empty() {
                    page.title = title.to_string();
                }
                page.loading = false;
                page.updated_at = Utc::now();
            }
            _ => {
                *current = Some(PageView {
                    url: url.to_string(),
                    title: title.to_string(),
                    loading: false,
                    updated_at: Utc::now(),
                });
            }
        }
    }

    pub fn current_page(&self) -> Option<PageView> {
        self.current_page.read().clone()
    }

    /// Cancel in-flight work and drop everything fetched for this session.
    pub fn end(&self) {
        if self.cancel.is_cancelled() {
            return;
        }

        self.cancel.cancel();
        *self.titles.write() = None;
        *self.main_page.write() = None;
        *self.current_page.write() = None;

        tracing::info!(session_id = %self.id, "Session ended");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            started_at: self.started_at,
            titles: Arc::clone(&self.titles),
            main_page: Arc::clone(&self.main_page),
            current_page: Arc::clone(&self.current_page),
            cancel: self.cancel.clone(),
        }
    }
}
