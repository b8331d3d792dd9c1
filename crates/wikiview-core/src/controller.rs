//! Navigation controller
//!
//! Owns the session and wires the collaborators together:
//! - startup: main page resolution and title listing, concurrently
//! - search box → `SearchFilter`
//! - every navigation → `UrlPolicy` before the surface loads it

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

use wikiview_api::{
    page_url, ApiClient, ListingStop, MainPageResolver, PageListFetcher, PageTitle, WikiApi,
};
use wikiview_navigation::{normalize_url, Interception, UrlPolicy};
use wikiview_session::{SearchFilter, Session, TitleSet};

use crate::config::Config;
use crate::surface::{ExternalPrompt, LinkOpener, PromptChoice, RenderSurface, ShellMessage, UiShell};
use crate::Result;

/// Everything outside the core the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub surface: Arc<dyn RenderSurface>,
    pub shell: Arc<dyn UiShell>,
    pub prompt: Arc<dyn ExternalPrompt>,
    pub opener: Arc<dyn LinkOpener>,
}

/// Routes loads through the URL policy. Shared with the startup task.
#[derive(Clone)]
struct Navigator {
    policy: Arc<UrlPolicy>,
    surface: Arc<dyn RenderSurface>,
    prompt: Arc<dyn ExternalPrompt>,
    opener: Arc<dyn LinkOpener>,
}

impl Navigator {
    /// Load `url` on the surface, rewriting or confirming it first.
    /// Returns whether the surface was navigated.
    fn load(&self, url: &str) -> bool {
        match self.policy.intercept(url) {
            Interception::Allow => {
                self.surface.load_url(url);
                true
            }
            Interception::Replace(rewritten) => {
                self.surface.load_url(&rewritten);
                true
            }
            Interception::External(external) => {
                self.leave_app(&external);
                false
            }
        }
    }

    /// Hook run before the surface follows a link.
    /// `true` means the core took over and the surface must not proceed.
    fn intercept(&self, url: &str) -> bool {
        match self.policy.intercept(url) {
            Interception::Allow => false,
            Interception::Replace(rewritten) => {
                tracing::debug!(from = %url, to = %rewritten, "Rewrote internal navigation");
                self.surface.load_url(&rewritten);
                true
            }
            Interception::External(external) => {
                self.leave_app(&external);
                true
            }
        }
    }

    fn leave_app(&self, url: &str) {
        match self.prompt.confirm_external(url) {
            PromptChoice::OpenExternally => {
                tracing::info!(url = %url, "Opening external link");
                if let Err(e) = self.opener.open(url) {
                    tracing::warn!(url = %url, error = %e, "Failed to open external link");
                }
            }
            PromptChoice::Cancel => {
                tracing::debug!(url = %url, "External navigation cancelled");
            }
        }
    }
}

pub struct NavigationController<A> {
    config: Config,
    api: Arc<A>,
    index_url: Url,
    session: Session,
    search: Arc<Mutex<Option<SearchFilter>>>,
    navigator: Navigator,
    shell: Arc<dyn UiShell>,
}

impl NavigationController<ApiClient> {
    /// Controller backed by the real HTTP client.
    pub fn connect(config: Config, collaborators: Collaborators) -> Result<Self> {
        let api = ApiClient::new(&config.base_url, &config.client_settings())?;
        Self::new(config, api, collaborators)
    }
}

impl<A: WikiApi + 'static> NavigationController<A> {
    pub fn new(config: Config, api: A, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let index_url = config.index_url()?;
        let navigator = Navigator {
            policy: Arc::new(config.url_policy()),
            surface: collaborators.surface,
            prompt: collaborators.prompt,
            opener: collaborators.opener,
        };

        Ok(Self {
            config,
            api: Arc::new(api),
            index_url,
            session: Session::new(),
            search: Arc::new(Mutex::new(None)),
            navigator,
            shell: collaborators.shell,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> &UrlPolicy {
        &self.navigator.policy
    }

    /// Kick off the session's background work.
    ///
    /// The main page is loaded as soon as it resolves, independent of the
    /// title listing. Search opens only after the listing finishes with at
    /// least one title.
    pub fn start(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let search = Arc::clone(&self.search);
        let navigator = self.navigator.clone();
        let shell = Arc::clone(&self.shell);
        let index_url = self.index_url.clone();
        let source_page = self.config.main_page_source.clone();
        let budget = self.config.fetch_budget();

        self.shell.set_search_enabled(false);

        tokio::spawn(async move {
            let cancel = session.cancellation();

            let main_page = async {
                let resolver =
                    MainPageResolver::new(&*api, index_url).with_source_page(source_page);
                let resolved = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    resolved = resolver.resolve() => resolved,
                };

                match resolved {
                    Ok(info) => {
                        session.set_main_page(Some(info.clone()));
                        if !session.is_ended() {
                            navigator.load(info.url.as_str());
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            session_id = %session.id(),
                            kind = ?e.kind(),
                            error = %e,
                            "Main page unavailable, leaving surface as is"
                        );
                    }
                }
            };

            let titles = async {
                let listing = PageListFetcher::new(&*api, budget)
                    .fetch_all_titles(&cancel)
                    .await;
                if listing.stop == ListingStop::Cancelled {
                    return;
                }

                let titles = match session.install_titles(TitleSet::new(listing.titles)) {
                    Ok(titles) => titles,
                    Err(e) => {
                        tracing::debug!(session_id = %session.id(), error = %e, "Dropped title set");
                        return;
                    }
                };

                // Held while enabling so `shutdown` cannot interleave.
                let mut filter = search.lock();
                if cancel.is_cancelled() {
                    return;
                }
                if titles.is_empty() {
                    shell.show_message(ShellMessage::NoPagesFound);
                    return;
                }

                *filter = Some(SearchFilter::new(titles));
                shell.set_search_enabled(true);
            };

            tokio::join!(main_page, titles);
        })
    }

    /// Search box changed. Returns (and shows) the matching titles.
    pub fn on_query_changed(&self, query: &str) -> Vec<PageTitle> {
        let results = match self.search.lock().as_mut() {
            Some(filter) => filter.set_query(query),
            None => Vec::new(),
        };

        self.shell.show_titles(&results);
        results
    }

    /// A title was picked from the result list.
    pub fn on_title_selected(&self, title: &str) -> bool {
        let Some(title) = PageTitle::new(title) else {
            tracing::warn!("Selected title is blank");
            self.shell.show_message(ShellMessage::FailedToFetchContent);
            return false;
        };

        let url = page_url(&self.index_url, title.as_str());
        tracing::debug!(title = %title, url = %url, "Opening selected title");
        self.navigator.load(url.as_str())
    }

    /// Navigate to user-typed input such as `wiki.example.org/wiki/Home`.
    pub fn open_url(&self, input: &str) -> Result<bool> {
        let url = normalize_url(input)?;
        Ok(self.navigator.load(&url))
    }

    /// Hook for the rendering surface, run before each navigation.
    /// Returns `true` when the core replaced or blocked it.
    pub fn intercept_navigation(&self, url: &str) -> bool {
        self.navigator.intercept(url)
    }

    pub fn on_page_started(&self, url: &str) {
        self.session.page_started(url);

        if let Some(hint) = self.navigator.policy.display_hint(url) {
            self.navigator.surface.apply_display_hint(hint);
        }
    }

    pub fn on_page_finished(&self, url: &str, title: &str) {
        self.session.page_finished(url, title);

        if !title.trim().is_empty() {
            self.shell.set_page_title(title);
        }
    }

    /// Step back if the surface has history. `false` lets the shell exit.
    pub fn go_back(&self) -> bool {
        if self.navigator.surface.can_go_back() {
            self.navigator.surface.go_back();
            true
        } else {
            false
        }
    }

    /// Reload the current page. The title list is not fetched again.
    pub fn reload(&self) {
        self.navigator.surface.reload();
    }

    /// Return to the resolved main page, if there is one.
    pub fn go_home(&self) -> bool {
        match self.session.main_page() {
            Some(info) => self.navigator.load(info.url.as_str()),
            None => false,
        }
    }

    /// End the session: cancel in-flight fetches and drop the title set.
    pub fn shutdown(&self) {
        self.session.end();

        let mut filter = self.search.lock();
        *filter = None;
        self.shell.set_search_enabled(false);
    }
}

impl<A> Drop for NavigationController<A> {
    fn drop(&mut self) {
        self.session.end();
    }
}
