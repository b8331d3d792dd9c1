//! Main page resolution
//!
//! The wiki names its landing page in a reserved system message page.
//! Rendering that page and taking its first line of text gives the title
//! to open at startup.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::WikiApi;
use crate::error::ApiError;
use crate::extract::extract_first_line;
use crate::title::PageTitle;
use crate::Result;

/// System page whose content is the main page title.
pub const MAIN_PAGE_SOURCE: &str = "MediaWiki:Mainpage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPageInfo {
    pub title: PageTitle,
    pub url: Url,
}

/// `<index>?title=<title>`
pub fn page_url(index_url: &Url, title: &str) -> Url {
    let mut url = index_url.clone();
    url.query_pairs_mut().append_pair("title", title);
    url
}

pub struct MainPageResolver<'a, A> {
    api: &'a A,
    index_url: Url,
    source_page: String,
}

impl<'a, A: WikiApi> MainPageResolver<'a, A> {
    pub fn new(api: &'a A, index_url: Url) -> Self {
        Self {
            api,
            index_url,
            source_page: MAIN_PAGE_SOURCE.to_string(),
        }
    }

    /// Read the main page title from another system page.
    pub fn with_source_page(mut self, page: impl Into<String>) -> Self {
        self.source_page = page.into();
        self
    }

    pub async fn resolve(&self) -> Result<MainPageInfo> {
        let html = self
            .api
            .parse_page(&self.source_page)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} has no content", self.source_page)))?;

        let title = extract_first_line(Some(&html))
            .and_then(PageTitle::new)
            .ok_or_else(|| {
                ApiError::NotFound(format!("{} has no readable text", self.source_page))
            })?;

        let url = page_url(&self.index_url, title.as_str());

        tracing::info!(title = %title, url = %url, "Resolved main page");

        Ok(MainPageInfo { title, url })
    }
}
