//! WikiView API layer
//!
//! Talks to a MediaWiki-compatible `api.php`:
//! - `list=allpages` enumeration with continuation tokens
//! - `action=parse` to read the page that names the wiki's main page
//!
//! Every network-facing type goes through the [`WikiApi`] trait so the
//! listing loop and the main page resolver can run against a scripted fake.

mod client;
mod error;
mod extract;
mod listing;
mod main_page;
mod title;

pub use client::{script_url, ApiClient, ClientSettings, ListPage, ListRequest, WikiApi};
pub use error::{ApiError, ApiErrorKind};
pub use extract::extract_first_line;
pub use listing::{FetchBudget, ListingStop, PageListFetcher, TitleListing};
pub use main_page::{page_url, MainPageInfo, MainPageResolver, MAIN_PAGE_SOURCE};
pub use title::PageTitle;

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
pub(crate) mod testing;
