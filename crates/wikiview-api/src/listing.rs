//! Paginated `list=allpages` enumeration
//!
//! Requests are issued one after another, threading the continuation token
//! from each response into the next request, until a response carries no
//! token. The loop is bounded by a [`FetchBudget`] and can be cancelled.
//! Failures never discard what was already accumulated.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::{ListRequest, WikiApi};
use crate::error::ApiError;
use crate::title::PageTitle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchBudget {
    /// Upper bound on listing requests per fetch
    pub max_requests: usize,
    /// Upper bound on wall-clock time for the whole fetch
    pub total_timeout: Option<Duration>,
}

impl Default for FetchBudget {
    fn default() -> Self {
        Self {
            max_requests: 200,
            total_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Why the listing loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStop {
    /// A response arrived without a continuation token
    Complete,
    /// A request failed; titles up to the previous response are kept
    Failed(ApiError),
    /// `max_requests` or `total_timeout` ran out
    BudgetExhausted,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TitleListing {
    /// Every title received, in response order
    pub titles: Vec<PageTitle>,
    /// Number of requests issued
    pub requests: usize,
    pub stop: ListingStop,
}

impl TitleListing {
    pub fn is_complete(&self) -> bool {
        self.stop == ListingStop::Complete
    }
}

pub struct PageListFetcher<'a, A> {
    api: &'a A,
    budget: FetchBudget,
    from: Option<String>,
}

impl<'a, A: WikiApi> PageListFetcher<'a, A> {
    pub fn new(api: &'a A, budget: FetchBudget) -> Self {
        Self {
            api,
            budget,
            from: None,
        }
    }

    /// Start the enumeration at `title` instead of the beginning.
    pub fn starting_from(mut self, title: impl Into<String>) -> Self {
        self.from = Some(title.into());
        self
    }

    pub fn budget(&self) -> FetchBudget {
        self.budget
    }

    /// Accumulate every non-redirect title the API reports.
    pub async fn fetch_all_titles(&self, cancel: &CancellationToken) -> TitleListing {
        let deadline = self.budget.total_timeout.map(|t| Instant::now() + t);
        let mut titles: Vec<PageTitle> = Vec::new();
        let mut requests = 0usize;
        let mut token: Option<String> = None;

        let stop = loop {
            if requests >= self.budget.max_requests {
                break ListingStop::BudgetExhausted;
            }

            let request = ListRequest {
                from: self.from.as_deref(),
                continue_from: token.as_deref(),
            };

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = within_deadline(deadline, self.api.list_pages(request)) => Some(result),
            };
            let Some(outcome) = outcome else {
                break ListingStop::Cancelled;
            };
            requests += 1;
            let Some(result) = outcome else {
                break ListingStop::BudgetExhausted;
            };

            match result {
                Ok(page) => {
                    tracing::debug!(
                        request = requests,
                        batch = page.titles.len(),
                        more = page.continue_token.is_some(),
                        "Received listing page"
                    );
                    titles.extend(page.titles);

                    match page.continue_token {
                        Some(next) => token = Some(next),
                        None => break ListingStop::Complete,
                    }
                }
                Err(e) => break ListingStop::Failed(e),
            }
        };

        match &stop {
            ListingStop::Complete => {
                tracing::info!(titles = titles.len(), requests, "Page listing complete");
            }
            ListingStop::Failed(e) => {
                tracing::warn!(
                    titles = titles.len(),
                    requests,
                    error = %e,
                    "Page listing aborted, keeping partial results"
                );
            }
            ListingStop::BudgetExhausted => {
                tracing::warn!(
                    titles = titles.len(),
                    requests,
                    "Page listing budget exhausted, keeping partial results"
                );
            }
            ListingStop::Cancelled => {
                tracing::debug!(titles = titles.len(), requests, "Page listing cancelled");
            }
        }

        TitleListing {
            titles,
            requests,
            stop,
        }
    }
}

async fn within_deadline<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}
