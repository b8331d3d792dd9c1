//! Scripted in-memory `WikiApi` for tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{ListPage, ListRequest, WikiApi};
use crate::error::ApiError;
use crate::title::PageTitle;
use crate::Result;

#[derive(Default)]
pub struct ScriptedApi {
    pages: Mutex<VecDeque<Result<ListPage>>>,
    parse: Mutex<Option<Result<Option<String>>>>,
    /// `apcontinue` value of every listing request, in order
    pub seen_tokens: Mutex<Vec<Option<String>>>,
    pub seen_from: Mutex<Vec<Option<String>>>,
    pub parsed_pages: Mutex<Vec<String>>,
    /// Delay before each listing response
    latency: Option<Duration>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, titles: &[&str], token: Option<&str>) -> Self {
        self.pages.lock().unwrap().push_back(Ok(ListPage {
            titles: titles.iter().filter_map(|t| PageTitle::new(*t)).collect(),
            continue_token: token.map(str::to_string),
        }));
        self
    }

    pub fn failure(self, error: ApiError) -> Self {
        self.pages.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn parse_result(self, result: Result<Option<String>>) -> Self {
        *self.parse.lock().unwrap() = Some(result);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn request_count(&self) -> usize {
        self.seen_tokens.lock().unwrap().len()
    }
}

impl WikiApi for ScriptedApi {
    async fn list_pages(&self, request: ListRequest<'_>) -> Result<ListPage> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(request.continue_from.map(str::to_string));
        self.seen_from
            .lock()
            .unwrap()
            .push(request.from.map(str::to_string));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("script exhausted".to_string())))
    }

    async fn parse_page(&self, page: &str) -> Result<Option<String>> {
        self.parsed_pages.lock().unwrap().push(page.to_string());
        self.parse
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Network("no parse result scripted".to_string())))
    }
}
