//! Incremental title search
//!
//! Case-insensitive substring match, recomputed on every query change.
//! A blank query shows nothing rather than everything.

use std::sync::Arc;

use wikiview_api::PageTitle;

use crate::titles::TitleSet;

pub struct SearchFilter {
    titles: Arc<TitleSet>,
    query: String,
}

impl SearchFilter {
    pub fn new(titles: Arc<TitleSet>) -> Self {
        Self {
            titles,
            query: String::new(),
        }
    }

    /// Titles containing `query`, ignoring case, in original order.
    pub fn filter(titles: &TitleSet, query: &str) -> Vec<PageTitle> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        titles
            .folded()
            .filter(|(_, folded)| folded.contains(needle.as_str()))
            .map(|(title, _)| title.clone())
            .collect()
    }

    /// Replace the current query and return the new result list.
    pub fn set_query(&mut self, query: &str) -> Vec<PageTitle> {
        self.query = query.to_string();
        self.results()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> Vec<PageTitle> {
        Self::filter(&self.titles, &self.query)
    }
}
