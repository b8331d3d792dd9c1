//! Ordered title set

use wikiview_api::PageTitle;

/// All page titles fetched for a session, in API order. Immutable.
#[derive(Debug, Clone, Default)]
pub struct TitleSet {
    titles: Vec<PageTitle>,
    /// Lowercase form of each title, same index
    folded: Vec<String>,
}

impl TitleSet {
    pub fn new(titles: Vec<PageTitle>) -> Self {
        let folded = titles.iter().map(|t| t.as_str().to_lowercase()).collect();
        Self { titles, folded }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageTitle> {
        self.titles.iter()
    }

    pub fn as_slice(&self) -> &[PageTitle] {
        &self.titles
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t.as_str() == title)
    }

    pub(crate) fn folded(&self) -> impl Iterator<Item = (&PageTitle, &str)> {
        self.titles
            .iter()
            .zip(self.folded.iter().map(String::as_str))
    }
}

impl From<Vec<PageTitle>> for TitleSet {
    fn from(titles: Vec<PageTitle>) -> Self {
        Self::new(titles)
    }
}

impl FromIterator<PageTitle> for TitleSet {
    fn from_iter<I: IntoIterator<Item = PageTitle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
