//! HTTP client for the wiki's `api.php`

use reqwest::redirect::Policy;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::error::ApiError;
use crate::title::PageTitle;
use crate::Result;

/// One request of the `list=allpages` enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListRequest<'a> {
    /// Title to start enumerating from (`apfrom`)
    pub from: Option<&'a str>,
    /// Continuation token returned by the previous response (`apcontinue`)
    pub continue_from: Option<&'a str>,
}

/// One page of listing results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub titles: Vec<PageTitle>,
    /// Present while more results remain
    pub continue_token: Option<String>,
}

/// The two remote operations the app needs.
pub trait WikiApi: Send + Sync {
    /// Fetch one page of non-redirect titles.
    fn list_pages(&self, request: ListRequest<'_>) -> impl Future<Output = Result<ListPage>> + Send;

    /// Fetch the rendered HTML of `page`. `Ok(None)` when the API returned no text.
    fn parse_page(&self, page: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub user_agent: String,
    pub request_timeout: Duration,
    /// `aplimit` sent with every listing request
    pub page_limit: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("WikiView/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(15),
            page_limit: 500,
        }
    }
}

/// Build `<base>/<script>`, e.g. `https://wiki.example.org/w/api.php`.
pub fn script_url(base_url: &str, script: &str) -> Result<Url> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(ApiError::InvalidUrl("base URL is empty".to_string()));
    }

    let url = Url::parse(&format!("{}/{}", base, script))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ApiError::InvalidUrl(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
    page_limit: String,
}

impl ApiClient {
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self> {
        let endpoint = script_url(base_url, "api.php")?;

        let http = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            page_limit: settings.page_limit.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Http(resp.status().as_u16()));
        }

        Ok(resp.text().await?)
    }
}

impl WikiApi for ApiClient {
    async fn list_pages(&self, request: ListRequest<'_>) -> Result<ListPage> {
        let body = self.get(&list_params(&request, &self.page_limit)).await?;
        decode_list_page(&body)
    }

    async fn parse_page(&self, page: &str) -> Result<Option<String>> {
        let body = self.get(&parse_params(page)).await?;
        decode_parse_text(&body)
    }
}

/// Query string of one `list=allpages` request. Redirects are excluded.
pub(crate) fn list_params<'a>(
    request: &ListRequest<'a>,
    limit: &'a str,
) -> Vec<(&'a str, &'a str)> {
    let mut params = vec![
        ("action", "query"),
        ("format", "json"),
        ("list", "allpages"),
        ("aplimit", limit),
        ("apfilterredir", "nonredirects"),
    ];
    if let Some(from) = request.from {
        params.push(("apfrom", from));
    }
    if let Some(token) = request.continue_from {
        params.push(("apcontinue", token));
    }
    params
}

pub(crate) fn parse_params(page: &str) -> [(&str, &str); 5] {
    [
        ("action", "parse"),
        ("format", "json"),
        ("prop", "text"),
        ("page", page),
        ("formatversion", "2"),
    ]
}

// === Wire format ===

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    #[serde(default)]
    info: String,
}

impl WireError {
    fn into_api_error(self) -> ApiError {
        match self.code.as_str() {
            "missingtitle" | "nosuchpageid" | "nosuchrevid" => ApiError::NotFound(self.info),
            _ => ApiError::Parse(format!("{}: {}", self.code, self.info)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    error: Option<WireError>,
    query: Option<AllPagesQuery>,
    #[serde(rename = "continue")]
    continuation: Option<Continuation>,
}

#[derive(Debug, Deserialize)]
struct AllPagesQuery {
    allpages: Vec<AllPagesEntry>,
}

#[derive(Debug, Deserialize)]
struct AllPagesEntry {
    title: String,
}

#[derive(Debug, Deserialize)]
struct Continuation {
    apcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParseEnvelope {
    error: Option<WireError>,
    parse: Option<ParseBody>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    text: Option<String>,
}

pub(crate) fn decode_list_page(body: &str) -> Result<ListPage> {
    let envelope: ListEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.error {
        return Err(error.into_api_error());
    }

    let query = envelope
        .query
        .ok_or_else(|| ApiError::Parse("response has no `query` member".to_string()))?;

    let titles = query
        .allpages
        .into_iter()
        .filter_map(|entry| PageTitle::new(entry.title))
        .collect();

    Ok(ListPage {
        titles,
        continue_token: envelope.continuation.and_then(|c| c.apcontinue),
    })
}

pub(crate) fn decode_parse_text(body: &str) -> Result<Option<String>> {
    let envelope: ParseEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.error {
        return Err(error.into_api_error());
    }

    Ok(envelope
        .parse
        .and_then(|p| p.text)
        .filter(|text| !text.trim().is_empty()))
}
