//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use wikiview_api::{script_url, ClientSettings, FetchBudget, MAIN_PAGE_SOURCE};
use wikiview_navigation::{HostMatching, UrlPolicy};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script path of the wiki, e.g. `https://en.wikipedia.org/w`
    pub base_url: String,
    /// Host treated as the wiki itself; derived from `base_url` when empty
    pub primary_host: String,
    /// Additional host suffixes that stay in-app
    pub internal_host_suffixes: Vec<String>,
    /// Hosts serving images and other static assets
    pub static_host_suffixes: Vec<String>,
    pub host_matching: HostMatching,
    /// Skin requested for every in-app page
    pub skin: String,
    /// System page whose text names the main page
    pub main_page_source: String,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `aplimit` per listing request
    pub page_limit: u32,
    /// Listing requests allowed per session
    pub max_requests: usize,
    /// Wall-clock limit for the whole listing; 0 disables it
    pub total_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("reading {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), base_url = %config.base_url, "Loaded config");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        script_url(&self.base_url, "index.php")?;

        if self.primary_host().is_empty() {
            return Err(CoreError::Config("no primary host configured".to_string()));
        }
        if self.skin.trim().is_empty() {
            return Err(CoreError::Config("skin cannot be empty".to_string()));
        }
        if self.main_page_source.trim().is_empty() {
            return Err(CoreError::Config(
                "main page source cannot be empty".to_string(),
            ));
        }
        if self.fetch.page_limit == 0 {
            return Err(CoreError::Config("fetch.page_limit must be positive".to_string()));
        }
        if self.fetch.max_requests == 0 {
            return Err(CoreError::Config(
                "fetch.max_requests must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn primary_host(&self) -> String {
        if !self.primary_host.trim().is_empty() {
            return self.primary_host.trim().to_lowercase();
        }

        Url::parse(self.base_url.trim())
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default()
    }

    /// `<base>/index.php`, the root of every navigable page URL
    pub fn index_url(&self) -> Result<Url> {
        Ok(script_url(&self.base_url, "index.php")?)
    }

    pub fn url_policy(&self) -> UrlPolicy {
        UrlPolicy::new(self.primary_host(), self.skin.trim())
            .with_internal_suffixes(&self.internal_host_suffixes)
            .with_static_suffixes(&self.static_host_suffixes)
            .with_matching(self.host_matching)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            user_agent: self.fetch.user_agent.clone(),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            page_limit: self.fetch.page_limit,
        }
    }

    pub fn fetch_budget(&self) -> FetchBudget {
        FetchBudget {
            max_requests: self.fetch.max_requests,
            total_timeout: (self.fetch.total_timeout_secs > 0)
                .then(|| Duration::from_secs(self.fetch.total_timeout_secs)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org/w".to_string(),
            primary_host: String::new(),
            internal_host_suffixes: vec!["wikipedia.org".to_string(), "wikimedia.org".to_string()],
            static_host_suffixes: vec!["upload.wikimedia.org".to_string()],
            host_matching: HostMatching::Strict,
            skin: "minerva".to_string(),
            main_page_source: MAIN_PAGE_SOURCE.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let budget = FetchBudget::default();

        Self {
            page_limit: client.page_limit,
            max_requests: budget.max_requests,
            total_timeout_secs: budget.total_timeout.map(|t| t.as_secs()).unwrap_or(0),
            request_timeout_secs: client.request_timeout.as_secs(),
            user_agent: client.user_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiview_navigation::UrlClass;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();

        assert_eq!(config.primary_host(), "en.wikipedia.org");
        assert_eq!(config.fetch.page_limit, 500);
        assert_eq!(
            config.index_url().unwrap().as_str(),
            "https://en.wikipedia.org/w/index.php"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "base_url": "https://wiki.example.org/w", "skin": "vector",
                 "host_matching": "substring", "fetch": { "max_requests": 3 } }"#,
        )
        .unwrap();

        assert_eq!(config.primary_host(), "wiki.example.org");
        assert_eq!(config.skin, "vector");
        assert_eq!(config.host_matching, HostMatching::Substring);
        assert_eq!(config.fetch.max_requests, 3);
        assert_eq!(config.fetch.page_limit, 500);
        assert_eq!(config.fetch_budget().max_requests, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::new("not a url").validate().is_err());

        let mut config = Config::default();
        config.skin = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fetch.max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_policy_from_config() {
        let policy = Config::new("https://wiki.example.org/w").url_policy();

        assert_eq!(
            policy.classify("https://wiki.example.org/wiki/Home"),
            UrlClass::Internal
        );
        assert_eq!(
            policy.classify("https://commons.wikimedia.org/wiki/File:A.png"),
            UrlClass::Internal
        );
        assert_eq!(policy.classify("https://example.com/"), UrlClass::External);
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let mut config = Config::default();
        config.fetch.total_timeout_secs = 0;
        assert!(config.fetch_budget().total_timeout.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("wikiview-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "base_url": "https://wiki.example.org/w" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.base_url, "https://wiki.example.org/w");
        assert!(Config::load(&path).is_err());
    }
}
