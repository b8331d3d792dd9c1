//! URL classification and skin rewriting
//!
//! Internal URLs (the wiki's own host family) stay in-app and must carry
//! `useskin=<skin>&safemode=1` before they are loaded. External URLs need
//! user confirmation. Hosts serving static assets get a display hint.

use serde::{Deserialize, Serialize};
use url::Url;

pub const SKIN_PARAM: &str = "useskin";
pub const SAFE_MODE_PARAM: &str = "safemode";
const SAFE_MODE_VALUE: &str = "1";

/// Initial zoom, in percent, for pages served from static asset hosts.
pub const STATIC_ASSET_INITIAL_SCALE: u32 = 50;

/// How configured hosts are compared with a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostMatching {
    /// Parse the URL and compare its host: equal, or a dot-separated suffix
    #[default]
    Strict,
    /// Plain substring containment anywhere in the URL
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlClass {
    Internal,
    External,
}

/// What to do with a navigation the rendering surface is about to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Internal and already tagged: let it through untouched
    Allow,
    /// Internal but untagged: load this URL instead
    Replace(String),
    /// Leaves the wiki: ask before opening externally
    External(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHint {
    pub initial_scale_percent: u32,
    pub wide_viewport: bool,
    pub overview_mode: bool,
}

impl DisplayHint {
    pub fn static_asset() -> Self {
        Self {
            initial_scale_percent: STATIC_ASSET_INITIAL_SCALE,
            wide_viewport: true,
            overview_mode: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlPolicy {
    primary_host: String,
    internal_suffixes: Vec<String>,
    static_suffixes: Vec<String>,
    skin: String,
    matching: HostMatching,
}

impl UrlPolicy {
    pub fn new(primary_host: impl Into<String>, skin: impl Into<String>) -> Self {
        Self {
            primary_host: normalize_host(&primary_host.into()),
            internal_suffixes: Vec::new(),
            static_suffixes: Vec::new(),
            skin: skin.into(),
            matching: HostMatching::default(),
        }
    }

    pub fn with_internal_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.internal_suffixes = collect_hosts(suffixes);
        self
    }

    pub fn with_static_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.static_suffixes = collect_hosts(suffixes);
        self
    }

    pub fn with_matching(mut self, matching: HostMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn skin(&self) -> &str {
        &self.skin
    }

    pub fn matching(&self) -> HostMatching {
        self.matching
    }

    /// Internal iff the URL belongs to the primary host or an internal suffix.
    pub fn classify(&self, url: &str) -> UrlClass {
        let internal = match self.matching {
            HostMatching::Substring => {
                (!self.primary_host.is_empty() && url.contains(&self.primary_host))
                    || self.internal_suffixes.iter().any(|s| url.contains(s.as_str()))
            }
            HostMatching::Strict => match host_of(url) {
                Some(host) => {
                    host_matches(&host, &self.primary_host)
                        || self
                            .internal_suffixes
                            .iter()
                            .any(|s| host_matches(&host, s))
                }
                None => false,
            },
        };

        if internal {
            UrlClass::Internal
        } else {
            UrlClass::External
        }
    }

    /// Whether `url` already carries `useskin=<skin>`.
    ///
    /// The query value is compared decoded, so skins that need escaping
    /// match what [`rewrite_for_skin`](Self::rewrite_for_skin) wrote.
    pub fn is_tagged(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed
                .query_pairs()
                .any(|(key, value)| key == SKIN_PARAM && value == self.skin.as_str()),
            Err(_) => url.contains(&format!("{}={}", SKIN_PARAM, self.skin)),
        }
    }

    /// Append the skin and safe-mode parameters unless the URL is already tagged.
    pub fn rewrite_for_skin(&self, url: &str) -> String {
        if self.is_tagged(url) {
            return url.to_string();
        }

        match Url::parse(url) {
            Ok(mut parsed) => {
                let has_stale_params = parsed
                    .query_pairs()
                    .any(|(key, _)| key == SKIN_PARAM || key == SAFE_MODE_PARAM);

                if has_stale_params {
                    let kept: Vec<(String, String)> = parsed
                        .query_pairs()
                        .filter(|(key, _)| key != SKIN_PARAM && key != SAFE_MODE_PARAM)
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect();
                    parsed.set_query(None);
                    parsed.query_pairs_mut().extend_pairs(kept);
                }

                parsed
                    .query_pairs_mut()
                    .append_pair(SKIN_PARAM, &self.skin)
                    .append_pair(SAFE_MODE_PARAM, SAFE_MODE_VALUE);
                parsed.to_string()
            }
            Err(_) => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!(
                    "{}{}{}={}&{}={}",
                    url, separator, SKIN_PARAM, self.skin, SAFE_MODE_PARAM, SAFE_MODE_VALUE
                )
            }
        }
    }

    /// Decide the fate of a navigation to `url`.
    pub fn intercept(&self, url: &str) -> Interception {
        match self.classify(url) {
            UrlClass::External => Interception::External(url.to_string()),
            UrlClass::Internal if self.is_tagged(url) => Interception::Allow,
            UrlClass::Internal => Interception::Replace(self.rewrite_for_skin(url)),
        }
    }

    /// Rendering hint for pages served from a static asset host.
    pub fn display_hint(&self, url: &str) -> Option<DisplayHint> {
        let host = host_of(url)?;
        let matched = match self.matching {
            HostMatching::Substring => self
                .static_suffixes
                .iter()
                .any(|s| host.contains(s.as_str())),
            HostMatching::Strict => self.static_suffixes.iter().any(|s| host_matches(&host, s)),
        };

        matched.then(DisplayHint::static_asset)
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_start_matches('.').to_lowercase()
}

fn collect_hosts<I, S>(hosts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hosts
        .into_iter()
        .map(|h| normalize_host(h.as_ref()))
        .filter(|h| !h.is_empty())
        .collect()
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}

/// `host` is `pattern` or a subdomain of it.
fn host_matches(host: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    host == pattern
        || host
            .strip_suffix(pattern)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UrlPolicy {
        UrlPolicy::new("wiki.example.org", "minerva")
            .with_internal_suffixes(["example-cdn.org", ".example.net"])
            .with_static_suffixes(["static.example.org", "upload.example-cdn.org"])
    }

    #[test]
    fn test_classify_strict() {
        let policy = policy();

        assert_eq!(
            policy.classify("https://wiki.example.org/w/index.php?title=Home"),
            UrlClass::Internal
        );
        assert_eq!(
            policy.classify("https://upload.example-cdn.org/a.png"),
            UrlClass::Internal
        );
        assert_eq!(policy.classify("https://example.net/"), UrlClass::Internal);
        assert_eq!(policy.classify("https://rust-lang.org/"), UrlClass::External);
        assert_eq!(policy.classify("mailto:someone@example.org"), UrlClass::External);
        assert_eq!(policy.classify("not a url"), UrlClass::External);
    }

    #[test]
    fn test_strict_rejects_host_in_path() {
        let policy = policy();

        assert_eq!(
            policy.classify("https://evil.test/?next=wiki.example.org"),
            UrlClass::External
        );
        assert_eq!(
            policy.classify("https://wiki.example.org.evil.test/"),
            UrlClass::External
        );
        assert_eq!(
            policy.classify("https://notexample-cdn.org/"),
            UrlClass::External
        );
    }

    #[test]
    fn test_classify_substring() {
        let policy = policy().with_matching(HostMatching::Substring);

        assert_eq!(
            policy.classify("https://wiki.example.org/w/index.php"),
            UrlClass::Internal
        );
        // containment anywhere counts in legacy mode
        assert_eq!(
            policy.classify("https://evil.test/?next=wiki.example.org"),
            UrlClass::Internal
        );
        assert_eq!(policy.classify("https://rust-lang.org/"), UrlClass::External);
    }

    #[test]
    fn test_rewrite_for_skin() {
        let policy = policy();

        let rewritten = policy.rewrite_for_skin("https://wiki.example.org/w/index.php?title=Home");
        assert_eq!(
            rewritten,
            "https://wiki.example.org/w/index.php?title=Home&useskin=minerva&safemode=1"
        );

        // second application is a no-op
        assert_eq!(policy.rewrite_for_skin(&rewritten), rewritten);

        assert_eq!(
            policy.rewrite_for_skin("https://wiki.example.org/wiki/Home#History"),
            "https://wiki.example.org/wiki/Home?useskin=minerva&safemode=1#History"
        );
    }

    #[test]
    fn test_rewrite_replaces_other_skin() {
        let policy = policy();

        assert_eq!(
            policy.rewrite_for_skin("https://wiki.example.org/wiki/Home?useskin=vector&oldid=5"),
            "https://wiki.example.org/wiki/Home?oldid=5&useskin=minerva&safemode=1"
        );
    }

    #[test]
    fn test_intercept() {
        let policy = policy();

        assert_eq!(
            policy.intercept("https://wiki.example.org/wiki/Home"),
            Interception::Replace(
                "https://wiki.example.org/wiki/Home?useskin=minerva&safemode=1".to_string()
            )
        );
        assert_eq!(
            policy.intercept("https://wiki.example.org/wiki/Home?useskin=minerva&safemode=1"),
            Interception::Allow
        );
        assert_eq!(
            policy.intercept("https://rust-lang.org/"),
            Interception::External("https://rust-lang.org/".to_string())
        );
    }

    #[test]
    fn test_intercept_settles_for_escaped_skin() {
        let policy = UrlPolicy::new("wiki.example.org", "my skin");

        let rewritten = match policy.intercept("https://wiki.example.org/wiki/Home") {
            Interception::Replace(url) => url,
            other => panic!("Expected Replace, got {:?}", other),
        };
        assert_eq!(
            rewritten,
            "https://wiki.example.org/wiki/Home?useskin=my+skin&safemode=1"
        );

        assert!(policy.is_tagged(&rewritten));
        assert_eq!(policy.intercept(&rewritten), Interception::Allow);
        assert_eq!(policy.rewrite_for_skin(&rewritten), rewritten);
    }

    #[test]
    fn test_tag_must_be_the_skin_param() {
        let policy = policy();

        assert!(!policy.is_tagged("https://wiki.example.org/wiki/Home?xuseskin=minerva"));
        assert!(!policy.is_tagged("https://wiki.example.org/wiki/Home?useskin=minervax"));
        assert!(policy.is_tagged("https://wiki.example.org/wiki/Home?oldid=5&useskin=minerva"));
    }

    #[test]
    fn test_display_hint() {
        let policy = policy();

        let hint = policy
            .display_hint("https://upload.example-cdn.org/images/a/ab/Map.png")
            .unwrap();
        assert_eq!(hint.initial_scale_percent, STATIC_ASSET_INITIAL_SCALE);
        assert!(hint.wide_viewport);
        assert!(hint.overview_mode);

        assert!(policy.display_hint("https://wiki.example.org/wiki/Home").is_none());
    }

    #[test]
    fn test_matching_serde() {
        let mode: HostMatching = serde_json::from_str("\"substring\"").unwrap();
        assert_eq!(mode, HostMatching::Substring);
    }
}
