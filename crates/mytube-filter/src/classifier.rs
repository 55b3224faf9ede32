//! Host classification.
//!
//! Two screens with deliberately different widths: resource fetches are
//! checked by *substring containment* against the blocklist (broad, catches
//! subdomains and path-embedded tracker names), while top-level navigations
//! are checked by *label-boundary suffix* against the allowlist (narrow,
//! resists host spoofing). Anything that clears the blocklist but misses
//! the allowlist leaves the app through the system link handler.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;
use tracing::debug;
use url::Url;

use crate::hosts;

/// Process-wide classifier over the compiled-in host lists, built once on
/// first use.
pub static HOST_CLASSIFIER: Lazy<HostClassifier> = Lazy::new(HostClassifier::new);

/// Outcome of classifying a single URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Drop the request; the embedding view answers it with an empty
    /// response instead of forwarding it.
    Block,
    /// Load inside the embedded view.
    AllowInternal,
    /// Hand the URL to the platform's default link handler; the embedded
    /// view never navigates there.
    AllowExternal,
}

/// The two decisions the embedding view asks for, injected into the view
/// rather than written inline in its event handlers.
pub trait RequestPolicy: Send + Sync {
    /// Classify a resource fetch (script, image, XHR, subframe).
    fn classify_fetch(&self, url: &str) -> Classification;

    /// Classify a top-level navigation.
    fn classify_navigation(&self, url: &str) -> Classification;
}

/// Substring blocklist automaton plus the navigable-host allowlist.
#[derive(Debug)]
pub struct HostClassifier {
    blocked: AhoCorasick,
    view_hosts: Vec<String>,
}

impl HostClassifier {
    /// Classifier over the compiled-in lists.
    pub fn new() -> Self {
        Self::with_rules(hosts::BLOCK_HOSTS, hosts::VIEW_HOSTS)
    }

    /// Classifier over custom lists.
    pub fn with_rules<B, V>(block_hosts: &[B], view_hosts: &[V]) -> Self
    where
        B: AsRef<[u8]>,
        V: AsRef<str>,
    {
        // One automaton for the whole blocklist; O(host length) per check.
        let blocked = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .ascii_case_insensitive(true)
            .build(block_hosts)
            .expect("failed to build blocklist automaton");

        let view_hosts = view_hosts
            .iter()
            .map(|h| h.as_ref().to_ascii_lowercase())
            .collect();

        Self { blocked, view_hosts }
    }

    fn is_view_host(&self, host: &str) -> bool {
        self.view_hosts
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    fn is_auth_host(host: &str) -> bool {
        hosts::AUTH_HOST_PREFIXES
            .iter()
            .any(|prefix| host.starts_with(prefix))
            || hosts::AUTH_HOST_SUFFIXES
                .iter()
                .any(|suffix| host.ends_with(suffix))
    }
}

impl Default for HostClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestPolicy for HostClassifier {
    fn classify_fetch(&self, url: &str) -> Classification {
        let Some(host) = request_host(url) else {
            // Hostless requests (data URIs, about:blank) fail open.
            return Classification::AllowInternal;
        };

        if self.blocked.is_match(&host) {
            debug!("blocklist hit: {host}");
            return Classification::Block;
        }

        Classification::AllowInternal
    }

    fn classify_navigation(&self, url: &str) -> Classification {
        let Some(host) = request_host(url) else {
            return Classification::AllowInternal;
        };

        if self.is_view_host(&host) || Self::is_auth_host(&host) {
            Classification::AllowInternal
        } else {
            debug!("off-site navigation: {host}");
            Classification::AllowExternal
        }
    }
}

/// Extract the host of a request URL. `Url::parse` lowercases and
/// punycodes hosts of http(s) URLs, which settles host-case normalization
/// in one place instead of per rule.
fn request_host(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_ad_hosts_on_fetch() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_fetch("https://ad.doubleclick.net/ddm/ad.js"),
            Classification::Block
        );
        assert_eq!(
            classifier.classify_fetch("https://pagead2.googlesyndication.com/pagead/js/r.js"),
            Classification::Block
        );
        assert_eq!(
            classifier.classify_fetch("https://www.google-analytics.com/collect"),
            Classification::Block
        );
    }

    #[test]
    fn fetch_blocking_is_substring_containment() {
        let classifier = HostClassifier::new();

        // A tracker name embedded deeper in the host still matches.
        assert_eq!(
            classifier.classify_fetch("https://ad.doubleclick.net.cdn.example/x"),
            Classification::Block
        );
    }

    #[test]
    fn fetch_allows_site_hosts() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_fetch("https://m.youtube.com/watch?v=abc"),
            Classification::AllowInternal
        );
        assert_eq!(
            classifier.classify_fetch("https://i.ytimg.com/vi/abc/hq720.jpg"),
            Classification::AllowInternal
        );
    }

    #[test]
    fn fetch_host_matching_ignores_case() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_fetch("https://AD.DoubleClick.NET/ad.js"),
            Classification::Block
        );
    }

    #[test]
    fn hostless_requests_fail_open() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_fetch("data:text/plain,hello"),
            Classification::AllowInternal
        );
        assert_eq!(
            classifier.classify_navigation("about:blank"),
            Classification::AllowInternal
        );
        assert_eq!(
            classifier.classify_navigation("not a url at all"),
            Classification::AllowInternal
        );
    }

    #[test]
    fn navigation_allows_view_hosts() {
        let classifier = HostClassifier::new();

        for url in [
            "https://m.youtube.com/",
            "https://music.youtube.com/library",
            "https://youtu.be/abc123",
            "https://www.youtube.com/watch?v=abc",
        ] {
            assert_eq!(
                classifier.classify_navigation(url),
                Classification::AllowInternal,
                "{url}"
            );
        }
    }

    #[test]
    fn navigation_allows_subdomains_of_view_hosts() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_navigation("https://accounts.youtube.com/accounts"),
            Classification::AllowInternal
        );
    }

    #[test]
    fn navigation_rejects_suffix_spoofing() {
        let classifier = HostClassifier::new();

        // Plain "ends with" would let this through; the label boundary
        // must not.
        assert_eq!(
            classifier.classify_navigation("https://evilyoutube.com/watch"),
            Classification::AllowExternal
        );
        assert_eq!(
            classifier.classify_navigation("https://notyoutu.be/x"),
            Classification::AllowExternal
        );
    }

    #[test]
    fn navigation_allows_auth_hosts() {
        let classifier = HostClassifier::new();

        for url in [
            "https://accounts.google.com/v3/signin",
            "https://accounts.google.co.uk/signin",
            "https://gds.google.com/web/signin",
            "https://myaccount.google.com/profile",
        ] {
            assert_eq!(
                classifier.classify_navigation(url),
                Classification::AllowInternal,
                "{url}"
            );
        }
    }

    #[test]
    fn navigation_sends_everything_else_external() {
        let classifier = HostClassifier::new();

        assert_eq!(
            classifier.classify_navigation("https://example.com/article"),
            Classification::AllowExternal
        );
        assert_eq!(
            classifier.classify_navigation("https://twitter.com/share?u=x"),
            Classification::AllowExternal
        );
    }

    #[test]
    fn custom_rules_take_effect() {
        let classifier =
            HostClassifier::with_rules(&["tracker.test"], &["site.test"]);

        assert_eq!(
            classifier.classify_fetch("https://cdn.tracker.test/pixel.gif"),
            Classification::Block
        );
        assert_eq!(
            classifier.classify_navigation("https://www.site.test/page"),
            Classification::AllowInternal
        );
        assert_eq!(
            classifier.classify_navigation("https://other.test/"),
            Classification::AllowExternal
        );
    }
}
