//! Compiled-in host lists.
//!
//! These are embedded at compile time and never reloaded; the classifier
//! treats them as immutable for the life of the process.

/// Hosts whose resource fetches are dropped. Matched by substring
/// containment on the request host, so subdomain and CDN variants of a
/// tracker name are covered without listing each one.
pub const BLOCK_HOSTS: &[&str] = &[
    // Tag managers / analytics
    "www.googletagmanager.com",
    "www.google-analytics.com",
    // DoubleClick ad serving
    "googleads.g.doubleclick.net",
    "ad.doubleclick.net",
    "static.doubleclick.net",
    "m.doubleclick.net",
    "mediavisor.doubleclick.net",
    // Syndication
    "pagead2.googlesyndication.com",
    "tpc.googlesyndication.com",
    "ade.googlesyndication.com",
    // Other ad services
    "www.googleadservices.com",
    "cdn.googletoolservices.com",
    "fundingchoicesmessages.google.com",
];

/// Hosts the embedded view may navigate to. Matched on a label boundary
/// (exact host or `.{suffix}`), so a lookalike such as `evilyoutube.com`
/// never qualifies.
pub const VIEW_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "m.youtube.com",
    "www.youtube.com",
    "music.youtube.com",
];

/// Sign-in flows bounce through Google's auth hosts; those stay in-view
/// so the login round trip completes inside the app.
pub const AUTH_HOST_PREFIXES: &[&str] = &["accounts.google.", "gds.google."];

/// Suffix rule for the auth provider's main domain.
pub const AUTH_HOST_SUFFIXES: &[&str] = &[".google.com"];
