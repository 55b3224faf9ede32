//! MyTube shell UI.
//!
//! Embeds the system WebView (tao + wry), injects the bundled ad-hiding
//! script at page-start and page-finish, routes navigations through the
//! injected request policy, and gates the first page load on the update
//! check's decision.

mod inject;
mod pages;
mod shell;

pub use inject::PageScript;
pub use shell::{run_shell, ShellConfig};
