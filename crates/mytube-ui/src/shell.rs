//! WebView shell.
//!
//! One tao window, one wry WebView. The view starts on a local splash
//! page while the update check runs on a background thread; the check's
//! decision is marshaled back onto the event-loop thread through the
//! event-loop proxy before any UI state changes — the platform requires
//! all view mutations to happen there.

use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing::{debug, info, warn};
use wry::{PageLoadEvent, WebViewBuilder};

use mytube_filter::{Classification, RequestPolicy};
use mytube_update::{GateDecision, GateState, StateStore, UpdateGate, VersionEndpoint};

use crate::inject::PageScript;
use crate::pages;

/// Mobile user agent without the embedded-view marker, so the site serves
/// the plain mobile experience instead of pushing the native app.
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";

/// Everything the shell needs at launch; all values are compiled-in
/// constants owned by the binary crate.
pub struct ShellConfig {
    pub start_url: String,
    pub endpoint: VersionEndpoint,
    pub gate: UpdateGate,
}

/// Events marshaled onto the event-loop thread.
#[derive(Debug)]
enum ShellEvent {
    GateDecided(GateDecision),
    PageFinished,
}

/// Session state, owned by the event loop.
struct ShellState {
    gate: GateState,
    current_url: String,
    blocked_requests: usize,
    /// Deferral banner waiting for the next page-finish.
    pending_banner: Option<String>,
}

impl ShellState {
    fn new(start_url: &str) -> Self {
        Self {
            gate: GateState::NoUpdateSeen,
            current_url: start_url.to_owned(),
            blocked_requests: 0,
            pending_banner: None,
        }
    }
}

/// What the view should do with a request, composed from the two policy
/// checks: the blocklist screens every request, the allowlist then routes
/// surviving navigations in-view or out to the system handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    LoadInView,
    Drop,
    OpenExternally,
}

fn route(policy: &dyn RequestPolicy, url: &str) -> Route {
    match policy.classify_fetch(url) {
        Classification::Block => Route::Drop,
        _ => match policy.classify_navigation(url) {
            Classification::AllowInternal => Route::LoadInView,
            Classification::AllowExternal => Route::OpenExternally,
            Classification::Block => Route::Drop,
        },
    }
}

/// Run the shell until the window closes.
pub fn run_shell(config: ShellConfig, policy: &'static dyn RequestPolicy) -> Result<()> {
    let ShellConfig {
        start_url,
        endpoint,
        gate,
    } = config;

    let script = PageScript::load();
    let state = Arc::new(Mutex::new(ShellState::new(&start_url)));

    let event_loop = EventLoopBuilder::<ShellEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title("MyTube")
        .with_inner_size(tao::dpi::LogicalSize::new(420.0, 820.0))
        .with_min_inner_size(tao::dpi::LogicalSize::new(320.0, 480.0))
        .build(&event_loop)?;

    // One check per launch, off the event-loop thread. The decision comes
    // back as a user event.
    {
        let proxy = proxy.clone();
        thread::Builder::new()
            .name("update-check".into())
            .spawn(move || {
                let store = StateStore::at_default_location();
                let decision = mytube_update::run_check(&endpoint, &gate, &store);
                let _ = proxy.send_event(ShellEvent::GateDecided(decision));
            })
            .context("failed to spawn update-check thread")?;
    }

    let nav_state = Arc::clone(&state);
    let load_proxy = proxy.clone();

    let mut builder = WebViewBuilder::new()
        .with_html(pages::SPLASH_HTML)
        .with_user_agent(MOBILE_USER_AGENT)
        .with_hotkeys_zoom(true)
        .with_navigation_handler(move |url| match route(policy, &url) {
            Route::LoadInView => {
                if let Ok(mut s) = nav_state.try_lock() {
                    s.current_url = url;
                }
                true
            }
            Route::Drop => {
                if let Ok(mut s) = nav_state.try_lock() {
                    s.blocked_requests += 1;
                    info!("blocked request #{}: {url}", s.blocked_requests);
                }
                false
            }
            Route::OpenExternally => {
                debug!("handing off to system browser: {url}");
                if let Err(err) = open::that(&url) {
                    warn!("failed to open external link: {err}");
                }
                false
            }
        })
        .with_on_page_load_handler(move |event, _url| {
            if let PageLoadEvent::Finished = event {
                let _ = load_proxy.send_event(ShellEvent::PageFinished);
            }
        })
        .with_devtools(cfg!(debug_assertions));

    if !script.is_empty() {
        // Page-start injection; page-finish re-injection happens below.
        builder = builder.with_initialization_script(script.as_str());
    }

    #[cfg(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    ))]
    let webview = builder.build(&window)?;

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    )))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().context("window has no default vbox")?;
        builder.build_gtk(vbox)?
    };

    info!("shell ready, waiting for the update gate");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Ok(s) = state.lock() {
                    info!(
                        "closing at {} ({:?}); blocked {} requests this session",
                        s.current_url, s.gate, s.blocked_requests
                    );
                }
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(ShellEvent::GateDecided(decision)) => {
                if let Ok(mut s) = state.lock() {
                    s.gate = decision.state();
                }
                match decision {
                    GateDecision::Proceed => {
                        if let Err(err) = webview.load_url(&start_url) {
                            warn!("failed to load start page: {err}");
                        }
                    }
                    GateDecision::Prompt {
                        days_remaining,
                        descriptor,
                    } => {
                        info!(
                            "update {} available, {days_remaining} day(s) of grace left",
                            descriptor.version_name
                        );
                        if let Ok(mut s) = state.lock() {
                            s.pending_banner =
                                Some(pages::deferral_banner_script(days_remaining, &descriptor));
                        }
                        if let Err(err) = webview.load_url(&start_url) {
                            warn!("failed to load start page: {err}");
                        }
                    }
                    GateDecision::Block { descriptor } => {
                        info!("blocking on update {}", descriptor.version_name);
                        if let Err(err) = webview.load_html(&pages::update_required_html(&descriptor)) {
                            warn!("failed to load update page: {err}");
                        }
                    }
                }
            }
            Event::UserEvent(ShellEvent::PageFinished) => {
                if !script.is_empty() {
                    if let Err(err) = webview.evaluate_script(script.as_str()) {
                        warn!("page-finish script injection failed: {err}");
                    }
                }
                let banner = state.lock().ok().and_then(|mut s| s.pending_banner.take());
                if let Some(banner) = banner {
                    if let Err(err) = webview.evaluate_script(&banner) {
                        warn!("deferral banner injection failed: {err}");
                    }
                }
            }
            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mytube_filter::HostClassifier;

    #[test]
    fn routes_compose_both_policy_checks() {
        let classifier = HostClassifier::new();

        assert_eq!(
            route(&classifier, "https://ad.doubleclick.net/ddm/ad.js"),
            Route::Drop
        );
        assert_eq!(
            route(&classifier, "https://m.youtube.com/watch?v=abc"),
            Route::LoadInView
        );
        assert_eq!(
            route(&classifier, "https://example.com/article"),
            Route::OpenExternally
        );
    }

    #[test]
    fn blocked_hosts_never_escape_to_the_system_browser() {
        let classifier = HostClassifier::new();

        // A blocked host is dropped before the navigation screen could
        // have routed it externally.
        assert_eq!(
            route(&classifier, "https://www.googletagmanager.com/gtm.js"),
            Route::Drop
        );
    }

    #[test]
    fn splash_and_hostless_pages_stay_in_view() {
        let classifier = HostClassifier::new();

        assert_eq!(route(&classifier, "about:blank"), Route::LoadInView);
    }
}
