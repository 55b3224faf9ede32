//! MyTube: the YouTube mobile site in a lean shell, minus the ads.
//!
//! Entry point: sets up the allocator and logging, wires the compiled-in
//! host classifier into the shell, and launches the update-gated WebView.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mytube_filter::HOST_CLASSIFIER;
use mytube_ui::{run_shell, ShellConfig};
use mytube_update::{UpdateGate, VersionEndpoint};

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Release counter compared against the backend's version_code.
const APP_VERSION_CODE: u32 = 3;

/// First page the shell loads once the update gate allows it.
const START_URL: &str = "https://m.youtube.com";

/// Backend serving the app_versions table.
const UPDATE_ENDPOINT: &str = "https://updates.mytube.example";

/// Public read key for the version endpoint, baked in at build time.
const UPDATE_API_KEY: &str = match option_env!("MYTUBE_UPDATE_KEY") {
    Some(key) => key,
    None => "",
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    info!("MyTube {} starting...", env!("CARGO_PKG_VERSION"));

    let config = ShellConfig {
        start_url: START_URL.to_owned(),
        endpoint: VersionEndpoint::new(UPDATE_ENDPOINT).with_api_key(UPDATE_API_KEY),
        gate: UpdateGate::new(APP_VERSION_CODE),
    };

    run_shell(config, &*HOST_CLASSIFIER)
}
