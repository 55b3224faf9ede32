//! Bundled page script.
//!
//! The ad-hiding script is embedded at compile time; an on-disk copy in
//! the data directory overrides it for quick iteration without a rebuild.
//! The script guards itself, so injecting it at both page-start and
//! page-finish is safe.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

const EMBEDDED_SCRIPT: &str = include_str!("../assets/mytube.js");
const OVERRIDE_FILE: &str = "mytube.js";

/// The script injected into every loaded page.
pub struct PageScript {
    source: String,
}

impl PageScript {
    /// Load the page script, preferring the on-disk override.
    pub fn load() -> Self {
        Self::load_from(&data_dir().join(OVERRIDE_FILE))
    }

    fn load_from(override_path: &Path) -> Self {
        if override_path.exists() {
            match fs::read_to_string(override_path) {
                Ok(source) => {
                    info!("using page-script override at {}", override_path.display());
                    return Self { source };
                }
                Err(err) => {
                    warn!("failed to read page-script override, using embedded copy: {err}");
                }
            }
        }

        Self {
            source: EMBEDDED_SCRIPT.to_owned(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// An empty script means injection is skipped; the page still loads.
    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mytube")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_override_falls_back_to_embedded() {
        let script = PageScript::load_from(Path::new("/nonexistent/mytube.js"));
        assert_eq!(script.as_str(), EMBEDDED_SCRIPT);
        assert!(!script.is_empty());
    }

    #[test]
    fn override_file_wins() {
        let path = std::env::temp_dir().join(format!(
            "mytube-script-override-{}.js",
            std::process::id()
        ));
        fs::write(&path, "console.log('override');").unwrap();

        let script = PageScript::load_from(&path);
        assert_eq!(script.as_str(), "console.log('override');");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn embedded_script_guards_against_double_injection() {
        assert!(EMBEDDED_SCRIPT.contains("__mytubeActive"));
    }
}
