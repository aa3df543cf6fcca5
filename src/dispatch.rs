//! URL construction and environment-aware navigation.
//!
//! Desktop browsers get the search results in a new tab; mobile ones
//! navigate in place (popup handling there is hopeless). A blocked popup
//! falls back to in-place navigation, and any remaining navigation failure
//! is logged and swallowed; the search itself already succeeded.

use std::process::Command;

use tracing::warn;

/// Substitute the encoded keyword into a destination's URL template.
pub fn build_url(template: &str, encoded_keyword: &str) -> String {
    template.replace("{keyword}", encoded_keyword)
}

#[derive(Debug, thiserror::Error)]
#[error("could not open a new browsing context: {0}")]
pub struct NavigationError(pub String);

/// Seam between the pipeline and whatever is hosting it (browser shell,
/// webview, CLI).
pub trait Navigator {
    /// Try to open `url` in a new browsing context.
    fn open_new_tab(&self, url: &str) -> Result<(), NavigationError>;
    /// Navigate the current context. Must not fail; best effort only.
    fn navigate_current(&self, url: &str);
}

/// What we know about the environment a search was submitted from.
#[derive(Debug, Clone)]
pub struct ClientEnv {
    user_agent: String,
}

impl ClientEnv {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    pub fn is_mobile(&self) -> bool {
        let ua = self.user_agent.to_ascii_lowercase();
        ["mobile", "android", "iphone", "ipad", "ipod"]
            .iter()
            .any(|marker| ua.contains(marker))
    }
}

/// Navigate to `url` the way the environment wants it.
pub fn dispatch(navigator: &dyn Navigator, env: &ClientEnv, url: &str) {
    if env.is_mobile() {
        navigator.navigate_current(url);
        return;
    }
    if let Err(e) = navigator.open_new_tab(url) {
        warn!(error = %e, "new tab failed, navigating in place");
        navigator.navigate_current(url);
    }
}

/// Navigator that hands the URL to the platform's opener. Used by the CLI.
pub struct ShellNavigator;

impl ShellNavigator {
    fn opener() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        }
    }
}

impl Navigator for ShellNavigator {
    fn open_new_tab(&self, url: &str) -> Result<(), NavigationError> {
        Command::new(Self::opener())
            .arg(url)
            .spawn()
            .map(|_| ())
            .map_err(|e| NavigationError(e.to_string()))
    }

    fn navigate_current(&self, url: &str) {
        if let Err(e) = self.open_new_tab(url) {
            warn!(error = %e, url, "could not open browser");
        }
    }
}
