//! Runtime configuration read from the environment.
//!
//! - `NARRATOR_API_KEY` (or `XAI_API_KEY`): enables the chat narrator. Without
//!   a key the service runs offline and returns rule-based advice only.
//! - `NARRATOR_BASE_URL`: OpenAI-compatible API root (default: x.ai)
//! - `NARRATOR_MODEL`: model name (default: grok-beta)
//! - `NARRATOR_MAX_TOKENS`: reply budget (default: 500)
//! - `NARRATOR_TIMEOUT_SECS`: how long a request waits for narration (default: 8)
//! - `NARRATE_SIMULATIONS`: also narrate `/simulate` replies (default: false)

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_NARRATOR_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_NARRATOR_MODEL: &str = "grok-beta";
pub const DEFAULT_NARRATOR_MAX_TOKENS: u32 = 500;
pub const DEFAULT_NARRATOR_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq)]
pub struct NarratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub narrator: Option<NarratorConfig>,
    pub narrator_timeout: Duration,
    pub narrate_simulations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            narrator: None,
            narrator_timeout: DEFAULT_NARRATOR_TIMEOUT,
            narrate_simulations: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let narrator = non_empty("NARRATOR_API_KEY")
            .or_else(|| non_empty("XAI_API_KEY"))
            .map(|api_key| NarratorConfig {
                api_key,
                base_url: non_empty("NARRATOR_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_NARRATOR_BASE_URL.to_string()),
                model: non_empty("NARRATOR_MODEL")
                    .unwrap_or_else(|| DEFAULT_NARRATOR_MODEL.to_string()),
                max_tokens: parse_setting("NARRATOR_MAX_TOKENS", non_empty("NARRATOR_MAX_TOKENS"))
                    .unwrap_or(DEFAULT_NARRATOR_MAX_TOKENS),
            });

        let narrator_timeout = parse_setting::<u64>(
            "NARRATOR_TIMEOUT_SECS",
            non_empty("NARRATOR_TIMEOUT_SECS"),
        )
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_NARRATOR_TIMEOUT);

        let narrate_simulations = matches!(
            non_empty("NARRATE_SIMULATIONS")
                .map(|v| v.trim().to_ascii_lowercase())
                .as_deref(),
            Some("1") | Some("true") | Some("yes")
        );

        Self {
            narrator,
            narrator_timeout,
            narrate_simulations,
        }
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
