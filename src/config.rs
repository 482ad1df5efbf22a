use std::fmt;

use shuttle_runtime::SecretStore;

/// Secret / environment variable holding the Slack incoming webhook URL.
pub static SLACK_URL_KEY: &str = "SLACK_URL";

/// Runtime configuration, resolved once at startup and handed to the handler.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    slack_url: Option<String>,
}

impl Config {
    /// Blank urls are treated as unset.
    pub fn new(slack_url: Option<String>) -> Self {
        Self {
            slack_url: slack_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(SLACK_URL_KEY).ok())
    }

    /// Looks the url up in the Shuttle secret store, falling back to the
    /// process environment.
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        let config = Self::new(secrets.get(SLACK_URL_KEY));
        if config.slack_url.is_some() {
            return config;
        }
        Self::from_env()
    }

    pub fn slack_url(&self) -> Option<&str> {
        self.slack_url.as_deref()
    }
}

// The webhook url is a credential, keep it out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "slack_url",
                &self.slack_url.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
