use std::sync::Arc;

use config::Config;
use notifier::{Notifier, SlackClient};

pub mod config;
pub mod events;
pub mod notifier;
#[cfg(any(test, feature = "tests"))]
pub mod tests_utils;
pub mod webhook;

/// Shared application data. Nothing in here is mutated after startup.
pub struct State {
    pub config: Config,
    pub notifier: Arc<dyn Notifier>,
}

impl State {
    /// State backed by a pooled [`SlackClient`].
    pub fn new(config: Config) -> Self {
        Self::with_notifier(config, Arc::new(SlackClient::new()))
    }

    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self { config, notifier }
    }
}
