//! GitHub webhook events understood by the bridge.

pub mod issues;

/// Header GitHub uses to name the event carried by a delivery.
pub static GITHUB_EVENT_HEADER: &str = "X-GitHub-Event";

/// The only event kind that is forwarded.
pub static ISSUES_EVENT: &str = "issues";
