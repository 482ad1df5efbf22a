use serde::Serialize;
use serde_json::Value;

/// The handful of fields the bridge reads from an `issues` delivery.
///
/// Every field is optional. A missing parent object, a `null` or a value of
/// the wrong JSON type all end up as `None`, nothing here fails once the body
/// is valid JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePayload {
    pub action: Option<String>,
    pub html_url: Option<String>,
    pub title: Option<String>,
    pub number: Option<i64>,
    pub repository: Option<String>,
    pub sender: Option<String>,
}

impl IssuePayload {
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let value = serde_json::from_slice::<Value>(body)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let text = |pointer: &str| {
            value
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Self {
            action: text("/action"),
            html_url: text("/issue/html_url"),
            title: text("/issue/title"),
            number: value.pointer("/issue/number").and_then(Value::as_i64),
            repository: text("/repository/full_name"),
            sender: text("/sender/login"),
        }
    }

    /// Fills every missing field with its placeholder.
    pub fn summary(self) -> IssueSummary {
        IssueSummary {
            action: self.action.unwrap_or_else(defaults::action),
            url: self.html_url.unwrap_or_default(),
            title: self.title.unwrap_or_else(defaults::title),
            number: self.number.unwrap_or_default(),
            repo: self.repository.unwrap_or_else(defaults::repo),
            sender: self.sender.unwrap_or_else(defaults::sender),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub action: String,
    pub url: String,
    pub title: String,
    pub number: i64,
    pub repo: String,
    pub sender: String,
}

impl IssueSummary {
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Slack mrkdwn rendering of the issue.
    pub fn message(&self) -> NotificationMessage {
        NotificationMessage {
            text: format!(
                "*[{}]* Issue *#{}* {} by `{}`\n*{}*\n{}",
                self.repo, self.number, self.action, self.sender, self.title, self.url
            ),
        }
    }
}

/// Body of the request sent to the Slack incoming webhook.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
}

mod defaults {
    pub fn action() -> String {
        String::from("unknown")
    }

    pub fn title() -> String {
        String::from("(no title)")
    }

    pub fn repo() -> String {
        String::from("(unknown repo)")
    }

    pub fn sender() -> String {
        String::from("(unknown sender)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_nested_fields() {
        let payload = IssuePayload::from_value(&json!({
            "action": "opened",
            "issue": { "html_url": "https://x/1", "title": "Bug", "number": 1 },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "alice" }
        }));

        assert_eq!(
            payload.summary(),
            IssueSummary {
                action: String::from("opened"),
                url: String::from("https://x/1"),
                title: String::from("Bug"),
                number: 1,
                repo: String::from("o/r"),
                sender: String::from("alice"),
            }
        );
    }

    #[test]
    fn test_missing_parents_fall_back_to_defaults() {
        let summary = IssuePayload::from_value(&json!({})).summary();

        assert_eq!(summary.action, "unknown");
        assert_eq!(summary.url, "");
        assert_eq!(summary.title, "(no title)");
        assert_eq!(summary.number, 0);
        assert_eq!(summary.repo, "(unknown repo)");
        assert_eq!(summary.sender, "(unknown sender)");
        assert!(!summary.has_url());
    }

    #[test]
    fn test_wrong_types_and_nulls_are_missing() {
        let payload = IssuePayload::from_value(&json!({
            "action": 7,
            "issue": { "html_url": null, "title": ["x"], "number": "12" },
            "repository": "o/r",
            "sender": null
        }));

        assert_eq!(payload, IssuePayload::default());
    }

    #[test]
    fn test_non_object_root_is_empty_payload() {
        assert_eq!(
            IssuePayload::from_slice(b"[1, 2, 3]").unwrap(),
            IssuePayload::default()
        );
        assert_eq!(
            IssuePayload::from_slice(b"\"issues\"").unwrap(),
            IssuePayload::default()
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(IssuePayload::from_slice(b"{not json").is_err());
    }

    #[test]
    fn test_whitespace_url_is_not_a_url() {
        let summary = IssuePayload::from_value(&json!({ "issue": { "html_url": "  \t" } })).summary();
        assert!(!summary.has_url());
    }

    #[test]
    fn test_message_format() {
        let summary = IssuePayload::from_value(&json!({
            "action": "opened",
            "issue": { "html_url": "https://x/1", "title": "Bug", "number": 1 },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "alice" }
        }))
        .summary();

        let message = summary.message();
        assert_eq!(
            message.text,
            "*[o/r]* Issue *#1* opened by `alice`\n*Bug*\nhttps://x/1"
        );
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"text":"*[o/r]* Issue *#1* opened by `alice`\n*Bug*\nhttps://x/1"}"#
        );
    }

    #[test]
    fn test_message_uses_placeholders() {
        let summary = IssuePayload::from_value(&json!({ "issue": { "html_url": "https://x/9" } }))
            .summary();

        assert_eq!(
            summary.message().text,
            "*[(unknown repo)]* Issue *#0* unknown by `(unknown sender)`\n*(no title)*\nhttps://x/9"
        );
    }
}
