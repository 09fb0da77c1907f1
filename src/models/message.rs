//! Message shapes on the page/content-script channel

use serde::{Deserialize, Deserializer};

use super::JobStats;

/// `type` field of the outbound analytics ping to the background script.
pub const UPDATE_MESSAGE_TYPE: &str = "update";

/// Inbound messages posted by the page-context script.
///
/// A `JobData` message missing any required field fails to deserialize and
/// is dropped by the caller; incomplete stats are never cached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    #[serde(rename = "LINKEDIN_JOB_DATA")]
    JobData {
        #[serde(rename = "jobId", deserialize_with = "job_id_as_string")]
        job_id: String,
        applies: u64,
        views: u64,
        #[serde(rename = "expireAt")]
        expire_at: i64,
        #[serde(rename = "isRemoteAllowed", default)]
        is_remote_allowed: Option<bool>,
    },
    #[serde(rename = "LINKEDIN_URL_CHANGE")]
    UrlChange { url: String },
}

impl PageMessage {
    /// Parse a raw message body, ignoring anything that is not one of the
    /// two known shapes.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// The voyager API reports `jobPostingId` as a number; the URL path yields
/// a string. Accept both on the wire and normalize to a string key.
fn job_id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Text(String),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Num(n) => n.to_string(),
        Repr::Text(s) => s,
    })
}

impl PageMessage {
    /// The stats payload of a `JobData` message, if that is what this is.
    pub fn into_stats(self) -> Option<JobStats> {
        match self {
            PageMessage::JobData {
                job_id,
                applies,
                views,
                expire_at,
                is_remote_allowed,
            } => Some(JobStats {
                job_id,
                applies,
                views,
                expire_at,
                is_remote_allowed,
            }),
            PageMessage::UrlChange { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_job_data_with_numeric_id() {
        let body = r#"{
            "type": "LINKEDIN_JOB_DATA",
            "jobId": 4012345678,
            "applies": 42,
            "views": 310,
            "expireAt": 1767225600000,
            "isRemoteAllowed": true
        }"#;
        let message = PageMessage::parse(body).unwrap();
        let stats = message.into_stats();
        let stats = stats.unwrap();
        assert_eq!(stats.job_id, "4012345678");
        assert_eq!(stats.applies, 42);
        assert_eq!(stats.views, 310);
        assert_eq!(stats.is_remote_allowed, Some(true));
    }

    #[test]
    fn test_parse_job_data_with_string_id_and_no_remote_flag() {
        let body = r#"{
            "type": "LINKEDIN_JOB_DATA",
            "jobId": "77",
            "applies": 1,
            "views": 2,
            "expireAt": 1767225600000
        }"#;
        let message = PageMessage::parse(body).unwrap();
        let stats = message.into_stats();
        assert_eq!(stats.unwrap().is_remote_allowed, None);
    }

    #[test]
    fn test_parse_url_change() {
        let body = r#"{"type": "LINKEDIN_URL_CHANGE", "url": "https://www.linkedin.com/jobs/view/99/"}"#;
        assert_eq!(
            PageMessage::parse(body),
            Some(PageMessage::UrlChange {
                url: "https://www.linkedin.com/jobs/view/99/".to_string()
            })
        );
    }

    #[test]
    fn test_incomplete_job_data_is_rejected() {
        // Missing expireAt: the whole message is dropped, never cached.
        let body = r#"{"type": "LINKEDIN_JOB_DATA", "jobId": 1, "applies": 5, "views": 9}"#;
        assert_eq!(PageMessage::parse(body), None);
    }

    #[test]
    fn test_unknown_message_type_is_ignored() {
        assert_eq!(PageMessage::parse(r#"{"type": "SOMETHING_ELSE"}"#), None);
        assert_eq!(PageMessage::parse("not json"), None);
    }
}
