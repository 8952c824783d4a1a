//! Activity feed model
//!
//! Mirrors the shape of the GitHub Events API. The envelope is decoded first,
//! then the kind-specific payload is decoded into a closed [`EventPayload`]
//! variant so rendering can match on it exhaustively.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result};

/// One event as it comes off the wire, payload still undecoded
#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: Actor,
    #[serde(default)]
    pub repo: Option<Repo>,
    #[serde(default)]
    pub public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
}

/// A decoded activity event
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub id: String,
    pub actor: String,
    pub repo: Option<String>,
    pub public: bool,
    pub created_at: OffsetDateTime,
    pub payload: EventPayload,
}

impl ActivityEvent {
    /// Decode the kind-specific payload of a raw event
    pub fn from_raw(raw: RawActivityEvent) -> Result<Self> {
        let payload = EventPayload::decode(&raw.kind, raw.payload)?;
        Ok(Self {
            id: raw.id,
            actor: raw.actor.login,
            repo: raw.repo.map(|r| r.name),
            public: raw.public,
            created_at: raw.created_at,
            payload,
        })
    }

    pub fn kind(&self) -> &str {
        self.payload.kind()
    }
}

/// Kind-specific payload, one variant per supported event kind
#[derive(Debug, Clone)]
pub enum EventPayload {
    Issues(IssuesPayload),
    IssueComment(IssueCommentPayload),
    PullRequest(PullRequestPayload),
    PullRequestReview(PullRequestReviewPayload),
    PullRequestReviewComment(PullRequestReviewCommentPayload),
    Push(PushPayload),
    Watch(WatchPayload),
    Fork(ForkPayload),
    Unknown { kind: String },
}

impl EventPayload {
    pub const ISSUES: &'static str = "IssuesEvent";
    pub const ISSUE_COMMENT: &'static str = "IssueCommentEvent";
    pub const PULL_REQUEST: &'static str = "PullRequestEvent";
    pub const PULL_REQUEST_REVIEW: &'static str = "PullRequestReviewEvent";
    pub const PULL_REQUEST_REVIEW_COMMENT: &'static str = "PullRequestReviewCommentEvent";
    pub const PUSH: &'static str = "PushEvent";
    pub const WATCH: &'static str = "WatchEvent";
    pub const FORK: &'static str = "ForkEvent";

    /// Decode `value` according to the event kind discriminant.
    ///
    /// Unrecognized kinds decode to [`EventPayload::Unknown`] and never fail.
    pub fn decode(kind: &str, value: serde_json::Value) -> Result<Self> {
        fn parse<T: serde::de::DeserializeOwned>(kind: &str, value: serde_json::Value) -> Result<T> {
            serde_json::from_value(value).map_err(|source| Error::PayloadParse {
                kind: kind.to_string(),
                source,
            })
        }

        let payload = match kind {
            Self::ISSUES => EventPayload::Issues(parse(kind, value)?),
            Self::ISSUE_COMMENT => EventPayload::IssueComment(parse(kind, value)?),
            Self::PULL_REQUEST => EventPayload::PullRequest(parse(kind, value)?),
            Self::PULL_REQUEST_REVIEW => EventPayload::PullRequestReview(parse(kind, value)?),
            Self::PULL_REQUEST_REVIEW_COMMENT => {
                EventPayload::PullRequestReviewComment(parse(kind, value)?)
            }
            Self::PUSH => EventPayload::Push(parse(kind, value)?),
            Self::WATCH => EventPayload::Watch(parse(kind, value)?),
            Self::FORK => EventPayload::Fork(parse(kind, value)?),
            other => EventPayload::Unknown {
                kind: other.to_string(),
            },
        };
        Ok(payload)
    }

    pub fn kind(&self) -> &str {
        match self {
            EventPayload::Issues(_) => Self::ISSUES,
            EventPayload::IssueComment(_) => Self::ISSUE_COMMENT,
            EventPayload::PullRequest(_) => Self::PULL_REQUEST,
            EventPayload::PullRequestReview(_) => Self::PULL_REQUEST_REVIEW,
            EventPayload::PullRequestReviewComment(_) => Self::PULL_REQUEST_REVIEW_COMMENT,
            EventPayload::Push(_) => Self::PUSH,
            EventPayload::Watch(_) => Self::WATCH,
            EventPayload::Fork(_) => Self::FORK,
            EventPayload::Unknown { kind } => kind.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// Present when the "issue" is actually a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub issue: Issue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCommentPayload {
    #[serde(default)]
    pub action: Option<String>,
    pub issue: Issue,
    #[serde(default)]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestReviewPayload {
    #[serde(default)]
    pub action: Option<String>,
    pub review: Review,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestReviewCommentPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub comment: Option<Comment>,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchPayload {
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forkee {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkPayload {
    pub forkee: Forkee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(kind: &str, payload: serde_json::Value) -> RawActivityEvent {
        serde_json::from_value(json!({
            "id": "1",
            "type": kind,
            "actor": { "login": "octocat" },
            "repo": { "name": "octocat/hello" },
            "public": true,
            "created_at": "2024-03-01T12:00:00Z",
            "payload": payload,
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_envelope() {
        let event = ActivityEvent::from_raw(raw(
            "WatchEvent",
            json!({ "action": "started" }),
        ))
        .unwrap();

        assert_eq!(event.actor, "octocat");
        assert_eq!(event.repo.as_deref(), Some("octocat/hello"));
        assert!(event.public);
        assert_eq!(event.created_at.unix_timestamp(), 1_709_294_400);
        assert_eq!(event.kind(), "WatchEvent");
    }

    #[test]
    fn test_unknown_kind_is_not_an_error() {
        let event = ActivityEvent::from_raw(raw("GollumEvent", json!({ "pages": [] }))).unwrap();
        match event.payload {
            EventPayload::Unknown { kind } => assert_eq!(kind, "GollumEvent"),
            other => panic!("expected unknown payload, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_parse_error() {
        let err = ActivityEvent::from_raw(raw("IssuesEvent", json!({ "action": "opened" })))
            .unwrap_err();
        match err {
            Error::PayloadParse { kind, .. } => assert_eq!(kind, "IssuesEvent"),
            other => panic!("expected payload parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_push_ref_field() {
        let event = ActivityEvent::from_raw(raw(
            "PushEvent",
            json!({ "ref": "refs/heads/main", "size": 2, "commits": [{ "sha": "a" }, { "sha": "b" }] }),
        ))
        .unwrap();
        match event.payload {
            EventPayload::Push(push) => {
                assert_eq!(push.git_ref.as_deref(), Some("refs/heads/main"));
                assert_eq!(push.size, Some(2));
                assert_eq!(push.commits.len(), 2);
            }
            other => panic!("expected push payload, got {:?}", other),
        }
    }
}
