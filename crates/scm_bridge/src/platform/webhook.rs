//! Vendor-neutral webhook model.

use std::io::Read;

use serde::Serialize;

use super::errors::{Result, ScmError};
use super::types::{PullRequest, Repository, User};
use crate::http::{HttpHeaders, header_get};

/// Largest webhook body any driver will read.
pub const MAX_PAYLOAD_BYTES: usize = 10_000_000;

/// Identity attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub login: String,
    pub name: String,
    pub email: String,
}

/// A commit as reported by a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
    pub link: String,
}

/// What happened to a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Unknown,
    Create,
    Update,
    Merge,
    Close,
}

/// A branch or tag push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushHook {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub repo: Repository,
    pub before: String,
    pub after: String,
    pub compare: String,
    pub commit: Commit,
    pub sender: User,
    pub guid: String,
}

/// A pull request lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub sender: User,
    pub guid: String,
}

/// A parsed webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Webhook {
    Push(PushHook),
    PullRequest(PullRequestHook),
}

impl Webhook {
    /// Short name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Webhook::Push(_) => "push",
            Webhook::PullRequest(_) => "pull_request",
        }
    }

    /// Repository the event refers to.
    #[must_use]
    pub fn repository(&self) -> &Repository {
        match self {
            Webhook::Push(hook) => &hook.repo,
            Webhook::PullRequest(hook) => &hook.repo,
        }
    }

    /// Delivery id stamped from the request headers.
    #[must_use]
    pub fn guid(&self) -> &str {
        match self {
            Webhook::Push(hook) => &hook.guid,
            Webhook::PullRequest(hook) => &hook.guid,
        }
    }
}

/// Looks up the shared secret for a parsed hook.
///
/// Returning an empty string means no secret is configured and verification
/// is skipped.
pub type SecretFunc<'a> = dyn Fn(&Webhook) -> Result<String> + Send + Sync + 'a;

/// An inbound webhook delivery: request headers plus the raw body.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl WebhookRequest {
    pub fn new(headers: HttpHeaders, body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Read the body from `reader`, failing once more than
    /// [`MAX_PAYLOAD_BYTES`] are available.
    pub fn from_reader(headers: HttpHeaders, reader: impl Read) -> Result<Self> {
        let mut body = Vec::new();
        reader
            .take(MAX_PAYLOAD_BYTES as u64 + 1)
            .read_to_end(&mut body)
            .map_err(|e| ScmError::internal(format!("failed to read webhook body: {e}")))?;
        if body.len() > MAX_PAYLOAD_BYTES {
            return Err(ScmError::PayloadTooLarge {
                limit: MAX_PAYLOAD_BYTES,
            });
        }
        Ok(Self { headers, body })
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}
