use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::http::HttpHeaders;

/// Which vendor driver backs a [`super::Client`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Coding,
}

impl Driver {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Driver::Coding => "coding",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about the vendor round trip that produced a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Vendor correlation id (Coding's `RequestId`), empty when unknown.
    pub id: String,
    /// HTTP status of the last call, or a synthetic status when no call was made.
    pub status: u16,
    #[serde(skip)]
    pub headers: HttpHeaders,
}

impl Response {
    /// A response for an answer produced without calling the vendor.
    #[must_use]
    pub fn synthetic(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Paging options accepted by list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub size: u32,
}

/// Organization-level permissions of the authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub members_create_internal: bool,
    pub members_create_public: bool,
    pub members_create_private: bool,
}

/// An organization (group, project, team space) on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub permissions: Permissions,
}

/// Input for creating an organization.
#[derive(Debug, Clone, Default)]
pub struct OrganizationInput {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub private: bool,
}

/// A member of an organization or team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub login: String,
    pub is_admin: bool,
}

/// A team inside an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent: i64,
}

/// A pending invitation to join an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationPendingInvite {
    pub id: i64,
    pub login: String,
    pub inviter_login: String,
    pub org_login: String,
}

/// Membership of the authenticated user in an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub organization_name: String,
    pub state: String,
    pub role: String,
}

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

/// A personal access token issued for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserToken {
    pub id: i64,
    pub token: String,
}

/// An invitation to collaborate on a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Invitation {
    pub id: i64,
    pub repo: Repository,
    pub invitee: User,
    pub inviter: User,
    pub permissions: String,
    pub link: String,
}

/// Repository permissions of the authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Perm {
    pub pull: bool,
    pub push: bool,
    pub admin: bool,
}

/// A git repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub id: String,
    pub namespace: String,
    pub name: String,
    pub full_name: String,
    pub perm: Option<Perm>,
    pub branch: String,
    pub private: bool,
    pub clone: String,
    pub clone_ssh: String,
    pub link: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Input for creating or forking a repository.
#[derive(Debug, Clone, Default)]
pub struct RepositoryInput {
    pub namespace: String,
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub private: bool,
}

/// Repository webhook registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hook {
    pub id: String,
    pub name: String,
    pub target: String,
    pub events: Vec<String>,
    pub active: bool,
    pub skip_verify: bool,
}

/// Event selection for creating a repository webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookEvents {
    pub branch: bool,
    pub issue: bool,
    pub issue_comment: bool,
    pub pull_request: bool,
    pub pull_request_comment: bool,
    pub push: bool,
    pub review_comment: bool,
    pub tag: bool,
}

/// Input for creating or updating a repository webhook.
#[derive(Debug, Clone, Default)]
pub struct HookInput {
    pub name: String,
    pub target: String,
    pub secret: String,
    pub events: HookEvents,
    pub native_events: Vec<String>,
    pub skip_verify: bool,
}

/// State of a commit status check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    #[default]
    Unknown,
    Pending,
    Running,
    Success,
    Failure,
    Canceled,
    Error,
}

/// A commit status check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub state: StatusState,
    pub label: String,
    pub desc: String,
    pub target: String,
}

/// Aggregate of all status checks for a ref.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombinedStatus {
    pub state: StatusState,
    pub sha: String,
    pub statuses: Vec<Status>,
}

/// Input for creating a commit status.
#[derive(Debug, Clone, Default)]
pub struct StatusInput {
    pub state: StatusState,
    pub label: String,
    pub desc: String,
    pub target: String,
}

/// An issue or pull request label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: String,
}

/// Merge state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    Mergeable,
    Conflict,
    CannotBeMerged,
    Closed,
}

impl PullRequestState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PullRequestState::Mergeable => "mergeable",
            PullRequestState::Conflict => "conflict",
            PullRequestState::CannotBeMerged => "cannot_be_merged",
            PullRequestState::Closed => "closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestBranch {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub repo: Repository,
}

/// A pull request (merge request).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub state: Option<PullRequestState>,
    pub source: String,
    pub target: String,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
    pub link: String,
    pub closed: bool,
    pub merged: bool,
    pub merge_sha: String,
    pub author: User,
}

/// Input for creating or updating a pull request.
#[derive(Debug, Clone, Default)]
pub struct PullRequestInput {
    pub title: String,
    pub body: String,
    /// Source branch.
    pub head: String,
    /// Target branch.
    pub base: String,
}

/// Merge strategy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
    FastForward,
}

/// Options for merging a pull request.
#[derive(Debug, Clone, Default)]
pub struct PullRequestMergeOptions {
    pub commit_title: String,
    pub merge_method: Option<MergeMethod>,
    pub sha: String,
    pub delete_source_branch: bool,
}

/// Filters for listing pull requests.
#[derive(Debug, Clone, Default)]
pub struct PullRequestListOptions {
    pub page: u32,
    pub size: u32,
    pub open: bool,
    pub closed: bool,
    pub labels: Vec<String>,
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Change {
    pub path: String,
    pub previous_path: String,
    pub added: bool,
    pub renamed: bool,
    pub deleted: bool,
    pub patch: String,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub author: User,
    pub link: String,
}

/// Input for creating or editing a comment.
#[derive(Debug, Clone, Default)]
pub struct CommentInput {
    pub body: String,
}

/// A timeline event on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListedIssueEvent {
    pub event: String,
    pub actor: User,
    pub label: Label,
    pub created: Option<DateTime<Utc>>,
}
