//! Capability traits implemented once per vendor driver.
//!
//! Every fallible call yields the converted value together with the
//! [`Response`] metadata of the vendor round trip. Operations a vendor does
//! not expose return [`ScmError::NotSupported`](super::ScmError::NotSupported).

use async_trait::async_trait;

use super::errors::Result;
use super::types::{
    Change, CombinedStatus, Comment, CommentInput, Hook, HookInput, Invitation, Label,
    ListOptions, ListedIssueEvent, Membership, Organization, OrganizationInput,
    OrganizationPendingInvite, Perm, PullRequest, PullRequestInput, PullRequestListOptions,
    PullRequestMergeOptions, Repository, RepositoryInput, Response, Status, StatusInput, Team,
    TeamMember, User, UserToken,
};
use super::webhook::{SecretFunc, Webhook, WebhookRequest};

/// Organization (group / project) operations.
#[async_trait]
pub trait OrganizationService: Send + Sync {
    async fn create(&self, input: &OrganizationInput) -> Result<(Organization, Response)>;

    async fn delete(&self, name: &str) -> Result<Response>;

    /// Look up an organization by name.
    async fn find(&self, name: &str) -> Result<(Organization, Response)>;

    async fn find_membership(&self, name: &str) -> Result<(Membership, Response)>;

    /// Organizations visible to the authenticated user.
    async fn list(&self, opts: ListOptions) -> Result<(Vec<Organization>, Response)>;

    async fn list_memberships(&self, opts: ListOptions) -> Result<(Vec<Membership>, Response)>;

    async fn list_org_members(
        &self,
        org: &str,
        opts: ListOptions,
    ) -> Result<(Vec<TeamMember>, Response)>;

    async fn list_pending_invitations(
        &self,
        org: &str,
        opts: ListOptions,
    ) -> Result<(Vec<OrganizationPendingInvite>, Response)>;

    async fn accept_organization_invitation(&self, org: &str) -> Result<Response>;

    async fn list_teams(&self, org: &str, opts: ListOptions) -> Result<(Vec<Team>, Response)>;

    async fn list_team_members(
        &self,
        team_id: i64,
        role: &str,
        opts: ListOptions,
    ) -> Result<(Vec<TeamMember>, Response)>;

    async fn is_member(&self, org: &str, user: &str) -> Result<(bool, Response)>;

    async fn is_admin(&self, org: &str, user: &str) -> Result<(bool, Response)>;
}

/// Repository operations.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    async fn create(&self, input: &RepositoryInput) -> Result<(Repository, Response)>;

    async fn fork(&self, input: &RepositoryInput, origin: &str) -> Result<(Repository, Response)>;

    /// Look up a repository by `namespace/name` (optionally `user/namespace/name`).
    async fn find(&self, repo: &str) -> Result<(Repository, Response)>;

    async fn find_hook(&self, repo: &str, id: &str) -> Result<(Hook, Response)>;

    async fn find_perms(&self, repo: &str) -> Result<(Perm, Response)>;

    async fn find_combined_status(
        &self,
        repo: &str,
        reference: &str,
    ) -> Result<(CombinedStatus, Response)>;

    async fn find_user_permission(&self, repo: &str, user: &str) -> Result<(String, Response)>;

    async fn add_collaborator(
        &self,
        repo: &str,
        user: &str,
        permission: &str,
    ) -> Result<(Option<Invitation>, bool, Response)>;

    async fn is_collaborator(&self, repo: &str, user: &str) -> Result<(bool, Response)>;

    async fn list_collaborators(
        &self,
        repo: &str,
        opts: ListOptions,
    ) -> Result<(Vec<User>, Response)>;

    async fn list(&self, opts: ListOptions) -> Result<(Vec<Repository>, Response)>;

    async fn list_organisation(
        &self,
        org: &str,
        opts: ListOptions,
    ) -> Result<(Vec<Repository>, Response)>;

    async fn list_user(&self, user: &str, opts: ListOptions)
    -> Result<(Vec<Repository>, Response)>;

    async fn list_labels(&self, repo: &str, opts: ListOptions) -> Result<(Vec<Label>, Response)>;

    async fn list_hooks(&self, repo: &str, opts: ListOptions) -> Result<(Vec<Hook>, Response)>;

    async fn list_status(
        &self,
        repo: &str,
        reference: &str,
        opts: ListOptions,
    ) -> Result<(Vec<Status>, Response)>;

    async fn create_hook(&self, repo: &str, input: &HookInput)
    -> Result<(Option<Hook>, Response)>;

    async fn update_hook(
        &self,
        repo: &str,
        id: &str,
        input: &HookInput,
    ) -> Result<(Hook, Response)>;

    async fn create_status(
        &self,
        repo: &str,
        reference: &str,
        input: &StatusInput,
    ) -> Result<(Status, Response)>;

    async fn delete_hook(&self, repo: &str, id: &str) -> Result<Response>;

    async fn delete(&self, repo: &str) -> Result<Response>;
}

/// Pull request (merge request) operations.
#[async_trait]
pub trait PullRequestService: Send + Sync {
    async fn find(&self, repo: &str, number: i64) -> Result<(PullRequest, Response)>;

    async fn update(
        &self,
        repo: &str,
        number: i64,
        input: &PullRequestInput,
    ) -> Result<(PullRequest, Response)>;

    async fn find_comment(
        &self,
        repo: &str,
        number: i64,
        id: i64,
    ) -> Result<(Comment, Response)>;

    async fn list(
        &self,
        repo: &str,
        opts: &PullRequestListOptions,
    ) -> Result<(Vec<PullRequest>, Response)>;

    async fn list_changes(
        &self,
        repo: &str,
        number: i64,
        opts: ListOptions,
    ) -> Result<(Vec<Change>, Response)>;

    async fn list_comments(
        &self,
        repo: &str,
        number: i64,
        opts: ListOptions,
    ) -> Result<(Vec<Comment>, Response)>;

    async fn list_labels(
        &self,
        repo: &str,
        number: i64,
        opts: ListOptions,
    ) -> Result<(Vec<Label>, Response)>;

    async fn list_events(
        &self,
        repo: &str,
        number: i64,
        opts: ListOptions,
    ) -> Result<(Vec<ListedIssueEvent>, Response)>;

    async fn merge(
        &self,
        repo: &str,
        number: i64,
        options: &PullRequestMergeOptions,
    ) -> Result<Response>;

    async fn close(&self, repo: &str, number: i64) -> Result<Response>;

    async fn reopen(&self, repo: &str, number: i64) -> Result<Response>;

    async fn create(&self, repo: &str, input: &PullRequestInput)
    -> Result<(PullRequest, Response)>;

    async fn create_comment(
        &self,
        repo: &str,
        number: i64,
        input: &CommentInput,
    ) -> Result<(Comment, Response)>;

    async fn delete_comment(&self, repo: &str, number: i64, id: i64) -> Result<Response>;

    async fn edit_comment(
        &self,
        repo: &str,
        number: i64,
        id: i64,
        input: &CommentInput,
    ) -> Result<(Comment, Response)>;

    async fn add_label(&self, repo: &str, number: i64, label: &str) -> Result<Response>;

    async fn delete_label(&self, repo: &str, number: i64, label: &str) -> Result<Response>;

    async fn set_milestone(&self, repo: &str, number: i64, milestone: i64) -> Result<Response>;

    async fn clear_milestone(&self, repo: &str, number: i64) -> Result<Response>;

    async fn assign_issue(&self, repo: &str, number: i64, logins: &[String]) -> Result<Response>;

    async fn unassign_issue(&self, repo: &str, number: i64, logins: &[String])
    -> Result<Response>;

    async fn request_review(&self, repo: &str, number: i64, logins: &[String])
    -> Result<Response>;

    async fn unrequest_review(
        &self,
        repo: &str,
        number: i64,
        logins: &[String],
    ) -> Result<Response>;
}

/// Operations on user accounts.
#[async_trait]
pub trait UserService: Send + Sync {
    /// The authenticated user.
    async fn find(&self) -> Result<(User, Response)>;

    async fn find_login(&self, login: &str) -> Result<(User, Response)>;

    /// Email address of the authenticated user.
    async fn find_email(&self) -> Result<(String, Response)>;

    async fn create_token(&self, user: &str, token: &str) -> Result<(UserToken, Response)>;

    async fn delete_token(&self, id: i64) -> Result<Response>;

    async fn list_invitations(&self) -> Result<(Vec<Invitation>, Response)>;

    async fn accept_invitation(&self, id: i64) -> Result<Response>;
}

/// Parses inbound webhook deliveries.
///
/// This is not a network call, so there is no [`Response`].
pub trait WebhookService: Send + Sync {
    fn parse(&self, req: &WebhookRequest, secret: &SecretFunc<'_>) -> Result<Webhook>;
}
