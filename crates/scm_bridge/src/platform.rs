//! Vendor-neutral SCM model.
//!
//! This module defines the common types every driver converts into, one
//! capability trait per service group, and the composed [`Client`] that a
//! driver hands back to callers.
//!
//! # Example
//!
//! ```ignore
//! use scm_bridge::platform::{Client, ListOptions, ScmError};
//!
//! async fn print_orgs(client: &Client) -> Result<(), ScmError> {
//!     let (orgs, _) = client.organizations.list(ListOptions::default()).await?;
//!     for org in orgs {
//!         println!("{}", org.name);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod convert;
mod errors;
mod services;
mod types;
mod webhook;

pub use client::Client;
pub use convert::strip_null_values;
pub use errors::{Result, ScmError, short_error_message};
pub use services::{
    OrganizationService, PullRequestService, RepositoryService, UserService, WebhookService,
};
pub use types::{
    Change, CombinedStatus, Comment, CommentInput, Driver, Hook, HookEvents, HookInput,
    Invitation, Label, ListOptions, ListedIssueEvent, MergeMethod, Membership, Organization,
    OrganizationInput, OrganizationPendingInvite, Perm, Permissions, PullRequest,
    PullRequestBranch, PullRequestInput, PullRequestListOptions, PullRequestMergeOptions,
    PullRequestState, Repository, RepositoryInput, Response, Status, StatusInput, StatusState,
    Team, TeamMember, User, UserToken,
};
pub use webhook::{
    Action, Commit, MAX_PAYLOAD_BYTES, PullRequestHook, PushHook, SecretFunc, Signature, Webhook,
    WebhookRequest,
};
