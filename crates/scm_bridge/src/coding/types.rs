//! Coding open-api data types.
//!
//! Every open-api call is a POST of `{"Action": "<Name>", ...fields}` to the
//! base URL and answers `{"Response": {"RequestId", "Error"?, ...payload}}`.
//! Outbound payloads use PascalCase keys; webhook payloads use snake_case.
//!
//! All payload structs are `#[serde(default)]`: we define only the fields we
//! convert and let anything missing fall back to its default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::platform::Perm;

/// Open-api action names.
pub mod actions {
    pub const DESCRIBE_CURRENT_USER: &str = "DescribeCodingCurrentUser";
    pub const DESCRIBE_PROJECT_BY_NAME: &str = "DescribeProjectByName";
    pub const DESCRIBE_USER_PROJECTS: &str = "DescribeUserProjects";
    pub const DESCRIBE_PROJECT_MEMBERS: &str = "DescribeProjectMembers";
    pub const CREATE_GIT_DEPOT: &str = "CreateGitDepot";
    pub const DESCRIBE_GIT_DEPOT: &str = "DescribeGitDepot";
    pub const DESCRIBE_PROJECT_DEPOTS: &str = "DescribeProjectDepotInfoList";
    pub const CREATE_MERGE_REQUEST: &str = "CreateGitMergeReq";
    pub const DESCRIBE_MERGE_REQUEST: &str = "DescribeMergeRequest";
    pub const MERGE_MERGE_REQUEST: &str = "ModifyMergeMR";
    pub const CLOSE_MERGE_REQUEST: &str = "ModifyCloseMR";
}

// ---------- Envelope ----------

/// Outbound envelope: the action name plus the action's own fields.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest<'a, T> {
    #[serde(rename = "Action")]
    pub action: &'a str,
    #[serde(flatten)]
    pub fields: &'a T,
}

/// Inbound envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<P> {
    #[serde(rename = "Response")]
    pub response: Option<Envelope<P>>,
}

/// Body of the `Response` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<P> {
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
    #[serde(rename = "Error", default)]
    pub error: Option<ApiErrorBody>,
    #[serde(flatten)]
    pub payload: P,
}

/// Error object embedded in a 2xx envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: String,
}

/// Payload of actions that return nothing but the envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoPayload {}

// ---------- Users ----------

/// The authenticated user as returned by `DescribeCodingCurrentUser`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CodingUser {
    pub id: i64,
    pub status: i64,
    pub email: Option<String>,
    pub global_key: String,
    pub avatar: String,
    pub name: String,
    pub name_pin_yin: String,
    pub phone: Option<String>,
    pub phone_validation: i64,
    pub email_validation: i64,
    pub phone_region_code: Option<String>,
    pub team_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CurrentUserPayload {
    pub user: Option<CodingUser>,
}

// ---------- Projects ----------

/// A Coding project; maps onto an organization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectItem {
    pub id: i64,
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: i64,
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub created_at: i64,
    pub max_member: i64,
    pub team_id: i64,
    pub user_owner_id: i64,
    pub is_demo: bool,
    pub archived: bool,
    pub start_date: i64,
    pub updated_at: i64,
    pub team_owner_id: i64,
    pub end_date: i64,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindProjectRequest<'a> {
    pub project_name: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FindProjectPayload {
    pub project: Option<ProjectItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListProjectsRequest {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectListPayload {
    pub project_list: Vec<Option<ProjectItem>>,
}

// ---------- Project members ----------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListProjectMembersRequest {
    pub project_id: i64,
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MemberRole {
    pub role_type: String,
    pub role_id: i64,
    pub role_type_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectMemberItem {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub name_pin_yin: String,
    pub avatar: String,
    pub email: String,
    pub phone: String,
    pub email_validation: i64,
    pub phone_validation: i64,
    pub status: i64,
    pub global_key: String,
    pub roles: Vec<Option<MemberRole>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectMembersPage {
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u32,
    pub project_members: Vec<Option<ProjectMemberItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectMembersPayload {
    pub data: ProjectMembersPage,
}

// ---------- Depots ----------

/// A git depot; maps onto a repository.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DepotItem {
    pub id: i64,
    pub name: String,
    pub https_url: String,
    pub project_id: i64,
    pub ssh_url: String,
    pub web_url: String,
    pub vcs_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDepotRequest<'a> {
    pub project_id: i64,
    pub depot_name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateDepotPayload {
    pub depot_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDepotRequest {
    pub depot_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDepotPayload {
    pub depot: Option<DepotItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectDepotsRequest {
    pub project_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DepotData {
    pub depots: Vec<Option<DepotItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectDepotsPayload {
    pub depot_data: Option<DepotData>,
}

// ---------- Merge requests ----------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMergeRequestRequest<'a> {
    pub depot_id: i64,
    pub title: &'a str,
    pub content: &'a str,
    pub src_branch: &'a str,
    pub dest_branch: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MergeInfo {
    pub project_id: i64,
    pub depot_id: i64,
    pub merge_request_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateMergeRequestPayload {
    pub merge_info: Option<MergeInfo>,
}

/// Identifies one merge request of a depot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeRequestRef {
    pub depot_id: i64,
    pub merge_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MergeRequestInfo {
    pub describe: String,
    pub status: String,
    pub title: String,
    pub target_branch: String,
    pub source_branch: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeMergeRequestPayload {
    pub merge_request_info: Option<MergeRequestInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeMergeRequestRequest<'a> {
    pub depot_id: i64,
    pub merge_id: i64,
    pub message: &'a str,
    pub is_del_source_branch: bool,
    pub is_fast_forward: bool,
    pub squash: bool,
}

// ---------- Webhooks ----------

/// Account reference inside webhook payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookUser {
    pub id: i64,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
    pub html_url: String,
    pub name: String,
    pub name_pinyin: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookRepository {
    pub id: i64,
    pub name: String,
    /// `user/project/depot`.
    pub full_name: String,
    pub owner: HookUser,
    pub private: bool,
    pub html_url: String,
    pub description: String,
    pub fork: bool,
    /// Milliseconds since the epoch.
    pub created_at: i64,
    /// Milliseconds since the epoch.
    pub updated_at: i64,
    pub clone_url: String,
    pub ssh_url: String,
    pub default_branch: String,
    pub vcs_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookProject {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookTeam {
    pub id: i64,
    pub domain: String,
    pub name: String,
    pub name_pinyin: String,
    pub introduction: String,
    pub avatar: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookSimpleUser {
    pub name: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookCommit {
    pub id: String,
    pub message: String,
    pub timestamp: i64,
    pub url: String,
    pub author: HookSimpleUser,
    pub committer: HookSimpleUser,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

/// Body of a `GIT_PUSHED` delivery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PushHookPayload {
    pub event: String,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub before: String,
    pub after: String,
    pub created: bool,
    pub deleted: bool,
    pub compare: String,
    pub commits: Vec<HookCommit>,
    pub head_commit: HookCommit,
    pub pusher: HookSimpleUser,
    pub repository: HookRepository,
    pub sender: HookUser,
    pub project: HookProject,
    pub team: HookTeam,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookBranch {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub user: HookUser,
    pub repo: HookRepository,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookMergeRequest {
    pub id: i64,
    pub html_url: String,
    pub patch_url: String,
    pub diff_url: String,
    pub number: i64,
    pub state: String,
    pub title: String,
    pub body: String,
    pub user: HookUser,
    pub created_at: i64,
    pub updated_at: i64,
    pub merge_commit_sha: String,
    pub merged: bool,
    pub comments: i64,
    pub commits: i64,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
    pub head: HookBranch,
    pub base: HookBranch,
}

/// Body of a `GIT_MR_*` delivery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestHookPayload {
    pub event: String,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "mergeRequest")]
    pub merge_request: HookMergeRequest,
    pub repository: HookRepository,
    pub sender: HookUser,
    pub project: HookProject,
    pub team: HookTeam,
}

// ---------- Permission levels and visibility ----------

/// Project member access level, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    No,
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
}

impl AccessLevel {
    /// Numeric level used by the vendor.
    #[must_use]
    pub fn level(self) -> i64 {
        match self {
            AccessLevel::No => 0,
            AccessLevel::Guest => 10,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Maintainer => 40,
            AccessLevel::Owner => 50,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::No => "no",
            AccessLevel::Guest => "guest",
            AccessLevel::Reporter => "reporter",
            AccessLevel::Developer => "developer",
            AccessLevel::Maintainer => "maintainer",
            AccessLevel::Owner => "owner",
        }
    }

    /// Repository permissions granted at this level.
    #[must_use]
    pub fn perm(self) -> Perm {
        Perm {
            pull: self >= AccessLevel::Reporter,
            push: self >= AccessLevel::Developer,
            admin: self >= AccessLevel::Maintainer,
        }
    }
}

impl TryFrom<i64> for AccessLevel {
    type Error = i64;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(AccessLevel::No),
            10 => Ok(AccessLevel::Guest),
            20 => Ok(AccessLevel::Reporter),
            30 => Ok(AccessLevel::Developer),
            40 => Ok(AccessLevel::Maintainer),
            50 => Ok(AccessLevel::Owner),
            other => Err(other),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Private,
    Internal,
    Public,
}

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Public => "public",
        }
    }

    #[must_use]
    pub fn is_private(self) -> bool {
        self != Visibility::Public
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            "public" => Ok(Visibility::Public),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::strip_null_values;

    fn decode<P: serde::de::DeserializeOwned>(value: serde_json::Value) -> ApiResponse<P> {
        serde_json::from_value(strip_null_values(value)).expect("envelope should decode")
    }

    #[test]
    fn test_request_flattens_fields_next_to_action() {
        let fields = FindProjectRequest {
            project_name: "acme",
        };
        let req = ApiRequest {
            action: actions::DESCRIBE_PROJECT_BY_NAME,
            fields: &fields,
        };
        assert_eq!(
            serde_json::to_value(&req).expect("serialize"),
            serde_json::json!({"Action": "DescribeProjectByName", "ProjectName": "acme"})
        );
    }

    #[test]
    fn test_request_field_names() {
        let list = ListProjectsRequest { user_id: 7 };
        assert_eq!(
            serde_json::to_value(&list).expect("serialize"),
            serde_json::json!({"userId": 7})
        );

        let merge = MergeMergeRequestRequest {
            depot_id: 12,
            merge_id: 3,
            message: "m",
            is_del_source_branch: true,
            is_fast_forward: false,
            squash: false,
        };
        assert_eq!(
            serde_json::to_value(&merge).expect("serialize"),
            serde_json::json!({
                "DepotId": 12,
                "MergeId": 3,
                "Message": "m",
                "IsDelSourceBranch": true,
                "IsFastForward": false,
                "Squash": false,
            })
        );

        let empty = ApiRequest {
            action: actions::DESCRIBE_CURRENT_USER,
            fields: &NoPayload {},
        };
        assert_eq!(
            serde_json::to_value(&empty).expect("serialize"),
            serde_json::json!({"Action": "DescribeCodingCurrentUser"})
        );
    }

    #[test]
    fn test_envelope_with_null_error_has_no_error() {
        let resp: ApiResponse<FindProjectPayload> = decode(serde_json::json!({
            "Response": {
                "RequestId": "r1",
                "Error": null,
                "Project": {"Id": 42, "Name": "acme", "Icon": null}
            }
        }));
        let envelope = resp.response.expect("response");
        assert_eq!(envelope.request_id, "r1");
        assert!(envelope.error.is_none());
        let project = envelope.payload.project.expect("project");
        assert_eq!(project.id, 42);
        assert_eq!(project.name, "acme");
        assert_eq!(project.icon, "");
    }

    #[test]
    fn test_envelope_with_error_object() {
        let resp: ApiResponse<NoPayload> = decode(serde_json::json!({
            "Response": {
                "RequestId": "r2",
                "Error": {"Message": "denied", "Code": "AuthFailure"}
            }
        }));
        let error = resp.response.expect("response").error.expect("error");
        assert_eq!(error.message, "denied");
        assert_eq!(error.code, "AuthFailure");
    }

    #[test]
    fn test_envelope_without_response_object() {
        let resp: ApiResponse<NoPayload> = decode(serde_json::json!({}));
        assert!(resp.response.is_none());
    }

    #[test]
    fn test_user_null_email_decodes_as_none() {
        let resp: ApiResponse<CurrentUserPayload> = decode(serde_json::json!({
            "Response": {
                "RequestId": "r3",
                "User": {"Id": 1, "Name": "Alice", "NamePinYin": "alice", "Email": null, "Status": 1}
            }
        }));
        let user = resp
            .response
            .expect("response")
            .payload
            .user
            .expect("user");
        assert_eq!(user.id, 1);
        assert_eq!(user.name_pin_yin, "alice");
        assert!(user.email.is_none());
    }

    #[test]
    fn test_member_page_keeps_null_slots() {
        let resp: ApiResponse<ProjectMembersPayload> = decode(serde_json::json!({
            "Response": {
                "RequestId": "r4",
                "Data": {
                    "PageNumber": 1,
                    "PageSize": 1000,
                    "TotalCount": 2,
                    "ProjectMembers": [
                        {"Id": 1, "Email": "a@x.io", "Roles": [{"RoleType": "ProjectMember", "RoleId": 1}]},
                        null
                    ]
                }
            }
        }));
        let page = resp.response.expect("response").payload.data;
        assert_eq!(page.total_count, 2);
        assert_eq!(page.project_members.len(), 2);
        assert!(page.project_members[1].is_none());
    }

    #[test]
    fn test_push_payload_field_names() {
        let payload: PushHookPayload = serde_json::from_value(serde_json::json!({
            "event": "GIT_PUSHED",
            "eventName": "push",
            "ref": "refs/heads/main",
            "head_commit": {"id": "abc", "committer": {"username": "bob"}, "added": ["a.rs"]},
            "repository": {"full_name": "user/acme/repo1", "created_at": 1600000000000i64}
        }))
        .expect("push payload");
        assert_eq!(payload.event_name, "push");
        assert_eq!(payload.ref_name, "refs/heads/main");
        assert_eq!(payload.head_commit.committer.username, "bob");
        assert_eq!(payload.head_commit.added, vec!["a.rs".to_string()]);
        assert_eq!(payload.repository.created_at, 1_600_000_000_000);
    }

    #[test]
    fn test_access_level_levels_and_perms() {
        assert_eq!(AccessLevel::Owner.level(), 50);
        assert_eq!(AccessLevel::try_from(30), Ok(AccessLevel::Developer));
        assert_eq!(AccessLevel::try_from(35), Err(35));
        assert_eq!(AccessLevel::Guest.to_string(), "guest");

        assert_eq!(
            AccessLevel::Owner.perm(),
            Perm {
                pull: true,
                push: true,
                admin: true
            }
        );
        assert_eq!(
            AccessLevel::Developer.perm(),
            Perm {
                pull: true,
                push: true,
                admin: false
            }
        );
        assert_eq!(AccessLevel::No.perm(), Perm::default());
    }

    #[test]
    fn test_visibility_strings() {
        for vis in [Visibility::Private, Visibility::Internal, Visibility::Public] {
            assert_eq!(vis.as_str().parse::<Visibility>(), Ok(vis));
        }
        assert!(Visibility::Private.is_private());
        assert!(Visibility::Internal.is_private());
        assert!(!Visibility::Public.is_private());
        assert!("secret".parse::<Visibility>().is_err());
    }
}
