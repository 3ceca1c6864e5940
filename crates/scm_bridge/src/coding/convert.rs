//! Conversion from Coding payloads to the vendor-neutral model.

use chrono::{DateTime, Utc};
use url::Url;

use super::error::CodingError;
use super::types::{
    CodingUser, DepotItem, HookBranch, HookRepository, HookUser, MergeRequestInfo, ProjectItem,
    ProjectMemberItem, PullRequestHookPayload, PushHookPayload,
};
use crate::platform::{
    Action, Commit, Organization, Perm, Permissions, PullRequest, PullRequestBranch,
    PullRequestHook, PullRequestState, PushHook, Repository, Signature, TeamMember, User,
};

/// Depot endpoints expose no per-repo permissions; the token owner gets all.
const DEPOT_PERM: Perm = Perm {
    pull: true,
    push: true,
    admin: true,
};

/// Owner, project, name and full name derived from a depot clone URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneUrlInfo {
    pub owner: String,
    pub project: String,
    /// `project/depot`.
    pub name: String,
    /// The trimmed URL path.
    pub full_name: String,
}

/// Split a depot HTTPS clone URL into its naming parts.
///
/// The path is trimmed of a `.git` suffix and surrounding slashes, then:
/// three segments are `owner/project/depot`, two are `project/depot` and a
/// single segment names everything.
pub fn info_from_clone_url(clone_url: &str) -> Result<CloneUrlInfo, CodingError> {
    let url = Url::parse(clone_url).map_err(|_| CodingError::InvalidCloneUrl(clone_url.into()))?;
    let path = url.path();
    let path = path.strip_suffix(".git").unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    let (owner, project, name) = match segments.as_slice() {
        [owner, project, depot] => (*owner, *project, format!("{project}/{depot}")),
        [project, depot] => (*project, *project, format!("{project}/{depot}")),
        [single] => (*single, *single, (*single).to_string()),
        _ => return Err(CodingError::InvalidCloneUrl(clone_url.into())),
    };

    Ok(CloneUrlInfo {
        owner: owner.to_string(),
        project: project.to_string(),
        name,
        full_name: path.to_string(),
    })
}

/// Map a merge request status onto the common state. Total: unknown and
/// empty statuses are closed.
pub fn pull_request_state(status: &str) -> PullRequestState {
    match status {
        "CANMERGE" => PullRequestState::Mergeable,
        "CANNOTMERGE" => PullRequestState::Conflict,
        "MERGING" => PullRequestState::CannotBeMerged,
        "CANCEL" | "REFUSED" => PullRequestState::Closed,
        _ => PullRequestState::Closed,
    }
}

/// Map a `GIT_MR_*` event name onto a pull request action.
pub fn convert_action(event: &str) -> Action {
    match event {
        "GIT_MR_CREATED" => Action::Create,
        "GIT_MR_UPDATED" => Action::Update,
        "GIT_MR_MERGED" => Action::Merge,
        "GIT_MR_CLOSED" => Action::Close,
        _ => Action::Unknown,
    }
}

pub fn convert_user(from: &CodingUser) -> User {
    User {
        id: from.id,
        login: from.name_pin_yin.clone(),
        name: from.name.clone(),
        email: from.email.clone().unwrap_or_default(),
        avatar: from.avatar.clone(),
    }
}

/// Projects map onto organizations; permission flags are never granted.
pub fn convert_organization(from: &ProjectItem) -> Organization {
    Organization {
        id: from.id,
        name: from.name.clone(),
        avatar: from.icon.clone(),
        permissions: Permissions::default(),
    }
}

pub fn convert_organization_list(from: &[Option<ProjectItem>]) -> Vec<Organization> {
    from.iter().flatten().map(convert_organization).collect()
}

/// Only the email survives; null entries are dropped.
pub fn convert_team_members(from: &[Option<ProjectMemberItem>]) -> Vec<TeamMember> {
    from.iter()
        .flatten()
        .map(|member| TeamMember {
            login: member.email.clone(),
            is_admin: false,
        })
        .collect()
}

/// Convert a depot. Depots are always private and fully accessible to the
/// token owner.
pub fn convert_repository(from: &DepotItem) -> Result<Repository, CodingError> {
    let info = info_from_clone_url(&from.https_url)?;
    Ok(Repository {
        id: from.id.to_string(),
        namespace: info.owner,
        name: info.name,
        full_name: info.full_name,
        perm: Some(DEPOT_PERM),
        branch: String::new(),
        private: true,
        clone: from.https_url.clone(),
        clone_ssh: from.ssh_url.clone(),
        link: from.web_url.clone(),
        created: None,
        updated: None,
    })
}

/// Convert every depot, skipping null slots and depots whose clone URL
/// cannot be named.
pub fn convert_repository_list(from: &[Option<DepotItem>]) -> Vec<Repository> {
    from.iter()
        .flatten()
        .filter_map(|depot| match convert_repository(depot) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!(depot_id = depot.id, depot = %depot.name, error = %e, "Skipping depot");
                None
            }
        })
        .collect()
}

/// Partial pull request from `DescribeMergeRequest`; the endpoint carries no
/// number, shas or author.
pub fn convert_merge_request_info(number: i64, from: &MergeRequestInfo) -> PullRequest {
    let state = pull_request_state(&from.status);
    PullRequest {
        number,
        title: from.title.clone(),
        body: from.describe.clone(),
        state: Some(state),
        source: from.source_branch.clone(),
        target: from.target_branch.clone(),
        head: PullRequestBranch {
            ref_name: from.source_branch.clone(),
            ..Default::default()
        },
        base: PullRequestBranch {
            ref_name: from.target_branch.clone(),
            ..Default::default()
        },
        closed: state == PullRequestState::Closed,
        ..Default::default()
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    DateTime::from_timestamp(millis / 1000, 0)
}

/// Convert a webhook repository, naming it from `full_name`
/// (`user/project/depot`).
pub fn convert_repository_hook(from: &HookRepository) -> Repository {
    let segments: Vec<&str> = from.full_name.split('/').collect();
    let namespace = segments.first().copied().unwrap_or_default().to_string();
    let name = if segments.len() > 2 {
        segments[1..].join("/")
    } else {
        segments.last().copied().unwrap_or_default().to_string()
    };

    Repository {
        id: from.id.to_string(),
        namespace,
        name,
        full_name: from.full_name.clone(),
        perm: None,
        branch: from.default_branch.clone(),
        private: from.private,
        clone: from.clone_url.clone(),
        clone_ssh: from.ssh_url.clone(),
        link: from.html_url.clone(),
        created: millis_to_datetime(from.created_at),
        updated: millis_to_datetime(from.updated_at),
    }
}

fn convert_hook_user(from: &HookUser) -> User {
    User {
        id: from.id,
        login: from.login.clone(),
        name: from.name.clone(),
        email: String::new(),
        avatar: from.avatar_url.clone(),
    }
}

fn convert_hook_branch(from: &HookBranch) -> PullRequestBranch {
    PullRequestBranch {
        ref_name: from.ref_name.clone(),
        sha: from.sha.clone(),
        repo: convert_repository_hook(&from.repo),
    }
}

pub fn convert_push_hook(src: &PushHookPayload) -> PushHook {
    let head = &src.head_commit;
    PushHook {
        ref_name: src.ref_name.clone(),
        repo: convert_repository_hook(&src.repository),
        before: src.before.clone(),
        after: src.after.clone(),
        compare: src.compare.clone(),
        commit: Commit {
            sha: head.id.clone(),
            message: head.message.clone(),
            author: Signature {
                login: head.author.username.clone(),
                name: head.author.name.clone(),
                email: head.author.email.clone(),
            },
            committer: Signature {
                login: head.committer.username.clone(),
                name: head.committer.name.clone(),
                email: head.committer.email.clone(),
            },
            link: head.url.clone(),
        },
        sender: convert_hook_user(&src.sender),
        guid: String::new(),
    }
}

/// Convert a merge request delivery; `event` is the header event name.
pub fn convert_pull_request_hook(src: &PullRequestHookPayload, event: &str) -> PullRequestHook {
    let mr = &src.merge_request;
    let state = pull_request_state(&mr.state);

    let pull_request = PullRequest {
        number: mr.number,
        title: mr.title.clone(),
        body: mr.body.clone(),
        state: Some(state),
        // Branch refs, not the repos' default branches: those name the
        // repository default and say nothing about this merge request.
        source: mr.head.ref_name.clone(),
        target: mr.base.ref_name.clone(),
        head: convert_hook_branch(&mr.head),
        base: convert_hook_branch(&mr.base),
        link: mr.html_url.clone(),
        closed: state == PullRequestState::Closed,
        merged: mr.merged,
        merge_sha: mr.merge_commit_sha.clone(),
        author: convert_hook_user(&mr.user),
    };

    PullRequestHook {
        action: convert_action(event),
        repo: convert_repository_hook(&src.repository),
        pull_request,
        sender: convert_hook_user(&src.sender),
        guid: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::types::HookMergeRequest;

    fn depot(url: &str) -> DepotItem {
        DepotItem {
            id: 7,
            name: "repo1".to_string(),
            https_url: url.to_string(),
            project_id: 42,
            ssh_url: "git@e.coding.net:user/acme/repo1.git".to_string(),
            web_url: "https://user.coding.net/p/acme/d/repo1/git".to_string(),
            vcs_type: "git".to_string(),
        }
    }

    #[test]
    fn test_info_from_clone_url_three_segments() {
        let info =
            info_from_clone_url("https://e.coding.net/user/acme/repo1.git").expect("valid url");
        assert_eq!(info.owner, "user");
        assert_eq!(info.project, "acme");
        assert_eq!(info.name, "acme/repo1");
        assert_eq!(info.full_name, "user/acme/repo1");
    }

    #[test]
    fn test_info_from_clone_url_two_segments() {
        let info = info_from_clone_url("https://e.coding.net/acme/repo1.git").expect("valid url");
        assert_eq!(info.owner, "acme");
        assert_eq!(info.project, "acme");
        assert_eq!(info.name, "acme/repo1");
        assert_eq!(info.full_name, "acme/repo1");
    }

    #[test]
    fn test_info_from_clone_url_one_segment() {
        let info = info_from_clone_url("https://e.coding.net/solo/").expect("valid url");
        assert_eq!(info.owner, "solo");
        assert_eq!(info.project, "solo");
        assert_eq!(info.name, "solo");
        assert_eq!(info.full_name, "solo");
    }

    #[test]
    fn test_info_from_clone_url_rejects_other_shapes() {
        assert!(matches!(
            info_from_clone_url("https://e.coding.net/a/b/c/d.git"),
            Err(CodingError::InvalidCloneUrl(_))
        ));
        assert!(matches!(
            info_from_clone_url("no scheme"),
            Err(CodingError::InvalidCloneUrl(_))
        ));
    }

    #[test]
    fn test_info_from_clone_url_is_idempotent() {
        let url = "https://e.coding.net/user/acme/repo1.git";
        let first = info_from_clone_url(url).expect("valid url");
        let second = info_from_clone_url(url).expect("valid url");
        assert_eq!(first, second);
    }

    #[test]
    fn test_pull_request_state_is_total() {
        assert_eq!(pull_request_state("CANMERGE"), PullRequestState::Mergeable);
        assert_eq!(pull_request_state("CANNOTMERGE"), PullRequestState::Conflict);
        assert_eq!(pull_request_state("MERGING"), PullRequestState::CannotBeMerged);
        assert_eq!(pull_request_state("REFUSED"), PullRequestState::Closed);
        assert_eq!(pull_request_state("CANCEL"), PullRequestState::Closed);
        assert_eq!(pull_request_state(""), PullRequestState::Closed);
        assert_eq!(pull_request_state("canmerge"), PullRequestState::Closed);
        assert_eq!(pull_request_state("ACCEPTED"), PullRequestState::Closed);
    }

    #[test]
    fn test_convert_action() {
        assert_eq!(convert_action("GIT_MR_CREATED"), Action::Create);
        assert_eq!(convert_action("GIT_MR_UPDATED"), Action::Update);
        assert_eq!(convert_action("GIT_MR_MERGED"), Action::Merge);
        assert_eq!(convert_action("GIT_MR_CLOSED"), Action::Close);
        assert_eq!(convert_action("GIT_PUSHED"), Action::Unknown);
    }

    #[test]
    fn test_convert_user_uses_pinyin_login() {
        let user = convert_user(&CodingUser {
            id: 9,
            name: "爱丽丝".to_string(),
            name_pin_yin: "ailisi".to_string(),
            email: None,
            avatar: "https://a/x.png".to_string(),
            ..Default::default()
        });
        assert_eq!(user.id, 9);
        assert_eq!(user.login, "ailisi");
        assert_eq!(user.name, "爱丽丝");
        assert_eq!(user.email, "");
        assert_eq!(user.avatar, "https://a/x.png");
    }

    #[test]
    fn test_convert_organization_never_grants_permissions() {
        let org = convert_organization(&ProjectItem {
            id: 42,
            name: "acme".to_string(),
            icon: "https://a/icon.png".to_string(),
            archived: true,
            ..Default::default()
        });
        assert_eq!(org.id, 42);
        assert_eq!(org.name, "acme");
        assert_eq!(org.avatar, "https://a/icon.png");
        assert_eq!(org.permissions, Permissions::default());
    }

    #[test]
    fn test_convert_team_members_filters_null_entries() {
        let members = convert_team_members(&[
            Some(ProjectMemberItem {
                name: "Alice".to_string(),
                email: "alice@acme.io".to_string(),
                ..Default::default()
            }),
            None,
            Some(ProjectMemberItem {
                email: "bob@acme.io".to_string(),
                ..Default::default()
            }),
        ]);
        let logins: Vec<&str> = members.iter().map(|m| m.login.as_str()).collect();
        assert_eq!(logins, vec!["alice@acme.io", "bob@acme.io"]);
        assert!(members.iter().all(|m| !m.is_admin));
    }

    #[test]
    fn test_convert_repository() {
        let repo = convert_repository(&depot("https://e.coding.net/user/acme/repo1.git"))
            .expect("valid depot");
        assert_eq!(repo.id, "7");
        assert_eq!(repo.namespace, "user");
        assert_eq!(repo.name, "acme/repo1");
        assert_eq!(repo.full_name, "user/acme/repo1");
        assert!(repo.private);
        assert_eq!(
            repo.perm,
            Some(crate::platform::Perm {
                pull: true,
                push: true,
                admin: true
            })
        );
        assert_eq!(repo.clone, "https://e.coding.net/user/acme/repo1.git");
        assert_eq!(repo.clone_ssh, "git@e.coding.net:user/acme/repo1.git");
        assert_eq!(repo.link, "https://user.coding.net/p/acme/d/repo1/git");
    }

    #[test]
    fn test_convert_repository_list_skips_bad_url() {
        let repos = convert_repository_list(&[
            Some(depot("https://e.coding.net/user/acme/repo1.git")),
            Some(depot("https://e.coding.net/a/b/c/d.git")),
            Some(depot("not a url")),
        ]);
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "user/acme/repo1");

        let repos = convert_repository_list(&[None, Some(depot("https://e.coding.net/acme/r.git"))]);
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn test_convert_merge_request_info() {
        let pr = convert_merge_request_info(
            3,
            &MergeRequestInfo {
                describe: "body".to_string(),
                status: "CANMERGE".to_string(),
                title: "Add feature".to_string(),
                target_branch: "main".to_string(),
                source_branch: "feature".to_string(),
            },
        );
        assert_eq!(pr.number, 3);
        assert_eq!(pr.title, "Add feature");
        assert_eq!(pr.body, "body");
        assert_eq!(pr.state, Some(PullRequestState::Mergeable));
        assert_eq!(pr.source, "feature");
        assert_eq!(pr.target, "main");
        assert_eq!(pr.head.ref_name, "feature");
        assert_eq!(pr.base.ref_name, "main");
        assert!(!pr.closed);
        assert!(pr.head.sha.is_empty());
        assert!(pr.link.is_empty());
    }

    #[test]
    fn test_convert_repository_hook_names() {
        let repo = convert_repository_hook(&HookRepository {
            id: 7,
            full_name: "user/acme/repo1".to_string(),
            default_branch: "master".to_string(),
            created_at: 1_600_000_000_123,
            updated_at: 0,
            ..Default::default()
        });
        assert_eq!(repo.id, "7");
        assert_eq!(repo.namespace, "user");
        assert_eq!(repo.name, "acme/repo1");
        assert_eq!(repo.branch, "master");
        assert_eq!(
            repo.created.map(|t| t.timestamp()),
            Some(1_600_000_000)
        );
        assert_eq!(repo.updated, None);

        let repo = convert_repository_hook(&HookRepository {
            full_name: "acme/repo1".to_string(),
            ..Default::default()
        });
        assert_eq!(repo.namespace, "acme");
        assert_eq!(repo.name, "repo1");
    }

    #[test]
    fn test_hook_and_clone_url_naming_agree_for_three_segments() {
        let hook_repo = convert_repository_hook(&HookRepository {
            full_name: "user/acme/repo1".to_string(),
            ..Default::default()
        });
        let depot_repo = convert_repository(&depot("https://e.coding.net/user/acme/repo1.git"))
            .expect("valid depot");
        assert_eq!(hook_repo.namespace, depot_repo.namespace);
        assert_eq!(hook_repo.name, depot_repo.name);
    }

    #[test]
    fn test_convert_pull_request_hook_uses_branch_refs() {
        let src = PullRequestHookPayload {
            merge_request: HookMergeRequest {
                number: 5,
                state: "REFUSED".to_string(),
                title: "Fix".to_string(),
                html_url: "https://user.coding.net/p/acme/d/repo1/git/merge/5".to_string(),
                merge_commit_sha: "deadbeef".to_string(),
                head: HookBranch {
                    ref_name: "feature".to_string(),
                    sha: "aaa".to_string(),
                    repo: HookRepository {
                        full_name: "user/acme/repo1".to_string(),
                        default_branch: "master".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                base: HookBranch {
                    ref_name: "release".to_string(),
                    sha: "bbb".to_string(),
                    ..Default::default()
                },
                user: HookUser {
                    login: "alice".to_string(),
                    avatar_url: "https://a/alice.png".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            repository: HookRepository {
                full_name: "user/acme/repo1".to_string(),
                ..Default::default()
            },
            sender: HookUser {
                login: "bob".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let hook = convert_pull_request_hook(&src, "GIT_MR_CLOSED");
        assert_eq!(hook.action, Action::Close);
        assert_eq!(hook.repo.name, "acme/repo1");
        assert_eq!(hook.sender.login, "bob");

        let pr = &hook.pull_request;
        assert_eq!(pr.number, 5);
        assert_eq!(pr.state, Some(PullRequestState::Closed));
        assert!(pr.closed);
        assert_eq!(pr.source, "feature");
        assert_eq!(pr.target, "release");
        assert_eq!(pr.head.sha, "aaa");
        assert_eq!(pr.base.sha, "bbb");
        assert_eq!(pr.head.repo.name, "acme/repo1");
        assert_eq!(pr.merge_sha, "deadbeef");
        assert_eq!(pr.author.login, "alice");
        assert_eq!(pr.author.avatar, "https://a/alice.png");
        assert!(pr.author.email.is_empty());
    }
}
