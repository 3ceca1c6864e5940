use std::sync::Arc;

use async_trait::async_trait;

use super::client::CodingClient;
use super::convert::{convert_repository, convert_repository_list};
use super::error::CodingError;
use super::org::CodingOrganizationService;
use super::types::{
    CreateDepotPayload, CreateDepotRequest, DescribeDepotPayload, DescribeDepotRequest,
    ProjectDepotsPayload, ProjectDepotsRequest, actions,
};
use crate::platform::{
    CombinedStatus, Hook, HookInput, Invitation, Label, ListOptions, OrganizationService, Perm,
    Repository, RepositoryInput, RepositoryService, Response, Result, ScmError, Status,
    StatusInput, User,
};

/// Repositories backed by Coding git depots.
#[derive(Clone)]
pub struct CodingRepositoryService {
    client: Arc<CodingClient>,
}

/// Split a repository identifier into `(project, depot)`.
///
/// Accepts `project/depot` and `user/project/depot`; the leading user segment
/// is dropped.
pub fn split_repo_name(repo: &str) -> std::result::Result<(&str, &str), CodingError> {
    let segments: Vec<&str> = repo.split('/').collect();
    match segments.as_slice() {
        [project, depot] | [_, project, depot] => Ok((*project, *depot)),
        _ => Err(CodingError::InvalidRepoName(repo.to_string())),
    }
}

impl CodingRepositoryService {
    pub fn new(client: Arc<CodingClient>) -> Self {
        Self { client }
    }

    fn organizations(&self) -> CodingOrganizationService {
        CodingOrganizationService::new(self.client.clone())
    }

    /// Fetch one depot by id.
    async fn describe_depot(&self, depot_id: i64) -> Result<(Repository, Response)> {
        let (payload, res): (DescribeDepotPayload, Response) = self
            .client
            .call(actions::DESCRIBE_GIT_DEPOT, &DescribeDepotRequest { depot_id })
            .await?;
        let depot = payload.depot.ok_or(CodingError::MissingPayload("Depot"))?;
        Ok((convert_repository(&depot)?, res))
    }

    /// All depots of a project, unpaginated.
    pub async fn list_project_repositories(
        &self,
        project: &str,
    ) -> Result<(Vec<Repository>, Response)> {
        let (org, _) = self.organizations().find(project).await?;
        let (payload, res): (ProjectDepotsPayload, Response) = self
            .client
            .call(
                actions::DESCRIBE_PROJECT_DEPOTS,
                &ProjectDepotsRequest { project_id: org.id },
            )
            .await?;
        let repos = match payload.depot_data {
            Some(data) => convert_repository_list(&data.depots),
            None => Vec::new(),
        };
        Ok((repos, res))
    }
}

#[async_trait]
impl RepositoryService for CodingRepositoryService {
    async fn create(&self, input: &RepositoryInput) -> Result<(Repository, Response)> {
        let (project, name) = match input.name.split_once('/') {
            Some((project, name)) if !name.contains('/') => (project, name),
            _ => (input.namespace.as_str(), input.name.as_str()),
        };

        let (org, _) = self.organizations().find(project).await?;
        let (created, res): (CreateDepotPayload, Response) = self
            .client
            .call(
                actions::CREATE_GIT_DEPOT,
                &CreateDepotRequest {
                    project_id: org.id,
                    depot_name: name,
                    description: &input.description,
                },
            )
            .await?;

        tracing::debug!(project, depot_id = created.depot_id, "Created depot");
        let (repo, _) = self.describe_depot(created.depot_id).await?;
        Ok((repo, res))
    }

    async fn fork(
        &self,
        _input: &RepositoryInput,
        _origin: &str,
    ) -> Result<(Repository, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find(&self, repo: &str) -> Result<(Repository, Response)> {
        let (project, depot) = split_repo_name(repo)?;
        let wanted = format!("{project}/{depot}");

        let (repos, res) = self.list_project_repositories(project).await?;
        match repos.into_iter().find(|r| r.name == wanted) {
            Some(mut found) => {
                found.full_name = repo.to_string();
                Ok((found, res))
            }
            None => Err(CodingError::RepoNotFound(repo.to_string()).into()),
        }
    }

    async fn find_hook(&self, _repo: &str, _id: &str) -> Result<(Hook, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find_perms(&self, _repo: &str) -> Result<(Perm, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find_combined_status(
        &self,
        _repo: &str,
        _reference: &str,
    ) -> Result<(CombinedStatus, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find_user_permission(&self, _repo: &str, _user: &str) -> Result<(String, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn add_collaborator(
        &self,
        _repo: &str,
        _user: &str,
        _permission: &str,
    ) -> Result<(Option<Invitation>, bool, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn is_collaborator(&self, _repo: &str, _user: &str) -> Result<(bool, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_collaborators(
        &self,
        _repo: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<User>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list(&self, _opts: ListOptions) -> Result<(Vec<Repository>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_organisation(
        &self,
        _org: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<Repository>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_user(
        &self,
        _user: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<Repository>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_labels(&self, _repo: &str, _opts: ListOptions) -> Result<(Vec<Label>, Response)> {
        Err(ScmError::NotSupported)
    }

    /// Hooks are configured out-of-band on Coding; always empty.
    async fn list_hooks(&self, _repo: &str, _opts: ListOptions) -> Result<(Vec<Hook>, Response)> {
        Ok((Vec::new(), Response::synthetic(200)))
    }

    async fn list_status(
        &self,
        _repo: &str,
        _reference: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<Status>, Response)> {
        Err(ScmError::NotSupported)
    }

    /// Accepted and ignored; hooks are configured out-of-band on Coding.
    async fn create_hook(
        &self,
        repo: &str,
        input: &HookInput,
    ) -> Result<(Option<Hook>, Response)> {
        tracing::debug!(repo, hook_url = %input.target, "Ignoring hook registration");
        Ok((None, Response::default()))
    }

    async fn update_hook(
        &self,
        _repo: &str,
        _id: &str,
        _input: &HookInput,
    ) -> Result<(Hook, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn create_status(
        &self,
        _repo: &str,
        _reference: &str,
        _input: &StatusInput,
    ) -> Result<(Status, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn delete_hook(&self, _repo: &str, _id: &str) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn delete(&self, _repo: &str) -> Result<Response> {
        Err(ScmError::NotSupported)
    }
}
