use std::sync::Arc;

use async_trait::async_trait;

use super::client::CodingClient;
use super::convert::{convert_organization, convert_organization_list, convert_team_members};
use super::error::CodingError;
use super::types::{
    FindProjectPayload, FindProjectRequest, ListProjectMembersRequest, ListProjectsRequest,
    ProjectListPayload, ProjectMembersPayload, actions,
};
use super::user::CodingUserService;
use crate::platform::{
    ListOptions, Membership, Organization, OrganizationInput, OrganizationPendingInvite,
    OrganizationService, Response, Result, ScmError, Team, TeamMember, UserService,
};

/// Members are fetched as a single page of this size.
const MEMBER_PAGE_SIZE: u32 = 1000;

/// Organizations backed by Coding projects.
#[derive(Clone)]
pub struct CodingOrganizationService {
    client: Arc<CodingClient>,
}

impl CodingOrganizationService {
    pub fn new(client: Arc<CodingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrganizationService for CodingOrganizationService {
    async fn create(&self, _input: &OrganizationInput) -> Result<(Organization, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn delete(&self, _name: &str) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn find(&self, name: &str) -> Result<(Organization, Response)> {
        let (payload, res): (FindProjectPayload, Response) = self
            .client
            .call(
                actions::DESCRIBE_PROJECT_BY_NAME,
                &FindProjectRequest { project_name: name },
            )
            .await?;
        let project = payload
            .project
            .ok_or(CodingError::MissingPayload("Project"))?;
        Ok((convert_organization(&project), res))
    }

    async fn find_membership(&self, _name: &str) -> Result<(Membership, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list(&self, _opts: ListOptions) -> Result<(Vec<Organization>, Response)> {
        let (user, _) = CodingUserService::new(self.client.clone()).find().await?;
        let (payload, res): (ProjectListPayload, Response) = self
            .client
            .call(
                actions::DESCRIBE_USER_PROJECTS,
                &ListProjectsRequest { user_id: user.id },
            )
            .await?;
        Ok((convert_organization_list(&payload.project_list), res))
    }

    async fn list_memberships(&self, _opts: ListOptions) -> Result<(Vec<Membership>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_org_members(
        &self,
        org: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<TeamMember>, Response)> {
        let (project, _) = self.find(org).await?;
        let (payload, res): (ProjectMembersPayload, Response) = self
            .client
            .call(
                actions::DESCRIBE_PROJECT_MEMBERS,
                &ListProjectMembersRequest {
                    project_id: project.id,
                    page_number: 1,
                    page_size: MEMBER_PAGE_SIZE,
                },
            )
            .await?;

        let page = payload.data;
        let returned = page.project_members.len();
        if page.total_count as usize > returned {
            tracing::warn!(
                org,
                total = page.total_count,
                returned,
                "Project member list truncated to the first page"
            );
        }
        Ok((convert_team_members(&page.project_members), res))
    }

    async fn list_pending_invitations(
        &self,
        _org: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<OrganizationPendingInvite>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn accept_organization_invitation(&self, _org: &str) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn list_teams(&self, _org: &str, _opts: ListOptions) -> Result<(Vec<Team>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_team_members(
        &self,
        _team_id: i64,
        _role: &str,
        _opts: ListOptions,
    ) -> Result<(Vec<TeamMember>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn is_member(&self, _org: &str, _user: &str) -> Result<(bool, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn is_admin(&self, _org: &str, _user: &str) -> Result<(bool, Response)> {
        Err(ScmError::NotSupported)
    }
}
