use std::sync::Arc;

use async_trait::async_trait;

use super::client::CodingClient;
use super::convert::convert_merge_request_info;
use super::error::CodingError;
use super::repo::CodingRepositoryService;
use super::types::{
    CreateMergeRequestPayload, CreateMergeRequestRequest, DescribeMergeRequestPayload,
    MergeMergeRequestRequest, MergeRequestRef, NoPayload, actions,
};
use crate::platform::{
    Change, Comment, CommentInput, Label, ListOptions, ListedIssueEvent, PullRequest,
    PullRequestInput, PullRequestListOptions, PullRequestMergeOptions, PullRequestService,
    RepositoryService, Response, Result, ScmError,
};

/// Pull requests backed by Coding merge requests.
#[derive(Clone)]
pub struct CodingPullRequestService {
    client: Arc<CodingClient>,
}

impl CodingPullRequestService {
    pub fn new(client: Arc<CodingClient>) -> Self {
        Self { client }
    }

    /// Resolve `repo` to its numeric depot id.
    async fn depot_id(&self, repo: &str) -> Result<i64> {
        let (found, _) = CodingRepositoryService::new(self.client.clone())
            .find(repo)
            .await?;
        let id = found
            .id
            .parse::<i64>()
            .map_err(|_| CodingError::InvalidDepotId(found.id.clone()))?;
        Ok(id)
    }
}

#[async_trait]
impl PullRequestService for CodingPullRequestService {
    async fn find(&self, repo: &str, number: i64) -> Result<(PullRequest, Response)> {
        let depot_id = self.depot_id(repo).await?;
        let (payload, res): (DescribeMergeRequestPayload, Response) = self
            .client
            .call(
                actions::DESCRIBE_MERGE_REQUEST,
                &MergeRequestRef {
                    depot_id,
                    merge_id: number,
                },
            )
            .await?;
        let info = payload
            .merge_request_info
            .ok_or(CodingError::MissingPayload("MergeRequestInfo"))?;
        Ok((convert_merge_request_info(number, &info), res))
    }

    async fn update(
        &self,
        _repo: &str,
        _number: i64,
        _input: &PullRequestInput,
    ) -> Result<(PullRequest, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find_comment(
        &self,
        _repo: &str,
        _number: i64,
        _id: i64,
    ) -> Result<(Comment, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list(
        &self,
        _repo: &str,
        _opts: &PullRequestListOptions,
    ) -> Result<(Vec<PullRequest>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_changes(
        &self,
        _repo: &str,
        _number: i64,
        _opts: ListOptions,
    ) -> Result<(Vec<Change>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn list_comments(
        &self,
        _repo: &str,
        _number: i64,
        _opts: ListOptions,
    ) -> Result<(Vec<Comment>, Response)> {
        Err(ScmError::NotSupported)
    }

    /// Labels are not exposed by the open-api; always empty.
    async fn list_labels(
        &self,
        _repo: &str,
        _number: i64,
        _opts: ListOptions,
    ) -> Result<(Vec<Label>, Response)> {
        Ok((Vec::new(), Response::default()))
    }

    async fn list_events(
        &self,
        _repo: &str,
        _number: i64,
        _opts: ListOptions,
    ) -> Result<(Vec<ListedIssueEvent>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn merge(
        &self,
        repo: &str,
        number: i64,
        options: &PullRequestMergeOptions,
    ) -> Result<Response> {
        let depot_id = self.depot_id(repo).await?;
        let (_, res): (NoPayload, Response) = self
            .client
            .call(
                actions::MERGE_MERGE_REQUEST,
                &MergeMergeRequestRequest {
                    depot_id,
                    merge_id: number,
                    message: &options.commit_title,
                    is_del_source_branch: options.delete_source_branch,
                    is_fast_forward: false,
                    squash: false,
                },
            )
            .await?;
        Ok(res)
    }

    async fn close(&self, repo: &str, number: i64) -> Result<Response> {
        let depot_id = self.depot_id(repo).await?;
        let (_, res): (NoPayload, Response) = self
            .client
            .call(
                actions::CLOSE_MERGE_REQUEST,
                &MergeRequestRef {
                    depot_id,
                    merge_id: number,
                },
            )
            .await?;
        Ok(res)
    }

    async fn reopen(&self, _repo: &str, _number: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn create(&self, repo: &str, input: &PullRequestInput) -> Result<(PullRequest, Response)> {
        let depot_id = self.depot_id(repo).await?;
        let (payload, res): (CreateMergeRequestPayload, Response) = self
            .client
            .call(
                actions::CREATE_MERGE_REQUEST,
                &CreateMergeRequestRequest {
                    depot_id,
                    title: &input.title,
                    content: &input.body,
                    src_branch: &input.head,
                    dest_branch: &input.base,
                },
            )
            .await?;
        let info = payload
            .merge_info
            .ok_or(CodingError::MissingPayload("MergeInfo"))?;

        let pr = PullRequest {
            number: info.merge_request_id,
            title: input.title.clone(),
            body: input.body.clone(),
            source: input.head.clone(),
            target: input.base.clone(),
            ..Default::default()
        };
        Ok((pr, res))
    }

    async fn create_comment(
        &self,
        _repo: &str,
        _number: i64,
        _input: &CommentInput,
    ) -> Result<(Comment, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn delete_comment(&self, _repo: &str, _number: i64, _id: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn edit_comment(
        &self,
        _repo: &str,
        _number: i64,
        _id: i64,
        _input: &CommentInput,
    ) -> Result<(Comment, Response)> {
        Err(ScmError::NotSupported)
    }

    /// Accepted and ignored.
    async fn add_label(&self, _repo: &str, _number: i64, _label: &str) -> Result<Response> {
        Ok(Response::default())
    }

    /// Accepted and ignored.
    async fn delete_label(&self, _repo: &str, _number: i64, _label: &str) -> Result<Response> {
        Ok(Response::default())
    }

    async fn set_milestone(&self, _repo: &str, _number: i64, _milestone: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn clear_milestone(&self, _repo: &str, _number: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn assign_issue(&self, _repo: &str, _number: i64, _logins: &[String]) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn unassign_issue(
        &self,
        _repo: &str,
        _number: i64,
        _logins: &[String],
    ) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn request_review(
        &self,
        _repo: &str,
        _number: i64,
        _logins: &[String],
    ) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn unrequest_review(
        &self,
        _repo: &str,
        _number: i64,
        _logins: &[String],
    ) -> Result<Response> {
        Err(ScmError::NotSupported)
    }
}
