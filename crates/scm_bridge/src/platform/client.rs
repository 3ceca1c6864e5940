use std::fmt;
use std::sync::Arc;

use url::Url;

use super::services::{
    OrganizationService, PullRequestService, RepositoryService, UserService, WebhookService,
};
use super::types::Driver;

/// A vendor-neutral client: one service per capability, all backed by the
/// same driver.
#[derive(Clone)]
pub struct Client {
    pub driver: Driver,
    pub base_url: Url,
    pub organizations: Arc<dyn OrganizationService>,
    pub repositories: Arc<dyn RepositoryService>,
    pub pull_requests: Arc<dyn PullRequestService>,
    pub users: Arc<dyn UserService>,
    pub webhooks: Arc<dyn WebhookService>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("driver", &self.driver)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
