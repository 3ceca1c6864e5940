//! Coding (e.coding.net) driver.
//!
//! Every outbound call is a POST of a JSON envelope to the open-api root:
//! the operation name travels in an `Action` field next to its parameters,
//! and the answer comes back wrapped in a `Response` object that carries
//! either the payload or an embedded `Error`. See [`CodingClient::call`].
//!
//! Coding concepts map onto the common model as follows:
//!
//! | Coding        | Common model   |
//! |---------------|----------------|
//! | project       | organization   |
//! | depot         | repository     |
//! | merge request | pull request   |
//!
//! Repositories are addressed as `project/depot` or `team/project/depot`.
//! Anything the open-api cannot express fails with
//! [`ScmError::NotSupported`](crate::ScmError::NotSupported).

mod client;
mod convert;
mod error;
mod org;
mod pr;
mod repo;
mod types;
mod user;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

pub use client::{CodingClient, DEFAULT_BASE_URL, normalize_base_url};
pub use convert::{CloneUrlInfo, info_from_clone_url, pull_request_state};
pub use error::CodingError;
pub use org::CodingOrganizationService;
pub use pr::CodingPullRequestService;
pub use repo::{CodingRepositoryService, split_repo_name};
pub use types::{AccessLevel, Visibility};
pub use user::CodingUserService;
pub use webhook::{CodingWebhookService, DELIVERY_HEADER, EVENT_HEADER, TOKEN_HEADER};

use crate::http::HttpTransport;
use crate::platform::{Client, Driver, Result};

/// Build a [`Client`] for the Coding instance at `uri`.
///
/// A bare host such as `https://e.coding.net` is completed with the
/// `/open-api` path. An empty `token` sends unauthenticated requests.
pub fn new_client(uri: &str, token: &str) -> Result<Client> {
    Ok(client_from(CodingClient::new(uri, token)?))
}

/// Like [`new_client`] with a custom request timeout.
pub fn new_client_with_timeout(uri: &str, token: &str, timeout: Duration) -> Result<Client> {
    Ok(client_from(CodingClient::with_timeout(uri, token, timeout)?))
}

/// Like [`new_client`] but over a caller-supplied transport.
pub fn new_client_with_transport(
    uri: &str,
    token: &str,
    transport: Arc<dyn HttpTransport>,
) -> Result<Client> {
    Ok(client_from(CodingClient::new_with_transport(
        uri, token, transport,
    )?))
}

/// Unauthenticated client for the public endpoint.
pub fn default_client() -> Result<Client> {
    Ok(client_from(CodingClient::default_client()?))
}

/// Client for the public endpoint using `token`.
pub fn default_client_with_token(token: &str) -> Result<Client> {
    Ok(client_from(CodingClient::with_token(token)?))
}

fn client_from(client: CodingClient) -> Client {
    let base_url = client.base_url().clone();
    let client = Arc::new(client);
    Client {
        driver: Driver::Coding,
        base_url,
        organizations: Arc::new(CodingOrganizationService::new(client.clone())),
        repositories: Arc::new(CodingRepositoryService::new(client.clone())),
        pull_requests: Arc::new(CodingPullRequestService::new(client.clone())),
        users: Arc::new(CodingUserService::new(client)),
        webhooks: Arc::new(CodingWebhookService::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    #[test]
    fn test_new_client_wires_coding_driver() {
        let client = new_client_with_transport(
            "https://e.coding.net",
            "t0k",
            Arc::new(MockTransport::new()),
        )
        .expect("client should build");
        assert_eq!(client.driver, Driver::Coding);
        assert_eq!(client.base_url.as_str(), "https://e.coding.net/open-api");
    }

    #[test]
    fn test_default_client_targets_public_endpoint() {
        let client = default_client().expect("default client should build");
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);

        let client = default_client_with_token("t0k").expect("client should build");
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_new_client_rejects_garbage_url() {
        let err = new_client("not a url", "t0k").expect_err("should fail");
        assert!(matches!(err, crate::ScmError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_client_services_share_transport() {
        let transport = MockTransport::new();
        transport.push_json(
            DEFAULT_BASE_URL,
            serde_json::json!({"Response": {"RequestId": "r", "User": {"Id": 7, "NamePinYin": "alice"}}}),
        );
        let client = new_client_with_transport(DEFAULT_BASE_URL, "t0k", Arc::new(transport.clone()))
            .expect("client should build");

        let (user, _) = client.users.find().await.expect("find should succeed");
        assert_eq!(user.login, "alice");
        assert_eq!(transport.requests().len(), 1);
    }
}
