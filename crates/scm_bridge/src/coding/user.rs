use std::sync::Arc;

use async_trait::async_trait;

use super::client::CodingClient;
use super::convert::convert_user;
use super::error::CodingError;
use super::types::{CurrentUserPayload, NoPayload, actions};
use crate::platform::{Invitation, Response, Result, ScmError, User, UserService, UserToken};

/// Users backed by `DescribeCodingCurrentUser`.
#[derive(Clone)]
pub struct CodingUserService {
    client: Arc<CodingClient>,
}

impl CodingUserService {
    pub fn new(client: Arc<CodingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserService for CodingUserService {
    async fn find(&self) -> Result<(User, Response)> {
        let (payload, res): (CurrentUserPayload, Response) = self
            .client
            .call(actions::DESCRIBE_CURRENT_USER, &NoPayload {})
            .await?;
        let user = payload.user.ok_or(CodingError::MissingPayload("User"))?;
        Ok((convert_user(&user), res))
    }

    async fn find_login(&self, _login: &str) -> Result<(User, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn find_email(&self) -> Result<(String, Response)> {
        let (user, res) = self.find().await?;
        Ok((user.email, res))
    }

    async fn create_token(&self, _user: &str, _token: &str) -> Result<(UserToken, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn delete_token(&self, _id: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }

    async fn list_invitations(&self) -> Result<(Vec<Invitation>, Response)> {
        Err(ScmError::NotSupported)
    }

    async fn accept_invitation(&self, _id: i64) -> Result<Response> {
        Err(ScmError::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    const URL: &str = "https://e.coding.net/open-api";

    fn service(transport: &MockTransport) -> CodingUserService {
        let client = CodingClient::new_with_transport(URL, "t0k", Arc::new(transport.clone()))
            .expect("client should build");
        CodingUserService::new(Arc::new(client))
    }

    fn user_response() -> serde_json::Value {
        serde_json::json!({
            "Response": {
                "RequestId": "req-user",
                "User": {
                    "Id": 7,
                    "Status": 1,
                    "Email": "alice@acme.io",
                    "GlobalKey": "alice",
                    "Avatar": "https://coding-net-production-static.example/alice.png",
                    "Name": "Alice",
                    "NamePinYin": "alice",
                    "Phone": null,
                    "TeamId": 3
                }
            }
        })
    }

    #[tokio::test]
    async fn test_find_converts_current_user() {
        let transport = MockTransport::new();
        transport.push_json(URL, user_response());

        let (user, res) = service(&transport).find().await.expect("find should succeed");
        assert_eq!(res.id, "req-user");
        assert_eq!(user.id, 7);
        assert_eq!(user.login, "alice");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@acme.io");

        assert_eq!(
            transport.request_bodies(),
            vec![serde_json::json!({"Action": "DescribeCodingCurrentUser"})]
        );
    }

    #[tokio::test]
    async fn test_find_surfaces_embedded_error() {
        let transport = MockTransport::new();
        transport.push_json(
            URL,
            serde_json::json!({
                "Response": {"RequestId": "r", "Error": {"Message": "token expired", "Code": "AuthFailure"}}
            }),
        );

        let err = service(&transport).find().await.expect_err("should fail");
        match err {
            ScmError::Api { message } => assert_eq!(message, "token expired"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_without_user_payload_is_internal() {
        let transport = MockTransport::new();
        transport.push_json(URL, serde_json::json!({"Response": {"RequestId": "r"}}));

        let err = service(&transport).find().await.expect_err("should fail");
        assert!(matches!(err, ScmError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_find_email_composes_on_find() {
        let transport = MockTransport::new();
        transport.push_json(URL, user_response());

        let (email, res) = service(&transport)
            .find_email()
            .await
            .expect("find_email should succeed");
        assert_eq!(email, "alice@acme.io");
        assert_eq!(res.id, "req-user");
    }

    #[tokio::test]
    async fn test_find_email_null_is_empty() {
        let transport = MockTransport::new();
        transport.push_json(
            URL,
            serde_json::json!({"Response": {"RequestId": "r", "User": {"Id": 1, "Email": null}}}),
        );

        let (email, _) = service(&transport)
            .find_email()
            .await
            .expect("find_email should succeed");
        assert_eq!(email, "");
    }

    #[tokio::test]
    async fn test_unsupported_operations_send_nothing() {
        let transport = MockTransport::new();
        let svc = service(&transport);

        assert!(svc.find_login("bob").await.expect_err("unsupported").is_not_supported());
        assert!(svc.create_token("bob", "t").await.expect_err("unsupported").is_not_supported());
        assert!(svc.delete_token(1).await.expect_err("unsupported").is_not_supported());
        assert!(svc.list_invitations().await.expect_err("unsupported").is_not_supported());
        assert!(svc.accept_invitation(1).await.expect_err("unsupported").is_not_supported());
        assert!(transport.requests().is_empty());
    }
}
