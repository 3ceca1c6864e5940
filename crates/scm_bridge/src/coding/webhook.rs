use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;

use super::convert::{convert_pull_request_hook, convert_push_hook};
use super::error::CodingError;
use super::types::{PullRequestHookPayload, PushHookPayload};
use crate::platform::{
    MAX_PAYLOAD_BYTES, Result, ScmError, SecretFunc, Webhook, WebhookRequest, WebhookService,
    strip_null_values,
};

pub const EVENT_HEADER: &str = "X-Coding-Service-Hook-Event";
pub const DELIVERY_HEADER: &str = "X-Coding-Service-Hook-Id";
/// Coding sends the configured hook token under the GitLab-compatible name.
pub const TOKEN_HEADER: &str = "X-Gitlab-Token";

const PUSH_EVENT: &str = "GIT_PUSHED";
const MERGE_REQUEST_EVENTS: [&str; 4] = [
    "GIT_MR_CREATED",
    "GIT_MR_UPDATED",
    "GIT_MR_MERGED",
    "GIT_MR_CLOSED",
];

/// Parses `X-Coding-Service-Hook-*` deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodingWebhookService;

impl CodingWebhookService {
    pub fn new() -> Self {
        Self
    }
}

/// Deliveries carry `null` for absent members (`before` on branch creation,
/// an empty description); those take their defaults.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(CodingError::from)?;
    Ok(serde_json::from_value(strip_null_values(value)).map_err(CodingError::from)?)
}

impl WebhookService for CodingWebhookService {
    fn parse(&self, req: &WebhookRequest, secret: &SecretFunc<'_>) -> Result<Webhook> {
        if req.body.len() > MAX_PAYLOAD_BYTES {
            return Err(ScmError::PayloadTooLarge {
                limit: MAX_PAYLOAD_BYTES,
            });
        }

        let event = req.header(EVENT_HEADER).unwrap_or_default();
        let guid = req.header(DELIVERY_HEADER).unwrap_or_default().to_string();

        let hook = if event == PUSH_EVENT {
            let mut hook = convert_push_hook(&decode::<PushHookPayload>(&req.body)?);
            hook.guid = guid;
            Webhook::Push(hook)
        } else if MERGE_REQUEST_EVENTS.contains(&event) {
            let payload = decode::<PullRequestHookPayload>(&req.body)?;
            let mut hook = convert_pull_request_hook(&payload, event);
            hook.guid = guid;
            Webhook::PullRequest(hook)
        } else {
            tracing::debug!(event, "Ignoring unsupported webhook event");
            return Err(ScmError::unknown_webhook(event));
        };

        let token = secret(&hook)?;
        if token.is_empty() {
            return Ok(hook);
        }

        let presented = req.header(TOKEN_HEADER).unwrap_or_default();
        if bool::from(presented.as_bytes().ct_eq(token.as_bytes())) {
            Ok(hook)
        } else {
            tracing::debug!(event, guid = hook.guid(), "Webhook token mismatch");
            Err(ScmError::SignatureInvalid)
        }
    }
}
