use std::path::Path;
use std::sync::Arc;

use scm_bridge::Client;
use scm_bridge::coding::{
    self, CodingClient, CodingRepositoryService, DELIVERY_HEADER, EVENT_HEADER, TOKEN_HEADER,
};
use scm_bridge::http::HttpHeaders;
use scm_bridge::platform::{
    ListOptions, PullRequestInput, PullRequestMergeOptions, RepositoryInput, Webhook,
    WebhookRequest,
};
use serde::Serialize;

use crate::config::Config;
use crate::{OrgAction, PrAction, RepoAction, UserAction, WebhookAction};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Connection settings resolved from config and flags.
pub(crate) struct Context {
    host: String,
    token: String,
    client: Client,
    timeout: std::time::Duration,
}

impl Context {
    pub(crate) fn new(
        config: &Config,
        host: Option<String>,
        token: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let host = host.unwrap_or_else(|| config.coding.host.clone());
        let token = token.unwrap_or_else(|| config.coding_token());
        let timeout = config.timeout();
        let client = coding::new_client_with_timeout(&host, &token, timeout)?;
        tracing::debug!(base_url = %client.base_url, "Using Coding endpoint");
        Ok(Self {
            host,
            token,
            client,
            timeout,
        })
    }

    /// Depot listing lives on the driver, not the common trait.
    fn repositories(&self) -> Result<CodingRepositoryService, Box<dyn std::error::Error>> {
        let client = CodingClient::with_timeout(&self.host, &self.token, self.timeout)?;
        Ok(CodingRepositoryService::new(Arc::new(client)))
    }
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn handle_user(action: Option<UserAction>, ctx: &Context) -> CmdResult {
    match action {
        None => {
            let (user, _) = ctx.client.users.find().await?;
            print_json(&user)
        }
        Some(UserAction::Email) => {
            let (email, _) = ctx.client.users.find_email().await?;
            print_json(&email)
        }
    }
}

pub(crate) async fn handle_org(action: OrgAction, ctx: &Context) -> CmdResult {
    let orgs = &ctx.client.organizations;
    match action {
        OrgAction::Find { name } => print_json(&orgs.find(&name).await?.0),
        OrgAction::List => print_json(&orgs.list(ListOptions::default()).await?.0),
        OrgAction::Members { org } => {
            print_json(&orgs.list_org_members(&org, ListOptions::default()).await?.0)
        }
    }
}

pub(crate) async fn handle_repo(action: RepoAction, ctx: &Context) -> CmdResult {
    let repos = &ctx.client.repositories;
    match action {
        RepoAction::Find { repo } => print_json(&repos.find(&repo).await?.0),
        RepoAction::Create {
            name,
            namespace,
            description,
        } => {
            let input = RepositoryInput {
                namespace,
                name,
                description,
                ..Default::default()
            };
            let (repo, res) = repos.create(&input).await?;
            tracing::info!(repo = %repo.full_name, request_id = %res.id, "Created repository");
            print_json(&repo)
        }
        RepoAction::List { project } => {
            let (list, _) = ctx.repositories()?.list_project_repositories(&project).await?;
            print_json(&list)
        }
        RepoAction::Hooks { repo } => {
            print_json(&repos.list_hooks(&repo, ListOptions::default()).await?.0)
        }
    }
}

pub(crate) async fn handle_pr(action: PrAction, ctx: &Context) -> CmdResult {
    let prs = &ctx.client.pull_requests;
    match action {
        PrAction::Find { repo, number } => print_json(&prs.find(&repo, number).await?.0),
        PrAction::Create {
            repo,
            title,
            body,
            head,
            base,
        } => {
            let input = PullRequestInput {
                title,
                body,
                head,
                base,
            };
            print_json(&prs.create(&repo, &input).await?.0)
        }
        PrAction::Merge {
            repo,
            number,
            message,
            delete_source_branch,
        } => {
            let options = PullRequestMergeOptions {
                commit_title: message,
                delete_source_branch,
                ..Default::default()
            };
            print_json(&prs.merge(&repo, number, &options).await?)
        }
        PrAction::Close { repo, number } => print_json(&prs.close(&repo, number).await?),
    }
}

pub(crate) fn handle_webhook(action: WebhookAction, ctx: &Context, config: &Config) -> CmdResult {
    match action {
        WebhookAction::Parse {
            file,
            event,
            delivery,
            hook_token,
            secret,
        } => {
            let headers = delivery_headers(&event, &delivery, hook_token.as_deref());
            let req = read_delivery(headers, &file)?;
            let secret = secret.unwrap_or_else(|| config.webhook_secret());
            let lookup = move |_: &Webhook| -> scm_bridge::Result<String> { Ok(secret.clone()) };
            let hook = ctx.client.webhooks.parse(&req, &lookup)?;
            print_json(&hook)
        }
    }
}

fn delivery_headers(event: &str, delivery: &str, token: Option<&str>) -> HttpHeaders {
    let mut headers = vec![
        (EVENT_HEADER.to_string(), event.to_string()),
        (DELIVERY_HEADER.to_string(), delivery.to_string()),
    ];
    if let Some(token) = token {
        headers.push((TOKEN_HEADER.to_string(), token.to_string()));
    }
    headers
}

fn read_delivery(headers: HttpHeaders, file: &Path) -> scm_bridge::Result<WebhookRequest> {
    if file == Path::new("-") {
        return WebhookRequest::from_reader(headers, std::io::stdin().lock());
    }
    let reader = std::fs::File::open(file).map_err(|e| {
        scm_bridge::ScmError::invalid_input(format!("{}: {e}", file.display()))
    })?;
    WebhookRequest::from_reader(headers, reader)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn delivery_headers_include_token_only_when_given() {
        let headers = delivery_headers("GIT_PUSHED", "d-1", None);
        assert_eq!(headers.len(), 2);
        assert_eq!(scm_bridge::http::header_get(&headers, EVENT_HEADER), Some("GIT_PUSHED"));

        let headers = delivery_headers("GIT_PUSHED", "d-1", Some("s1"));
        assert_eq!(scm_bridge::http::header_get(&headers, TOKEN_HEADER), Some("s1"));
    }

    #[test]
    fn read_delivery_loads_file_body() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("scm-bridge-hook-{nonce}.json"));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(b"{\"ref\":\"refs/heads/main\"}"))
            .expect("temp file should be writable");

        let req = read_delivery(delivery_headers("GIT_PUSHED", "d-1", None), &path)
            .expect("file should load");
        assert_eq!(req.body, b"{\"ref\":\"refs/heads/main\"}");
        assert_eq!(req.header(DELIVERY_HEADER), Some("d-1"));

        std::fs::remove_file(&path).expect("temp file should be removable");
    }

    #[test]
    fn read_delivery_reports_missing_file() {
        let err = read_delivery(Vec::new(), Path::new("/nonexistent/scm-bridge/body.json"))
            .expect_err("missing file");
        assert!(matches!(err, scm_bridge::ScmError::InvalidInput { .. }));
    }

    #[test]
    fn context_prefers_flags_over_config() {
        let config = Config::default();
        let ctx = Context::new(
            &config,
            Some("https://git.corp.io".to_string()),
            Some("t0k".to_string()),
        )
        .expect("context should build");
        assert_eq!(ctx.token, "t0k");
        assert_eq!(ctx.client.base_url.as_str(), "https://git.corp.io/open-api");

        let ctx = Context::new(&config, None, None).expect("context should build");
        assert_eq!(ctx.client.base_url.as_str(), coding::DEFAULT_BASE_URL);
        assert_eq!(ctx.token, "");
    }
}
