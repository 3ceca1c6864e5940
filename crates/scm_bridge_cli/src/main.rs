//! scm-bridge CLI - command-line front end for the Coding driver.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scm-bridge")]
#[command(version)]
#[command(about = "Query and drive a Coding (e.coding.net) account")]
#[command(
    long_about = "scm-bridge talks to the Coding open-api through a vendor-neutral SCM \
model: projects appear as organizations, depots as repositories and merge requests \
as pull requests. Every command prints pretty JSON on stdout."
)]
#[command(after_long_help = r#"EXAMPLES
    Show the authenticated user:
        $ scm-bridge user

    Find a repository:
        $ scm-bridge repo find team/acme/repo1

    Open a merge request:
        $ scm-bridge pr create acme/repo1 --title "Add feature" --head feature --base main

    Parse a captured webhook delivery:
        $ scm-bridge webhook parse body.json --event GIT_PUSHED --token s1

    Generate shell completions:
        $ scm-bridge completions bash > ~/.local/share/bash-completion/completions/scm-bridge

CONFIGURATION
    scm-bridge reads configuration from:
      1. ~/.config/scm-bridge/config.toml (or $XDG_CONFIG_HOME/scm-bridge/config.toml)
      2. ./scm-bridge.toml
      3. Environment variables (SCM_BRIDGE_* prefix, e.g., SCM_BRIDGE_CODING_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    SCM_BRIDGE_CODING_HOST     Coding host (default: https://e.coding.net)
    SCM_BRIDGE_CODING_TOKEN    Coding personal access token
    SCM_BRIDGE_WEBHOOK_SECRET  Expected webhook token
    SCM_BRIDGE_HTTP_TIMEOUT    Request timeout in seconds (default: 30)
"#)]
struct Cli {
    /// Coding host or open-api URL (overrides config)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Personal access token (overrides config)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user
    User {
        #[command(subcommand)]
        action: Option<UserAction>,
    },
    /// Projects, seen as organizations
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },
    /// Depots, seen as repositories
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// Merge requests, seen as pull requests
    Pr {
        #[command(subcommand)]
        action: PrAction,
    },
    /// Inbound webhook deliveries
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Print only the user's email address
    Email,
}

#[derive(Subcommand)]
enum OrgAction {
    /// Find a project by name
    Find {
        /// Project name
        name: String,
    },
    /// List the projects of the authenticated user
    List,
    /// List project members (first page only)
    Members {
        /// Project name
        org: String,
    },
}

#[derive(Subcommand)]
enum RepoAction {
    /// Find a repository by `project/depot` or `team/project/depot`
    Find {
        /// Repository identifier
        repo: String,
    },
    /// Create a depot
    Create {
        /// Depot name, or `project/depot`
        name: String,

        /// Owning project when NAME has no project part
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Depot description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List every depot of a project
    List {
        /// Project name
        project: String,
    },
    /// List hooks (always empty for Coding)
    Hooks {
        /// Repository identifier
        repo: String,
    },
}

#[derive(Subcommand)]
enum PrAction {
    /// Show a merge request
    Find {
        /// Repository identifier
        repo: String,
        /// Merge request number
        number: i64,
    },
    /// Open a merge request
    Create {
        /// Repository identifier
        repo: String,

        /// Title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short = 'm', long, default_value = "")]
        body: String,

        /// Source branch
        #[arg(long)]
        head: String,

        /// Target branch
        #[arg(long)]
        base: String,
    },
    /// Merge a merge request
    Merge {
        /// Repository identifier
        repo: String,
        /// Merge request number
        number: i64,

        /// Merge commit message
        #[arg(short = 'm', long, default_value = "")]
        message: String,

        /// Delete the source branch after merging
        #[arg(short = 'd', long)]
        delete_source_branch: bool,
    },
    /// Close a merge request
    Close {
        /// Repository identifier
        repo: String,
        /// Merge request number
        number: i64,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Parse a captured delivery body and print the normalized event
    Parse {
        /// Body file (`-` reads stdin)
        file: PathBuf,

        /// Value of X-Coding-Service-Hook-Event
        #[arg(short, long)]
        event: String,

        /// Value of X-Coding-Service-Hook-Id
        #[arg(short = 'i', long, default_value = "")]
        delivery: String,

        /// Value of X-Gitlab-Token sent with the delivery
        #[arg(short = 'k', long = "hook-token")]
        hook_token: Option<String>,

        /// Expected secret (overrides config; empty skips verification)
        #[arg(short, long)]
        secret: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logs only when not attached to a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("scm_bridge=info,scm_bridge_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        _ => {}
    }

    let ctx = commands::coding::Context::new(&config, cli.host, cli.token)?;

    match cli.command {
        Commands::User { action } => commands::coding::handle_user(action, &ctx).await?,
        Commands::Org { action } => commands::coding::handle_org(action, &ctx).await?,
        Commands::Repo { action } => commands::coding::handle_repo(action, &ctx).await?,
        Commands::Pr { action } => commands::coding::handle_pr(action, &ctx).await?,
        Commands::Webhook { action } => commands::coding::handle_webhook(action, &ctx, &config)?,
        Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repo_find_with_global_overrides() {
        let cli = Cli::try_parse_from([
            "scm-bridge",
            "repo",
            "find",
            "team/acme/repo1",
            "--host",
            "https://git.corp.io",
            "--token",
            "t0k",
        ])
        .expect("arguments should parse");
        assert_eq!(cli.host.as_deref(), Some("https://git.corp.io"));
        assert_eq!(cli.token.as_deref(), Some("t0k"));
        assert!(matches!(
            cli.command,
            Commands::Repo { action: RepoAction::Find { ref repo } } if repo == "team/acme/repo1"
        ));
    }

    #[test]
    fn bare_user_command_has_no_action() {
        let cli = Cli::try_parse_from(["scm-bridge", "user"]).expect("arguments should parse");
        assert!(matches!(cli.command, Commands::User { action: None }));

        let cli =
            Cli::try_parse_from(["scm-bridge", "user", "email"]).expect("arguments should parse");
        assert!(matches!(
            cli.command,
            Commands::User {
                action: Some(UserAction::Email)
            }
        ));
    }

    #[test]
    fn pr_merge_flags() {
        let cli = Cli::try_parse_from([
            "scm-bridge",
            "pr",
            "merge",
            "acme/repo1",
            "12",
            "-m",
            "Merge feature",
            "-d",
        ])
        .expect("arguments should parse");
        match cli.command {
            Commands::Pr {
                action:
                    PrAction::Merge {
                        repo,
                        number,
                        message,
                        delete_source_branch,
                    },
            } => {
                assert_eq!(repo, "acme/repo1");
                assert_eq!(number, 12);
                assert_eq!(message, "Merge feature");
                assert!(delete_source_branch);
            }
            _ => panic!("expected pr merge"),
        }
    }

    #[test]
    fn pr_number_must_be_numeric() {
        assert!(Cli::try_parse_from(["scm-bridge", "pr", "find", "acme/repo1", "twelve"]).is_err());
    }

    #[test]
    fn webhook_parse_requires_event() {
        assert!(Cli::try_parse_from(["scm-bridge", "webhook", "parse", "body.json"]).is_err());

        let cli = Cli::try_parse_from([
            "scm-bridge",
            "webhook",
            "parse",
            "-",
            "--event",
            "GIT_PUSHED",
            "--hook-token",
            "s1",
        ])
        .expect("arguments should parse");
        assert!(matches!(
            cli.command,
            Commands::Webhook {
                action: WebhookAction::Parse { ref event, ref hook_token, .. }
            } if event == "GIT_PUSHED" && hook_token.as_deref() == Some("s1")
        ));
    }
}
