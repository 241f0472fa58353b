use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "runvoy", version, about = "Control-plane client for the runvoy remote execution service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Subcommand timeout in seconds; 0 disables.
    #[arg(long, global = true, default_value_t = 600)]
    pub timeout: u64,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactively write api_endpoint/api_key/web_url/provider to the config file.
    Configure,

    /// Exchange a one-time claim token for a permanent API key.
    Claim {
        token: String,
    },

    /// Submit a command for remote execution and stream its logs.
    Run {
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,
        #[arg(long)]
        git_repo: Option<String>,
        #[arg(long)]
        git_ref: Option<String>,
        #[arg(long)]
        git_path: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long = "secret")]
        secrets: Vec<String>,
    },

    /// Display an execution's logs, statically or live.
    Logs {
        execution_id: String,
    },

    /// Print an execution's current status.
    Status {
        execution_id: String,
    },

    /// Kill a running execution.
    Kill {
        execution_id: String,
    },

    /// List known executions.
    List,

    /// Fetch the backend trace for a request id.
    Trace {
        request_id: String,
    },

    /// Manage container images.
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },

    /// Manage server-stored secrets.
    Secrets {
        #[command(subcommand)]
        action: SecretsAction,
    },

    /// Manage users.
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Inspect and run declarative YAML playbooks.
    Playbook {
        #[command(subcommand)]
        action: PlaybookAction,
    },

    /// Apply or destroy the cloud infrastructure stack.
    Infra {
        #[command(subcommand)]
        action: InfraAction,
    },

    /// Health operations.
    Health {
        #[command(subcommand)]
        action: HealthAction,
    },

    /// Print the CLI version.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ImagesAction {
    Register {
        image_ref: String,
        #[arg(long)]
        set_default: bool,
    },
    List,
    Unregister {
        image_ref: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SecretsAction {
    Create {
        name: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        description: Option<String>,
    },
    Get {
        name: String,
    },
    List,
    Update {
        name: String,
        #[arg(long)]
        value: String,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    Create {
        email: String,
        #[arg(long)]
        role: String,
    },
    List,
    Revoke {
        email: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlaybookAction {
    List,
    Show {
        name: String,
    },
    Run {
        name: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        git_repo: Option<String>,
        #[arg(long)]
        git_ref: Option<String>,
        #[arg(long)]
        git_path: Option<String>,
        #[arg(long = "secret")]
        secrets: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum InfraAction {
    Apply {
        #[arg(long, default_value = "aws")]
        provider: String,
        #[arg(long, alias = "project-name")]
        stack_name: String,
        #[arg(long, default_value = "")]
        template: String,
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        version: String,
        #[arg(long = "parameter")]
        parameters: Vec<String>,
        #[arg(long)]
        wait: bool,
        #[arg(long)]
        configure: bool,
        #[arg(long)]
        region: String,
        #[arg(long)]
        seed_admin_user: Option<String>,
    },
    Destroy {
        #[arg(long, default_value = "aws")]
        provider: String,
        #[arg(long, alias = "project-name")]
        stack_name: String,
        #[arg(long)]
        wait: bool,
        #[arg(long)]
        region: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HealthAction {
    Reconcile,
}
