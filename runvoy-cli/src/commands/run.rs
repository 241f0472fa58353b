use std::collections::HashMap;

use runvoy_core::{ExecutionRequest, Sink};
use runvoy_logs::display_logs;

use crate::context::AppContext;
use crate::error::Result;

const USER_ENV_PREFIX: &str = "RUNVOY_USER_";

/// Collects the forwarded environment: process env entries prefixed
/// `RUNVOY_USER_`, prefix stripped, split on the first `=` only, keys
/// with no `=` are impossible here (std env is already key/value) so
/// this only trims the prefix.
pub(crate) fn collect_user_env() -> HashMap<String, String> {
    std::env::vars()
        .filter_map(|(k, v)| k.strip_prefix(USER_ENV_PREFIX).map(|suffix| (suffix.to_string(), v)))
        .collect()
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    ctx: &AppContext,
    command: Vec<String>,
    git_repo: Option<String>,
    git_ref: Option<String>,
    git_path: Option<String>,
    image: Option<String>,
    secrets: Vec<String>,
) -> Result<()> {
    let env = collect_user_env();
    let request = ExecutionRequest {
        command: command.join(" "),
        image,
        git_repo,
        git_ref,
        git_path,
        env,
        secrets,
        timeout_seconds: 0,
    }
    .with_git_defaults();

    execute(ctx, request).await
}

/// `ExecuteCommand`: echo the effective inputs, submit, print the
/// execution id/image id, then hand off to the Log Engine. Does not
/// inspect logs itself.
pub async fn execute(ctx: &AppContext, request: ExecutionRequest) -> Result<()> {
    ctx.sink.key_value("command", &request.command);
    if let Some(repo) = &request.git_repo {
        ctx.sink.key_value("git_repo", repo);
        ctx.sink.key_value("git_ref", request.git_ref.as_deref().unwrap_or(""));
        ctx.sink.key_value("git_path", request.git_path.as_deref().unwrap_or(""));
    }
    if !request.env.is_empty() {
        let mut keys: Vec<&String> = request.env.keys().collect();
        keys.sort();
        let joined = keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ");
        ctx.sink.key_value("env", &joined);
    }

    let envelope = ctx.client.run_command(&request).await?;

    ctx.sink.key_value("execution_id", &envelope.execution_id);
    if let Some(image_id) = &envelope.image_id {
        ctx.sink.key_value("image_id", image_id);
    }

    display_logs(&ctx.client, ctx.sink.clone(), &envelope.execution_id, &ctx.web_url()).await?;
    Ok(())
}
