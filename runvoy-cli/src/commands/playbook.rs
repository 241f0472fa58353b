use runvoy_core::Sink;
use runvoy_playbook::{compile, list_playbooks, load_playbook, Overrides};

use crate::commands::run::{collect_user_env, execute};
use crate::context::AppContext;
use crate::error::Result;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let names = list_playbooks(&ctx.playbook_dir)?;
    for name in names {
        ctx.sink.info(&name);
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, name: &str) -> Result<()> {
    let playbook = load_playbook(&ctx.playbook_dir, name)?;
    let yaml = serde_yaml::to_string(&playbook)
        .unwrap_or_else(|_| "<unable to render playbook>".to_string());
    ctx.sink.info(&yaml);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    ctx: &AppContext,
    name: &str,
    image: Option<String>,
    git_repo: Option<String>,
    git_ref: Option<String>,
    git_path: Option<String>,
    secrets: Vec<String>,
) -> Result<()> {
    let playbook = load_playbook(&ctx.playbook_dir, name)?;
    let overrides = Overrides {
        image: image.unwrap_or_default(),
        git_repo: git_repo.unwrap_or_default(),
        git_ref: git_ref.unwrap_or_default(),
        git_path: git_path.unwrap_or_default(),
    };
    let request = compile(&playbook, &overrides, &collect_user_env(), &secrets).with_git_defaults();

    execute(ctx, request).await
}
