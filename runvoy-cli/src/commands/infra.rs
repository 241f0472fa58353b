use runvoy_core::Sink;
use runvoy_infra::{new_deployer, DeployOptions, DestroyOptions};

use crate::context::AppContext;
use crate::error::Result;

#[allow(clippy::too_many_arguments)]
pub async fn apply(
    ctx: &AppContext,
    provider: &str,
    stack_name: &str,
    template: &str,
    version: &str,
    parameters: Vec<String>,
    wait: bool,
    region: &str,
    seed_admin_user: Option<String>,
) -> Result<()> {
    let deployer = new_deployer(provider, region).await?;
    let opts = DeployOptions {
        stack_name: stack_name.to_string(),
        template: template.to_string(),
        parameters,
        wait,
        seed_admin_user,
    };
    let spinner = ctx.sink.spinner(&format!("deploying {stack_name}"));
    let result = deployer.deploy(opts, version, spinner.as_ref()).await;
    spinner.finish(&format!("deploy of {stack_name} finished"));
    let stack = result?;

    ctx.sink.key_value("stack", &stack.name);
    ctx.sink.key_value("status", &stack.status);
    if stack.no_changes {
        ctx.sink.info("no changes to apply");
    }
    for (key, value) in &stack.outputs {
        ctx.sink.key_value(key, value);
    }
    Ok(())
}

pub async fn destroy(ctx: &AppContext, provider: &str, stack_name: &str, wait: bool, region: &str) -> Result<()> {
    let deployer = new_deployer(provider, region).await?;
    let opts = DestroyOptions { stack_name: stack_name.to_string(), wait };
    let spinner = ctx.sink.spinner(&format!("destroying {stack_name}"));
    let outcome = deployer.destroy(opts, spinner.as_ref()).await;
    spinner.finish(&format!("destroy of {stack_name} finished"));
    let result = outcome?;

    if result.not_found {
        ctx.sink.info(&format!("stack {} does not exist", result.name));
    } else {
        ctx.sink.key_value("stack", &result.name);
        ctx.sink.key_value("status", &result.status);
    }
    Ok(())
}
