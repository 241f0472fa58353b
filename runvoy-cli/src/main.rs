mod cli;
mod commands;
mod context;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands, HealthAction, ImagesAction, InfraAction, PlaybookAction, SecretsAction, UsersAction};
use color_eyre::eyre;
use context::AppContext;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Commands::Configure = cli.command {
        commands::configure::configure()?;
        return Ok(());
    }

    let timeout = if cli.timeout == 0 { Duration::from_secs(u64::MAX / 2) } else { Duration::from_secs(cli.timeout) };
    let mut ctx = AppContext::build()?;

    match tokio::time::timeout(timeout, dispatch(&mut ctx, cli.command)).await {
        Ok(result) => result?,
        Err(_) => return Err(error::RunvoyError::Timeout(timeout).into()),
    }
    Ok(())
}

async fn dispatch(ctx: &mut AppContext, command: Commands) -> error::Result<()> {
    match command {
        Commands::Configure => unreachable!("handled before context construction"),

        Commands::Claim { token } => commands::claim::claim(ctx, &token).await,

        Commands::Run { command, git_repo, git_ref, git_path, image, secrets } => {
            commands::run::run(ctx, command, git_repo, git_ref, git_path, image, secrets).await
        }

        Commands::Logs { execution_id } => commands::executions::logs(ctx, &execution_id).await,
        Commands::Status { execution_id } => commands::executions::status(ctx, &execution_id).await,
        Commands::Kill { execution_id } => commands::executions::kill(ctx, &execution_id).await,
        Commands::List => commands::executions::list(ctx).await,
        Commands::Trace { request_id } => commands::executions::trace(ctx, &request_id).await,

        Commands::Images { action } => match action {
            ImagesAction::Register { image_ref, set_default } => {
                commands::catalog::images_register(ctx, &image_ref, set_default).await
            }
            ImagesAction::List => commands::catalog::images_list(ctx).await,
            ImagesAction::Unregister { image_ref } => commands::catalog::images_unregister(ctx, &image_ref).await,
        },

        Commands::Secrets { action } => match action {
            SecretsAction::Create { name, value, description } => {
                commands::catalog::secrets_create(ctx, &name, &value, description).await
            }
            SecretsAction::Get { name } => commands::catalog::secrets_get(ctx, &name).await,
            SecretsAction::List => commands::catalog::secrets_list(ctx).await,
            SecretsAction::Update { name, value } => commands::catalog::secrets_update(ctx, &name, &value).await,
            SecretsAction::Delete { name } => commands::catalog::secrets_delete(ctx, &name).await,
        },

        Commands::Users { action } => match action {
            UsersAction::Create { email, role } => commands::catalog::users_create(ctx, &email, &role).await,
            UsersAction::List => commands::catalog::users_list(ctx).await,
            UsersAction::Revoke { email } => commands::catalog::users_revoke(ctx, &email).await,
        },

        Commands::Playbook { action } => match action {
            PlaybookAction::List => commands::playbook::list(ctx).await,
            PlaybookAction::Show { name } => commands::playbook::show(ctx, &name).await,
            PlaybookAction::Run { name, image, git_repo, git_ref, git_path, secrets } => {
                commands::playbook::run(ctx, &name, image, git_repo, git_ref, git_path, secrets).await
            }
        },

        Commands::Infra { action } => match action {
            InfraAction::Apply {
                provider,
                stack_name,
                template,
                version,
                parameters,
                wait,
                configure,
                region,
                seed_admin_user,
            } => {
                if configure {
                    commands::configure::configure()?;
                }
                commands::infra::apply(
                    ctx,
                    &provider,
                    &stack_name,
                    &template,
                    &version,
                    parameters,
                    wait,
                    &region,
                    seed_admin_user,
                )
                .await
            }
            InfraAction::Destroy { provider, stack_name, wait, region } => {
                commands::infra::destroy(ctx, &provider, &stack_name, wait, &region).await
            }
        },

        Commands::Health { action } => match action {
            HealthAction::Reconcile => commands::health::reconcile(ctx).await,
        },

        Commands::Version => {
            ctx.sink.info(env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
