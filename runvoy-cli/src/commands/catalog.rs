use runvoy_core::{CreateSecretRequest, Sink, UpdateSecretRequest, UserRole};

use crate::context::AppContext;
use crate::error::{Result, RunvoyError};

pub async fn images_register(ctx: &AppContext, image_ref: &str, set_default: bool) -> Result<()> {
    let default = if set_default { Some(true) } else { None };
    let result = ctx.client.register_image(image_ref, default).await?;
    ctx.sink.success(&result.message);
    Ok(())
}

pub async fn images_list(ctx: &AppContext) -> Result<()> {
    let images = ctx.client.list_images().await?;
    let rows = images
        .iter()
        .map(|i| vec![i.image_ref.clone(), i.is_default.unwrap_or(false).to_string()])
        .collect::<Vec<_>>();
    ctx.sink.table(&["ref", "default"], &rows);
    Ok(())
}

pub async fn images_unregister(ctx: &AppContext, image_ref: &str) -> Result<()> {
    let result = ctx.client.unregister_image(image_ref).await?;
    ctx.sink.success(&result.message);
    Ok(())
}

pub async fn secrets_create(
    ctx: &AppContext,
    name: &str,
    value: &str,
    description: Option<String>,
) -> Result<()> {
    let req = CreateSecretRequest {
        name: name.to_string(),
        key_name: name.to_string(),
        value: value.to_string(),
        description,
    };
    let result = ctx.client.create_secret(&req).await?;
    ctx.sink.success(&result.message);
    Ok(())
}

pub async fn secrets_get(ctx: &AppContext, name: &str) -> Result<()> {
    let secret = ctx.client.get_secret(name).await?;
    ctx.sink.key_value("name", &secret.name);
    if let Some(description) = &secret.description {
        ctx.sink.key_value("description", description);
    }
    Ok(())
}

pub async fn secrets_list(ctx: &AppContext) -> Result<()> {
    let secrets = ctx.client.list_secrets().await?;
    let rows = secrets
        .iter()
        .map(|s| vec![s.name.clone(), s.description.clone().unwrap_or_default()])
        .collect::<Vec<_>>();
    ctx.sink.table(&["name", "description"], &rows);
    Ok(())
}

pub async fn secrets_update(ctx: &AppContext, name: &str, value: &str) -> Result<()> {
    let req = UpdateSecretRequest { key_name: name.to_string(), value: value.to_string() };
    let result = ctx.client.update_secret(name, &req).await?;
    ctx.sink.success(&result.message);
    Ok(())
}

pub async fn secrets_delete(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.client.delete_secret(name).await?;
    ctx.sink.success(&result.message);
    Ok(())
}

pub async fn users_create(ctx: &AppContext, email: &str, role: &str) -> Result<()> {
    let role = match role {
        "admin" => UserRole::Admin,
        "member" => UserRole::Member,
        other => return Err(RunvoyError::InvalidInput(format!("unknown role: {other}"))),
    };
    let result = ctx.client.create_user(email, role).await?;
    ctx.sink.key_value("email", &result.user.email);
    ctx.sink.key_value("claim_token", &result.claim_token);
    Ok(())
}

pub async fn users_list(ctx: &AppContext) -> Result<()> {
    let users = ctx.client.list_users().await?;
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.email.clone(),
                match u.role {
                    UserRole::Admin => "admin".to_string(),
                    UserRole::Member => "member".to_string(),
                },
            ]
        })
        .collect::<Vec<_>>();
    ctx.sink.table(&["email", "role"], &rows);
    Ok(())
}

pub async fn users_revoke(ctx: &AppContext, email: &str) -> Result<()> {
    ctx.client.revoke_user(email).await?;
    ctx.sink.success(&format!("user {email} revoked"));
    Ok(())
}
