use runvoy_core::Sink;

use crate::context::AppContext;
use crate::error::Result;

/// Exchanges a one-time claim token for a permanent API key, persisting
/// it through the Config Store.
pub async fn claim(ctx: &mut AppContext, token: &str) -> Result<()> {
    let result = ctx.client.claim_api_key(token).await?;
    ctx.config.api_key = Some(result.api_key);
    ctx.config_store.save(&ctx.config)?;
    ctx.sink.success("API key claimed and saved");
    Ok(())
}
