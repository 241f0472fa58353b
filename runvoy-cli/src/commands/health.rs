use runvoy_core::Sink;

use crate::context::AppContext;
use crate::error::Result;

pub async fn reconcile(ctx: &AppContext) -> Result<()> {
    let report = ctx.client.reconcile_health().await?;
    ctx.sink.key_value("status", &report.status);
    if let Some(detail) = &report.report {
        ctx.sink.info(detail);
    }
    Ok(())
}
