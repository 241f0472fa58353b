use runvoy_core::Sink;
use runvoy_logs::display_logs;

use crate::context::AppContext;
use crate::error::Result;

pub async fn logs(ctx: &AppContext, execution_id: &str) -> Result<()> {
    display_logs(&ctx.client, ctx.sink.clone(), execution_id, &ctx.web_url()).await?;
    Ok(())
}

pub async fn status(ctx: &AppContext, execution_id: &str) -> Result<()> {
    let status = ctx.client.get_execution_status(execution_id).await?;
    ctx.sink.key_value("status", &status.to_string());
    Ok(())
}

pub async fn kill(ctx: &AppContext, execution_id: &str) -> Result<()> {
    let result = ctx.client.kill_execution(execution_id).await?;
    if result.was_already_terminated() {
        ctx.sink.info(&format!("execution {execution_id} was already terminated"));
    } else {
        ctx.sink.success(&format!("execution {execution_id} killed"));
        if let Some(message) = &result.message {
            ctx.sink.info(message);
        }
    }
    Ok(())
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let executions = ctx.client.list_executions().await?;
    let rows = executions
        .iter()
        .map(|e| {
            vec![
                e.execution_id.clone(),
                e.status.to_string(),
                e.image_id.clone().unwrap_or_default(),
                e.command.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    ctx.sink.table(&["execution_id", "status", "image_id", "command"], &rows);
    Ok(())
}

pub async fn trace(ctx: &AppContext, request_id: &str) -> Result<()> {
    let trace = ctx.client.fetch_backend_logs(request_id).await?;
    let rows = trace
        .entries
        .iter()
        .map(|e| vec![e.timestamp.to_rfc3339(), e.level.clone().unwrap_or_default(), e.message.clone()])
        .collect::<Vec<_>>();
    ctx.sink.table(&["timestamp", "level", "message"], &rows);
    Ok(())
}
