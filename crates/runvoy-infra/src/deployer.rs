use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use runvoy_config::ConfigStore;
use runvoy_core::{DestroyResult, OperationType, SpinnerHandle, Stack};

use crate::error::{InfraError, Result};
use crate::params::parse_parameters;
use crate::providers::{StackProvider, UpdateOutcome};
use crate::template::resolve_template_source;

/// Shared across `Deploy` and `Destroy` so there is one source of truth
/// for the stack-operation cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub stack_name: String,
    /// Raw `--template` input, pre-resolution.
    pub template: String,
    /// Raw `--parameter KEY=VALUE` tokens.
    pub parameters: Vec<String>,
    pub wait: bool,
    pub seed_admin_user: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DestroyOptions {
    pub stack_name: String,
    pub wait: bool,
}

/// Provider-neutral stack lifecycle: exists?, create/update, destroy,
/// with status polling and output extraction. Never leaks a provider
/// SDK type through its surface.
#[async_trait]
pub trait Deployer: Send + Sync {
    fn region(&self) -> &str;
    async fn check_stack_exists(&self, name: &str) -> Result<bool>;
    async fn deploy(&self, opts: DeployOptions, cli_version: &str, spinner: &dyn SpinnerHandle) -> Result<Stack>;
    async fn destroy(&self, opts: DestroyOptions, spinner: &dyn SpinnerHandle) -> Result<DestroyResult>;
}

/// Constructs a [`Deployer`] for the named provider. Only `aws` is
/// currently implemented; the signature leaves room for more without
/// changing callers.
pub async fn new_deployer(provider: &str, region: &str) -> Result<Arc<dyn Deployer>> {
    match provider {
        "aws" => Ok(Arc::new(AwsDeployer::new(region).await)),
        other => Err(InfraError::UnsupportedProvider(other.to_string())),
    }
}

pub struct AwsDeployer {
    provider: crate::providers::aws::AwsStackProvider,
    region: String,
}

impl AwsDeployer {
    pub async fn new(region: &str) -> Self {
        Self {
            provider: crate::providers::aws::AwsStackProvider::new(region).await,
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl Deployer for AwsDeployer {
    fn region(&self) -> &str {
        &self.region
    }

    #[tracing::instrument(skip(self))]
    async fn check_stack_exists(&self, name: &str) -> Result<bool> {
        Ok(self.provider.describe(name).await?.is_some())
    }

    #[tracing::instrument(skip(self, opts, spinner))]
    async fn deploy(&self, opts: DeployOptions, cli_version: &str, spinner: &dyn SpinnerHandle) -> Result<Stack> {
        let template = resolve_template_source(&opts.template, cli_version).await?;
        let parameters = parse_parameters(&opts.parameters)?;

        let exists = self.provider.describe(&opts.stack_name).await?.is_some();
        let operation = if exists { OperationType::Update } else { OperationType::Create };

        if exists {
            match self.provider.update(&opts.stack_name, &template, &parameters).await? {
                UpdateOutcome::NoUpdates => {
                    let current = self
                        .provider
                        .describe(&opts.stack_name)
                        .await?
                        .ok_or(InfraError::StackDisappeared)?;
                    return Ok(Stack::no_changes(opts.stack_name, current.status));
                }
                UpdateOutcome::Submitted => {}
            }
        } else {
            self.provider.create(&opts.stack_name, &template, &parameters).await?;
        }

        if !opts.wait {
            return Ok(Stack::in_progress(opts.stack_name, operation));
        }

        let described = poll_until_complete(&self.provider, &opts.stack_name, spinner).await?;
        if described.status.ends_with("_FAILED") || described.status == "ROLLBACK_COMPLETE" {
            return Err(InfraError::OperationFailed(described.status));
        }

        let stack = Stack {
            name: opts.stack_name.clone(),
            status: described.status,
            outputs: described.outputs,
            no_changes: false,
            not_found: false,
            operation_type: Some(operation),
        };

        if let Some(admin_email) = opts.seed_admin_user {
            seed_admin_and_persist(&self.provider, &stack, &admin_email).await?;
        }

        Ok(stack)
    }

    #[tracing::instrument(skip(self, opts, spinner))]
    async fn destroy(&self, opts: DestroyOptions, spinner: &dyn SpinnerHandle) -> Result<DestroyResult> {
        let exists = self.provider.describe(&opts.stack_name).await?.is_some();
        if !exists {
            return Ok(DestroyResult { name: opts.stack_name, status: String::new(), not_found: true });
        }

        self.provider.delete(&opts.stack_name).await?;

        if !opts.wait {
            return Ok(DestroyResult { name: opts.stack_name, status: "IN_PROGRESS".to_string(), not_found: false });
        }

        let deadline = tokio::time::Instant::now() + OPERATION_TIMEOUT;
        loop {
            match self.provider.describe(&opts.stack_name).await? {
                None => {
                    return Ok(DestroyResult {
                        name: opts.stack_name,
                        status: "DELETE_COMPLETE".to_string(),
                        not_found: false,
                    })
                }
                Some(d) if d.status.ends_with("_FAILED") => return Err(InfraError::OperationFailed(d.status)),
                Some(d) => {
                    spinner.set_message(&format!("destroying {} ({})", opts.stack_name, d.status));
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(InfraError::Timeout);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

async fn poll_until_complete(
    provider: &dyn StackProvider,
    name: &str,
    spinner: &dyn SpinnerHandle,
) -> Result<crate::providers::DescribedStack> {
    let deadline = tokio::time::Instant::now() + OPERATION_TIMEOUT;
    loop {
        let described = provider.describe(name).await?.ok_or(InfraError::StackDisappeared)?;
        tracing::info!(stack = name, status = %described.status, "polled stack status");
        spinner.set_message(&format!("deploying {name} ({})", described.status));
        if described.status.ends_with("_COMPLETE") || described.status.ends_with("_FAILED") {
            return Ok(described);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(InfraError::Timeout);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// After a completed apply, seeds an admin credential into the identity
/// table named by the `APIKeysTableName` output and writes the resulting
/// API key back through the local Config Store — preserving an
/// already-set `api_endpoint` unless it is empty, in which case the
/// endpoint is adopted from the `APIEndpoint` stack output.
async fn seed_admin_and_persist(provider: &dyn StackProvider, stack: &Stack, admin_email: &str) -> Result<()> {
    let table_name = stack
        .outputs
        .get("APIKeysTableName")
        .ok_or_else(|| InfraError::Provider("stack outputs missing APIKeysTableName".to_string()))?;

    let api_key = provider.seed_admin(table_name, admin_email).await?;

    let store = ConfigStore::discover()?;
    let mut config = store.load()?;
    config.api_key = Some(api_key);
    if config.api_endpoint.as_deref().unwrap_or("").is_empty() {
        if let Some(endpoint) = stack.outputs.get("APIEndpoint") {
            config.api_endpoint = Some(endpoint.clone());
        }
    }
    store.save(&config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::DescribedStack;
    use crate::template::TemplateSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeProvider {
        exists: Mutex<bool>,
        status_after_create: String,
        outputs: HashMap<String, String>,
    }

    #[async_trait]
    impl StackProvider for FakeProvider {
        async fn describe(&self, _name: &str) -> Result<Option<DescribedStack>> {
            if *self.exists.lock().unwrap() {
                Ok(Some(DescribedStack { status: self.status_after_create.clone(), outputs: self.outputs.clone() }))
            } else {
                Ok(None)
            }
        }

        async fn create(&self, _name: &str, _template: &TemplateSource, _parameters: &[(String, String)]) -> Result<()> {
            *self.exists.lock().unwrap() = true;
            Ok(())
        }

        async fn update(&self, _name: &str, _template: &TemplateSource, _parameters: &[(String, String)]) -> Result<UpdateOutcome> {
            Ok(UpdateOutcome::NoUpdates)
        }

        async fn delete(&self, _name: &str) -> Result<()> {
            *self.exists.lock().unwrap() = false;
            Ok(())
        }

        async fn seed_admin(&self, _table_name: &str, _email: &str) -> Result<String> {
            Ok("rv_fake".to_string())
        }
    }

    #[tokio::test]
    async fn poll_returns_as_soon_as_status_is_terminal() {
        let provider = FakeProvider {
            exists: Mutex::new(true),
            status_after_create: "CREATE_COMPLETE".to_string(),
            outputs: HashMap::new(),
        };
        let spinner = runvoy_core::NullSpinnerHandle;
        let described = poll_until_complete(&provider, "my-stack", &spinner).await.unwrap();
        assert_eq!(described.status, "CREATE_COMPLETE");
    }

    #[tokio::test]
    async fn poll_surfaces_stack_disappearance() {
        let provider = FakeProvider {
            exists: Mutex::new(false),
            status_after_create: "CREATE_COMPLETE".to_string(),
            outputs: HashMap::new(),
        };
        let spinner = runvoy_core::NullSpinnerHandle;
        let err = poll_until_complete(&provider, "gone", &spinner).await.unwrap_err();
        assert!(matches!(err, InfraError::StackDisappeared));
    }
}
