use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::types::{Capability, Parameter};
use aws_sdk_cloudformation::Client as CloudFormationClient;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;

use crate::error::{InfraError, Result};
use crate::template::TemplateSource;

use super::{DescribedStack, StackProvider, UpdateOutcome};

/// The `aws` provider variant: CloudFormation for stack lifecycle,
/// Secrets Manager for the post-apply admin seed. Neither SDK type
/// crosses the [`StackProvider`] boundary.
pub struct AwsStackProvider {
    cfn: CloudFormationClient,
    secrets: SecretsManagerClient,
    region: String,
}

impl AwsStackProvider {
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_cloudformation::config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            cfn: CloudFormationClient::new(&config),
            secrets: SecretsManagerClient::new(&config),
            region: region.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

fn to_cfn_parameters(parameters: &[(String, String)]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|(k, v)| {
            Parameter::builder()
                .parameter_key(k)
                .parameter_value(v)
                .build()
        })
        .collect()
}

#[async_trait]
impl StackProvider for AwsStackProvider {
    async fn describe(&self, name: &str) -> Result<Option<DescribedStack>> {
        let resp = match self.cfn.describe_stacks().stack_name(name).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let message = e.to_string();
                if message.contains("does not exist") {
                    return Ok(None);
                }
                return Err(InfraError::Provider(message));
            }
        };

        let Some(stack) = resp.stacks().first() else {
            return Ok(None);
        };

        let status = stack.stack_status().map(|s| s.as_str().to_string()).unwrap_or_default();
        let outputs = stack
            .outputs()
            .iter()
            .filter_map(|o| Some((o.output_key()?.to_string(), o.output_value()?.to_string())))
            .collect::<HashMap<_, _>>();

        Ok(Some(DescribedStack { status, outputs }))
    }

    async fn create(
        &self,
        name: &str,
        template: &TemplateSource,
        parameters: &[(String, String)],
    ) -> Result<()> {
        let mut req = self
            .cfn
            .create_stack()
            .stack_name(name)
            .set_parameters(Some(to_cfn_parameters(parameters)))
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam);

        req = match template {
            TemplateSource::Url(url) => req.template_url(url),
            TemplateSource::Inline(body) => req.template_body(body),
        };

        req.send().await.map_err(|e| InfraError::Provider(e.to_string()))?;
        Ok(())
    }

    async fn update(
        &self,
        name: &str,
        template: &TemplateSource,
        parameters: &[(String, String)],
    ) -> Result<UpdateOutcome> {
        let mut req = self
            .cfn
            .update_stack()
            .stack_name(name)
            .set_parameters(Some(to_cfn_parameters(parameters)))
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam);

        req = match template {
            TemplateSource::Url(url) => req.template_url(url),
            TemplateSource::Inline(body) => req.template_body(body),
        };

        match req.send().await {
            Ok(_) => Ok(UpdateOutcome::Submitted),
            Err(e) => {
                let message = e.to_string();
                if message.contains("No updates are to be performed") {
                    Ok(UpdateOutcome::NoUpdates)
                } else {
                    Err(InfraError::Provider(message))
                }
            }
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.cfn
            .delete_stack()
            .stack_name(name)
            .send()
            .await
            .map_err(|e| InfraError::Provider(e.to_string()))?;
        Ok(())
    }

    async fn seed_admin(&self, table_name: &str, email: &str) -> Result<String> {
        let api_key = format!("rv_{}", uuid::Uuid::new_v4().simple());
        let secret_name = format!("{table_name}/admin/{email}");

        let create = self
            .secrets
            .create_secret()
            .name(&secret_name)
            .secret_string(&api_key)
            .send()
            .await;

        if let Err(e) = create {
            let message = e.to_string();
            if !message.contains("already exists") {
                return Err(InfraError::Provider(message));
            }
            self.secrets
                .put_secret_value()
                .secret_id(&secret_name)
                .secret_string(&api_key)
                .send()
                .await
                .map_err(|e| InfraError::Provider(e.to_string()))?;
        }

        Ok(api_key)
    }
}
