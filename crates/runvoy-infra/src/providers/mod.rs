pub mod aws;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::template::TemplateSource;

/// A stack's provider-reported state at one point in time.
#[derive(Debug, Clone)]
pub struct DescribedStack {
    pub status: String,
    pub outputs: HashMap<String, String>,
}

/// Whether an `update` call actually submitted a change set or found
/// nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Submitted,
    NoUpdates,
}

/// The minimal surface a cloud provider's stack-management API must
/// implement. Hides the provider SDK's own types from the core
/// [`crate::deployer::Deployer`] logic (poll loop, create-vs-update
/// decision, output extraction) so a second provider can be added without
/// touching it.
#[async_trait]
pub trait StackProvider: Send + Sync {
    async fn describe(&self, name: &str) -> Result<Option<DescribedStack>>;

    async fn create(
        &self,
        name: &str,
        template: &TemplateSource,
        parameters: &[(String, String)],
    ) -> Result<()>;

    async fn update(
        &self,
        name: &str,
        template: &TemplateSource,
        parameters: &[(String, String)],
    ) -> Result<UpdateOutcome>;

    async fn delete(&self, name: &str) -> Result<()>;

    /// Provider-specific post-apply admin seed: creates an initial admin
    /// credential in the identity table named by `table_name` and
    /// returns the new API key.
    async fn seed_admin(&self, table_name: &str, email: &str) -> Result<String>;
}
