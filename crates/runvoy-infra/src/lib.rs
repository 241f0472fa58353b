//! The Infrastructure Driver: provider-neutral stack lifecycle
//! (exists?/create/update/destroy) with status polling, output
//! extraction, and optional post-apply admin seeding.

mod deployer;
mod error;
mod params;
mod template;

pub mod providers;

pub use deployer::{new_deployer, DeployOptions, Deployer, DestroyOptions, OPERATION_TIMEOUT, POLL_INTERVAL};
pub use error::{InfraError, Result};
pub use params::parse_parameters;
pub use providers::{aws::AwsStackProvider, DescribedStack, StackProvider, UpdateOutcome};
pub use template::{resolve_template_source, TemplateSource};
