//! Deploy filter for Jira Service Management and Assets changes.
//!
//! A deploy pipeline is a sequence of [`DeployFilter`]s. Each filter receives
//! the changes nobody has claimed yet, deploys the ones it owns, and hands the
//! rest on as leftovers. [`JsmDeployFilter`] is the filter for JSM and Assets
//! instance changes.
//!
//! # Architecture
//!
//! - **Partition**: split the batch into in-scope instance changes and leftovers
//! - **Rewrite**: give every in-scope instance the type the deploy engine expects
//! - **Service id**: a closed set of rules for writing the server-assigned id back
//! - **Dispatch**: resolve per-type, per-action request config and hand each
//!   change to the [`DeployEngine`]
//! - **Filter**: the orchestrator tying the above together
//!
//! ## Deploy flow
//!
//! 1. Short-circuit if JSM is disabled or has no API definitions
//! 2. Partition by supported type name and instance-ness
//! 3. Rewrite the declared type of every payload slot
//! 4. Plan each change (hard error on a missing type definition)
//! 5. Resolve the Assets workspace id (optional)
//! 6. Deploy every planned change and collect applied changes and errors
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jsm_config::FilterConfig;
//! use jsm_deploy::client::mock::MockDeployClient;
//! use jsm_deploy::{JsmDeployFilter, StandardDeployEngine, StaticWorkspace};
//!
//! let client = Arc::new(MockDeployClient::new());
//! let filter = JsmDeployFilter::new(
//!     FilterConfig::default(),
//!     Arc::new(StandardDeployEngine::new(client)),
//!     Arc::new(StaticWorkspace::none()),
//! );
//! assert_eq!(jsm_deploy::DeployFilter::name(&filter), "jsmDeployFilter");
//! ```

pub mod client;
mod dispatch;
pub mod engine;
mod error;
mod filter;
pub mod partition;
mod result;
pub mod rewrite;
mod runner;
pub mod service_id;
pub mod workspace;

pub use client::{DeployClient, HttpClientConfig, HttpDeployClient};
pub use dispatch::{deploy_changes, plan_changes, DeployContext, DeployEngine, DeployPlan, UrlVars};
pub use engine::StandardDeployEngine;
pub use error::{ChangeDeployResult, ClientError, ClientResult, DeployError, FilterError};
pub use filter::{DeployFilter, JsmDeployFilter};
pub use partition::{partition_changes, Partition};
pub use result::{ChangeError, DeployResult, FilterResult, Severity};
pub use rewrite::replace_instance_type_for_deploy;
pub use runner::DeployFilterRunner;
pub use service_id::ServiceIdSetter;
pub use workspace::{ClientWorkspaceResolver, StaticWorkspace, WorkspaceResolver, WORKSPACE_ID_VAR};
