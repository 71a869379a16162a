//! Runtime environment and question graph settings

use serde::Deserialize;

use crate::domain::triage::GraphIntegrityPolicy;

use super::error::ValidationError;

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Question graph settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphConfig {
    /// Overrides the environment's integrity policy
    pub integrity_policy: Option<GraphIntegrityPolicy>,
}

impl GraphConfig {
    /// The policy to run with: the override if set, otherwise
    /// `FallbackToComplete` in production and the build default elsewhere.
    pub fn effective_policy(&self, environment: Environment) -> GraphIntegrityPolicy {
        match (self.integrity_policy, environment) {
            (Some(policy), _) => policy,
            (None, Environment::Production) => GraphIntegrityPolicy::FallbackToComplete,
            (None, _) => GraphIntegrityPolicy::default(),
        }
    }

    /// Validate graph configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if environment == Environment::Production
            && self.integrity_policy == Some(GraphIntegrityPolicy::Strict)
        {
            return Err(ValidationError::StrictPolicyInProduction);
        }
        Ok(())
    }
}
