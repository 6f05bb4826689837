//! Review Pipeline - Single Entry Point for Editors and Export
//!
//! CRITICAL: publish MUST re-validate internally. A stored snapshot is never
//! trusted on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::autofix::{self, BatchFixOutcome, FixLoopOutcome, FixOutcome};
use crate::composition::Composition;
use crate::config::{EngineConfig, FailureMode};
use crate::hashing::composition_fingerprint;
use crate::validation::{ValidationReport, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Publish blocked: {0}")]
    PublishBlocked(String),

    #[error("Config requires engine >= {0}, current is {1}")]
    EngineVersionMismatch(String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishManifest {
    pub id: String,
    pub composition_id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub fingerprint: String,
    pub validation: ValidationReport,
}

/// The review pipeline - validation, fixing, and the publish gate
pub struct ReviewPipeline {
    config: EngineConfig,
    validator: Validator,
}

impl ReviewPipeline {
    pub fn new(config: EngineConfig) -> Result<Self, PipelineError> {
        check_engine_version(&config)?;
        let validator = Validator::without(&config.disabled_rules);
        Ok(Self { config, validator })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn validate(&self, composition: &Composition) -> ValidationReport {
        let report = self.validator.validate(composition);
        debug!(
            composition = %composition.id,
            valid = report.is_valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated composition"
        );
        report
    }

    /// Composition with a fresh validation snapshot attached.
    pub fn review(&self, composition: &Composition) -> Composition {
        composition.with_validation(self.validate(composition))
    }

    pub fn fix(&self, composition: &Composition, rule_id: &str) -> FixOutcome {
        let outcome = autofix::apply_fix(composition, rule_id);
        debug!(composition = %composition.id, rule = rule_id, status = ?outcome.status, "applied fix");
        FixOutcome {
            composition: self.review(&outcome.composition),
            status: outcome.status,
        }
    }

    pub fn fix_all(&self, composition: &Composition) -> BatchFixOutcome {
        let batch = autofix::apply_fixes(composition, self.validator.rules());
        debug!(composition = %composition.id, changed = ?batch.changed_rules, "applied batch fixes");
        BatchFixOutcome {
            composition: self.review(&batch.composition),
            changed_rules: batch.changed_rules,
        }
    }

    pub fn fix_until_clean(&self, composition: &Composition) -> FixLoopOutcome {
        let outcome = autofix::fix_until_clean(composition, &self.validator, self.config.max_fix_passes);
        debug!(
            composition = %composition.id,
            passes = outcome.passes,
            valid = outcome.report.is_valid,
            "fix loop finished"
        );
        FixLoopOutcome {
            composition: outcome.composition.with_validation(outcome.report.clone()),
            ..outcome
        }
    }

    /// Gate for the export pipeline.
    ///
    /// Always re-validates. Under `block`, any error-severity finding rejects
    /// the publish; under `warn` findings are recorded in the manifest only.
    pub fn publish(&self, composition: &Composition) -> Result<PublishManifest, PipelineError> {
        let validation = self.validate(composition);

        if composition.validation.as_ref().is_some_and(|stored| stored != &validation) {
            warn!(composition = %composition.id, "stored validation snapshot is stale");
        }

        if !validation.is_valid && self.config.failure_mode == FailureMode::Block {
            let messages: Vec<_> = validation
                .errors
                .iter()
                .map(|issue| format!("{}: {}", issue.rule_id, issue.message))
                .collect();
            warn!(composition = %composition.id, errors = messages.len(), "publish blocked");
            return Err(PipelineError::PublishBlocked(messages.join("; ")));
        }

        let manifest = PublishManifest {
            id: Uuid::new_v4().to_string(),
            composition_id: composition.id.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            fingerprint: composition_fingerprint(composition)?,
            validation,
        };
        info!(
            composition = %manifest.composition_id,
            manifest = %manifest.id,
            score = manifest.validation.score,
            "composition published"
        );
        Ok(manifest)
    }
}

fn check_engine_version(config: &EngineConfig) -> Result<(), PipelineError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| PipelineError::InvalidVersion(ENGINE_VERSION.to_string()))?;
    let min_ver = semver::Version::parse(&config.engine_min_version)
        .map_err(|_| PipelineError::InvalidVersion(config.engine_min_version.clone()))?;

    if engine_ver < min_ver {
        return Err(PipelineError::EngineVersionMismatch(
            config.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }
    Ok(())
}

impl Default for ReviewPipeline {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            validator: Validator::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Position;
    use crate::rules::fixtures::*;

    #[test]
    fn test_version_gate() {
        let config = EngineConfig {
            engine_min_version: "99.0.0".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            ReviewPipeline::new(config),
            Err(PipelineError::EngineVersionMismatch(..))
        ));

        let config = EngineConfig {
            engine_min_version: "not-a-version".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(ReviewPipeline::new(config), Err(PipelineError::InvalidVersion(_))));
    }

    #[test]
    fn test_review_attaches_snapshot() {
        let pipeline = ReviewPipeline::default();
        let comp = composition(vec![]);
        let reviewed = pipeline.review(&comp);
        assert_eq!(reviewed.validation, Some(pipeline.validate(&comp)));
        assert_eq!(reviewed.layers, comp.layers);
    }

    #[test]
    fn test_fix_reviews_result() {
        let pipeline = ReviewPipeline::default();
        let comp = composition(vec![central_object("Robot", Position::new(70.0, 0.0, 20.0, 20.0))]);
        let outcome = pipeline.fix(&comp, "central_object_centered");
        let report = outcome.composition.validation.unwrap();
        assert!(report.result_for("central_object_centered").unwrap().passed);
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let config = EngineConfig {
            disabled_rules: vec!["metadata_complete".to_string()],
            ..EngineConfig::default()
        };
        let pipeline = ReviewPipeline::new(config).unwrap();
        let report = pipeline.validate(&composition(vec![]));
        assert!(report.result_for("metadata_complete").is_none());

        let batch = pipeline.fix_all(&composition(vec![]));
        assert!(!batch.changed_rules.contains(&"metadata_complete".to_string()));
    }
}
