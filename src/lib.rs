//! HeroForge Core - Composition Rule Engine
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Compositions Are Values
//! 2. Rules Are Pure
//! 3. Absent Layers Pass
//! 4. Fixes Are Deterministic
//! 5. Publishing Re-Validates

pub mod composition;
pub mod geometry;
pub mod rules;
pub mod validation;
pub mod autofix;
pub mod hashing;
pub mod config;
pub mod pipeline;

pub use composition::{Composition, Corner, Layer, LayerKind, Metadata, Position, TextPlacement};
pub use rules::{
    all_rules, auto_fixable_rules, find_rule, rules_by_category, rules_by_severity, select_rules, CompositionRule,
    RuleInfo,
};
pub use validation::{validate, CheckResult, RuleCategory, Severity, ValidationIssue, ValidationReport, Validator};
pub use autofix::{apply_all_fixes, apply_fix, fix_until_clean, FixStatus};
pub use hashing::{canonical_json, composition_fingerprint};
pub use config::{ConfigError, EngineConfig, FailureMode};
pub use pipeline::{PipelineError, PublishManifest, ReviewPipeline};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_ENGINE_VERSION: &str = "1.0.0";
