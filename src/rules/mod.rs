//! Rule Registry - Fixed Catalogue of Composition Rules
//!
//! Every rule is a stateless unit struct. `check` and `auto_fix` are pure:
//! they read a composition and return new values, never mutate.

use serde::Serialize;

use crate::composition::Composition;
use crate::validation::{CheckResult, RuleCategory, Severity};

pub mod accessibility;
pub mod canvas;
pub mod central_object;
pub mod logo;
pub mod metadata;
pub mod text_overlay;

pub use accessibility::{AltTextEntityRule, AltTextLengthRule, KeywordStuffingRule};
pub use canvas::{AspectRatioRule, CanvasDimensionsRule};
pub use central_object::{CenteringRule, VisibilityRule};
pub use logo::{LogoCornerRule, LogoSizeRule};
pub use metadata::MetadataCompletenessRule;
pub use text_overlay::{TextLengthRule, TextOverlapRule, TextZoneRule};

/// Composition rule trait - check, and optionally fix
pub trait CompositionRule: Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn category(&self) -> RuleCategory;
    fn severity(&self) -> Severity;

    fn check(&self, composition: &Composition) -> CheckResult;

    fn auto_fix_available(&self) -> bool {
        false
    }

    /// `None` when the rule has no fix. A fix on a passing composition
    /// returns it unchanged.
    fn auto_fix(&self, _composition: &Composition) -> Option<Composition> {
        None
    }
}

static REGISTRY: &[&dyn CompositionRule] = &[
    &CenteringRule,
    &VisibilityRule,
    &TextZoneRule,
    &TextOverlapRule,
    &TextLengthRule,
    &LogoCornerRule,
    &LogoSizeRule,
    &AltTextEntityRule,
    &KeywordStuffingRule,
    &AltTextLengthRule,
    &MetadataCompletenessRule,
    &CanvasDimensionsRule,
    &AspectRatioRule,
];

/// Every registered rule, in registry order.
pub fn all_rules() -> &'static [&'static dyn CompositionRule] {
    REGISTRY
}

pub fn find_rule(id: &str) -> Option<&'static dyn CompositionRule> {
    REGISTRY.iter().copied().find(|r| r.id() == id)
}

pub fn rules_by_category(category: RuleCategory) -> Vec<&'static dyn CompositionRule> {
    REGISTRY.iter().copied().filter(|r| r.category() == category).collect()
}

pub fn rules_by_severity(severity: Severity) -> Vec<&'static dyn CompositionRule> {
    REGISTRY.iter().copied().filter(|r| r.severity() == severity).collect()
}

pub fn auto_fixable_rules() -> Vec<&'static dyn CompositionRule> {
    REGISTRY.iter().copied().filter(|r| r.auto_fix_available()).collect()
}

/// Registry filter by wire names. An unknown category or severity selects
/// nothing.
pub fn select_rules(
    category: Option<&str>,
    severity: Option<&str>,
    fixable_only: bool,
) -> Vec<&'static dyn CompositionRule> {
    let category = match category.map(RuleCategory::parse) {
        Some(None) => return vec![],
        parsed => parsed.flatten(),
    };
    let severity = match severity.map(Severity::parse) {
        Some(None) => return vec![],
        parsed => parsed.flatten(),
    };

    REGISTRY
        .iter()
        .copied()
        .filter(|r| category.map_or(true, |c| r.category() == c))
        .filter(|r| severity.map_or(true, |s| r.severity() == s))
        .filter(|r| !fixable_only || r.auto_fix_available())
        .collect()
}

/// Serializable view of a rule for findings panels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub auto_fix_available: bool,
}

impl RuleInfo {
    pub fn of(rule: &dyn CompositionRule) -> Self {
        Self {
            id: rule.id(),
            name: rule.name(),
            description: rule.description(),
            category: rule.category(),
            severity: rule.severity(),
            auto_fix_available: rule.auto_fix_available(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_ids_unique() {
        let ids: HashSet<_> = all_rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), all_rules().len());
    }

    #[test]
    fn test_lookup_by_category_and_severity() {
        let logo = rules_by_category(RuleCategory::Logo);
        let ids: Vec<_> = logo.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["logo_corner_position", "logo_size"]);

        let total = rules_by_severity(Severity::Error).len() + rules_by_severity(Severity::Warning).len();
        assert_eq!(total, all_rules().len());
    }

    #[test]
    fn test_every_category_is_populated() {
        for category in RuleCategory::ALL {
            assert!(!rules_by_category(category).is_empty(), "{category} has no rules");
        }
    }

    #[test]
    fn test_fix_availability_matches_fix() {
        let empty = fixtures::composition(vec![]);
        for rule in all_rules() {
            assert_eq!(
                rule.auto_fix_available(),
                rule.auto_fix(&empty).is_some(),
                "{} advertises the wrong fix availability",
                rule.id()
            );
        }
        let fixable: Vec<_> = auto_fixable_rules().iter().map(|r| r.id()).collect();
        assert!(!fixable.contains(&"text_overlay_length"));
        assert!(!fixable.contains(&"canvas_aspect_ratio"));
        assert!(!fixable.contains(&"alt_text_length"));
        assert_eq!(fixable.len(), 10);
    }

    #[test]
    fn test_select_rules_by_name() {
        assert_eq!(select_rules(None, None, false).len(), all_rules().len());

        let ids: Vec<_> = select_rules(Some("logo"), Some("warning"), true).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["logo_corner_position", "logo_size"]);

        assert!(select_rules(Some("pixels"), None, false).is_empty());
        assert!(select_rules(None, Some("fatal"), false).is_empty());
    }

    #[test]
    fn test_find_rule() {
        assert_eq!(find_rule("logo_size").map(|r| r.id()), Some("logo_size"));
        assert!(find_rule("nope").is_none());
    }
}
