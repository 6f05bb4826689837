//! Alt text rules.

use serde_json::json;
use std::collections::BTreeMap;

use crate::composition::Composition;
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

/// Entity words must be longer than this to be matched on their own.
pub const ENTITY_WORD_MIN_EXCLUSIVE: usize = 3;
pub const KEYWORD_MIN_CHARS: usize = 3;
pub const MAX_KEYWORD_OCCURRENCES: usize = 2;
pub const ALT_TEXT_MIN_CHARS: usize = 30;
pub const ALT_TEXT_MAX_CHARS: usize = 200;

/// Lowercased word with surrounding punctuation stripped.
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

fn entity_terms(entity_name: &str) -> Vec<String> {
    let terms: Vec<String> = entity_name
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| w.chars().count() > ENTITY_WORD_MIN_EXCLUSIVE)
        .collect();
    if terms.is_empty() {
        // Short names like "AI" are matched whole.
        let whole = entity_name.trim().to_lowercase();
        if whole.is_empty() { vec![] } else { vec![whole] }
    } else {
        terms
    }
}

fn replace_alt_text(composition: &Composition, alt_text: String) -> Composition {
    let mut metadata = composition.metadata.clone();
    metadata.alt_text = Some(alt_text);
    composition.with_metadata(metadata)
}

pub struct AltTextEntityRule;

impl CompositionRule for AltTextEntityRule {
    fn id(&self) -> &'static str { "alt_text_entity" }
    fn name(&self) -> &'static str { "Alt text names the entity" }
    fn description(&self) -> &'static str {
        "Alt text must mention the central object's entity"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Accessibility }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let Some((_, object)) = composition.central_object() else {
            return CheckResult::vacuous("no central object");
        };
        let terms = entity_terms(&object.entity_name);
        if terms.is_empty() {
            return CheckResult::vacuous("central object has no entity name");
        }

        let alt = composition.alt_text().to_lowercase();
        let matched: Vec<&String> = terms.iter().filter(|t| alt.contains(t.as_str())).collect();

        CheckResult::new(
            !matched.is_empty(),
            json!({
                "entityName": object.entity_name,
                "terms": terms,
                "matchedTerms": matched,
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    // Prepends, never truncates.
    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        if self.check(composition).passed {
            return Some(composition.clone());
        }
        let Some((_, object)) = composition.central_object() else {
            return Some(composition.clone());
        };
        let entity = object.entity_name.trim();
        let alt = composition.alt_text().trim();

        if alt.to_lowercase().contains(&entity.to_lowercase()) {
            return Some(composition.clone());
        }
        let fixed = if alt.is_empty() {
            entity.to_string()
        } else {
            format!("{} - {}", entity, alt)
        };
        Some(replace_alt_text(composition, fixed))
    }
}

/// Byte ranges of the whitespace-separated tokens of `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = vec![];
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

pub struct KeywordStuffingRule;

impl KeywordStuffingRule {
    fn repeated_words(alt_text: &str) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for word in alt_text.split_whitespace().map(normalize_word) {
            if word.chars().count() >= KEYWORD_MIN_CHARS {
                *counts.entry(word).or_default() += 1;
            }
        }
        counts.retain(|_, n| *n > MAX_KEYWORD_OCCURRENCES);
        counts
    }

    /// Keep the first two occurrences of each keyword, drop the rest.
    /// A dropped word takes the whitespace before it; everything else,
    /// spacing included, is kept as-is.
    pub fn dedupe(alt_text: &str) -> String {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut out = String::with_capacity(alt_text.len());
        let mut gap_start = 0;

        for (start, end) in word_spans(alt_text) {
            let gap = &alt_text[gap_start..start];
            let token = &alt_text[start..end];
            gap_start = end;

            let word = normalize_word(token);
            if word.chars().count() >= KEYWORD_MIN_CHARS {
                let count = seen.entry(word).or_default();
                *count += 1;
                if *count > MAX_KEYWORD_OCCURRENCES {
                    continue;
                }
            }
            out.push_str(gap);
            out.push_str(token);
        }
        out.push_str(&alt_text[gap_start..]);
        out
    }
}

impl CompositionRule for KeywordStuffingRule {
    fn id(&self) -> &'static str { "alt_text_keyword_stuffing" }
    fn name(&self) -> &'static str { "No keyword stuffing" }
    fn description(&self) -> &'static str {
        "No word of three or more characters may appear more than twice in the alt text"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Accessibility }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let repeated = Self::repeated_words(composition.alt_text());
        CheckResult::new(
            repeated.is_empty(),
            json!({
                "repeatedWords": repeated,
                "maxOccurrences": MAX_KEYWORD_OCCURRENCES,
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        if self.check(composition).passed {
            return Some(composition.clone());
        }
        Some(replace_alt_text(composition, Self::dedupe(composition.alt_text())))
    }
}

pub struct AltTextLengthRule;

impl CompositionRule for AltTextLengthRule {
    fn id(&self) -> &'static str { "alt_text_length" }
    fn name(&self) -> &'static str { "Alt text length" }
    fn description(&self) -> &'static str {
        "Alt text should be between 30 and 200 characters"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Accessibility }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let length = composition.alt_text().trim().chars().count();
        CheckResult::new(
            (ALT_TEXT_MIN_CHARS..=ALT_TEXT_MAX_CHARS).contains(&length),
            json!({
                "length": length,
                "min": ALT_TEXT_MIN_CHARS,
                "max": ALT_TEXT_MAX_CHARS,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Position;
    use crate::rules::fixtures::*;

    fn robot(alt: &str) -> Composition {
        let comp = composition(vec![central_object(
            "Industrial Robot Arm",
            Position::new(25.0, 25.0, 50.0, 50.0),
        )]);
        with_alt_text(comp, alt)
    }

    #[test]
    fn test_entity_term_match_is_case_insensitive() {
        assert!(AltTextEntityRule.check(&robot("A ROBOT welding car doors")).passed);
        // "Arm" is too short to count on its own.
        assert!(!AltTextEntityRule.check(&robot("An arm welding car doors")).passed);
    }

    #[test]
    fn test_entity_fix_prepends() {
        let fixed = AltTextEntityRule.auto_fix(&robot("Welding line at dawn")).unwrap();
        assert_eq!(fixed.alt_text(), "Industrial Robot Arm - Welding line at dawn");
        assert!(AltTextEntityRule.check(&fixed).passed);

        let empty = AltTextEntityRule.auto_fix(&robot("")).unwrap();
        assert_eq!(empty.alt_text(), "Industrial Robot Arm");
    }

    #[test]
    fn test_short_entity_name_matched_whole() {
        let comp = composition(vec![central_object("AI", Position::new(25.0, 25.0, 50.0, 50.0))]);
        assert!(!AltTextEntityRule.check(&with_alt_text(comp.clone(), "A chip diagram")).passed);
        assert!(AltTextEntityRule.check(&with_alt_text(comp, "An AI chip diagram")).passed);
    }

    #[test]
    fn test_entity_vacuous_without_object() {
        let comp = with_alt_text(composition(vec![]), "anything");
        assert!(AltTextEntityRule.check(&comp).passed);
    }

    #[test]
    fn test_keyword_stuffing_fix() {
        let comp = robot("robot robot robot arm");
        let result = KeywordStuffingRule.check(&comp);
        assert!(!result.passed);
        assert_eq!(result.details.unwrap()["repeatedWords"]["robot"], 3);

        let fixed = KeywordStuffingRule.auto_fix(&comp).unwrap();
        assert_eq!(fixed.alt_text(), "robot robot arm");
        assert_eq!(KeywordStuffingRule.auto_fix(&fixed).unwrap(), fixed);
    }

    #[test]
    fn test_dedupe_keeps_short_words_and_punctuation() {
        assert_eq!(
            KeywordStuffingRule::dedupe("a Robot, a robot. a ROBOT! an arm"),
            "a Robot, a robot. a an arm"
        );
    }

    #[test]
    fn test_dedupe_preserves_original_spacing() {
        assert_eq!(
            KeywordStuffingRule::dedupe("robot\nrobot  arm\trobot at dawn "),
            "robot\nrobot  arm at dawn "
        );
        let once = KeywordStuffingRule::dedupe("  bike,  bike;\n\nbike bike");
        assert_eq!(once, "  bike,  bike;");
        assert_eq!(KeywordStuffingRule::dedupe(&once), once);
    }

    #[test]
    fn test_alt_text_length_band() {
        assert!(!AltTextLengthRule.check(&robot("too short")).passed);
        assert!(AltTextLengthRule.check(&robot(&"x".repeat(30))).passed);
        assert!(AltTextLengthRule.check(&robot(&"x".repeat(200))).passed);
        assert!(!AltTextLengthRule.check(&robot(&"x".repeat(201))).passed);
        assert!(AltTextLengthRule.auto_fix(&robot("")).is_none());
    }
}
