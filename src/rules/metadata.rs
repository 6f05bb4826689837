//! Metadata completeness across IPTC, EXIF, alt text and file name.

use chrono::{Datelike, Utc};
use serde_json::json;

use crate::composition::{is_blank, Composition, Metadata};
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

pub const DEFAULT_CREATOR: &str = "Content Team";
pub const DEFAULT_DESCRIPTION: &str = "Hero image";
pub const DEFAULT_FILE_STEM: &str = "hero-image";
pub const FILE_EXTENSION: &str = "jpg";

/// The nine fields every published image must carry.
pub fn missing_fields(metadata: &Metadata) -> Vec<&'static str> {
    let required: [(&'static str, &Option<String>); 9] = [
        ("iptc.creator", &metadata.iptc.creator),
        ("iptc.copyright", &metadata.iptc.copyright),
        ("iptc.caption", &metadata.iptc.caption),
        ("iptc.headline", &metadata.iptc.headline),
        ("exif.artist", &metadata.exif.artist),
        ("exif.copyright", &metadata.exif.copyright),
        ("exif.imageDescription", &metadata.exif.image_description),
        ("altText", &metadata.alt_text),
        ("fileName", &metadata.file_name),
    ];
    required
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
}

fn present(field: &Option<String>) -> Option<String> {
    if is_blank(field) { None } else { field.clone() }
}

fn fill(field: &mut Option<String>, value: String) {
    if is_blank(field) {
        *field = Some(value);
    }
}

/// Lowercase ASCII slug, words joined by single hyphens.
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Fill every blank required field from its siblings, falling back to
/// defaults. Populated fields are never touched.
pub fn complete_metadata(metadata: &Metadata, entity_name: Option<&str>, year: i32) -> Metadata {
    let mut m = metadata.clone();
    let entity = entity_name.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string);

    let creator = present(&m.iptc.creator)
        .or_else(|| present(&m.exif.artist))
        .unwrap_or_else(|| DEFAULT_CREATOR.to_string());
    fill(&mut m.iptc.creator, creator.clone());
    fill(&mut m.exif.artist, creator.clone());

    let copyright = present(&m.iptc.copyright)
        .or_else(|| present(&m.exif.copyright))
        .unwrap_or_else(|| format!("© {} {}", year, creator));
    fill(&mut m.iptc.copyright, copyright.clone());
    fill(&mut m.exif.copyright, copyright);

    let description = present(&m.alt_text)
        .or_else(|| present(&m.iptc.caption))
        .or_else(|| present(&m.exif.image_description))
        .or_else(|| entity.clone())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    fill(&mut m.alt_text, description.clone());
    fill(&mut m.iptc.caption, description.clone());
    fill(&mut m.exif.image_description, description.clone());

    let headline = entity.clone().unwrap_or(description);
    fill(&mut m.iptc.headline, headline.clone());

    let stem = slugify(entity.as_deref().unwrap_or(&headline));
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM.to_string() } else { stem };
    fill(&mut m.file_name, format!("{}.{}", stem, FILE_EXTENSION));

    m
}

pub struct MetadataCompletenessRule;

impl CompositionRule for MetadataCompletenessRule {
    fn id(&self) -> &'static str { "metadata_complete" }
    fn name(&self) -> &'static str { "Metadata complete" }
    fn description(&self) -> &'static str {
        "Creator, copyright, caption, headline, description, alt text and file name must all be set"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Metadata }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let missing = missing_fields(&composition.metadata);
        CheckResult::new(missing.is_empty(), json!({ "missingFields": missing }))
    }

    fn auto_fix_available(&self) -> bool { true }

    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        if self.check(composition).passed {
            return Some(composition.clone());
        }
        let entity = composition.central_object().map(|(_, obj)| obj.entity_name.as_str());
        let metadata = complete_metadata(&composition.metadata, entity, Utc::now().year());
        Some(composition.with_metadata(metadata))
    }
}
