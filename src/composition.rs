//! Composition Model - Layered Hero Image Data
//!
//! Positions are percentages of the canvas. Nothing here is clamped;
//! bounds are asserted by rules, not by the types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationReport;

pub type LayerId = String;

/// Percentage-based bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    #[serde(default)]
    pub name: String,
    pub position: Position,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(flatten)]
    pub kind: LayerKind,
}

fn default_true() -> bool { true }
fn default_opacity() -> f64 { 100.0 }

/// Closed set of layer variants, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerKind {
    Background(BackgroundLayer),
    CentralObject(CentralObjectLayer),
    TextOverlay(TextOverlayLayer),
    Logo(LogoLayer),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundLayer {
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralObjectLayer {
    pub entity_name: String,
    /// When false the centering rule skips this object.
    #[serde(default = "default_true")]
    pub centered_enforced: bool,
    /// When false the visibility rule skips this object.
    #[serde(default = "default_true")]
    pub visibility_enforced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlayLayer {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub placement: TextPlacement,
    #[serde(default)]
    pub typography: Typography,
}

/// `Center` is accepted on input but never satisfies the zone rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPlacement {
    Top,
    #[default]
    Bottom,
    Center,
}

impl TextPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextPlacement::Top => "top",
            TextPlacement::Bottom => "bottom",
            TextPlacement::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoLayer {
    pub corner_position: Corner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Layer {
    pub fn as_central_object(&self) -> Option<&CentralObjectLayer> {
        match &self.kind {
            LayerKind::CentralObject(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_text_overlay(&self) -> Option<&TextOverlayLayer> {
        match &self.kind {
            LayerKind::TextOverlay(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_logo(&self) -> Option<&LogoLayer> {
        match &self.kind {
            LayerKind::Logo(logo) => Some(logo),
            _ => None,
        }
    }

    /// Same layer (same id) at a new position.
    pub fn with_position(&self, position: Position) -> Self {
        Self { position, ..self.clone() }
    }
}

// --- Metadata ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub iptc: IptcMetadata,
    #[serde(default)]
    pub exif: ExifMetadata,
    #[serde(default)]
    pub schema_org: SchemaOrgMetadata,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IptcMetadata {
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifMetadata {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default)]
    pub software: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOrgMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Absent or whitespace-only.
pub fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

// --- Composition ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: String,
    /// Pixels; a missing side reads as 0 and is left to the canvas rule.
    #[serde(default)]
    pub canvas_width: i32,
    #[serde(default)]
    pub canvas_height: i32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Last-known report, written by the review pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl Composition {
    pub fn new(id: impl Into<String>, canvas_width: i32, canvas_height: i32) -> Self {
        Self {
            id: id.into(),
            canvas_width,
            canvas_height,
            layers: vec![],
            metadata: Metadata::default(),
            validation: None,
        }
    }

    /// First central object; rules assume there is at most one.
    pub fn central_object(&self) -> Option<(&Layer, &CentralObjectLayer)> {
        self.layers
            .iter()
            .find_map(|l| l.as_central_object().map(|obj| (l, obj)))
    }

    pub fn text_overlays(&self) -> impl Iterator<Item = (&Layer, &TextOverlayLayer)> {
        self.layers
            .iter()
            .filter_map(|l| l.as_text_overlay().map(|text| (l, text)))
    }

    pub fn logos(&self) -> impl Iterator<Item = (&Layer, &LogoLayer)> {
        self.layers
            .iter()
            .filter_map(|l| l.as_logo().map(|logo| (l, logo)))
    }

    /// New composition with the layer of the same id swapped in.
    /// Layer order is preserved; an unknown id leaves the layers untouched.
    pub fn with_layer(&self, layer: Layer) -> Self {
        let layers = self
            .layers
            .iter()
            .map(|l| if l.id == layer.id { layer.clone() } else { l.clone() })
            .collect();
        Self { layers, ..self.clone() }
    }

    /// New composition with every layer passed through `f`.
    pub fn map_layers(&self, f: impl Fn(&Layer) -> Layer) -> Self {
        Self {
            layers: self.layers.iter().map(f).collect(),
            ..self.clone()
        }
    }

    pub fn with_metadata(&self, metadata: Metadata) -> Self {
        Self { metadata, ..self.clone() }
    }

    pub fn with_validation(&self, report: ValidationReport) -> Self {
        Self { validation: Some(report), ..self.clone() }
    }

    pub fn alt_text(&self) -> &str {
        self.metadata.alt_text.as_deref().unwrap_or("")
    }
}
