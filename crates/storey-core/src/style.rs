//! Per-entity visual mapping.
//!
//! Attributes on the node or edge win when they are truthy; otherwise the value comes from the
//! [`EditorConfig`] defaults for the requested interaction state.

use crate::config::EditorConfig;
use crate::model::{AttrValue, Attributes, Edge, Node};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleState {
    Normal,
    Hover,
    Selected,
}

impl StyleState {
    fn key(self) -> &'static str {
        match self {
            StyleState::Normal => "normal",
            StyleState::Hover => "hover",
            StyleState::Selected => "selected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub text: String,
    pub direction: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub shape: String,
    pub radius: f64,
    pub width: f64,
    pub height: f64,
    pub border_radius: f64,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub stroke_dasharray: String,
    pub color: String,
    pub draggable: bool,
    pub label: LabelStyle,
}

impl NodeStyle {
    pub fn resolve(node: &Node, config: &EditorConfig, state: StyleState) -> Self {
        let attrs = &node.attrs;
        let default_size = config.get_f64("node.size").unwrap_or(16.0);
        let declared_shape = attrs.get("shape").and_then(AttrValue::as_str);
        let size = num(attrs, "size").unwrap_or(default_size);

        // Only an explicitly declared shape scales with `size`.
        let radius = if declared_shape == Some("circle") {
            size
        } else {
            default_size
        };
        let side = if declared_shape == Some("rect") {
            size * 2.0
        } else {
            default_size * 2.0
        };

        let direction = if attrs.get("labelPosition").and_then(AttrValue::as_str) == Some("inside") {
            "center".to_string()
        } else {
            text_or(attrs, "labelDirection", config, "node.label.direction")
        };
        let label_text = if !node.name.is_empty() {
            node.name.clone()
        } else {
            text(attrs, "label").unwrap_or_else(|| {
                config.get_str("node.label.text").unwrap_or_default().to_string()
            })
        };

        Self {
            shape: text_or(attrs, "shape", config, "node.shape"),
            radius,
            width: side,
            height: side,
            border_radius: num_or(attrs, "borderRadius", config, "node.borderRadius"),
            stroke_width: num_or(attrs, "strokeWidth", config, "node.strokeWidth"),
            stroke_color: text_or(attrs, "strokeColor", config, "node.strokeColor"),
            stroke_dasharray: text_or(attrs, "strokeDasharray", config, "node.strokeDasharray"),
            color: text_or(attrs, "color", config, &format!("node.color.{}", state.key())),
            draggable: attrs
                .get("draggable")
                .and_then(AttrValue::as_bool)
                .or_else(|| config.get_bool("node.draggable"))
                .unwrap_or(true),
            label: LabelStyle {
                text: label_text,
                direction,
                font_family: text_or(attrs, "fontFamily", config, "node.label.fontFamily"),
                font_size: num_or(attrs, "fontSize", config, "node.label.fontSize"),
                color: text_or(attrs, "fontColor", config, "node.label.color"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub width: f64,
    pub color: String,
    pub dasharray: String,
    pub linecap: String,
    pub animate: bool,
    pub animation_speed: f64,
    pub source_marker: String,
    pub target_marker: String,
    /// `None` hides the label.
    pub label: Option<String>,
    pub label_color: String,
}

impl EdgeStyle {
    pub fn resolve(edge: &Edge, config: &EditorConfig, state: StyleState) -> Self {
        let attrs = &edge.attrs;
        let base = format!("edge.{}", state.key());
        Self {
            width: num_or(attrs, "width", config, &format!("{base}.width")),
            color: text_or(attrs, "color", config, &format!("{base}.color")),
            dasharray: text_or(attrs, "dasharray", config, &format!("{base}.dasharray")),
            linecap: text_or(attrs, "linecap", config, &format!("{base}.linecap")),
            animate: truthy(attrs, "animate")
                .and_then(AttrValue::as_bool)
                .or_else(|| config.get_bool("edge.animate"))
                .unwrap_or(false),
            animation_speed: num_or(attrs, "animationSpeed", config, "edge.animationSpeed"),
            source_marker: text_or(attrs, "sourceMarkerType", config, "edge.marker.source"),
            target_marker: text_or(attrs, "targetMarkerType", config, "edge.marker.target"),
            label: text(attrs, "label"),
            label_color: text_or(attrs, "color", config, "edge.label.color"),
        }
    }
}

fn truthy<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a AttrValue> {
    attrs.get(key).filter(|v| v.is_truthy())
}

fn text(attrs: &Attributes, key: &str) -> Option<String> {
    truthy(attrs, key).and_then(AttrValue::as_str).map(str::to_string)
}

fn num(attrs: &Attributes, key: &str) -> Option<f64> {
    truthy(attrs, key).and_then(AttrValue::as_f64)
}

fn text_or(attrs: &Attributes, key: &str, config: &EditorConfig, path: &str) -> String {
    text(attrs, key)
        .or_else(|| config.get_str(path).map(str::to_string))
        .unwrap_or_default()
}

fn num_or(attrs: &Attributes, key: &str, config: &EditorConfig, path: &str) -> f64 {
    num(attrs, key)
        .or_else(|| config.get_f64(path))
        .unwrap_or_default()
}
