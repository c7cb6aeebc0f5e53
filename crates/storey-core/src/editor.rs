//! Property editor contract: field schemas, initial form data and validation of saved bags.

use crate::error::{Error, Result};
use crate::model::{AttrValue, Attributes, Edge, EdgeId, Node, NodeId};
use serde::Serialize;

pub const NODE_EDITOR_TITLE: &str = "Edit node";
pub const EDGE_EDITOR_TITLE: &str = "Edit edge";

const DASH_PATTERNS: &[(&str, &str)] = &[
    ("0", "Solid"),
    ("2,2", "Fine dash"),
    ("4,4", "Medium dash"),
    ("8,8", "Coarse dash"),
    ("2,4", "Dash-dot"),
    ("1,1", "Dotted"),
];

const MARKERS: &[(&str, &str)] = &[
    ("none", "None"),
    ("arrow", "Arrow"),
    ("angle", "Angle"),
    ("circle", "Circle"),
];

pub const ICONS: &[(&str, &str)] = &[
    ("fa-solid fa-address-card", "Address Card"),
    ("fa-regular fa-hard-drive", "Hard Drive"),
    ("fa-regular fa-folder-closed", "Folder Closed"),
    ("fa-brands fa-pied-piper-hat", "Pied Piper Hat"),
    ("fa-solid fa-wifi", "WiFi"),
    ("fa-solid fa-key", "Key"),
    ("fa-solid fa-print", "Print"),
    ("fa-solid fa-database", "Database"),
    ("fa-solid fa-desktop", "Desktop"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    fn list(pairs: &[(&str, &str)]) -> Vec<Self> {
        pairs
            .iter()
            .map(|(value, label)| Self {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect()
    }

    fn values(values: &[&str]) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                value: (*value).to_string(),
                label: (*value).to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Shape { options: Vec<FieldOption> },
    Icon { options: Vec<FieldOption> },
    Checkbox,
    Number { min: f64, max: f64, step: f64 },
    Range { min: f64, max: f64, step: f64 },
    /// The palette is a suggestion; any color string is accepted.
    Color { palette: Vec<String> },
    Select { options: Vec<FieldOption> },
    Font { options: Vec<FieldOption> },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub tab: &'static str,
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

fn field(tab: &'static str, key: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        tab,
        key,
        label,
        kind,
    }
}

fn palette(colors: &[&str]) -> FieldKind {
    FieldKind::Color {
        palette: colors.iter().map(|c| (*c).to_string()).collect(),
    }
}

pub fn node_form_schema() -> Vec<FieldSpec> {
    vec![
        field("main", "name", "Name", FieldKind::Text),
        field("main", "childLayer", "Sub-level", FieldKind::Text),
        field(
            "styles",
            "shape",
            "Shape",
            FieldKind::Shape {
                options: FieldOption::values(&["circle", "rect"]),
            },
        ),
        field(
            "main",
            "icon",
            "Icon",
            FieldKind::Icon {
                options: FieldOption::list(ICONS),
            },
        ),
        field("main", "hideIcon", "Hide icon", FieldKind::Checkbox),
        field("main", "draggable", "Draggable", FieldKind::Checkbox),
        field(
            "styles",
            "size",
            "Size",
            FieldKind::Number {
                min: 5.0,
                max: 100.0,
                step: 5.0,
            },
        ),
        field(
            "styles",
            "borderRadius",
            "Border radius",
            FieldKind::Number {
                min: 0.0,
                max: 20.0,
                step: 1.0,
            },
        ),
        field(
            "styles",
            "color",
            "Color",
            palette(&[
                "#ff9e6d", "#4caf50", "#2196f3", "#9c27b0", "#ff9800", "#e91e63", "#00bcd4",
                "#8bc34a",
            ]),
        ),
        field(
            "styles",
            "strokeWidth",
            "Stroke width",
            FieldKind::Number {
                min: 0.0,
                max: 20.0,
                step: 1.0,
            },
        ),
        field(
            "styles",
            "strokeColor",
            "Stroke color",
            palette(&[
                "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff",
                "#ff00ff", "#ff7700", "#aa00ff",
            ]),
        ),
        field(
            "styles",
            "strokeDasharray",
            "Stroke dash",
            FieldKind::Select {
                options: FieldOption::list(DASH_PATTERNS),
            },
        ),
        field(
            "text",
            "labelDirection",
            "Label direction",
            FieldKind::Select {
                options: FieldOption::list(&[
                    ("north", "North (up)"),
                    ("south", "South (down)"),
                    ("east", "East (right)"),
                    ("west", "West (left)"),
                    ("north-east", "North-east"),
                    ("north-west", "North-west"),
                    ("south-east", "South-east"),
                    ("south-west", "South-west"),
                    ("center", "Center"),
                ]),
            },
        ),
        field(
            "text",
            "labelPosition",
            "Label position",
            FieldKind::Select {
                options: FieldOption::list(&[
                    ("inside", "Inside the node"),
                    ("outside", "Outside the node"),
                ]),
            },
        ),
        field(
            "text",
            "fontFamily",
            "Font family",
            FieldKind::Font {
                options: FieldOption::list(&[
                    ("monospace", "Monospace"),
                    ("Arial, sans-serif", "Arial"),
                    ("Times New Roman, serif", "Times New Roman"),
                    ("Georgia, serif", "Georgia"),
                    ("Verdana, sans-serif", "Verdana"),
                    ("Courier New, monospace", "Courier New"),
                    ("Trebuchet MS, sans-serif", "Trebuchet MS"),
                    ("Impact, sans-serif", "Impact"),
                    ("Comic Sans MS, cursive", "Comic Sans MS"),
                    ("Tahoma, sans-serif", "Tahoma"),
                ]),
            },
        ),
        field(
            "text",
            "fontColor",
            "Font color",
            palette(&[
                "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff",
                "#ff00ff", "#ff7700", "#aa00ff", "#333333", "#666666", "#999999", "#cccccc",
                "#ff6600",
            ]),
        ),
        field(
            "text",
            "fontSize",
            "Font size",
            FieldKind::Number {
                min: 8.0,
                max: 24.0,
                step: 1.0,
            },
        ),
    ]
}

pub fn edge_form_schema() -> Vec<FieldSpec> {
    vec![
        field("text", "label", "Label", FieldKind::Text),
        field(
            "main",
            "width",
            "Line width",
            FieldKind::Number {
                min: 1.0,
                max: 20.0,
                step: 1.0,
            },
        ),
        field(
            "styles",
            "color",
            "Color",
            palette(&[
                "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff", "#ff00ff", "#ff7700",
                "#aa00ff",
            ]),
        ),
        field(
            "styles",
            "dasharray",
            "Line dash",
            FieldKind::Select {
                options: FieldOption::list(DASH_PATTERNS),
            },
        ),
        field(
            "styles",
            "linecap",
            "Line cap",
            FieldKind::Select {
                options: FieldOption::list(&[
                    ("butt", "Butt"),
                    ("round", "Round"),
                    ("square", "Square"),
                ]),
            },
        ),
        field("styles", "animate", "Animate", FieldKind::Checkbox),
        field(
            "styles",
            "animationSpeed",
            "Animation speed",
            FieldKind::Range {
                min: 10.0,
                max: 200.0,
                step: 10.0,
            },
        ),
        field("styles", "markerDivider", "Markers", FieldKind::Divider),
        field(
            "markers",
            "sourceMarkerType",
            "Source marker",
            FieldKind::Select {
                options: FieldOption::list(MARKERS),
            },
        ),
        field(
            "markers",
            "targetMarkerType",
            "Target marker",
            FieldKind::Select {
                options: FieldOption::list(MARKERS),
            },
        ),
    ]
}

fn attr_or(attrs: &Attributes, key: &str, fallback: impl Into<AttrValue>) -> AttrValue {
    attrs
        .get(key)
        .filter(|v| v.is_truthy())
        .cloned()
        .unwrap_or_else(|| fallback.into())
}

/// Initial form values for a node. Falsy attributes show the editor's defaults.
pub fn node_form_data(id: &str, node: &Node) -> Attributes {
    let attrs = &node.attrs;
    let mut data = Attributes::new();
    data.insert("id".into(), id.into());
    data.insert("name".into(), node.name.as_str().into());
    data.insert(
        "childLayer".into(),
        node.child_layer.as_deref().unwrap_or("").into(),
    );
    data.insert("color".into(), attr_or(attrs, "color", "#ff9e6d"));
    data.insert("shape".into(), attr_or(attrs, "shape", "circle"));
    data.insert(
        "icon".into(),
        attrs.get("icon").cloned().unwrap_or(AttrValue::Null),
    );
    data.insert("hideIcon".into(), attr_or(attrs, "hideIcon", false));
    // `draggable: false` must survive, so only a missing value falls back.
    data.insert(
        "draggable".into(),
        node.attr("draggable").cloned().unwrap_or(AttrValue::Bool(true)),
    );
    data.insert("size".into(), attr_or(attrs, "size", 18i64));
    data.insert("borderRadius".into(), attr_or(attrs, "borderRadius", 4i64));
    data.insert("strokeWidth".into(), attr_or(attrs, "strokeWidth", 0i64));
    data.insert("strokeColor".into(), attr_or(attrs, "strokeColor", "#000000"));
    data.insert(
        "strokeDasharray".into(),
        attr_or(attrs, "strokeDasharray", "0"),
    );
    data.insert(
        "labelDirection".into(),
        attr_or(attrs, "labelDirection", "south"),
    );
    data.insert(
        "labelPosition".into(),
        attr_or(attrs, "labelPosition", "outside"),
    );
    data
}

pub fn edge_form_data(id: &str, edge: &Edge) -> Attributes {
    let attrs = &edge.attrs;
    let mut data = Attributes::new();
    data.insert("id".into(), id.into());
    data.insert("label".into(), attr_or(attrs, "label", ""));
    data.insert("color".into(), attr_or(attrs, "color", "#ff00dd"));
    data.insert("width".into(), attr_or(attrs, "width", 3i64));
    data.insert("dasharray".into(), attr_or(attrs, "dasharray", "0"));
    data.insert("linecap".into(), attr_or(attrs, "linecap", "butt"));
    data.insert("animate".into(), attr_or(attrs, "animate", false));
    data.insert("animationSpeed".into(), attr_or(attrs, "animationSpeed", 50i64));
    data.insert(
        "sourceMarkerType".into(),
        attr_or(attrs, "sourceMarkerType", "none"),
    );
    data.insert(
        "targetMarkerType".into(),
        attr_or(attrs, "targetMarkerType", "arrow"),
    );
    data
}

/// Checks each value against the field it belongs to. Unknown keys and `id` pass through, and
/// `null` always passes (it clears the attribute).
pub fn validate(bag: &Attributes, schema: &[FieldSpec]) -> Result<()> {
    validate_changes(bag, schema, &Attributes::new())
}

/// Like [`validate`], but values equal to the entity's `current` attribute are accepted as-is,
/// so a loaded `size: 200` does not block saving an untouched form.
pub fn validate_changes(bag: &Attributes, schema: &[FieldSpec], current: &Attributes) -> Result<()> {
    for (key, value) in bag {
        if key == "id" || value.is_null() || current.get(key) == Some(value) {
            continue;
        }
        let Some(spec) = schema.iter().find(|f| f.key == key) else {
            continue;
        };
        check_field(spec, value)?;
    }
    Ok(())
}

fn check_field(spec: &FieldSpec, value: &AttrValue) -> Result<()> {
    let expect = |wanted: &str| {
        Error::invalid_attribute(
            spec.key,
            format!("expected {wanted}, got {}", value.kind_name()),
        )
    };
    match &spec.kind {
        FieldKind::Divider => Ok(()),
        FieldKind::Text | FieldKind::Icon { .. } | FieldKind::Color { .. } => {
            value.as_str().map(|_| ()).ok_or_else(|| expect("string"))
        }
        FieldKind::Checkbox => value.as_bool().map(|_| ()).ok_or_else(|| expect("boolean")),
        FieldKind::Number { min, max, .. } | FieldKind::Range { min, max, .. } => {
            let n = value.as_f64().ok_or_else(|| expect("number"))?;
            if !n.is_finite() || n < *min || n > *max {
                return Err(Error::invalid_attribute(
                    spec.key,
                    format!("{n} is outside {min}..={max}"),
                ));
            }
            Ok(())
        }
        FieldKind::Shape { options } | FieldKind::Select { options } | FieldKind::Font { options } => {
            let s = value.as_str().ok_or_else(|| expect("string"))?;
            if options.iter().any(|o| o.value == s) {
                Ok(())
            } else {
                Err(Error::invalid_attribute(
                    spec.key,
                    format!("`{s}` is not one of the allowed options"),
                ))
            }
        }
    }
}

/// What the host's editor dialog is editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum EditorTarget {
    Node(NodeId),
    Edge(EdgeId),
}

/// Everything needed to open the property editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRequest {
    pub title: &'static str,
    pub target: EditorTarget,
    pub schema: Vec<FieldSpec>,
    pub initial_data: Attributes,
}

impl EditorRequest {
    pub fn for_node(id: &str, node: &Node) -> Self {
        Self {
            title: NODE_EDITOR_TITLE,
            target: EditorTarget::Node(id.to_string()),
            schema: node_form_schema(),
            initial_data: node_form_data(id, node),
        }
    }

    pub fn for_edge(id: &str, edge: &Edge) -> Self {
        Self {
            title: EDGE_EDITOR_TITLE,
            target: EditorTarget::Edge(id.to_string()),
            schema: edge_form_schema(),
            initial_data: edge_form_data(id, edge),
        }
    }
}
