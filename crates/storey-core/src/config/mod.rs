use serde_json::{Map, Value, json};

/// Renderer and editor configuration, stored as a JSON tree.
///
/// [`EditorConfig::default`] carries the built-in view/node/edge fallbacks; hosts override parts
/// of it with [`EditorConfig::deep_merge`] or [`EditorConfig::set_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig(Value);

impl Default for EditorConfig {
    fn default() -> Self {
        Self(default_tree())
    }
}

impl EditorConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut config = Self::default();
        config.deep_merge(overrides);
        config
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    /// `titles.<key>`, falling back to a generic heading.
    pub fn title(&self, key: &str) -> &str {
        self.get("titles")
            .and_then(|titles| titles.get(key))
            .and_then(Value::as_str)
            .unwrap_or("Map")
    }

    /// Icon classes offered for new nodes.
    pub fn icons(&self) -> Vec<&str> {
        self.get("icons")
            .and_then(Value::as_array)
            .map(|icons| icons.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Writes `value` at `dotted_path`. Scalars met on the way are replaced by objects.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let (parents, leaf) = match dotted_path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, dotted_path),
        };
        let mut cur = &mut self.0;
        for seg in parents.into_iter().flat_map(|p| p.split('.')) {
            let Some(map) = object_mut(cur) else {
                return;
            };
            cur = map.entry(seg).or_insert_with(|| Value::Object(Map::new()));
        }
        if let Some(map) = object_mut(cur) {
            map.insert(leaf.to_string(), value);
        }
    }

    /// Merges `other` over this tree. Objects merge key by key; anything else (arrays included)
    /// replaces what was there.
    pub fn deep_merge(&mut self, other: &Value) {
        merge_into(&mut self.0, other);
    }
}

fn object_mut(slot: &mut Value) -> Option<&mut Map<String, Value>> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

fn merge_into(base: &mut Value, incoming: &Value) {
    let (Value::Object(base_map), Value::Object(in_map)) = (&mut *base, incoming) else {
        *base = incoming.clone();
        return;
    };
    for (key, in_value) in in_map {
        match base_map.get_mut(key) {
            Some(slot) => merge_into(slot, in_value),
            None => {
                base_map.insert(key.clone(), in_value.clone());
            }
        }
    }
}

fn default_tree() -> Value {
    json!({
        "view": {
            "scalingObjects": false,
            "boxSelectionEnabled": true,
            "autoPanAndZoomOnLoad": "fit-content",
            "minZoom": 1,
            "maxZoom": 1,
            "zoom": 1,
            "selection": {
                "enabled": true,
                "box": {
                    "color": "#4a90e220",
                    "strokeWidth": 1,
                    "strokeColor": "#4a90e2",
                    "strokeDasharray": "0"
                }
            }
        },
        "node": {
            "selectable": true,
            "draggable": true,
            "shape": "circle",
            "size": 16,
            "borderRadius": 4,
            "strokeWidth": 0,
            "strokeColor": "#000000",
            "strokeDasharray": "0",
            "color": {
                "normal": "#4466cc",
                "hover": "#dd2288",
                "selected": "#4466cc"
            },
            "label": {
                "visible": true,
                "fontFamily": "monospace",
                "fontSize": 11,
                "lineHeight": 1.1,
                "color": "#000000",
                "margin": 4,
                "direction": "south",
                "text": "name"
            },
            "focusring": {
                "visible": true,
                "width": 4,
                "padding": 3,
                "color": "#eebb00",
                "dasharray": "0"
            }
        },
        "edge": {
            "selectable": true,
            "normal": { "width": 3, "color": "#4466cc", "dasharray": "0", "linecap": "butt" },
            "hover": { "width": 4, "color": "#3355bb", "dasharray": "0", "linecap": "butt" },
            "selected": { "width": 3, "color": "#dd8800", "dasharray": "6", "linecap": "round" },
            "animate": false,
            "animationSpeed": 50,
            "gap": 5,
            "type": "straight",
            "margin": 2,
            "marker": {
                "source": "none",
                "target": "arrow",
                "width": 8,
                "height": 8
            },
            "label": {
                "fontSize": 11,
                "color": "#ff0000",
                "margin": 4
            }
        },
        "titles": {
            "mainMap": "Main map",
            "fallback": "Map"
        },
        "newNode": {
            "shape": "circle",
            "color": "#ff9e6d",
            "size": 18,
            "draggable": true,
            "labelDirection": "south",
            "labelPosition": "outside",
            "fontFamily": "monospace",
            "fontColor": "#000000",
            "fontSize": 11
        },
        "icons": [
            "fa-solid fa-address-card",
            "fa-regular fa-hard-drive",
            "fa-regular fa-folder-closed",
            "fa-brands fa-pied-piper-hat",
            "fa-solid fa-wifi",
            "fa-solid fa-key",
            "fa-solid fa-print",
            "fa-solid fa-database",
            "fa-solid fa-desktop"
        ]
    })
}
