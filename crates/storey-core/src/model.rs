//! Dataset model: levels, floors, nodes, edges and their layouts.
//!
//! The JSON shape mirrors the editor's data document:
//!
//! ```json
//! {
//!   "levels": {
//!     "main": {
//!       "background": "img/map.png",
//!       "nodes": { "node1": { "name": "HQ", "childLayer": "campus" } },
//!       "edges": { "edge1": { "source": "node1", "target": "node2" } }
//!     },
//!     "B1": { "name": "Block 1", "nodes": {}, "edges": {}, "floors": { "F1": { "name": "Ground" } } }
//!   },
//!   "layouts": { "main": { "node1": { "x": 10, "y": 20 } }, "B1_F1": {} }
//! }
//! ```

use crate::error::{Error, Result};
use crate::geom::LayoutPoint;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub type LevelId = String;
pub type FloorId = String;
pub type NodeId = String;
pub type EdgeId = String;

pub type NodeMap = IndexMap<NodeId, Node>;
pub type EdgeMap = IndexMap<EdgeId, Edge>;
pub type Layout = IndexMap<NodeId, LayoutPoint>;
pub type Attributes = IndexMap<String, AttrValue>;

/// A presentation attribute value. The core never interprets these; only the property editor
/// schema and the style resolver read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "boolean",
            AttrValue::Int(_) | AttrValue::Float(_) => "number",
            AttrValue::Text(_) => "string",
        }
    }

    /// JS-style truthiness, used where the renderer falls back to a default on falsy values
    /// (`node.size || 16`).
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(v) => *v,
            AttrValue::Int(v) => *v != 0,
            AttrValue::Float(v) => *v != 0.0 && !v.is_nan(),
            AttrValue::Text(s) => !s.is_empty(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub name: String,
    #[serde(
        rename = "childLayer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub child_layer: Option<LevelId>,
    #[serde(flatten)]
    pub attrs: Attributes,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_child_layer(mut self, level: impl Into<LevelId>) -> Self {
        self.child_layer = Some(level.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(flatten)]
    pub attrs: Attributes,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key).filter(|v| !v.is_null())
    }

    /// Whether this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn touches(&self, node: &str) -> bool {
        self.source == node || self.target == node
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: NodeMap,
    #[serde(default)]
    pub edges: EdgeMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub nodes: NodeMap,
    #[serde(default)]
    pub edges: EdgeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<IndexMap<FloorId, Floor>>,
}

impl Level {
    /// Levels with a `floors` map are buildings.
    pub fn is_building(&self) -> bool {
        self.floors.is_some()
    }

    pub fn floor(&self, id: &str) -> Option<&Floor> {
        self.floors.as_ref()?.get(id)
    }
}

/// Identifies one editable graph: a level, or one floor of a building.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeId {
    Level(LevelId),
    Floor { building: LevelId, floor: FloorId },
}

impl ScopeId {
    pub fn level(id: impl Into<LevelId>) -> Self {
        ScopeId::Level(id.into())
    }

    pub fn floor(building: impl Into<LevelId>, floor: impl Into<FloorId>) -> Self {
        ScopeId::Floor {
            building: building.into(),
            floor: floor.into(),
        }
    }

    /// Key of this scope in [`GraphDataset::layouts`].
    pub fn layout_key(&self) -> Cow<'_, str> {
        match self {
            ScopeId::Level(id) => Cow::Borrowed(id.as_str()),
            ScopeId::Floor { building, floor } => Cow::Owned(format!("{building}_{floor}")),
        }
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Level(id) => write!(f, "{id}"),
            ScopeId::Floor { building, floor } => write!(f, "{building}/{floor}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDataset {
    #[serde(default)]
    pub levels: IndexMap<LevelId, Level>,
    #[serde(default)]
    pub layouts: IndexMap<String, Layout>,
}

impl GraphDataset {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the nodes and edges of a scope, if it exists.
    pub fn scope(&self, scope: &ScopeId) -> Option<(&NodeMap, &EdgeMap)> {
        match scope {
            ScopeId::Level(id) => {
                let level = self.levels.get(id)?;
                Some((&level.nodes, &level.edges))
            }
            ScopeId::Floor { building, floor } => {
                let floor = self.levels.get(building)?.floor(floor)?;
                Some((&floor.nodes, &floor.edges))
            }
        }
    }

    pub fn scope_mut(&mut self, scope: &ScopeId) -> Option<(&mut NodeMap, &mut EdgeMap)> {
        scope_maps_mut(&mut self.levels, scope)
    }

    pub fn layout(&self, scope: &ScopeId) -> Option<&Layout> {
        self.layouts.get(scope.layout_key().as_ref())
    }

    /// Checks that every edge of every scope references nodes of that same scope.
    pub fn validate(&self) -> Result<()> {
        for (level_id, level) in &self.levels {
            check_scope(&ScopeId::level(level_id.as_str()), &level.nodes, &level.edges)?;
            let Some(floors) = &level.floors else {
                continue;
            };
            for (floor_id, floor) in floors {
                let scope = ScopeId::floor(level_id.as_str(), floor_id.as_str());
                check_scope(&scope, &floor.nodes, &floor.edges)?;
            }
        }
        Ok(())
    }
}

/// Borrows only `levels`, so callers can hold the scope's layout from `layouts` at the same time.
pub(crate) fn scope_maps_mut<'a>(
    levels: &'a mut IndexMap<LevelId, Level>,
    scope: &ScopeId,
) -> Option<(&'a mut NodeMap, &'a mut EdgeMap)> {
    match scope {
        ScopeId::Level(id) => {
            let level = levels.get_mut(id)?;
            Some((&mut level.nodes, &mut level.edges))
        }
        ScopeId::Floor { building, floor } => {
            let floor = levels
                .get_mut(building)?
                .floors
                .as_mut()?
                .get_mut(floor)?;
            Some((&mut floor.nodes, &mut floor.edges))
        }
    }
}

fn check_scope(scope: &ScopeId, nodes: &NodeMap, edges: &EdgeMap) -> Result<()> {
    for (edge_id, edge) in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !nodes.contains_key(endpoint) {
                return Err(Error::DanglingEdge {
                    scope: scope.to_string(),
                    edge_id: edge_id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}
