//! Level → building → floor navigation.
//!
//! Two LIFO stacks record where the user came from. Drilling into a plain level pushes onto the
//! level history; drilling into a building pushes onto the building history. Both hold full
//! [`Context`] snapshots. Going back restores them verbatim; leaving a building keeps only the
//! level of the popped frame.

use crate::config::EditorConfig;
use crate::model::{FloorId, LevelId, ScopeId};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_LEVEL: &str = "main";

/// Which level, building and floor the user is looking at.
///
/// `level` is kept while inside a building so that leaving the building can fall back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub level: LevelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<LevelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<FloorId>,
}

impl Context {
    pub fn level(level: impl Into<LevelId>) -> Self {
        Self {
            level: level.into(),
            building: None,
            floor: None,
        }
    }

    pub fn in_building(&self) -> bool {
        self.building.is_some()
    }

    /// Scope projected for this context; `None` is the building view before a floor is chosen.
    pub fn scope(&self) -> Option<ScopeId> {
        match (&self.building, &self.floor) {
            (Some(building), Some(floor)) => Some(ScopeId::floor(building.as_str(), floor.as_str())),
            (Some(_), None) => None,
            (None, _) => Some(ScopeId::level(self.level.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    root: LevelId,
    context: Context,
    level_history: Vec<Context>,
    building_history: Vec<Context>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_LEVEL)
    }
}

impl Navigator {
    pub fn new(root: impl Into<LevelId>) -> Self {
        let root = root.into();
        Self {
            context: Context::level(root.as_str()),
            root,
            level_history: Vec::new(),
            building_history: Vec::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Level ids of the level history, oldest first.
    pub fn level_history(&self) -> Vec<&str> {
        self.level_history
            .iter()
            .map(|ctx| ctx.level.as_str())
            .collect()
    }

    pub fn building_history(&self) -> &[Context] {
        &self.building_history
    }

    pub fn can_go_back(&self) -> bool {
        self.context.floor.is_some()
            || self.context.building.is_some()
            || !self.level_history.is_empty()
    }

    /// Points the store's active projection at the current context.
    pub fn project(&self, store: &mut GraphStore) {
        store.set_active_projection(self.context.scope());
    }

    /// Enters the level referenced by `node_id`'s `childLayer`.
    pub fn drill_down(&mut self, store: &mut GraphStore, node_id: &str) -> bool {
        let child = store
            .active_projection()
            .nodes
            .get(node_id)
            .and_then(|node| node.child_layer.clone());
        let Some(child) = child else {
            tracing::debug!(node = node_id, "drill-down ignored: no child layer");
            return false;
        };
        let Some(target) = store.level(&child) else {
            tracing::debug!(node = node_id, level = %child, "drill-down ignored: unknown level");
            return false;
        };

        if target.is_building() {
            self.building_history.push(self.context.clone());
            self.context = Context {
                level: self.context.level.clone(),
                building: Some(child),
                floor: None,
            };
        } else {
            self.level_history.push(self.context.clone());
            self.context = Context::level(child);
        }
        tracing::debug!(context = ?self.context, "drilled down");
        self.project(store);
        true
    }

    pub fn go_to_floor(&mut self, store: &mut GraphStore, floor_id: &str) -> bool {
        let Some(building) = &self.context.building else {
            tracing::debug!(floor = floor_id, "floor switch ignored: not inside a building");
            return false;
        };
        let exists = store
            .level(building)
            .and_then(|level| level.floor(floor_id))
            .is_some();
        if !exists {
            tracing::debug!(building = %building, floor = floor_id, "floor switch ignored: unknown floor");
            return false;
        }
        self.context.floor = Some(floor_id.to_string());
        self.project(store);
        true
    }

    /// Undoes one navigation step: floor first, then building, then level history.
    ///
    /// Leaving a floor only returns to the building view; another step leaves the building.
    pub fn go_back(&mut self, store: &mut GraphStore) -> bool {
        if self.context.floor.is_some() {
            self.context.floor = None;
        } else if self.context.building.is_some() {
            let Some(previous) = self.building_history.pop() else {
                return false;
            };
            self.context = previous;
        } else if let Some(previous) = self.level_history.pop() {
            self.context = previous;
        } else {
            return false;
        }
        tracing::debug!(context = ?self.context, "navigated back");
        self.project(store);
        true
    }

    /// Leaves the current floor, or the building itself when no floor is active.
    pub fn exit_building(&mut self, store: &mut GraphStore) -> bool {
        if self.context.floor.is_some() {
            self.context.floor = None;
        } else if self.context.building.is_some() {
            // Only the level of the popped frame is restored; it may have been pushed from a floor.
            let level = match self.level_history.pop() {
                Some(previous) => previous.level,
                None => self.context.level.clone(),
            };
            self.context = Context::level(level);
        } else {
            return false;
        }
        tracing::debug!(context = ?self.context, "left building");
        self.project(store);
        true
    }

    /// Floors of the current building in dataset order, as `(id, name)`.
    pub fn building_floors(&self, store: &GraphStore) -> Vec<(FloorId, String)> {
        let Some(floors) = self
            .context
            .building
            .as_deref()
            .and_then(|id| store.level(id))
            .and_then(|level| level.floors.as_ref())
        else {
            return Vec::new();
        };
        floors
            .iter()
            .map(|(id, floor)| (id.clone(), floor.name.clone()))
            .collect()
    }

    /// Background of the current level. Buildings and floors have none.
    pub fn background_image<'a>(&self, store: &'a GraphStore) -> Option<&'a str> {
        if self.context.in_building() {
            return None;
        }
        store.level(&self.context.level)?.background.as_deref()
    }

    /// Heading for the navigation bar.
    pub fn current_title(&self, store: &GraphStore, config: &EditorConfig) -> String {
        if let Some(building_id) = &self.context.building {
            let building = store.level(building_id);
            let building_name = building
                .and_then(|b| b.name.clone())
                .unwrap_or_else(|| building_id.clone());
            return match &self.context.floor {
                Some(floor_id) => {
                    let floor_name = building
                        .and_then(|b| b.floor(floor_id))
                        .map(|f| f.name.clone())
                        .unwrap_or_else(|| floor_id.clone());
                    format!("{building_name} - {floor_name}")
                }
                None => building_name,
            };
        }
        if self.context.level == self.root {
            return config.title("mainMap").to_string();
        }
        let Some(level) = store.level(&self.context.level) else {
            return config.title("fallback").to_string();
        };
        level
            .name
            .clone()
            .or_else(|| level.nodes.values().next().map(|n| n.name.clone()))
            .unwrap_or_else(|| config.title("fallback").to_string())
    }
}
