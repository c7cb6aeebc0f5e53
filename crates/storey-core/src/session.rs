use crate::config::EditorConfig;
use crate::edit;
use crate::editor::{self, EditorRequest, EditorTarget};
use crate::error::{Error, Result};
use crate::geom::{CanvasTranslator, LayoutPoint, Point, ViewTransform, point};
use crate::interaction::InteractionState;
use crate::model::{Attributes, EdgeId, FloorId, GraphDataset, LevelId, NodeId, ScopeId};
use crate::navigation::{Context, DEFAULT_ROOT_LEVEL, Navigator};
use crate::selection::{self, Selection};
use crate::store::{
    GraphStore, LevelDefaults, Projection, ProjectionChange, ScopeMut, SubscriptionId,
};
use std::fmt;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub root_level: LevelId,
    pub config: EditorConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            root_level: DEFAULT_ROOT_LEVEL.to_string(),
            config: EditorConfig::default(),
        }
    }
}

impl SessionOptions {
    pub fn with_root_level(mut self, root: impl Into<LevelId>) -> Self {
        self.root_level = root.into();
        self
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }
}

/// One editing session over a loaded dataset.
///
/// All navigation, selection and edit entry points live here so that the selection can be
/// cleared or pruned in the same call that changes the projection.
pub struct Session {
    store: GraphStore,
    navigator: Navigator,
    selection: Selection,
    config: EditorConfig,
    translator: Box<dyn CanvasTranslator + Send>,
    pub(crate) interaction: InteractionState,
    icon_cursor: usize,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("context", self.navigator.context())
            .field("selection", &self.selection)
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(dataset: GraphDataset, options: SessionOptions) -> Self {
        let mut store = GraphStore::new(dataset);
        let navigator = Navigator::new(options.root_level);
        navigator.project(&mut store);
        Self {
            store,
            navigator,
            selection: Selection::new(),
            config: options.config,
            translator: Box::new(ViewTransform::default()),
            interaction: InteractionState::default(),
            icon_cursor: 0,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn dataset(&self) -> &GraphDataset {
        self.store.dataset()
    }

    pub fn into_dataset(self) -> GraphDataset {
        self.store.into_dataset()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn context(&self) -> &Context {
        self.navigator.context()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    /// Replaces the screen → canvas translation used when placing nodes.
    pub fn set_translator(&mut self, translator: impl CanvasTranslator + Send + 'static) {
        self.translator = Box::new(translator);
    }

    pub fn projection(&self) -> Projection<'_> {
        self.store.active_projection()
    }

    pub fn active_scope(&self) -> Option<&ScopeId> {
        self.store.active_scope()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ProjectionChange) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn background_image(&self) -> Option<&str> {
        self.navigator.background_image(&self.store)
    }

    pub fn title(&self) -> String {
        self.navigator.current_title(&self.store, &self.config)
    }

    pub fn building_floors(&self) -> Vec<(FloorId, String)> {
        self.navigator.building_floors(&self.store)
    }

    pub fn level_history(&self) -> Vec<&str> {
        self.navigator.level_history()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigator.can_go_back()
    }

    // Navigation

    pub fn drill_down(&mut self, node_id: &str) -> bool {
        let moved = self.navigator.drill_down(&mut self.store, node_id);
        self.after_navigation(moved)
    }

    pub fn go_to_floor(&mut self, floor_id: &str) -> bool {
        let moved = self.navigator.go_to_floor(&mut self.store, floor_id);
        self.after_navigation(moved)
    }

    pub fn go_back(&mut self) -> bool {
        let moved = self.navigator.go_back(&mut self.store);
        self.after_navigation(moved)
    }

    pub fn exit_building(&mut self) -> bool {
        let moved = self.navigator.exit_building(&mut self.store);
        self.after_navigation(moved)
    }

    fn after_navigation(&mut self, moved: bool) -> bool {
        if moved {
            self.selection.clear();
            self.interaction.reset();
        }
        moved
    }

    // Selection

    pub fn select_node(&mut self, id: &str) -> bool {
        let known = self.projection().nodes.contains_key(id);
        known && self.selection.select_node(id)
    }

    pub fn select_edge(&mut self, id: &str) -> bool {
        let known = self.projection().edges.contains_key(id);
        known && self.selection.select_edge(id)
    }

    pub fn deselect_node(&mut self, id: &str) -> bool {
        self.selection.deselect_node(id)
    }

    pub fn deselect_edge(&mut self, id: &str) -> bool {
        self.selection.deselect_edge(id)
    }

    pub fn toggle_node(&mut self, id: &str) {
        if self.projection().nodes.contains_key(id) {
            self.selection.toggle_node(id);
        }
    }

    pub fn toggle_edge(&mut self, id: &str) {
        if self.projection().edges.contains_key(id) {
            self.selection.toggle_edge(id);
        }
    }

    /// Replaces the selection, dropping ids that are not in the active projection.
    pub fn replace_selection<N, E>(&mut self, nodes: N, edges: E)
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = EdgeId>,
    {
        let projection = self.store.active_projection();
        self.selection.replace(nodes, edges, &projection);
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn has_edges_between_selected(&self) -> bool {
        selection::has_edges_between_selected(&self.selection.nodes, &self.projection().edges)
    }

    // Edits

    fn edit<R>(&mut self, f: impl FnOnce(ScopeMut<'_>, &mut Selection) -> R) -> Result<R> {
        let Some(scope) = self.store.active_scope_mut() else {
            tracing::debug!(context = ?self.navigator.context(), "edit rejected: no active scope");
            return Err(Error::NoActiveScope);
        };
        let out = f(scope, &mut self.selection);
        self.store.mark_mutated();
        Ok(out)
    }

    /// Connects two nodes of the active scope. Unknown nodes, self-loops and existing
    /// connections yield `Ok(None)`.
    pub fn create_edge(&mut self, source: &str, target: &str) -> Result<Option<EdgeId>> {
        self.edit(|scope, _| {
            if !scope.nodes.contains_key(source) || !scope.nodes.contains_key(target) {
                tracing::debug!(source, target, "edge creation ignored: unknown node");
                return None;
            }
            edit::create_edge(source, target, scope.edges)
        })
    }

    pub fn create_edges_between_selected(&mut self) -> Result<Vec<EdgeId>> {
        self.edit(|scope, selection| {
            edit::create_edges_between_selected(&selection.nodes, scope.edges)
        })
    }

    pub fn delete_node(&mut self, id: &str) -> Result<()> {
        self.edit(|scope, selection| {
            edit::delete_node(
                id,
                scope.nodes,
                scope.layout,
                scope.edges,
                &mut selection.nodes,
                &mut selection.edges,
            )
        })
    }

    pub fn delete_edge(&mut self, id: &str) -> Result<()> {
        self.edit(|scope, selection| edit::delete_edge(id, scope.edges, &mut selection.edges))
    }

    pub fn delete_edges_between_selected(&mut self) -> Result<()> {
        self.edit(|scope, selection| {
            edit::delete_edges_between_selected(&selection.nodes, scope.edges, &mut selection.edges)
        })
    }

    pub fn delete_selected_edges(&mut self) -> Result<()> {
        self.edit(|scope, selection| edit::delete_selected_edges(&mut selection.edges, scope.edges))
    }

    pub fn delete_selected_nodes(&mut self) -> Result<()> {
        self.edit(|scope, selection| {
            edit::delete_selected_nodes(
                &mut selection.nodes,
                scope.nodes,
                scope.layout,
                scope.edges,
                &mut selection.edges,
            )
        })
    }

    pub fn reverse_edge(&mut self, id: &str) -> Result<bool> {
        self.edit(|scope, _| edit::reverse_edge(id, scope.edges))
    }

    /// Moves a node of the active scope. Unknown nodes and non-finite points are ignored.
    pub fn set_node_position(&mut self, id: &str, position: LayoutPoint) -> Result<bool> {
        self.edit(|scope, _| {
            if !position.is_finite() || !scope.nodes.contains_key(id) {
                return false;
            }
            scope.layout.insert(id.to_string(), position);
            true
        })
    }

    /// Adds a node under a container-local screen position.
    ///
    /// Negative coordinates are clamped to the container edge before translation. A non-finite
    /// canvas point aborts the call without touching the dataset.
    pub fn add_node_at(&mut self, screen: Point) -> Result<NodeId> {
        let Some(scope) = self.store.active_scope().cloned() else {
            return Err(Error::NoActiveScope);
        };
        let clamped = point(screen.x.max(0.0), screen.y.max(0.0));
        let canvas = self.translator.screen_to_canvas(clamped);
        if !canvas.x.is_finite() || !canvas.y.is_finite() {
            tracing::error!(x = canvas.x, y = canvas.y, "invalid canvas coordinates; node not added");
            return Err(Error::MalformedCoordinate {
                x: canvas.x,
                y: canvas.y,
            });
        }

        let template: Attributes = match self.config.get("newNode") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Attributes::new(),
        };
        if let ScopeId::Level(level) = &scope {
            let defaults = self.level_defaults();
            self.store.ensure_scope_exists(level, &defaults);
        }

        let icons = self.config.icons();
        let icon = if icons.is_empty() {
            None
        } else {
            Some(icons[self.icon_cursor % icons.len()].to_string())
        };
        self.icon_cursor = self.icon_cursor.wrapping_add(1);

        let id = self.edit(|scope, _| {
            edit::create_node(
                scope.nodes,
                scope.layout,
                LayoutPoint::from(canvas),
                &template,
                icon.as_deref(),
            )
        })?;
        tracing::debug!(node = %id, x = canvas.x, y = canvas.y, "node added");
        Ok(id)
    }

    /// Validates `bag` against the node schema and merges it into the node. Values the node
    /// already carries are not re-checked.
    pub fn update_node(&mut self, id: &str, bag: &Attributes) -> Result<bool> {
        let current = self
            .projection()
            .nodes
            .get(id)
            .map(|node| node.attrs.clone())
            .unwrap_or_default();
        if let Err(err) = editor::validate_changes(bag, &editor::node_form_schema(), &current) {
            tracing::warn!(node = id, error = %err, "node attributes rejected");
            return Err(err);
        }
        let changed = self.edit(|scope, _| edit::merge_node_attributes(id, bag, scope.nodes))?;
        // The referenced level only appears once the node actually carries it.
        if changed {
            if let Some(level) = bag.get("childLayer").and_then(|v| v.as_str()) {
                if !level.is_empty() {
                    let defaults = self.level_defaults();
                    self.store.ensure_scope_exists(level, &defaults);
                }
            }
        }
        Ok(changed)
    }

    /// Validates `bag` against the edge schema and merges it. Endpoints never change.
    pub fn update_edge(&mut self, id: &str, bag: &Attributes) -> Result<bool> {
        let current = self
            .projection()
            .edges
            .get(id)
            .map(|edge| edge.attrs.clone())
            .unwrap_or_default();
        if let Err(err) = editor::validate_changes(bag, &editor::edge_form_schema(), &current) {
            tracing::warn!(edge = id, error = %err, "edge attributes rejected");
            return Err(err);
        }
        self.edit(|scope, _| edit::merge_edge_attributes(id, bag, scope.edges))
    }

    /// Editor request for a node or edge of the active projection.
    pub fn editor_request(&self, target: &EditorTarget) -> Option<EditorRequest> {
        let projection = self.projection();
        match target {
            EditorTarget::Node(id) => projection
                .nodes
                .get(id)
                .map(|node| EditorRequest::for_node(id, node)),
            EditorTarget::Edge(id) => projection
                .edges
                .get(id)
                .map(|edge| EditorRequest::for_edge(id, edge)),
        }
    }

    fn level_defaults(&self) -> LevelDefaults {
        let background = self
            .background_image()
            .or_else(|| self.config.get_str("view.background"))
            .map(str::to_string);
        LevelDefaults { background }
    }
}
