//! Dataset ownership and the active projection.
//!
//! The store never copies scope data: projections borrow the dataset, and a scope that does not
//! exist projects as empty maps. Every re-projection or mutation bumps [`GraphStore::version`]
//! and is announced to subscribers, which is how renderers learn they must re-read.

use crate::geom::LayoutPoint;
use crate::model::{EdgeMap, GraphDataset, Layout, Level, NodeMap, ScopeId};
use std::borrow::Cow;
use std::fmt;

/// Read-only view of one scope.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    pub nodes: Cow<'a, NodeMap>,
    pub edges: Cow<'a, EdgeMap>,
    pub layout: Cow<'a, Layout>,
}

impl Projection<'_> {
    fn empty() -> Self {
        Self {
            nodes: Cow::Owned(NodeMap::new()),
            edges: Cow::Owned(EdgeMap::new()),
            layout: Cow::Owned(Layout::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn position(&self, node: &str) -> Option<LayoutPoint> {
        self.layout.get(node).copied()
    }
}

/// Mutable access to the three maps of one scope at once.
#[derive(Debug)]
pub struct ScopeMut<'a> {
    pub nodes: &'a mut NodeMap,
    pub edges: &'a mut EdgeMap,
    pub layout: &'a mut Layout,
}

/// Defaults for levels created on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelDefaults {
    pub background: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The active projection now points at a different scope (or at the empty view).
    Reprojected,
    /// Data inside the active projection changed.
    Mutated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionChange {
    pub version: u64,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ProjectionChange) + Send>;

pub struct GraphStore {
    dataset: GraphDataset,
    /// `None` is the empty projection shown inside a building before a floor is chosen.
    active: Option<ScopeId>,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("active", &self.active)
            .field("version", &self.version)
            .field("levels", &self.dataset.levels.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GraphStore {
    pub fn new(dataset: GraphDataset) -> Self {
        Self {
            dataset,
            active: None,
            version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn dataset(&self) -> &GraphDataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> GraphDataset {
        self.dataset
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        self.dataset.levels.get(id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Projection of an arbitrary scope. Missing scopes (and missing layouts) are empty.
    pub fn projection(&self, scope: &ScopeId) -> Projection<'_> {
        let Some((nodes, edges)) = self.dataset.scope(scope) else {
            return Projection::empty();
        };
        Projection {
            nodes: Cow::Borrowed(nodes),
            edges: Cow::Borrowed(edges),
            layout: match self.dataset.layout(scope) {
                Some(layout) => Cow::Borrowed(layout),
                None => Cow::Owned(Layout::new()),
            },
        }
    }

    pub fn active_scope(&self) -> Option<&ScopeId> {
        self.active.as_ref()
    }

    pub fn active_projection(&self) -> Projection<'_> {
        match &self.active {
            Some(scope) => self.projection(scope),
            None => Projection::empty(),
        }
    }

    /// Mutable maps of the active scope, or `None` for the empty view and for scopes that do
    /// not exist in the dataset. The scope's layout entry is created if it is missing.
    pub fn active_scope_mut(&mut self) -> Option<ScopeMut<'_>> {
        let scope = self.active.as_ref()?;
        let GraphDataset { levels, layouts } = &mut self.dataset;
        let (nodes, edges) = crate::model::scope_maps_mut(levels, scope)?;
        let layout = layouts
            .entry(scope.layout_key().into_owned())
            .or_default();
        Some(ScopeMut {
            nodes,
            edges,
            layout,
        })
    }

    /// Creates `level` with empty nodes/edges if it is absent. Returns whether it was created.
    pub fn ensure_scope_exists(&mut self, level: &str, defaults: &LevelDefaults) -> bool {
        if self.dataset.levels.contains_key(level) {
            return false;
        }
        self.dataset.levels.insert(
            level.to_string(),
            Level {
                background: defaults.background.clone(),
                ..Default::default()
            },
        );
        tracing::debug!(level, "created level on demand");
        if self.active.as_ref() == Some(&ScopeId::Level(level.to_string())) {
            self.mark_mutated();
        }
        true
    }

    /// Repoints the active projection. `None` selects the empty building view.
    pub fn set_active_projection(&mut self, scope: Option<ScopeId>) {
        tracing::debug!(scope = ?scope, "active projection changed");
        self.active = scope;
        self.notify(ChangeKind::Reprojected);
    }

    /// Records that data inside the active projection changed.
    pub fn mark_mutated(&mut self) {
        self.notify(ChangeKind::Mutated);
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ProjectionChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, kind: ChangeKind) {
        self.version = self.version.wrapping_add(1);
        let change = ProjectionChange {
            version: self.version,
            kind,
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}
