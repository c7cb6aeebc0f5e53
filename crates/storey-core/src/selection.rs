use crate::edit::edge_exists;
use crate::model::{EdgeId, EdgeMap, NodeId};
use crate::store::Projection;
use indexmap::IndexSet;

pub type SelectedNodes = IndexSet<NodeId>;
pub type SelectedEdges = IndexSet<EdgeId>;

/// Selected node and edge ids, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub nodes: SelectedNodes,
    pub edges: SelectedEdges,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn select_node(&mut self, id: impl Into<NodeId>) -> bool {
        self.nodes.insert(id.into())
    }

    pub fn select_edge(&mut self, id: impl Into<EdgeId>) -> bool {
        self.edges.insert(id.into())
    }

    pub fn deselect_node(&mut self, id: &str) -> bool {
        self.nodes.shift_remove(id)
    }

    pub fn deselect_edge(&mut self, id: &str) -> bool {
        self.edges.shift_remove(id)
    }

    pub fn toggle_node(&mut self, id: &str) {
        if !self.nodes.shift_remove(id) {
            self.nodes.insert(id.to_string());
        }
    }

    pub fn toggle_edge(&mut self, id: &str) {
        if !self.edges.shift_remove(id) {
            self.edges.insert(id.to_string());
        }
    }

    /// Replaces both sets, keeping only ids present in `projection`.
    pub fn replace<N, E>(&mut self, nodes: N, edges: E, projection: &Projection<'_>)
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = EdgeId>,
    {
        self.nodes = nodes
            .into_iter()
            .filter(|id| projection.nodes.contains_key(id))
            .collect();
        self.edges = edges
            .into_iter()
            .filter(|id| projection.edges.contains_key(id))
            .collect();
    }

    /// Drops ids that are no longer part of `projection`.
    pub fn retain_in(&mut self, projection: &Projection<'_>) {
        self.nodes.retain(|id| projection.nodes.contains_key(id));
        self.edges.retain(|id| projection.edges.contains_key(id));
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// Whether any two of `selected` are already connected.
pub fn has_edges_between_selected(selected: &SelectedNodes, edges: &EdgeMap) -> bool {
    unordered_pairs(selected).any(|(a, b)| edge_exists(a, b, edges))
}

/// Every `(selected[i], selected[j])` with `i < j`.
pub(crate) fn unordered_pairs(selected: &SelectedNodes) -> impl Iterator<Item = (&str, &str)> + '_ {
    selected.iter().enumerate().flat_map(move |(i, a)| {
        selected
            .iter()
            .skip(i + 1)
            .map(move |b| (a.as_str(), b.as_str()))
    })
}
