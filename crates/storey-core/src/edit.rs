//! Structural edits on one scope.
//!
//! Every function takes the maps it touches explicitly. Missing ids, self-loops and duplicate
//! edges are silent no-ops, and deletions prune the selection sets they are given so no caller
//! can observe a dangling reference.

use crate::geom::LayoutPoint;
use crate::model::{Attributes, AttrValue, Edge, EdgeId, EdgeMap, Layout, Node, NodeId, NodeMap};
use crate::selection::{SelectedEdges, SelectedNodes, unordered_pairs};
use indexmap::IndexMap;

/// `prefix<N>` where `N` is one past the largest numeric suffix among keys shaped like
/// `prefix<digits>`. Other keys are ignored. When that suffix is already `u64::MAX`, the lowest
/// unused `N` is taken instead.
pub fn next_id<V>(map: &IndexMap<String, V>, prefix: &str) -> String {
    let max = map
        .keys()
        .filter_map(|key| {
            let digits = key.strip_prefix(prefix)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u64>().ok()
        })
        .max()
        .unwrap_or(0);
    if let Some(next) = max.checked_add(1) {
        return format!("{prefix}{next}");
    }
    (1..)
        .map(|n: u64| format!("{prefix}{n}"))
        .find(|candidate| !map.contains_key(candidate))
        .unwrap_or_else(|| format!("{prefix}0"))
}

/// Undirected: `a → b` and `b → a` count as the same connection.
pub fn edge_exists(a: &str, b: &str, edges: &EdgeMap) -> bool {
    edges.values().any(|edge| edge.connects(a, b))
}

/// Inserts `a → b` unless it would be a self-loop or duplicate. Returns the new edge id.
pub fn create_edge(a: &str, b: &str, edges: &mut EdgeMap) -> Option<EdgeId> {
    if a == b {
        tracing::debug!(node = a, "edge creation ignored: self-loop");
        return None;
    }
    if edge_exists(a, b, edges) {
        tracing::debug!(source = a, target = b, "edge creation ignored: already connected");
        return None;
    }
    let id = next_id(edges, "edge");
    edges.insert(id.clone(), Edge::new(a, b));
    Some(id)
}

/// Connects every unordered pair of `selected`. Running it twice adds nothing the second time.
pub fn create_edges_between_selected(selected: &SelectedNodes, edges: &mut EdgeMap) -> Vec<EdgeId> {
    if selected.len() < 2 {
        return Vec::new();
    }
    let pairs: Vec<(String, String)> = unordered_pairs(selected)
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    pairs
        .iter()
        .filter_map(|(a, b)| create_edge(a, b, edges))
        .collect()
}

/// Removes a node, its layout entry and every edge touching it.
pub fn delete_node(
    id: &str,
    nodes: &mut NodeMap,
    layout: &mut Layout,
    edges: &mut EdgeMap,
    selected_nodes: &mut SelectedNodes,
    selected_edges: &mut SelectedEdges,
) {
    nodes.shift_remove(id);
    layout.shift_remove(id);
    selected_nodes.shift_remove(id);

    let incident: Vec<EdgeId> = edges
        .iter()
        .filter(|(_, edge)| edge.touches(id))
        .map(|(edge_id, _)| edge_id.clone())
        .collect();
    for edge_id in &incident {
        delete_edge(edge_id, edges, selected_edges);
    }
}

pub fn delete_edge(id: &str, edges: &mut EdgeMap, selected_edges: &mut SelectedEdges) {
    edges.shift_remove(id);
    selected_edges.shift_remove(id);
}

/// Removes every edge whose endpoints are both selected.
pub fn delete_edges_between_selected(
    selected: &SelectedNodes,
    edges: &mut EdgeMap,
    selected_edges: &mut SelectedEdges,
) {
    if selected.len() < 2 {
        return;
    }
    let doomed: Vec<EdgeId> = edges
        .iter()
        .filter(|(_, edge)| selected.contains(&edge.source) && selected.contains(&edge.target))
        .map(|(edge_id, _)| edge_id.clone())
        .collect();
    for edge_id in &doomed {
        delete_edge(edge_id, edges, selected_edges);
    }
}

/// Deletes every selected edge and leaves the edge selection empty.
pub fn delete_selected_edges(selected_edges: &mut SelectedEdges, edges: &mut EdgeMap) {
    for edge_id in selected_edges.drain(..) {
        edges.shift_remove(&edge_id);
    }
}

/// Deletes every selected node (with its edges) and leaves the node selection empty.
pub fn delete_selected_nodes(
    selected_nodes: &mut SelectedNodes,
    nodes: &mut NodeMap,
    layout: &mut Layout,
    edges: &mut EdgeMap,
    selected_edges: &mut SelectedEdges,
) {
    let doomed: Vec<NodeId> = selected_nodes.iter().cloned().collect();
    for node_id in &doomed {
        delete_node(node_id, nodes, layout, edges, selected_nodes, selected_edges);
    }
    selected_nodes.clear();
}

/// Swaps source and target in place. Id and attributes are kept.
pub fn reverse_edge(id: &str, edges: &mut EdgeMap) -> bool {
    let Some(edge) = edges.get_mut(id) else {
        return false;
    };
    std::mem::swap(&mut edge.source, &mut edge.target);
    true
}

/// Adds a node named `Point <N>` at `position`, styled from `template` plus the optional icon.
pub fn create_node(
    nodes: &mut NodeMap,
    layout: &mut Layout,
    position: LayoutPoint,
    template: &Attributes,
    icon: Option<&str>,
) -> NodeId {
    let id = next_id(nodes, "node");
    let ordinal = id.strip_prefix("node").unwrap_or(&id);
    let mut node = Node::new(format!("Point {ordinal}"));
    if let Some(icon) = icon {
        node.attrs.insert("icon".to_string(), AttrValue::from(icon));
    }
    for (key, value) in template {
        node.attrs.insert(key.clone(), value.clone());
    }
    nodes.insert(id.clone(), node);
    layout.insert(id.clone(), position);
    id
}

/// Merges an attribute bag into a node. `id` is ignored; `name` and `childLayer` update the
/// typed fields (a null or empty `childLayer` clears it). Other `null` values remove the attribute.
pub fn merge_node_attributes(id: &str, bag: &Attributes, nodes: &mut NodeMap) -> bool {
    let Some(node) = nodes.get_mut(id) else {
        return false;
    };
    for (key, value) in bag {
        match key.as_str() {
            "id" => {}
            "name" => {
                node.name = attr_to_string(value);
            }
            "childLayer" => {
                node.child_layer = value
                    .as_str()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
            }
            _ if value.is_null() => {
                node.attrs.shift_remove(key);
            }
            _ => {
                node.attrs.insert(key.clone(), value.clone());
            }
        }
    }
    true
}

/// Merges an attribute bag into an edge. `id`, `source` and `target` are never overwritten;
/// `null` removes an attribute.
pub fn merge_edge_attributes(id: &str, bag: &Attributes, edges: &mut EdgeMap) -> bool {
    let Some(edge) = edges.get_mut(id) else {
        return false;
    };
    for (key, value) in bag {
        if matches!(key.as_str(), "id" | "source" | "target") {
            continue;
        }
        if value.is_null() {
            edge.attrs.shift_remove(key);
        } else {
            edge.attrs.insert(key.clone(), value.clone());
        }
    }
    true
}

fn attr_to_string(value: &AttrValue) -> String {
    match value {
        AttrValue::Null => String::new(),
        AttrValue::Bool(v) => v.to_string(),
        AttrValue::Int(v) => v.to_string(),
        AttrValue::Float(v) => v.to_string(),
        AttrValue::Text(v) => v.clone(),
    }
}
