use super::*;
use crate::edit::*;
use crate::model::{EdgeMap, Layout, NodeMap};
use crate::selection::{SelectedEdges, SelectedNodes};

fn nodes(ids: &[&str]) -> NodeMap {
    ids.iter()
        .map(|id| (id.to_string(), Node::new(id.to_uppercase())))
        .collect()
}

fn edges(pairs: &[(&str, &str, &str)]) -> EdgeMap {
    pairs
        .iter()
        .map(|(id, s, t)| (id.to_string(), Edge::new(*s, *t)))
        .collect()
}

fn selected(ids: &[&str]) -> SelectedNodes {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn next_id_skips_past_the_highest_suffix() {
    assert_eq!(next_id(&nodes(&["node1", "node3"]), "node"), "node4");
    assert_eq!(next_id(&NodeMap::new(), "node"), "node1");
    assert_eq!(
        next_id(&nodes(&["nodeX", "node", "hub7", "node-2", "node2"]), "node"),
        "node3"
    );
    assert_eq!(next_id(&edges(&[("edge9", "a", "b")]), "edge"), "edge10");
}

#[test]
fn next_id_never_reuses_a_gap() {
    let mut map = nodes(&["node1", "node2", "node3"]);
    map.shift_remove("node2");
    let id = next_id(&map, "node");
    assert_eq!(id, "node4");
    assert!(!map.contains_key(&id));
}

#[test]
fn next_id_survives_a_saturated_suffix() {
    let max = format!("node{}", u64::MAX);
    assert_eq!(next_id(&nodes(&[max.as_str()]), "node"), "node1");
    assert_eq!(next_id(&nodes(&["node1", "node2", max.as_str()]), "node"), "node3");

    let edges = edges(&[("edge18446744073709551615", "a", "b"), ("edge1", "a", "c")]);
    let id = next_id(&edges, "edge");
    assert_eq!(id, "edge2");
    assert!(!edges.contains_key(&id));
}

#[test]
fn edge_existence_ignores_direction() {
    let e = edges(&[("edge1", "node1", "node2")]);
    assert!(edge_exists("node1", "node2", &e));
    assert!(edge_exists("node2", "node1", &e));
    assert!(!edge_exists("node1", "node3", &e));
}

#[test]
fn connecting_two_selected_nodes_creates_one_edge() {
    let mut e = EdgeMap::new();
    let created = create_edges_between_selected(&selected(&["node1", "node2"]), &mut e);
    assert_eq!(created, vec!["edge1".to_string()]);
    assert_eq!(e.len(), 1);
    assert_eq!(e["edge1"], Edge::new("node1", "node2"));
}

#[test]
fn duplicate_and_self_loop_edges_are_refused() {
    let mut e = EdgeMap::new();
    assert_eq!(create_edge("a", "b", &mut e), Some("edge1".to_string()));
    assert_eq!(create_edge("b", "a", &mut e), None);
    assert_eq!(create_edge("a", "b", &mut e), None);
    assert_eq!(create_edge("a", "a", &mut e), None);
    assert_eq!(e.len(), 1);
}

#[test]
fn batch_edge_creation_is_idempotent() {
    let sel = selected(&["a", "b", "c", "d"]);
    let mut once = edges(&[("edge1", "c", "a")]);
    create_edges_between_selected(&sel, &mut once);
    assert_eq!(once.len(), 6);

    let mut twice = once.clone();
    let created = create_edges_between_selected(&sel, &mut twice);
    assert!(created.is_empty());
    assert_eq!(once, twice);

    for (i, a) in sel.iter().enumerate() {
        for b in sel.iter().skip(i + 1) {
            let count = twice.values().filter(|e| e.connects(a, b)).count();
            assert_eq!(count, 1, "{a}-{b}");
        }
    }
}

#[test]
fn batch_creation_needs_two_nodes() {
    let mut e = EdgeMap::new();
    assert!(create_edges_between_selected(&selected(&["a"]), &mut e).is_empty());
    assert!(e.is_empty());
}

#[test]
fn reversing_swaps_endpoints_only() {
    let mut e = EdgeMap::new();
    e.insert(
        "edge1".into(),
        Edge::new("node1", "node2")
            .with_attr("label", "road")
            .with_attr("width", 4i64),
    );
    assert!(reverse_edge("edge1", &mut e));
    let edge = &e["edge1"];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("node2", "node1"));
    assert_eq!(edge.attr("label"), Some(&AttrValue::from("road")));
    assert_eq!(edge.attr("width"), Some(&AttrValue::Int(4)));
    assert_eq!(e.len(), 1);

    assert!(!reverse_edge("edge9", &mut e));
}

#[test]
fn deleting_a_node_cascades_to_its_edges_only() {
    let mut n = nodes(&["node1", "node2", "node3", "node4"]);
    let mut layout: Layout = [("node1".to_string(), LayoutPoint::new(1.0, 1.0))]
        .into_iter()
        .collect();
    let mut e = edges(&[
        ("edge1", "node1", "node2"),
        ("edge2", "node3", "node4"),
        ("edge3", "node4", "node1"),
    ]);
    let mut sel_nodes = selected(&["node1", "node3"]);
    let mut sel_edges: SelectedEdges = ["edge1".to_string(), "edge2".to_string()]
        .into_iter()
        .collect();

    delete_node("node1", &mut n, &mut layout, &mut e, &mut sel_nodes, &mut sel_edges);

    assert!(!n.contains_key("node1"));
    assert!(layout.is_empty());
    assert_eq!(ids(e.keys()), vec!["edge2"]);
    assert!(e.values().all(|edge| !edge.touches("node1")));
    assert_eq!(ids(sel_nodes.iter()), vec!["node3"]);
    assert_eq!(ids(sel_edges.iter()), vec!["edge2"]);
}

#[test]
fn deleting_missing_ids_changes_nothing() {
    let mut n = nodes(&["node1"]);
    let mut layout = Layout::new();
    let mut e = edges(&[("edge1", "node1", "node1")]);
    let before = (n.clone(), e.clone());
    let mut sel_nodes = SelectedNodes::new();
    let mut sel_edges = SelectedEdges::new();

    delete_node("ghost", &mut n, &mut layout, &mut e, &mut sel_nodes, &mut sel_edges);
    delete_edge("ghost", &mut e, &mut sel_edges);
    assert_eq!((n, e), before);
}

#[test]
fn deleting_selected_nodes_empties_the_selection() {
    let mut n = nodes(&["node1", "node2", "node3"]);
    let mut layout = Layout::new();
    let mut e = edges(&[("edge1", "node1", "node2"), ("edge2", "node2", "node3")]);
    let mut sel_nodes = selected(&["node1", "node2", "ghost"]);
    let mut sel_edges: SelectedEdges = ["edge2".to_string()].into_iter().collect();

    delete_selected_nodes(&mut sel_nodes, &mut n, &mut layout, &mut e, &mut sel_edges);

    assert!(sel_nodes.is_empty());
    assert!(sel_edges.is_empty());
    assert_eq!(ids(n.keys()), vec!["node3"]);
    assert!(e.is_empty());
}

#[test]
fn deleting_edges_between_selected_needs_both_endpoints() {
    let mut e = edges(&[
        ("edge1", "a", "b"),
        ("edge2", "b", "c"),
        ("edge3", "c", "a"),
    ]);
    let mut sel_edges: SelectedEdges = ["edge1".to_string(), "edge2".to_string()]
        .into_iter()
        .collect();

    delete_edges_between_selected(&selected(&["a", "b"]), &mut e, &mut sel_edges);
    assert_eq!(ids(e.keys()), vec!["edge2", "edge3"]);
    assert_eq!(ids(sel_edges.iter()), vec!["edge2"]);

    delete_edges_between_selected(&selected(&["c"]), &mut e, &mut sel_edges);
    assert_eq!(e.len(), 2);
}

#[test]
fn deleting_selected_edges_empties_the_edge_selection() {
    let mut e = edges(&[("edge1", "a", "b"), ("edge2", "b", "c")]);
    let mut sel_edges: SelectedEdges = ["edge2".to_string(), "ghost".to_string()]
        .into_iter()
        .collect();
    delete_selected_edges(&mut sel_edges, &mut e);
    assert!(sel_edges.is_empty());
    assert_eq!(ids(e.keys()), vec!["edge1"]);
}

#[test]
fn created_nodes_are_named_after_their_ordinal() {
    let mut n = nodes(&["node1", "node5"]);
    let mut layout = Layout::new();
    let template: Attributes = [("shape".to_string(), AttrValue::from("rect"))]
        .into_iter()
        .collect();
    let id = create_node(
        &mut n,
        &mut layout,
        LayoutPoint::new(3.0, 4.0),
        &template,
        Some("fa-solid fa-key"),
    );
    assert_eq!(id, "node6");
    let node = &n["node6"];
    assert_eq!(node.name, "Point 6");
    assert_eq!(node.attr("shape"), Some(&AttrValue::from("rect")));
    assert_eq!(node.attr("icon"), Some(&AttrValue::from("fa-solid fa-key")));
    assert_eq!(layout["node6"], LayoutPoint::new(3.0, 4.0));
}

#[test]
fn edge_merges_never_retarget() {
    let mut e = edges(&[("edge1", "node1", "node2")]);
    let bag: Attributes = [
        ("id".to_string(), AttrValue::from("edge7")),
        ("source".to_string(), AttrValue::from("node9")),
        ("target".to_string(), AttrValue::from("node8")),
        ("color".to_string(), AttrValue::from("#00ff00")),
    ]
    .into_iter()
    .collect();
    assert!(merge_edge_attributes("edge1", &bag, &mut e));
    let edge = &e["edge1"];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("node1", "node2"));
    assert_eq!(edge.attr("color"), Some(&AttrValue::from("#00ff00")));
    assert!(edge.attr("id").is_none());
    assert!(!merge_edge_attributes("edge9", &bag, &mut e));
}

#[test]
fn node_merges_update_typed_fields() {
    let mut n = nodes(&["node1"]);
    n["node1"].child_layer = Some("L2".into());
    let bag: Attributes = [
        ("id".to_string(), AttrValue::from("node5")),
        ("name".to_string(), AttrValue::from("Gate")),
        ("childLayer".to_string(), AttrValue::from("")),
        ("size".to_string(), AttrValue::Int(30)),
    ]
    .into_iter()
    .collect();
    assert!(merge_node_attributes("node1", &bag, &mut n));
    let node = &n["node1"];
    assert_eq!(node.name, "Gate");
    assert_eq!(node.child_layer, None);
    assert_eq!(node.attr("size"), Some(&AttrValue::Int(30)));
    assert!(!node.attrs.contains_key("id"));
    assert!(!node.attrs.contains_key("name"));
}
