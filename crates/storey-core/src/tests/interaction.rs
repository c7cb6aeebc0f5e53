use super::*;
use crate::geom::{Point, point, vector};
use tracing_test::traced_test;

#[derive(Debug)]
struct Broken;

impl CanvasTranslator for Broken {
    fn screen_to_canvas(&self, _screen: Point) -> Point {
        point(f64::NAN, 0.0)
    }
}

fn labels(entries: &[MenuEntry]) -> Vec<&str> {
    entries
        .iter()
        .map(|e| e.label().unwrap_or("---"))
        .collect()
}

fn open_background_menu(s: &mut Session, x: f64, y: f64) {
    s.handle_event(InteractionEvent::BackgroundContextMenu {
        position: LayoutPoint::new(x, y),
    })
    .unwrap();
}

#[test]
fn background_menu_toggles_between_create_and_delete_edges() {
    let mut s = session();
    s.replace_selection(vec!["node2".into(), "node3".into()], vec![]);
    open_background_menu(&mut s, 5.0, 5.0);
    assert_eq!(
        labels(&s.menu_entries()),
        vec![
            "Add node",
            "---",
            "Delete selected nodes (2)",
            "Create edges between selected nodes",
            "---",
            "Start box selection",
        ]
    );

    s.invoke(MenuAction::CreateEdgesBetweenSelected).unwrap();
    assert!(s.menu().is_none());
    assert!(s.has_edges_between_selected());

    open_background_menu(&mut s, 5.0, 5.0);
    let entries = s.menu_entries();
    assert!(labels(&entries).contains(&"Delete edges between selected nodes"));
    assert!(!labels(&entries).contains(&"Create edges between selected nodes"));

    s.invoke(MenuAction::DeleteEdgesBetweenSelected).unwrap();
    assert_eq!(ids(s.projection().edges.keys()), vec!["edge1"]);
}

#[test]
fn background_menu_lists_selected_edges() {
    let mut s = session();
    s.select_edge("edge1");
    open_background_menu(&mut s, 0.0, 0.0);
    assert_eq!(
        labels(&s.menu_entries()),
        vec![
            "Add node",
            "---",
            "Delete selected edges (1)",
            "---",
            "Start box selection"
        ]
    );
    s.invoke(MenuAction::DeleteSelectedEdges).unwrap();
    assert!(s.projection().edges.is_empty());
    assert!(s.selection().edges.is_empty());
}

#[test]
fn node_menu_offers_edge_creation_for_a_single_selection() {
    let mut s = session();
    s.select_node("node2");
    s.handle_event(InteractionEvent::NodeContextMenu {
        id: "node2".into(),
        position: LayoutPoint::new(1.0, 1.0),
    })
    .unwrap();
    assert_eq!(
        labels(&s.menu_entries()),
        vec!["Create edge", "Delete node", "Edit node"]
    );

    s.invoke(MenuAction::CreateEdge("node2".into())).unwrap();
    assert_eq!(s.edge_source(), Some("node2"));
    assert!(!s.nodes_selectable());

    s.handle_event(InteractionEvent::NodeClicked { id: "node3".into() })
        .unwrap();
    assert!(s.nodes_selectable());
    let projection = s.projection();
    let edge = &projection.edges["edge2"];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("node2", "node3"));
}

#[test]
fn node_menu_with_a_multi_selection() {
    let mut s = session();
    s.replace_selection(vec!["node1".into(), "node2".into()], vec![]);
    s.handle_event(InteractionEvent::NodeContextMenu {
        id: "node1".into(),
        position: LayoutPoint::new(1.0, 1.0),
    })
    .unwrap();
    assert_eq!(
        labels(&s.menu_entries()),
        vec![
            "Delete node",
            "Edit node",
            "---",
            "Delete selected nodes (2)",
            "Delete edges between selected nodes",
        ]
    );
}

#[test]
fn edge_menu_entries() {
    let mut s = session();
    s.handle_event(InteractionEvent::EdgeContextMenu {
        id: "edge1".into(),
        position: LayoutPoint::new(1.0, 1.0),
    })
    .unwrap();
    assert_eq!(
        labels(&s.menu_entries()),
        vec![
            "Edit edge",
            "Reverse edge (swap source and target)",
            "Delete edge"
        ]
    );

    s.invoke(MenuAction::ReverseEdge("edge1".into())).unwrap();
    assert_eq!(s.projection().edges["edge1"].source, "node2");
}

#[test]
fn background_click_cancels_edge_creation_before_clearing_nodes() {
    let mut s = session();
    s.replace_selection(vec!["node1".into()], vec!["edge1".into()]);
    s.invoke(MenuAction::CreateEdge("node1".into())).unwrap();

    s.handle_event(InteractionEvent::BackgroundClicked).unwrap();
    assert_eq!(s.edge_source(), None);
    assert_eq!(ids(s.selection().nodes.iter()), vec!["node1"]);
    assert!(s.selection().edges.is_empty());

    s.handle_event(InteractionEvent::BackgroundClicked).unwrap();
    assert!(s.selection().is_empty());
}

#[test]
fn clicking_a_node_closes_the_menu() {
    let mut s = session();
    open_background_menu(&mut s, 3.0, 3.0);
    assert!(s.menu().is_some());
    s.handle_event(InteractionEvent::NodeClicked { id: "node2".into() })
        .unwrap();
    assert!(s.menu().is_none());
    assert_eq!(s.projection().edges.len(), 1);
}

#[test]
fn double_click_drills_down() {
    let mut s = session();
    s.handle_event(InteractionEvent::NodeDoubleClicked { id: "node1".into() })
        .unwrap();
    assert_eq!(s.context(), &Context::level("L2"));
}

#[test]
fn add_node_places_the_node_under_the_cursor() {
    let mut s = session();
    s.set_translator(ViewTransform::new(vector(10.0, 0.0), 2.0));
    open_background_menu(&mut s, 30.0, 40.0);
    s.invoke(MenuAction::AddNode).unwrap();

    let p = s.projection();
    let node = &p.nodes["node5"];
    assert_eq!(node.name, "Point 5");
    assert_eq!(node.attr("color"), Some(&AttrValue::from("#ff9e6d")));
    assert_eq!(node.attr("icon"), Some(&AttrValue::from("fa-solid fa-address-card")));
    assert_eq!(p.position("node5"), Some(LayoutPoint::new(10.0, 20.0)));
}

#[test]
fn add_node_clamps_negative_screen_coordinates() {
    let mut s = session();
    let id = s.add_node_at(point(-15.0, 8.0)).unwrap();
    assert_eq!(s.projection().position(&id), Some(LayoutPoint::new(0.0, 8.0)));
}

#[test]
fn add_node_into_a_missing_level_creates_it() {
    let mut s = Session::new(campus(), SessionOptions::default().with_root_level("annex"));
    assert!(s.store().level("annex").is_none());
    let version = s.version();

    let id = s.add_node_at(point(1.0, 2.0)).unwrap();
    let level = s.store().level("annex").unwrap();
    assert_eq!(level.background, None);
    assert!(level.nodes.contains_key(&id));
    assert_eq!(id, "node1");
    assert_eq!(s.projection().nodes.len(), 1);
    assert!(s.version() > version);
}

#[test]
fn new_levels_inherit_the_configured_background() {
    let options = SessionOptions::default()
        .with_root_level("fresh")
        .with_config(EditorConfig::with_overrides(&json!({
            "view": { "background": "img/blank.png" }
        })));
    let mut s = Session::new(campus(), options);
    s.add_node_at(point(0.0, 0.0)).unwrap();
    assert_eq!(
        s.store().level("fresh").unwrap().background.as_deref(),
        Some("img/blank.png")
    );
    assert_eq!(s.background_image(), Some("img/blank.png"));
}

#[test]
#[traced_test]
fn malformed_coordinates_abort_without_mutation() {
    let mut s = session();
    s.set_translator(Broken);
    let before = s.dataset().clone();
    let version = s.version();

    let err = s.add_node_at(point(10.0, 10.0)).unwrap_err();
    assert!(matches!(err, Error::MalformedCoordinate { .. }));
    assert_eq!(s.dataset(), &before);
    assert_eq!(s.version(), version);
    assert!(logs_contain("invalid canvas coordinates"));
}

#[test]
fn add_node_is_disabled_in_the_building_view() {
    let mut s = session();
    s.drill_down("node3");
    open_background_menu(&mut s, 1.0, 1.0);
    let entries = s.menu_entries();
    assert!(matches!(
        &entries[0],
        MenuEntry::Item { action: MenuAction::AddNode, disabled: true, .. }
    ));

    let before = s.dataset().clone();
    s.invoke(MenuAction::AddNode).unwrap();
    assert_eq!(s.dataset(), &before);
    assert!(matches!(
        s.add_node_at(point(1.0, 1.0)),
        Err(Error::NoActiveScope)
    ));
    assert!(matches!(s.delete_node("node1"), Err(Error::NoActiveScope)));
}

#[test]
fn box_selection_round_trip() {
    let mut s = session();
    open_background_menu(&mut s, 1.0, 1.0);
    s.invoke(MenuAction::StartBoxSelection).unwrap();
    assert!(s.is_box_selection_mode());
    assert!(s.take_box_selection_request());
    assert!(!s.take_box_selection_request());

    s.handle_event(InteractionEvent::BoxSelected {
        nodes: vec!["node1".into(), "node2".into(), "ghost".into()],
        edges: vec!["edge1".into()],
    })
    .unwrap();
    assert!(!s.is_box_selection_mode());
    assert_eq!(ids(s.selection().nodes.iter()), vec!["node1", "node2"]);
    assert_eq!(ids(s.selection().edges.iter()), vec!["edge1"]);

    s.handle_event(InteractionEvent::ViewModeChanged {
        mode: ViewMode::BoxSelection,
    })
    .unwrap();
    assert!(s.is_box_selection_mode());
}

#[test]
fn editing_an_edge_never_retargets_it() {
    let mut s = session();
    s.handle_event(InteractionEvent::EdgeContextMenu {
        id: "edge1".into(),
        position: LayoutPoint::new(1.0, 1.0),
    })
    .unwrap();
    s.invoke(MenuAction::EditEdge("edge1".into())).unwrap();
    let request = s.editor().unwrap();
    assert_eq!(request.target, EditorTarget::Edge("edge1".into()));
    assert_eq!(request.initial_data["label"], AttrValue::from("road"));

    let mut bag = request.initial_data.clone();
    bag.insert("source".into(), "node4".into());
    bag.insert("target".into(), "node3".into());
    bag.insert("width".into(), AttrValue::Int(7));
    s.save_editor(&bag).unwrap();

    assert!(s.editor().is_none());
    let projection = s.projection();
    let edge = &projection.edges["edge1"];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("node1", "node2"));
    assert_eq!(edge.attr("width"), Some(&AttrValue::Int(7)));
    assert!(edge.attr("id").is_none());
}

#[test]
fn rejected_editor_bags_keep_the_editor_open() {
    let mut s = session();
    s.open_editor(EditorTarget::Node("node1".into()));
    let mut bag = s.editor().unwrap().initial_data.clone();
    bag.insert("size".into(), AttrValue::Int(500));

    let err = s.save_editor(&bag).unwrap_err();
    assert!(matches!(err, Error::InvalidAttribute { ref key, .. } if key == "size"));
    assert!(s.editor().is_some());
    assert!(s.projection().nodes["node1"].attr("size").is_none());

    bag.insert("size".into(), AttrValue::Int(40));
    s.save_editor(&bag).unwrap();
    assert_eq!(
        s.projection().nodes["node1"].attr("size"),
        Some(&AttrValue::Int(40))
    );
}

#[test]
fn navigation_resets_interaction_modes() {
    let mut s = session();
    s.invoke(MenuAction::CreateEdge("node1".into())).unwrap();
    open_background_menu(&mut s, 1.0, 1.0);
    s.drill_down("node1");
    assert!(s.nodes_selectable());
    assert!(s.menu().is_none());
}
