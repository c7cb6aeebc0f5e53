use crate::*;
use serde_json::json;

mod edit;
mod interaction;

/// A root map with a plain sub-level, a two-floor building and a dangling `childLayer`.
fn campus() -> GraphDataset {
    let value = json!({
        "levels": {
            "main": {
                "background": "img/main.png",
                "nodes": {
                    "node1": { "name": "HQ", "childLayer": "L2", "color": "#123456" },
                    "node2": { "name": "Depot" },
                    "node3": { "name": "Campus", "childLayer": "B1" },
                    "node4": { "name": "Nowhere", "childLayer": "missing" }
                },
                "edges": {
                    "edge1": { "source": "node1", "target": "node2", "label": "road" }
                }
            },
            "L2": {
                "nodes": {
                    "node1": { "name": "Lab", "childLayer": "B1" }
                },
                "edges": {}
            },
            "B1": {
                "name": "Block 1",
                "nodes": {},
                "edges": {},
                "floors": {
                    "F1": {
                        "name": "Ground",
                        "nodes": {
                            "node1": { "name": "Lobby", "childLayer": "L2" },
                            "node2": { "name": "Stairs" }
                        },
                        "edges": {
                            "edge1": { "source": "node1", "target": "node2" }
                        }
                    },
                    "F2": { "name": "First", "nodes": {}, "edges": {} }
                }
            }
        },
        "layouts": {
            "main": {
                "node1": { "x": 10, "y": 20 },
                "node2": { "x": 110, "y": 20 },
                "node3": { "x": 60, "y": 90 }
            },
            "L2": { "node1": { "x": 5, "y": 5 } },
            "B1_F1": {
                "node1": { "x": 0, "y": 0 },
                "node2": { "x": 50, "y": 0 }
            }
        }
    });
    serde_json::from_value(value).unwrap()
}

fn session() -> Session {
    Session::new(campus(), SessionOptions::default())
}

fn ids<'a>(iter: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    iter.into_iter().map(String::as_str).collect()
}
