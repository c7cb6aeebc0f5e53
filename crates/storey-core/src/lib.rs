#![forbid(unsafe_code)]

//! Headless core of a hierarchical map editor.
//!
//! A dataset holds levels; a level with floors is a building. The [`Session`] keeps one scope
//! (a level or a floor) projected for rendering, moves between scopes with reversible history,
//! and applies edits that never leave an edge pointing at a missing node.
//!
//! Design goals:
//! - renderer-agnostic: the host feeds [`InteractionEvent`]s in and reads projections out
//! - edits and navigation are synchronous and total; misuse is a logged no-op
//! - runtime-agnostic async loading (no specific executor required)
//!
//! ```
//! use storey_core::{GraphDataset, Session, SessionOptions};
//!
//! let dataset = GraphDataset::from_json_str(r#"{
//!   "levels": { "main": { "nodes": { "node1": { "name": "HQ" }, "node2": { "name": "Depot" } } } }
//! }"#)?;
//! let mut session = Session::new(dataset, SessionOptions::default());
//! session.create_edge("node1", "node2")?;
//! assert_eq!(session.projection().edges.len(), 1);
//! # Ok::<(), storey_core::Error>(())
//! ```

pub mod command;
pub mod config;
pub mod edit;
pub mod editor;
pub mod error;
pub mod geom;
pub mod interaction;
pub mod load;
pub mod model;
pub mod navigation;
pub mod selection;
pub mod session;
pub mod store;
pub mod style;

pub use command::{Command, parse_script};
pub use config::EditorConfig;
pub use editor::{EditorRequest, EditorTarget, FieldKind, FieldSpec};
pub use error::{Error, Result};
pub use geom::{CanvasTranslator, LayoutPoint, ViewTransform};
pub use interaction::{ContextMenu, InteractionEvent, MenuAction, MenuEntry, MenuTarget, ViewMode};
pub use load::{
    DatasetSource, FileSource, LoadState, StaticSource, load_dataset, load_dataset_sync,
    load_session,
};
pub use model::{AttrValue, Attributes, Edge, Floor, GraphDataset, Level, Node, ScopeId};
pub use navigation::{Context, Navigator};
pub use selection::Selection;
pub use session::{Session, SessionOptions};
pub use store::{ChangeKind, GraphStore, Projection, ProjectionChange, SubscriptionId};
pub use style::{EdgeStyle, NodeStyle, StyleState};

#[cfg(test)]
mod tests;
