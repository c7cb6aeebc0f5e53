//! Serializable session operations, for hosts that drive the core through messages and for
//! replaying scripted edits.
//!
//! ```json
//! [
//!   { "op": "drillDown", "node": "node1" },
//!   { "op": "addNode", "x": 40, "y": 60 },
//!   { "op": "selectNode", "id": "node1" },
//!   { "op": "goBack" }
//! ]
//! ```

use crate::error::Result;
use crate::geom::{LayoutPoint, point};
use crate::interaction::{InteractionEvent, MenuAction};
use crate::model::{Attributes, EdgeId, FloorId, NodeId};
use crate::session::Session;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    DrillDown { node: NodeId },
    GoToFloor { floor: FloorId },
    GoBack,
    ExitBuilding,
    SelectNode { id: NodeId },
    SelectEdge { id: EdgeId },
    DeselectNode { id: NodeId },
    DeselectEdge { id: EdgeId },
    ReplaceSelection {
        #[serde(default)]
        nodes: Vec<NodeId>,
        #[serde(default)]
        edges: Vec<EdgeId>,
    },
    ClearSelection,
    CreateEdge { source: NodeId, target: NodeId },
    CreateEdgesBetweenSelected,
    DeleteNode { id: NodeId },
    DeleteEdge { id: EdgeId },
    DeleteEdgesBetweenSelected,
    DeleteSelectedEdges,
    DeleteSelectedNodes,
    ReverseEdge { id: EdgeId },
    /// Container-local screen position.
    AddNode { x: f64, y: f64 },
    MoveNode { id: NodeId, x: f64, y: f64 },
    UpdateNode { id: NodeId, attrs: Attributes },
    UpdateEdge { id: EdgeId, attrs: Attributes },
    Interact { event: InteractionEvent },
    Invoke { action: MenuAction },
    SaveEditor { attrs: Attributes },
    CloseEditor,
}

pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    Ok(serde_json::from_str(text)?)
}

impl Session {
    /// Applies one command. Ignored transitions and no-op edits still return `Ok`.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        tracing::trace!(?command, "apply");
        match command {
            Command::DrillDown { node } => {
                self.drill_down(&node);
            }
            Command::GoToFloor { floor } => {
                self.go_to_floor(&floor);
            }
            Command::GoBack => {
                self.go_back();
            }
            Command::ExitBuilding => {
                self.exit_building();
            }
            Command::SelectNode { id } => {
                self.select_node(&id);
            }
            Command::SelectEdge { id } => {
                self.select_edge(&id);
            }
            Command::DeselectNode { id } => {
                self.deselect_node(&id);
            }
            Command::DeselectEdge { id } => {
                self.deselect_edge(&id);
            }
            Command::ReplaceSelection { nodes, edges } => self.replace_selection(nodes, edges),
            Command::ClearSelection => self.clear_selection(),
            Command::CreateEdge { source, target } => {
                self.create_edge(&source, &target)?;
            }
            Command::CreateEdgesBetweenSelected => {
                self.create_edges_between_selected()?;
            }
            Command::DeleteNode { id } => self.delete_node(&id)?,
            Command::DeleteEdge { id } => self.delete_edge(&id)?,
            Command::DeleteEdgesBetweenSelected => self.delete_edges_between_selected()?,
            Command::DeleteSelectedEdges => self.delete_selected_edges()?,
            Command::DeleteSelectedNodes => self.delete_selected_nodes()?,
            Command::ReverseEdge { id } => {
                self.reverse_edge(&id)?;
            }
            Command::AddNode { x, y } => {
                self.add_node_at(point(x, y))?;
            }
            Command::MoveNode { id, x, y } => {
                self.set_node_position(&id, LayoutPoint::new(x, y))?;
            }
            Command::UpdateNode { id, attrs } => {
                self.update_node(&id, &attrs)?;
            }
            Command::UpdateEdge { id, attrs } => {
                self.update_edge(&id, &attrs)?;
            }
            Command::Interact { event } => self.handle_event(event)?,
            Command::Invoke { action } => self.invoke(action)?,
            Command::SaveEditor { attrs } => self.save_editor(&attrs)?,
            Command::CloseEditor => self.close_editor(),
        }
        Ok(())
    }

    /// Applies commands in order, stopping at the first error.
    pub fn apply_all<I>(&mut self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }
}
