//! Renderer events, interaction modes and the context-menu model.

use crate::editor::{EditorRequest, EditorTarget};
use crate::error::Result;
use crate::geom::LayoutPoint;
use crate::model::{Attributes, EdgeId, NodeId};
use crate::session::Session;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Default,
    BoxSelection,
}

/// Events emitted by the renderer. Positions are container-local screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InteractionEvent {
    NodeClicked { id: NodeId },
    NodeDoubleClicked { id: NodeId },
    NodeContextMenu { id: NodeId, position: LayoutPoint },
    EdgeContextMenu { id: EdgeId, position: LayoutPoint },
    BackgroundContextMenu { position: LayoutPoint },
    BackgroundClicked,
    ViewModeChanged { mode: ViewMode },
    /// The renderer's own selection changed (click or modifier-click).
    SelectionChanged {
        #[serde(default)]
        nodes: Vec<NodeId>,
        #[serde(default)]
        edges: Vec<EdgeId>,
    },
    BoxSelected {
        #[serde(default)]
        nodes: Vec<NodeId>,
        #[serde(default)]
        edges: Vec<EdgeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum MenuTarget {
    Background,
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenu {
    pub target: MenuTarget,
    pub position: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "camelCase")]
pub enum MenuAction {
    AddNode,
    DeleteSelectedNodes,
    CreateEdgesBetweenSelected,
    DeleteEdgesBetweenSelected,
    DeleteSelectedEdges,
    StartBoxSelection,
    CreateEdge(NodeId),
    DeleteNode(NodeId),
    EditNode(NodeId),
    EditEdge(EdgeId),
    ReverseEdge(EdgeId),
    DeleteEdge(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuEntry {
    Item {
        label: String,
        action: MenuAction,
        disabled: bool,
    },
    Divider,
}

impl MenuEntry {
    fn item(label: impl Into<String>, action: MenuAction) -> Self {
        MenuEntry::Item {
            label: label.into(),
            action,
            disabled: false,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            MenuEntry::Item { label, .. } => Some(label),
            MenuEntry::Divider => None,
        }
    }

    pub fn action(&self) -> Option<&MenuAction> {
        match self {
            MenuEntry::Item { action, .. } => Some(action),
            MenuEntry::Divider => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct InteractionState {
    pub(crate) creating_edge: Option<NodeId>,
    pub(crate) box_selection: bool,
    pub(crate) box_selection_requested: bool,
    pub(crate) menu: Option<ContextMenu>,
    pub(crate) editor: Option<EditorRequest>,
}

impl InteractionState {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Session {
    pub fn handle_event(&mut self, event: InteractionEvent) -> Result<()> {
        match event {
            InteractionEvent::NodeClicked { id } => {
                self.interaction.menu = None;
                if let Some(source) = self.interaction.creating_edge.take() {
                    self.create_edge(&source, &id)?;
                }
            }
            InteractionEvent::NodeDoubleClicked { id } => {
                self.drill_down(&id);
            }
            InteractionEvent::NodeContextMenu { id, position } => {
                self.show_menu(MenuTarget::Node(id), position);
            }
            InteractionEvent::EdgeContextMenu { id, position } => {
                self.show_menu(MenuTarget::Edge(id), position);
            }
            InteractionEvent::BackgroundContextMenu { position } => {
                self.show_menu(MenuTarget::Background, position);
            }
            InteractionEvent::BackgroundClicked => {
                if self.interaction.creating_edge.take().is_none() {
                    self.selection_mut().nodes.clear();
                }
                self.selection_mut().edges.clear();
                self.interaction.menu = None;
            }
            InteractionEvent::ViewModeChanged { mode } => {
                self.interaction.box_selection = mode == ViewMode::BoxSelection;
            }
            InteractionEvent::SelectionChanged { nodes, edges } => {
                self.replace_selection(nodes, edges);
            }
            InteractionEvent::BoxSelected { nodes, edges } => {
                self.replace_selection(nodes, edges);
                self.interaction.box_selection = false;
            }
        }
        Ok(())
    }

    fn show_menu(&mut self, target: MenuTarget, position: LayoutPoint) {
        self.interaction.menu = Some(ContextMenu { target, position });
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.interaction.menu.as_ref()
    }

    pub fn hide_menu(&mut self) {
        self.interaction.menu = None;
    }

    /// Entries of the open context menu; empty when no menu is shown.
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let Some(menu) = &self.interaction.menu else {
            return Vec::new();
        };
        let selected_nodes = self.selection().nodes.len();
        let selected_edges = self.selection().edges.len();
        let mut entries = Vec::new();

        match &menu.target {
            MenuTarget::Background => {
                entries.push(MenuEntry::Item {
                    label: "Add node".to_string(),
                    action: MenuAction::AddNode,
                    disabled: self.active_scope().is_none(),
                });
                entries.push(MenuEntry::Divider);
                if selected_nodes >= 2 {
                    self.push_multi_node_entries(&mut entries, selected_nodes);
                    entries.push(MenuEntry::Divider);
                }
                if selected_edges > 0 {
                    entries.push(MenuEntry::item(
                        format!("Delete selected edges ({selected_edges})"),
                        MenuAction::DeleteSelectedEdges,
                    ));
                    entries.push(MenuEntry::Divider);
                }
                entries.push(MenuEntry::item(
                    "Start box selection",
                    MenuAction::StartBoxSelection,
                ));
            }
            MenuTarget::Node(id) => {
                if selected_nodes == 1 {
                    entries.push(MenuEntry::item(
                        "Create edge",
                        MenuAction::CreateEdge(id.clone()),
                    ));
                }
                entries.push(MenuEntry::item(
                    "Delete node",
                    MenuAction::DeleteNode(id.clone()),
                ));
                entries.push(MenuEntry::item("Edit node", MenuAction::EditNode(id.clone())));
                if selected_nodes >= 2 {
                    entries.push(MenuEntry::Divider);
                    self.push_multi_node_entries(&mut entries, selected_nodes);
                }
            }
            MenuTarget::Edge(id) => {
                entries.push(MenuEntry::item("Edit edge", MenuAction::EditEdge(id.clone())));
                entries.push(MenuEntry::item(
                    "Reverse edge (swap source and target)",
                    MenuAction::ReverseEdge(id.clone()),
                ));
                entries.push(MenuEntry::item(
                    "Delete edge",
                    MenuAction::DeleteEdge(id.clone()),
                ));
                if selected_edges > 1 {
                    entries.push(MenuEntry::Divider);
                    entries.push(MenuEntry::item(
                        format!("Delete selected edges ({selected_edges})"),
                        MenuAction::DeleteSelectedEdges,
                    ));
                }
            }
        }
        entries
    }

    fn push_multi_node_entries(&self, entries: &mut Vec<MenuEntry>, selected_nodes: usize) {
        entries.push(MenuEntry::item(
            format!("Delete selected nodes ({selected_nodes})"),
            MenuAction::DeleteSelectedNodes,
        ));
        if self.has_edges_between_selected() {
            entries.push(MenuEntry::item(
                "Delete edges between selected nodes",
                MenuAction::DeleteEdgesBetweenSelected,
            ));
        } else {
            entries.push(MenuEntry::item(
                "Create edges between selected nodes",
                MenuAction::CreateEdgesBetweenSelected,
            ));
        }
    }

    /// Runs a menu action and closes the menu. Actions shown as disabled are ignored.
    pub fn invoke(&mut self, action: MenuAction) -> Result<()> {
        let disabled = self.menu_entries().iter().any(|entry| {
            matches!(entry, MenuEntry::Item { action: a, disabled: true, .. } if *a == action)
        });
        let menu = self.interaction.menu.take();
        if disabled {
            tracing::debug!(?action, "ignored disabled menu action");
            return Ok(());
        }

        match action {
            MenuAction::AddNode => {
                let Some(menu) = menu else {
                    tracing::debug!("add node ignored: no menu position");
                    return Ok(());
                };
                self.add_node_at(menu.position.into())?;
            }
            MenuAction::DeleteSelectedNodes => self.delete_selected_nodes()?,
            MenuAction::CreateEdgesBetweenSelected => {
                self.create_edges_between_selected()?;
            }
            MenuAction::DeleteEdgesBetweenSelected => self.delete_edges_between_selected()?,
            MenuAction::DeleteSelectedEdges => self.delete_selected_edges()?,
            MenuAction::StartBoxSelection => {
                self.interaction.box_selection = true;
                self.interaction.box_selection_requested = true;
            }
            MenuAction::CreateEdge(source) => {
                self.interaction.creating_edge = Some(source);
            }
            MenuAction::DeleteNode(id) => self.delete_node(&id)?,
            MenuAction::EditNode(id) => self.open_editor(EditorTarget::Node(id)),
            MenuAction::EditEdge(id) => self.open_editor(EditorTarget::Edge(id)),
            MenuAction::ReverseEdge(id) => {
                self.reverse_edge(&id)?;
            }
            MenuAction::DeleteEdge(id) => self.delete_edge(&id)?,
        }
        Ok(())
    }

    pub fn open_editor(&mut self, target: EditorTarget) {
        self.interaction.menu = None;
        self.interaction.editor = self.editor_request(&target);
    }

    pub fn editor(&self) -> Option<&EditorRequest> {
        self.interaction.editor.as_ref()
    }

    pub fn close_editor(&mut self) {
        self.interaction.editor = None;
    }

    /// Applies the open editor's form values. A rejected bag keeps the editor open.
    pub fn save_editor(&mut self, bag: &Attributes) -> Result<()> {
        let Some(request) = &self.interaction.editor else {
            tracing::debug!("save ignored: no editor is open");
            return Ok(());
        };
        match request.target.clone() {
            EditorTarget::Node(id) => self.update_node(&id, bag)?,
            EditorTarget::Edge(id) => self.update_edge(&id, bag)?,
        };
        self.interaction.editor = None;
        Ok(())
    }

    /// Renderers disable node selection while an edge is being drawn.
    pub fn nodes_selectable(&self) -> bool {
        self.interaction.creating_edge.is_none()
    }

    pub fn edge_source(&self) -> Option<&str> {
        self.interaction.creating_edge.as_deref()
    }

    pub fn cancel_edge_creation(&mut self) {
        self.interaction.creating_edge = None;
    }

    pub fn is_box_selection_mode(&self) -> bool {
        self.interaction.box_selection
    }

    /// Whether the renderer should start a box selection; the request is consumed.
    pub fn take_box_selection_request(&mut self) -> bool {
        std::mem::take(&mut self.interaction.box_selection_requested)
    }
}
