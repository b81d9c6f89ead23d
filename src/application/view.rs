//! The tree view component
//!
//! [`TreeView`] owns the forest, the identifier index, the state sets, the
//! inline editor and the rendered [`VisualTree`]. Every public method runs to
//! completion synchronously: the model changes first, then the visual tree
//! is rebuilt (structural changes) or patched (flag changes), then listeners
//! are notified.
//!
//! Calls with unknown or empty ids are silent no-ops.

use itertools::Itertools;
use tracing::{debug, instrument, trace, warn};

use crate::application::events::{EventDispatcher, ListenerId, TreeEvent};
use crate::application::interaction::Interaction;
use crate::application::render::{self, VisualTree, CLASS_DISABLED, CLASS_HIDDEN, CLASS_SELECTED};
use crate::config::Settings;
use crate::domain::id::normalize;
use crate::domain::{
    DomainError, EditOutcome, InlineEditor, MoveDirection, NodeData, NodeId, NodeRecord,
    Placement, StateKind, StateSets, TreeArena,
};

#[derive(Debug)]
pub struct TreeView {
    settings: Settings,
    /// Normalized `settings.tree_name`
    tree_name: String,
    arena: TreeArena,
    state: StateSets,
    editor: InlineEditor,
    visual: VisualTree,
    events: EventDispatcher,
}

impl TreeView {
    pub fn new(settings: Settings) -> Self {
        let tree_name = normalize(&settings.tree_name);
        let mut view = Self {
            settings,
            tree_name,
            arena: TreeArena::new(),
            state: StateSets::new(),
            editor: InlineEditor::new(),
            visual: VisualTree::default(),
            events: EventDispatcher::new(),
        };
        view.refresh();
        view
    }

    /// Creates a view populated with `records`.
    pub fn with_data(settings: Settings, records: Vec<NodeRecord>) -> Self {
        let mut view = Self::new(settings);
        view.set_data(records);
        view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tree_name(&self) -> &str {
        &self.tree_name
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn state(&self) -> &StateSets {
        &self.state
    }

    pub fn editor(&self) -> &InlineEditor {
        &self.editor
    }

    /// The current rendered tree.
    pub fn visual(&self) -> &VisualTree {
        &self.visual
    }

    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    /// Shorthand for `events_mut().connect(listener)`.
    pub fn connect<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TreeEvent) + 'static,
    {
        self.events.connect(listener)
    }

    /// Rebuilds the visual tree from the model.
    #[instrument(level = "trace", skip(self))]
    pub fn refresh(&mut self) {
        self.visual = render::render(
            &self.arena,
            &self.state,
            &self.settings,
            &self.tree_name,
            self.editor.session(),
        );
    }

    /// Replaces the forest with `records`.
    ///
    /// Ids are normalized and parent ids rewritten to the actual parent.
    /// Records with an empty or duplicate id are skipped with their subtree.
    /// `checked`/`selected`/`visible` flags seed the state sets.
    #[instrument(level = "debug", skip(self, records), fields(roots = records.len()))]
    pub fn set_data(&mut self, records: Vec<NodeRecord>) {
        self.clear_model();
        for record in records {
            self.load_record(record, &NodeId::root());
        }
        self.refresh();
    }

    fn load_record(&mut self, record: NodeRecord, parent: &NodeId) {
        let id = record.node_id.clone();
        let mut data = NodeData::new(id.clone(), parent.clone(), record.text)
            .with_icon(record.icon_url.unwrap_or_default())
            .with_href(record.href.unwrap_or_default());
        data.expanded = record.expanded.unwrap_or(false);
        data.disabled = record.disabled.unwrap_or(false);
        data.checked = record.checked.unwrap_or(false);
        data.selected = record.selected.unwrap_or(false);
        data.visible = record.visible.unwrap_or(true);

        let flags = [
            (StateKind::Checked, data.checked),
            (StateKind::Selected, data.selected),
            (StateKind::Visible, data.visible),
        ];
        if self
            .arena
            .insert(data, Placement::LastChildOf(parent.clone()))
            .is_none()
        {
            warn!(id = %id, "skipping node record with empty or duplicate id");
            return;
        }
        for (kind, on) in flags {
            self.state.toggle(kind, &id, on);
        }
        for child in record.nodes {
            self.load_record(child, &id);
        }
    }

    fn clear_model(&mut self) {
        self.arena.clear();
        self.state.clear();
        self.editor.reset();
    }

    /// Drops every node and all state.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.clear_model();
        self.refresh();
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn exists(&self, id: &str) -> bool {
        self.arena.exists(&NodeId::new(id))
    }

    /// Node payload by id.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.arena.find(&NodeId::new(id)).map(|n| &n.data)
    }

    /// Snapshot of a node including its subtree.
    pub fn find(&self, id: &str) -> Option<NodeRecord> {
        let idx = self.arena.lookup(&NodeId::new(id))?;
        self.arena.record(idx, true)
    }

    /// Direct children of a node; empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> Vec<NodeRecord> {
        self.find(id).map(|r| r.nodes).unwrap_or_default()
    }

    /// The forest as nested records.
    pub fn tree(&self) -> Vec<NodeRecord> {
        self.arena.to_records()
    }

    /// Every node in pre-order, without nested children.
    pub fn flatten(&self) -> Vec<NodeRecord> {
        self.arena.iter().map(|(_, n)| n.data.to_record()).collect()
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.state.ids(StateKind::Selected)
    }

    pub fn checked_ids(&self) -> Vec<NodeId> {
        self.state.ids(StateKind::Checked)
    }

    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.state.ids(StateKind::Visible)
    }

    /// First selected node in display order.
    pub fn selected_node(&self, include_children: bool) -> Option<NodeRecord> {
        self.arena
            .iter()
            .find(|(_, n)| self.state.contains(StateKind::Selected, &n.data.id))
            .and_then(|(idx, _)| self.arena.record(idx, include_children))
    }

    fn snapshot(&self, id: &NodeId) -> Option<NodeRecord> {
        self.arena.find(id).map(|n| n.data.to_record())
    }

    // ---------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------

    fn new_node(&self, id: NodeId, icon_url: &str, text: &str, href: &str) -> NodeData {
        let icon_url = if icon_url.is_empty() {
            self.settings.blank_icon_url.as_str()
        } else {
            icon_url
        };
        NodeData::new(id, NodeId::root(), text)
            .with_icon(icon_url)
            .with_href(href)
    }

    fn insert(&mut self, placement: Placement, id: &str, icon_url: &str, text: &str, href: &str) -> bool {
        let id = NodeId::new(id);
        let data = self.new_node(id.clone(), icon_url, text, href);
        match self.arena.insert(data, placement) {
            Some(_) => {
                self.state.toggle(StateKind::Visible, &id, true);
                true
            }
            None => false,
        }
    }

    /// Appends a node to `parent_id`'s children, or to the roots if
    /// `parent_id` is empty. Does not re-render; call [`refresh`](Self::refresh).
    /// Returns false and changes nothing if the parent does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent_id: &str, id: &str, icon_url: &str, text: &str, href: &str) -> bool {
        self.insert(Placement::LastChildOf(NodeId::new(parent_id)), id, icon_url, text, href)
    }

    /// Inserts a node right before `target_id` among its siblings.
    #[instrument(level = "debug", skip(self))]
    pub fn add_before(&mut self, target_id: &str, id: &str, icon_url: &str, text: &str, href: &str) -> bool {
        let added = self.insert(Placement::Before(NodeId::new(target_id)), id, icon_url, text, href);
        if added {
            self.refresh();
        }
        added
    }

    /// Inserts a node right after `target_id` among its siblings.
    #[instrument(level = "debug", skip(self))]
    pub fn add_after(&mut self, target_id: &str, id: &str, icon_url: &str, text: &str, href: &str) -> bool {
        let added = self.insert(Placement::After(NodeId::new(target_id)), id, icon_url, text, href);
        if added {
            self.refresh();
        }
        added
    }

    /// Removes a node. Its subtree goes with it, out of the index and every state set.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.arena.remove(&NodeId::new(id));
        self.forget(&removed)
    }

    /// Removes every child of a node; the node itself stays.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_children(&mut self, id: &str) -> bool {
        if !self.exists(id) {
            return false;
        }
        let removed = self.arena.remove_children(&NodeId::new(id));
        self.forget(&removed);
        self.refresh();
        true
    }

    /// Purges removed ids from the state sets and the editor.
    fn forget(&mut self, removed: &[NodeId]) -> bool {
        if removed.is_empty() {
            return false;
        }
        for id in removed {
            self.state.purge(id);
        }
        self.editor.abandon_if(removed.iter());
        self.refresh();
        true
    }

    /// Sets icon, text and link of a node; a blank icon falls back to the
    /// placeholder.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&mut self, id: &str, icon_url: &str, text: &str, href: &str) -> bool {
        let id = NodeId::new(id);
        let icon_url = if icon_url.is_empty() {
            self.settings.blank_icon_url.clone()
        } else {
            icon_url.to_string()
        };
        let Some(node) = self.arena.find_mut(&id) else {
            return false;
        };
        node.data.icon_url = icon_url.clone();
        node.data.text = text.to_string();
        node.data.href = href.to_string();

        if let Some(item) = self.visual.find_mut(&id) {
            item.label.text = text.to_string();
            item.input.value = text.to_string();
            if let Some(icon) = &mut item.icon {
                icon.src = icon_url;
            }
            item.href = (!href.is_empty()).then(|| href.to_string());
        }
        true
    }

    // ---------------------------------------------------------------
    // State propagation
    // ---------------------------------------------------------------

    /// Applies `f` to a node and its descendants, mirrors the change into
    /// the `kind` set, and returns the touched ids.
    fn propagate<F>(&mut self, id: &str, kind: Option<(StateKind, bool)>, mut f: F) -> Vec<NodeId>
    where
        F: FnMut(&mut NodeData),
    {
        let mut touched = Vec::new();
        let state = &mut self.state;
        self.arena.apply_recursive(&NodeId::new(id), |data| {
            f(data);
            if let Some((kind, on)) = kind {
                state.toggle(kind, &data.id, on);
            }
            touched.push(data.id.clone());
        });
        touched
    }

    fn patch_selected(&mut self, ids: &[NodeId], on: bool) {
        for id in ids {
            if let Some(item) = self.visual.find_mut(id) {
                item.set_class(CLASS_SELECTED, on);
                item.aria_selected = on;
            }
        }
    }

    fn patch_checked(&mut self, ids: &[NodeId], on: bool) {
        for id in ids {
            if let Some(checkbox) = self.visual.find_mut(id).and_then(|i| i.checkbox.as_mut()) {
                checkbox.checked = on;
            }
        }
    }

    /// Selects or deselects a node and all of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: &str, state: bool) {
        let touched = self.propagate(id, Some((StateKind::Selected, state)), |d| d.selected = state);
        self.patch_selected(&touched, state);
    }

    /// Checks or unchecks a node and all of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn check(&mut self, id: &str, state: bool) {
        let touched = self.propagate(id, Some((StateKind::Checked, state)), |d| d.checked = state);
        self.patch_checked(&touched, state);
    }

    /// Enables or disables a node and all of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn enable(&mut self, id: &str, state: bool) {
        let touched = self.propagate(id, None, |d| d.disabled = !state);
        for id in &touched {
            if let Some(item) = self.visual.find_mut(id) {
                item.set_class(CLASS_DISABLED, !state);
                item.aria_disabled = !state;
            }
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        let touched = self.propagate(id, Some((StateKind::Visible, visible)), |d| d.visible = visible);
        for id in &touched {
            if let Some(item) = self.visual.find_mut(id) {
                item.set_class(CLASS_HIDDEN, !visible);
            }
        }
    }

    /// Hides a node and all of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn hide(&mut self, id: &str) {
        self.set_visible(id, false);
    }

    /// Shows a node and all of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn show(&mut self, id: &str) {
        self.set_visible(id, true);
    }

    /// Resets every member of a state set (flag and set entry).
    fn reset_set(&mut self, kind: StateKind) -> Vec<NodeId> {
        let members = self.state.ids(kind);
        for id in &members {
            if let Some(node) = self.arena.find_mut(id) {
                match kind {
                    StateKind::Selected => node.data.selected = false,
                    StateKind::Checked => node.data.checked = false,
                    StateKind::Visible => node.data.visible = false,
                }
            }
        }
        self.state.set_mut(kind).clear();
        members
    }

    /// Deselects every node.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_selected(&mut self) {
        let members = self.reset_set(StateKind::Selected);
        self.patch_selected(&members, false);
    }

    /// Unchecks every node.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_checked(&mut self) {
        let members = self.reset_set(StateKind::Checked);
        self.patch_checked(&members, false);
    }

    fn unique_ids<I, S>(ids: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter().map(NodeId::new).unique().collect()
    }

    /// Replaces the selection with `ids` and their descendants.
    #[instrument(level = "debug", skip_all)]
    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear_selected();
        for id in Self::unique_ids(ids) {
            self.select(id.as_str(), true);
        }
    }

    /// Replaces the checked set with `ids` and their descendants, then
    /// emits `nodesChecked`.
    #[instrument(level = "debug", skip_all)]
    pub fn check_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear_checked();
        let node_ids = Self::unique_ids(ids);
        for id in &node_ids {
            self.check(id.as_str(), true);
        }
        self.events.emit(&TreeEvent::NodesChecked { node_ids });
    }

    // ---------------------------------------------------------------
    // Expand / collapse
    // ---------------------------------------------------------------

    fn set_expanded(&mut self, id: &NodeId, open: bool) -> bool {
        let Some(node) = self.arena.find_mut(id) else {
            return false;
        };
        node.data.expanded = open;
        if let Some(item) = self.visual.find_mut(id) {
            item.set_open(open, &self.settings);
        }
        true
    }

    /// Opens or closes a single node; descendants keep their state.
    #[instrument(level = "debug", skip(self))]
    pub fn expand(&mut self, id: &str, state: bool) {
        self.set_expanded(&NodeId::new(id), state);
    }

    fn set_all_expanded(&mut self, open: bool) {
        let ids: Vec<NodeId> = self.arena.iter().map(|(_, n)| n.data.id.clone()).collect();
        for id in &ids {
            self.set_expanded(id, open);
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    #[instrument(level = "debug", skip(self))]
    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    // ---------------------------------------------------------------
    // Reordering
    // ---------------------------------------------------------------

    fn apply_move(&mut self, id: &str, direction: MoveDirection) -> bool {
        let id = NodeId::new(id);
        let result = match direction {
            MoveDirection::Left => self.arena.move_left(&id),
            MoveDirection::Right => self.arena.move_right(&id),
            MoveDirection::Up => self.arena.move_up(&id),
            MoveDirection::Down => self.arena.move_down(&id),
        };
        match result {
            Ok(()) => {
                self.refresh();
                true
            }
            Err(DomainError::NodeNotFound(_)) => false,
            Err(e @ DomainError::InvalidMove { direction: MoveDirection::Right, .. }) => {
                warn!("{e}");
                false
            }
            Err(e) => {
                debug!("{e}");
                false
            }
        }
    }

    /// Makes a node a sibling of its parent.
    #[instrument(level = "debug", skip(self))]
    pub fn move_left(&mut self, id: &str) -> bool {
        self.apply_move(id, MoveDirection::Left)
    }

    /// Makes a node the last child of its preceding sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_right(&mut self, id: &str) -> bool {
        self.apply_move(id, MoveDirection::Right)
    }

    /// Swaps a node with its preceding sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_up(&mut self, id: &str) -> bool {
        self.apply_move(id, MoveDirection::Up)
    }

    /// Swaps a node with its following sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_down(&mut self, id: &str) -> bool {
        self.apply_move(id, MoveDirection::Down)
    }

    /// Moves `dragged_id` with its subtree under `target_id` and notifies
    /// `nodeDragStart` and `nodeDrop`.
    ///
    /// Ignored when drag and drop is disabled, when either node is missing,
    /// or when the target is the dragged node or one of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_node(&mut self, dragged_id: &str, target_id: &str) -> bool {
        if !self.settings.drag_n_drop {
            trace!("drag and drop disabled");
            return false;
        }
        let dragged = NodeId::new(dragged_id);
        let target = NodeId::new(target_id);
        let (Some(dragged_node), Some(target_node)) = (self.snapshot(&dragged), self.snapshot(&target))
        else {
            return false;
        };
        let (Some(dragged_idx), Some(target_idx)) = (self.arena.lookup(&dragged), self.arena.lookup(&target))
        else {
            return false;
        };
        if dragged_idx == target_idx || self.arena.is_ancestor(dragged_idx, target_idx) {
            debug!("drop onto itself or a descendant ignored");
            return false;
        }

        self.events.emit(&TreeEvent::NodeDragStart {
            dragged_node: dragged_node.clone(),
        });
        self.events.emit(&TreeEvent::NodeDrop {
            dragged_node,
            target_node,
        });

        match self.arena.reparent(&dragged, &target) {
            Ok(()) => {
                self.refresh();
                true
            }
            Err(e) => {
                debug!("{e}");
                false
            }
        }
    }

    // ---------------------------------------------------------------
    // Inline editing
    // ---------------------------------------------------------------

    /// Opens the edit field of a node.
    #[instrument(level = "debug", skip(self))]
    pub fn enable_inline_editing(&mut self, id: &str) -> bool {
        let id = NodeId::new(id);
        let Some(text) = self.arena.find(&id).map(|n| n.data.text.clone()) else {
            return false;
        };
        if let Some(previous) = self.editor.begin(&id, &text) {
            self.finish_edit(previous);
        }
        if let Some(item) = self.visual.find_mut(&id) {
            item.input.value = text;
            item.set_editing(true);
        }
        true
    }

    /// Replaces the content of the open edit field.
    pub fn edit_input(&mut self, value: &str) -> bool {
        if !self.editor.input(value) {
            return false;
        }
        if let Some(id) = self.editor.session().map(|s| s.node_id.clone()) {
            if let Some(item) = self.visual.find_mut(&id) {
                item.input.value = value.to_string();
            }
        }
        true
    }

    /// Leaves the edit field keeping the typed text (blur / Enter).
    pub fn commit_edit(&mut self) -> Option<EditOutcome> {
        let outcome = self.editor.commit()?;
        self.finish_edit(outcome.clone());
        Some(outcome)
    }

    /// Leaves the edit field discarding the typed text (Escape).
    pub fn cancel_edit(&mut self) -> Option<EditOutcome> {
        let outcome = self.editor.cancel()?;
        self.finish_edit(outcome.clone());
        Some(outcome)
    }

    fn finish_edit(&mut self, outcome: EditOutcome) {
        let id = outcome.node_id().clone();
        let event = match outcome {
            EditOutcome::Committed { text, .. } => {
                let Some(node) = self.arena.find_mut(&id) else {
                    return;
                };
                node.data.text = text.clone();
                let node = node.data.to_record();
                if let Some(item) = self.visual.find_mut(&id) {
                    item.label.text = text.clone();
                    item.input.value = text;
                }
                TreeEvent::NodeEdited { node }
            }
            EditOutcome::Cancelled { .. } => {
                let Some(node) = self.snapshot(&id) else {
                    return;
                };
                if let Some(item) = self.visual.find_mut(&id) {
                    item.input.value = node.text.clone();
                }
                TreeEvent::NodeEditCancelled { node }
            }
        };
        if let Some(item) = self.visual.find_mut(&id) {
            item.set_editing(false);
        }
        self.events.emit(&event);
    }

    // ---------------------------------------------------------------
    // Host interactions
    // ---------------------------------------------------------------

    /// Routes a host interaction to the matching operation.
    #[instrument(level = "debug", skip(self))]
    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::CheckboxToggled { node_id, checked } => {
                if !self.exists(&node_id) {
                    return;
                }
                self.check(&node_id, checked);
                if let Some(node) = self.snapshot(&NodeId::new(&node_id)) {
                    self.events.emit(&TreeEvent::NodeChecked { node, checked });
                }
            }
            Interaction::ExpanderClicked { node_id } => self.toggle_expanded(&node_id),
            Interaction::LabelClicked { node_id } | Interaction::RowClicked { node_id } => {
                self.click(&node_id)
            }
            Interaction::EditInput { node_id, value } => {
                if self.editor.is_editing(&NodeId::new(&node_id)) {
                    self.edit_input(&value);
                }
            }
            Interaction::EditKey { node_id, key } => {
                if self.editor.is_editing(&NodeId::new(&node_id)) {
                    if let Some(outcome) = self.editor.key(key) {
                        self.finish_edit(outcome);
                    }
                }
            }
            Interaction::EditBlur { node_id } => {
                if self.editor.is_editing(&NodeId::new(&node_id)) {
                    self.commit_edit();
                }
            }
            Interaction::Drop {
                dragged_id,
                target_id,
            } => {
                self.drop_node(&dragged_id, &target_id);
            }
        }
    }

    fn toggle_expanded(&mut self, id: &str) {
        let id = NodeId::new(id);
        let Some(node) = self.arena.find(&id) else {
            return;
        };
        if node.is_leaf() {
            return;
        }
        let open = !node.data.expanded;
        self.set_expanded(&id, open);
        if let Some(node) = self.snapshot(&id) {
            let event = if open {
                TreeEvent::NodeExpanded { node }
            } else {
                TreeEvent::NodeCollapsed { node }
            };
            self.events.emit(&event);
        }
    }

    fn click(&mut self, id: &str) {
        if !self.exists(id) {
            return;
        }
        if self.settings.inline_edit {
            self.enable_inline_editing(id);
            return;
        }
        if let Some(node) = self.snapshot(&NodeId::new(id)) {
            self.events.emit(&TreeEvent::NodeClick { node });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view() -> TreeView {
        let mut view = TreeView::new(Settings {
            has_checkbox: true,
            ..Settings::default()
        });
        view.add("", "a", "", "Node A", "");
        view.add("a", "aa", "", "Node AA", "");
        view.add("", "b", "", "Node B", "");
        view.refresh();
        view
    }

    fn recorder(view: &mut TreeView) -> Rc<RefCell<Vec<TreeEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        view.connect(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn test_add_defaults_icon_and_marks_visible() {
        let v = view();
        let aa = v.node("AA").unwrap();
        assert_eq!(aa.icon_url, v.settings().blank_icon_url);
        assert_eq!(aa.parent_id.as_str(), "a");
        assert!(v.visible_ids().contains(&NodeId::new("aa")));
        assert_eq!(v.tree_name(), "treeview");
    }

    #[test]
    fn test_add_without_refresh_leaves_visual_stale() {
        let mut v = view();
        v.add("", "c", "", "Node C", "");
        assert!(v.visual().find(&NodeId::new("c")).is_none());
        v.refresh();
        assert!(v.visual().find(&NodeId::new("c")).is_some());
    }

    #[test]
    fn test_check_patches_rendered_checkbox() {
        let mut v = view();
        v.check("a", true);
        let item = v.visual().find(&NodeId::new("aa")).unwrap();
        assert!(item.checkbox.as_ref().unwrap().checked);
        assert!(v.node("aa").unwrap().checked);
    }

    #[test]
    fn test_update_patches_label_and_icon() {
        let mut v = view();
        v.update("b", "b.svg", "Renamed", "https://example.com");
        let item = v.visual().find(&NodeId::new("b")).unwrap();
        assert_eq!(item.label.text, "Renamed");
        assert_eq!(item.input.value, "Renamed");
        assert_eq!(item.icon.as_ref().unwrap().src, "b.svg");
        assert_eq!(item.href.as_deref(), Some("https://example.com"));
        assert!(!v.update("zz", "", "x", ""));
    }

    #[test]
    fn test_expander_click_toggles_and_notifies() {
        let mut v = view();
        let log = recorder(&mut v);
        v.handle(Interaction::ExpanderClicked { node_id: "a".into() });
        v.handle(Interaction::ExpanderClicked { node_id: "a".into() });
        v.handle(Interaction::ExpanderClicked { node_id: "b".into() });
        let names: Vec<_> = log.borrow().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["nodeExpanded", "nodeCollapsed"]);
        assert!(!v.node("a").unwrap().expanded);
    }

    #[test]
    fn test_remove_abandons_running_edit() {
        let mut v = view();
        v.enable_inline_editing("aa");
        v.remove("a");
        assert!(v.editor().session().is_none());
        assert!(v.commit_edit().is_none());
    }

    #[test]
    fn test_set_data_seeds_state_sets() {
        let mut aa = NodeRecord::new("AA", "Node AA");
        aa.checked = Some(true);
        aa.visible = Some(false);
        let a = NodeRecord::new("a", "Node A").with_children(vec![aa]);
        let dup = NodeRecord::new("a", "Duplicate");
        let v = TreeView::with_data(Settings::default(), vec![a, dup]);

        assert_eq!(v.arena().len(), 2);
        assert_eq!(v.checked_ids(), vec![NodeId::new("aa")]);
        assert!(!v.visible_ids().contains(&NodeId::new("aa")));
        assert_eq!(v.node("aa").unwrap().parent_id.as_str(), "a");
        assert!(v.visual().find(&NodeId::new("aa")).unwrap().is_hidden());
    }
}
