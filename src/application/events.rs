//! Notifications emitted to the host after state changes
//!
//! Listeners are plain closures connected to an [`EventDispatcher`]; emission
//! is synchronous and runs listeners in connection order.

use serde::Serialize;
use tracing::trace;

use crate::domain::{NodeId, NodeRecord};

/// A notification with its payload. Node payloads are snapshots without children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TreeEvent {
    NodeClick { node: NodeRecord },
    NodeChecked { node: NodeRecord, checked: bool },
    NodesChecked { node_ids: Vec<NodeId> },
    NodeExpanded { node: NodeRecord },
    NodeCollapsed { node: NodeRecord },
    NodeEdited { node: NodeRecord },
    NodeEditCancelled { node: NodeRecord },
    NodeDragStart { dragged_node: NodeRecord },
    NodeDrop { dragged_node: NodeRecord, target_node: NodeRecord },
}

impl TreeEvent {
    /// Notification name as seen by the host.
    pub fn name(&self) -> &'static str {
        match self {
            TreeEvent::NodeClick { .. } => "nodeClick",
            TreeEvent::NodeChecked { .. } => "nodeChecked",
            TreeEvent::NodesChecked { .. } => "nodesChecked",
            TreeEvent::NodeExpanded { .. } => "nodeExpanded",
            TreeEvent::NodeCollapsed { .. } => "nodeCollapsed",
            TreeEvent::NodeEdited { .. } => "nodeEdited",
            TreeEvent::NodeEditCancelled { .. } => "nodeEditCancelled",
            TreeEvent::NodeDragStart { .. } => "nodeDragStart",
            TreeEvent::NodeDrop { .. } => "nodeDrop",
        }
    }

    /// Primary node of the payload, if any.
    pub fn node(&self) -> Option<&NodeRecord> {
        match self {
            TreeEvent::NodeClick { node }
            | TreeEvent::NodeChecked { node, .. }
            | TreeEvent::NodeExpanded { node }
            | TreeEvent::NodeCollapsed { node }
            | TreeEvent::NodeEdited { node }
            | TreeEvent::NodeEditCancelled { node } => Some(node),
            TreeEvent::NodeDragStart { dragged_node } | TreeEvent::NodeDrop { dragged_node, .. } => {
                Some(dragged_node)
            }
            TreeEvent::NodesChecked { .. } => None,
        }
    }
}

/// Handle returned by [`EventDispatcher::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TreeEvent)>;

#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
    blocked: bool,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .field("blocked", &self.blocked)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TreeEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not connected.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// While blocked, `emit` drops notifications.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn emit(&mut self, event: &TreeEvent) {
        if self.blocked {
            trace!(event = event.name(), "dispatcher blocked, skipping emit");
            return;
        }
        trace!(event = event.name(), listeners = self.listeners.len(), "emit");
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn click(id: &str) -> TreeEvent {
        TreeEvent::NodeClick {
            node: NodeRecord::new(id, id),
        }
    }

    #[test]
    fn test_emit_reaches_listeners_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            dispatcher.connect(move |e| log.borrow_mut().push(format!("{tag}:{}", e.name())));
        }
        dispatcher.emit(&click("a"));
        assert_eq!(*log.borrow(), vec!["first:nodeClick", "second:nodeClick"]);
    }

    #[test]
    fn test_disconnect_and_block() {
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = EventDispatcher::new();
        let c = Rc::clone(&count);
        let id = dispatcher.connect(move |_| *c.borrow_mut() += 1);

        dispatcher.set_blocked(true);
        dispatcher.emit(&click("a"));
        dispatcher.set_blocked(false);
        dispatcher.emit(&click("a"));
        assert!(dispatcher.disconnect(id));
        assert!(!dispatcher.disconnect(id));
        dispatcher.emit(&click("a"));

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let event = TreeEvent::NodeDrop {
            dragged_node: NodeRecord::new("a", "A"),
            target_node: NodeRecord::new("b", "B"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "nodeDrop");
        assert_eq!(json["draggedNode"]["nodeId"], "a");
        assert_eq!(json["targetNode"]["nodeId"], "b");

        let json = serde_json::to_value(TreeEvent::NodesChecked {
            node_ids: vec![NodeId::new("x")],
        })
        .unwrap();
        assert_eq!(json["nodeIds"][0], "x");
    }
}
