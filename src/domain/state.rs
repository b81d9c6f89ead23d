//! Selected / checked / visible id sets

use indexmap::IndexSet;

use crate::domain::NodeId;

/// Which of the three state sets an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Selected,
    Checked,
    Visible,
}

/// Insertion-ordered sets of node ids holding a boolean flag.
#[derive(Debug, Clone, Default)]
pub struct StateSets {
    pub selected: IndexSet<NodeId>,
    pub checked: IndexSet<NodeId>,
    pub visible: IndexSet<NodeId>,
}

impl StateSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, kind: StateKind) -> &IndexSet<NodeId> {
        match kind {
            StateKind::Selected => &self.selected,
            StateKind::Checked => &self.checked,
            StateKind::Visible => &self.visible,
        }
    }

    pub fn set_mut(&mut self, kind: StateKind) -> &mut IndexSet<NodeId> {
        match kind {
            StateKind::Selected => &mut self.selected,
            StateKind::Checked => &mut self.checked,
            StateKind::Visible => &mut self.visible,
        }
    }

    pub fn contains(&self, kind: StateKind, id: &NodeId) -> bool {
        self.set(kind).contains(id)
    }

    /// Adds or removes `id`; removal keeps the order of the remaining ids.
    pub fn toggle(&mut self, kind: StateKind, id: &NodeId, on: bool) {
        let set = self.set_mut(kind);
        if on {
            set.insert(id.clone());
        } else {
            set.shift_remove(id);
        }
    }

    /// Drops `id` from all three sets.
    pub fn purge(&mut self, id: &NodeId) {
        self.selected.shift_remove(id);
        self.checked.shift_remove(id);
        self.visible.shift_remove(id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.checked.clear();
        self.visible.clear();
    }

    pub fn ids(&self, kind: StateKind) -> Vec<NodeId> {
        self.set(kind).iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut sets = StateSets::new();
        for id in ["c", "a", "b"] {
            sets.toggle(StateKind::Checked, &NodeId::new(id), true);
        }
        sets.toggle(StateKind::Checked, &NodeId::new("a"), false);
        assert_eq!(
            sets.ids(StateKind::Checked),
            vec![NodeId::new("c"), NodeId::new("b")]
        );
    }

    #[test]
    fn test_purge_removes_from_every_set() {
        let mut sets = StateSets::new();
        let id = NodeId::new("x");
        sets.toggle(StateKind::Selected, &id, true);
        sets.toggle(StateKind::Checked, &id, true);
        sets.toggle(StateKind::Visible, &id, true);
        sets.purge(&id);
        assert!(!sets.contains(StateKind::Selected, &id));
        assert!(!sets.contains(StateKind::Checked, &id));
        assert!(!sets.contains(StateKind::Visible, &id));
    }
}
