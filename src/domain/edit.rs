//! Inline label editing
//!
//! A node label is either displayed or being edited. Leaving the edit field
//! (blur or Enter) commits unless the trimmed text is empty or equals the
//! trimmed original; Escape always cancels.

use tracing::{debug, instrument};

use crate::domain::NodeId;

/// Keys the edit field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

/// An edit in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub node_id: NodeId,
    /// Label text when editing started
    pub original: String,
    /// Current content of the edit field
    pub buffer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Display,
    Editing(EditSession),
}

/// Result of leaving the editing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// New, trimmed, non-empty text that differs from the original
    Committed { node_id: NodeId, text: String },
    Cancelled { node_id: NodeId },
}

impl EditOutcome {
    pub fn node_id(&self) -> &NodeId {
        match self {
            EditOutcome::Committed { node_id, .. } | EditOutcome::Cancelled { node_id } => node_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InlineEditor {
    state: EditState,
}

impl InlineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            EditState::Display => None,
        }
    }

    pub fn is_editing(&self, node_id: &NodeId) -> bool {
        self.session().is_some_and(|s| &s.node_id == node_id)
    }

    /// Starts editing `node_id`. An edit already running on another node is
    /// committed first and its outcome returned.
    #[instrument(level = "debug", skip(self, current_text))]
    pub fn begin(&mut self, node_id: &NodeId, current_text: &str) -> Option<EditOutcome> {
        if self.is_editing(node_id) {
            return None;
        }
        let previous = self.commit();
        self.state = EditState::Editing(EditSession {
            node_id: node_id.clone(),
            original: current_text.to_string(),
            buffer: current_text.to_string(),
        });
        previous
    }

    /// Replaces the field content. Ignored when not editing.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Editing(session) => {
                session.buffer = text.into();
                true
            }
            EditState::Display => false,
        }
    }

    /// Leaves the editing state (blur).
    #[instrument(level = "debug", skip(self))]
    pub fn commit(&mut self) -> Option<EditOutcome> {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let text = session.buffer.trim();
        let outcome = if text.is_empty() || text == session.original.trim() {
            EditOutcome::Cancelled {
                node_id: session.node_id,
            }
        } else {
            EditOutcome::Committed {
                node_id: session.node_id,
                text: text.to_string(),
            }
        };
        debug!(?outcome, "edit finished");
        Some(outcome)
    }

    /// Discards the typed text and leaves the editing state.
    #[instrument(level = "debug", skip(self))]
    pub fn cancel(&mut self) -> Option<EditOutcome> {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        debug!(node_id = %session.node_id, "edit cancelled");
        Some(EditOutcome::Cancelled {
            node_id: session.node_id,
        })
    }

    pub fn key(&mut self, key: EditKey) -> Option<EditOutcome> {
        match key {
            EditKey::Enter => self.commit(),
            EditKey::Escape => self.cancel(),
        }
    }

    /// Drops the session without an outcome if it edits one of `ids`.
    pub fn abandon_if<'a>(&mut self, mut ids: impl Iterator<Item = &'a NodeId>) {
        if let Some(session) = self.session() {
            let editing = session.node_id.clone();
            if ids.any(|id| *id == editing) {
                self.state = EditState::Display;
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = EditState::Display;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn editing(text: &str) -> InlineEditor {
        let mut editor = InlineEditor::new();
        editor.begin(&NodeId::new("a"), text);
        editor
    }

    #[rstest]
    #[case("Node A")]
    #[case("  Node A  ")]
    fn test_padded_original_unchanged_text_cancels(#[case] typed: &str) {
        let mut editor = editing("  Node A  ");
        editor.input(typed);
        assert_eq!(
            editor.commit(),
            Some(EditOutcome::Cancelled {
                node_id: NodeId::new("a")
            })
        );
    }

    #[test]
    fn test_cancel_ignores_typed_text() {
        let mut editor = editing("  Node A  ");
        editor.input("Other");
        assert_eq!(
            editor.key(EditKey::Escape),
            Some(EditOutcome::Cancelled {
                node_id: NodeId::new("a")
            })
        );
        assert!(editor.session().is_none());
    }

    #[rstest]
    #[case("Node A", None)]
    #[case("   ", None)]
    #[case("  Node A  ", None)]
    #[case(" Renamed ", Some("Renamed"))]
    fn test_commit_outcome(#[case] typed: &str, #[case] expected: Option<&str>) {
        let mut editor = editing("Node A");
        editor.input(typed);
        let outcome = editor.commit().unwrap();
        match expected {
            Some(text) => assert_eq!(
                outcome,
                EditOutcome::Committed {
                    node_id: NodeId::new("a"),
                    text: text.into()
                }
            ),
            None => assert_eq!(
                outcome,
                EditOutcome::Cancelled {
                    node_id: NodeId::new("a")
                }
            ),
        }
        assert_eq!(editor.state(), &EditState::Display);
    }

    #[test]
    fn test_begin_on_other_node_commits_previous() {
        let mut editor = editing("Node A");
        editor.input("New A");
        let previous = editor.begin(&NodeId::new("b"), "Node B").unwrap();
        assert_eq!(previous.node_id(), &NodeId::new("a"));
        assert!(editor.is_editing(&NodeId::new("b")));
    }

    #[test]
    fn test_commit_without_session_is_none() {
        let mut editor = InlineEditor::new();
        assert!(editor.commit().is_none());
        assert!(!editor.input("x"));
    }
}
