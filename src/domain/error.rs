//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Direction of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
        };
        f.write_str(name)
    }
}

/// Domain errors represent tree rule violations.
///
/// None of these are fatal for a tree view: the view layer turns them
/// into diagnostics and leaves the model untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("cannot move node {id} {direction}: {reason}")]
    InvalidMove {
        id: NodeId,
        direction: MoveDirection,
        reason: &'static str,
    },

    #[error("cannot drop node {dragged} onto {target}: {reason}")]
    InvalidDrop {
        dragged: NodeId,
        target: NodeId,
        reason: &'static str,
    },
}

impl DomainError {
    pub(crate) fn invalid_move(id: &NodeId, direction: MoveDirection, reason: &'static str) -> Self {
        Self::InvalidMove {
            id: id.clone(),
            direction,
            reason,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
