//! Domain layer: tree model, identifiers, state sets and edit state
//!
//! This layer is independent of external concerns (no I/O, no rendering, no config loading).

pub mod arena;
pub mod edit;
pub mod error;
pub mod id;
pub mod node;
pub mod state;

pub use arena::{Placement, TreeArena, TreeNode};
pub use edit::{EditKey, EditOutcome, EditSession, EditState, InlineEditor};
pub use error::{DomainError, DomainResult, MoveDirection};
pub use id::NodeId;
pub use node::{NodeData, NodeRecord};
pub use state::{StateKind, StateSets};
