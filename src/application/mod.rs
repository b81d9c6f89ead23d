//! Application layer: the tree view component and its collaborators
//!
//! This layer orchestrates the domain model, rendering and notifications.

pub mod error;
pub mod events;
pub mod interaction;
pub mod render;
pub mod script;
pub mod view;

pub use error::{ApplicationError, ApplicationResult};
pub use events::{EventDispatcher, ListenerId, TreeEvent};
pub use interaction::Interaction;
pub use render::{to_text_tree, VisualItem, VisualTree};
pub use script::{parse_script, run_script, Command};
pub use view::TreeView;
