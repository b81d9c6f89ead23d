//! Host interaction events
//!
//! The host surface translates pointer and keyboard input on rendered
//! elements into these values and hands them to [`TreeView::handle`].
//!
//! [`TreeView::handle`]: crate::application::TreeView::handle

use crate::domain::EditKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The row checkbox changed to `checked`
    CheckboxToggled { node_id: String, checked: bool },
    /// The open/closed toggle of a branch was clicked
    ExpanderClicked { node_id: String },
    /// The text label was clicked
    LabelClicked { node_id: String },
    /// A leaf row outside the label was clicked
    RowClicked { node_id: String },
    /// The edit field content changed
    EditInput { node_id: String, value: String },
    /// A key was pressed inside the edit field
    EditKey { node_id: String, key: EditKey },
    /// The edit field lost focus
    EditBlur { node_id: String },
    /// A dragged row was released over another row
    Drop { dragged_id: String, target_id: String },
}
