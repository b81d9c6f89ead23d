//! Visual tree rendering
//!
//! [`render`] is a pure function of the model, the state sets and the
//! settings. The host surface draws the resulting [`VisualTree`]; the view
//! either rebuilds it after structural changes or patches single items
//! in place after flag changes.

use serde::Serialize;
use termtree::Tree;

use crate::config::Settings;
use crate::domain::{EditSession, NodeId, StateKind, StateSets, TreeArena, TreeNode};

pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_SELECTED: &str = "menu-active";
pub const CLASS_DISABLED: &str = "menu-disabled";

/// Rendered forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualTree {
    pub tree_name: String,
    pub items: Vec<VisualItem>,
}

/// One rendered row (`li`) with its nested rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualItem {
    pub element_id: String,
    pub node_id: NodeId,
    pub classes: Vec<String>,
    pub aria_expanded: bool,
    pub aria_selected: bool,
    pub aria_disabled: bool,
    pub draggable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Open/closed toggle, branches only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expander: Option<Expander>,
    /// Spacer icon in place of the expander, leaves only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_icon: Option<IconRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<Checkbox>,
    pub input: EditField,
    pub label: Label,
    pub children: Vec<VisualItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expander {
    pub element_id: String,
    pub open: bool,
    pub icon: IconRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRef {
    pub element_id: String,
    pub src: String,
    pub width: String,
    pub height: String,
    pub use_local_storage: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkbox {
    pub element_id: String,
    pub checked: bool,
    pub classes: Vec<String>,
}

/// Inline edit field; hidden unless the node is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditField {
    pub element_id: String,
    pub value: String,
    pub hidden: bool,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub element_id: String,
    pub text: String,
    pub hidden: bool,
}

impl VisualTree {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element id of a node's row.
    pub fn element_id(&self, node_id: &NodeId) -> String {
        element_id(&self.tree_name, node_id)
    }

    pub fn find(&self, node_id: &NodeId) -> Option<&VisualItem> {
        let target = self.element_id(node_id);
        find_in(&self.items, &target)
    }

    pub fn find_mut(&mut self, node_id: &NodeId) -> Option<&mut VisualItem> {
        let target = self.element_id(node_id);
        find_in_mut(&mut self.items, &target)
    }

    /// Rows in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &VisualItem> {
        let mut stack: Vec<&VisualItem> = self.items.iter().rev().collect();
        std::iter::from_fn(move || {
            let item = stack.pop()?;
            stack.extend(item.children.iter().rev());
            Some(item)
        })
    }
}

fn find_in<'a>(items: &'a [VisualItem], element_id: &str) -> Option<&'a VisualItem> {
    items.iter().find_map(|item| {
        if item.element_id == element_id {
            Some(item)
        } else {
            find_in(&item.children, element_id)
        }
    })
}

fn find_in_mut<'a>(items: &'a mut [VisualItem], element_id: &str) -> Option<&'a mut VisualItem> {
    for item in items.iter_mut() {
        if item.element_id == element_id {
            return Some(item);
        }
        if let Some(found) = find_in_mut(&mut item.children, element_id) {
            return Some(found);
        }
    }
    None
}

impl VisualItem {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(CLASS_HIDDEN)
    }

    pub fn is_branch(&self) -> bool {
        self.expander.is_some()
    }

    /// Opens or closes the expander and swaps its icon.
    pub fn set_open(&mut self, open: bool, settings: &Settings) {
        self.aria_expanded = open;
        if let Some(expander) = &mut self.expander {
            expander.open = open;
            expander.icon.src = expander_icon(open, settings).to_string();
        }
    }

    /// Shows the edit field instead of the label, or the other way round.
    pub fn set_editing(&mut self, editing: bool) {
        self.input.hidden = !editing;
        self.label.hidden = editing;
    }
}

/// Element id of a node's row: `{tree_name}-{node_id}`.
pub fn element_id(tree_name: &str, node_id: &NodeId) -> String {
    format!("{tree_name}-{node_id}")
}

fn expander_icon(open: bool, settings: &Settings) -> &str {
    if open {
        &settings.expand_icon_url
    } else {
        &settings.collapse_icon_url
    }
}

/// Builds a utility class from a prefix and a color suffix.
///
/// Blank parts yield `""`; hex colors are bracketed (`bg-[#ff0000]`) and
/// `btn`/`badge` prefixes become `bg`.
pub fn fix_color(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() || suffix.is_empty() {
        return String::new();
    }
    let suffix = if suffix.starts_with('#') {
        format!("[{suffix}]")
    } else {
        suffix.to_string()
    };
    let prefix = match prefix {
        "btn" | "badge" => "bg",
        other => other,
    };
    let result = format!("{prefix}-{suffix}");
    if result.ends_with('-') {
        String::new()
    } else {
        result
    }
}

fn prefixed(prefix: &str, suffix: &str) -> Option<String> {
    (!suffix.is_empty()).then(|| format!("{prefix}-{suffix}"))
}

/// Class lists derived once per render from the settings.
struct Styles {
    item: Vec<String>,
    checkbox: Vec<String>,
    input: Vec<String>,
}

impl Styles {
    fn new(settings: &Settings) -> Self {
        let item = [
            &settings.item_color,
            &settings.item_active_color,
            &settings.item_focus_color,
            &settings.item_hover_color,
        ]
        .into_iter()
        .filter(|c| !c.is_empty())
        .cloned()
        .collect();

        let checkbox = std::iter::once(Some("checkbox".to_string()))
            .chain([
                prefixed("checkbox", &settings.item_color),
                Some(fix_color("checked:bg", &settings.check_box_active_color)),
                Some(fix_color("checked:border", &settings.check_box_active_border_color)),
                prefixed("checkbox", &settings.check_box_size),
            ])
            .flatten()
            .filter(|c| !c.is_empty())
            .collect();

        let input = ["input", "input-ghost", "xinput", "w-full"]
            .into_iter()
            .map(String::from)
            .map(Some)
            .chain([
                prefixed("input", &settings.item_color),
                prefixed("input", &settings.text_box_size),
            ])
            .flatten()
            .collect();

        Self {
            item,
            checkbox,
            input,
        }
    }
}

struct Renderer<'a> {
    arena: &'a TreeArena,
    state: &'a StateSets,
    settings: &'a Settings,
    editing: Option<&'a EditSession>,
    tree_name: &'a str,
    styles: Styles,
}

/// Renders the whole forest.
///
/// `tree_name` namespaces element ids; `editing` marks the row whose edit
/// field is open.
pub fn render(
    arena: &TreeArena,
    state: &StateSets,
    settings: &Settings,
    tree_name: &str,
    editing: Option<&EditSession>,
) -> VisualTree {
    let renderer = Renderer {
        arena,
        state,
        settings,
        editing,
        tree_name,
        styles: Styles::new(settings),
    };
    VisualTree {
        tree_name: tree_name.to_string(),
        items: renderer.build(arena.roots()),
    }
}

impl Renderer<'_> {
    fn build(&self, indices: &[generational_arena::Index]) -> Vec<VisualItem> {
        indices
            .iter()
            .filter_map(|&idx| self.arena.get_node(idx))
            .map(|node| self.item(node))
            .collect()
    }

    fn icon(&self, id: &str, src: &str) -> IconRef {
        IconRef {
            element_id: format!("{}-{id}", self.tree_name),
            src: src.to_string(),
            width: self.settings.icon_width.clone(),
            height: self.settings.icon_height.clone(),
            use_local_storage: self.settings.use_local_storage,
        }
    }

    fn item(&self, node: &TreeNode) -> VisualItem {
        let data = &node.data;
        let id = &data.id;
        let base = element_id(self.tree_name, id);
        let is_branch = !node.is_leaf();
        let selected = self.state.contains(StateKind::Selected, id);
        let editing = self.editing.is_some_and(|s| &s.node_id == id);

        let mut classes = vec!["list-item".to_string()];
        classes.extend(self.styles.item.iter().cloned());
        if is_branch {
            classes.push("xdetails".into());
        }
        if !self.state.contains(StateKind::Visible, id) {
            classes.push(CLASS_HIDDEN.into());
        }
        if selected {
            classes.push(CLASS_SELECTED.into());
        }
        if data.disabled {
            classes.push(CLASS_DISABLED.into());
        }

        let expander = is_branch.then(|| Expander {
            element_id: format!("{base}-details"),
            open: data.expanded,
            icon: self.icon(
                &format!("{id}-expandicon"),
                expander_icon(data.expanded, self.settings),
            ),
        });
        let blank_icon = (!is_branch)
            .then(|| self.icon(&format!("{id}-blankicon"), &self.settings.blank_icon_url));
        let icon = (!data.icon_url.is_empty()).then(|| self.icon(&format!("{id}-icon"), &data.icon_url));
        let checkbox = self.settings.has_checkbox.then(|| Checkbox {
            element_id: format!("{base}-check"),
            checked: self.state.contains(StateKind::Checked, id),
            classes: self.styles.checkbox.clone(),
        });

        let value = match self.editing {
            Some(session) if editing => session.buffer.clone(),
            _ => data.text.clone(),
        };

        VisualItem {
            node_id: id.clone(),
            classes,
            aria_expanded: data.expanded,
            aria_selected: selected,
            aria_disabled: data.disabled,
            draggable: self.settings.drag_n_drop,
            href: (!data.href.is_empty()).then(|| data.href.clone()),
            expander,
            blank_icon,
            icon,
            checkbox,
            input: EditField {
                element_id: format!("{base}-input"),
                value,
                hidden: !editing,
                classes: self.styles.input.clone(),
            },
            label: Label {
                element_id: format!("{base}-text"),
                text: data.text.clone(),
                hidden: editing,
            },
            children: self.build(&node.children),
            element_id: base,
        }
    }
}

/// Text rendering of the forest for terminals.
///
/// Markers: `[x]`/`[ ]` checkbox (when enabled), `*` selected, `+`/`-`
/// collapsed/expanded branch, `(hidden)`, `(disabled)`.
pub fn to_text_tree(
    arena: &TreeArena,
    state: &StateSets,
    settings: &Settings,
    title: &str,
) -> Tree<String> {
    fn label(node: &TreeNode, state: &StateSets, settings: &Settings) -> String {
        let data = &node.data;
        let mut parts = Vec::new();
        if !node.is_leaf() {
            parts.push(if data.expanded { "-" } else { "+" }.to_string());
        }
        if settings.has_checkbox {
            let mark = if state.contains(StateKind::Checked, &data.id) {
                "[x]"
            } else {
                "[ ]"
            };
            parts.push(mark.to_string());
        }
        let selected = if state.contains(StateKind::Selected, &data.id) {
            "*"
        } else {
            ""
        };
        parts.push(format!("{selected}{} ({})", data.text, data.id));
        if !state.contains(StateKind::Visible, &data.id) {
            parts.push("(hidden)".into());
        }
        if data.disabled {
            parts.push("(disabled)".into());
        }
        parts.join(" ")
    }

    fn build(
        arena: &TreeArena,
        idx: generational_arena::Index,
        state: &StateSets,
        settings: &Settings,
    ) -> Option<Tree<String>> {
        let node = arena.get_node(idx)?;
        let leaves: Vec<_> = node
            .children
            .iter()
            .filter_map(|&c| build(arena, c, state, settings))
            .collect();
        Some(Tree::new(label(node, state, settings)).with_leaves(leaves))
    }

    let leaves: Vec<_> = arena
        .roots()
        .iter()
        .filter_map(|&root| build(arena, root, state, settings))
        .collect();
    Tree::new(title.to_string()).with_leaves(leaves)
}
