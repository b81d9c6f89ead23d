//! Line-oriented command scripts driving a [`TreeView`]
//!
//! One command per line, `#` starts a comment line. Arguments are separated
//! by whitespace; double quotes group words and `""` is an empty argument
//! (e.g. the parent id of a root node).
//!
//! ```text
//! add "" docs "Documents"
//! add docs report "Q3 report" ./icons/file.svg
//! check docs
//! move-right report
//! ```

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::interaction::Interaction;
use crate::application::view::TreeView;
use crate::domain::EditKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { parent: String, id: String, text: String, icon: String, href: String },
    AddBefore { target: String, id: String, text: String, icon: String, href: String },
    AddAfter { target: String, id: String, text: String, icon: String, href: String },
    Remove(String),
    RemoveChildren(String),
    Update { id: String, text: String, icon: String, href: String },
    Select(String, bool),
    SelectMany(Vec<String>),
    ClearSelected,
    Check(String, bool),
    CheckMany(Vec<String>),
    ClearChecked,
    Expand(String, bool),
    ExpandAll,
    CollapseAll,
    Enable(String, bool),
    Hide(String),
    Show(String),
    MoveLeft(String),
    MoveRight(String),
    MoveUp(String),
    MoveDown(String),
    /// Opens the edit field, types `text` and presses Enter
    Edit { id: String, text: String },
    /// Opens the edit field, types `text` and presses Escape
    EditCancel { id: String, text: String },
    Interact(Interaction),
    Refresh,
    Clear,
}

/// Splits a line into arguments, honoring double quotes.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err("unterminated quote".into());
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_bool(value: Option<&String>, default: bool) -> Result<bool, String> {
    match value.map(String::as_str) {
        None => Ok(default),
        Some("true" | "on" | "yes" | "1") => Ok(true),
        Some("false" | "off" | "no" | "0") => Ok(false),
        Some(other) => Err(format!("expected a boolean, got '{other}'")),
    }
}

impl Command {
    /// Parses one script line; blank and comment lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let tokens = tokenize(trimmed)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let arg = |i: usize| -> Result<String, String> {
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("{name}: missing argument {}", i + 1))
        };
        let opt = |i: usize| args.get(i).cloned().unwrap_or_default();

        let command = match name.as_str() {
            "add" => Command::Add {
                parent: arg(0)?,
                id: arg(1)?,
                text: arg(2)?,
                icon: opt(3),
                href: opt(4),
            },
            "add-before" => Command::AddBefore {
                target: arg(0)?,
                id: arg(1)?,
                text: arg(2)?,
                icon: opt(3),
                href: opt(4),
            },
            "add-after" => Command::AddAfter {
                target: arg(0)?,
                id: arg(1)?,
                text: arg(2)?,
                icon: opt(3),
                href: opt(4),
            },
            "remove" => Command::Remove(arg(0)?),
            "remove-children" => Command::RemoveChildren(arg(0)?),
            "update" => Command::Update {
                id: arg(0)?,
                text: arg(1)?,
                icon: opt(2),
                href: opt(3),
            },
            "select" => Command::Select(arg(0)?, parse_bool(args.get(1), true)?),
            "deselect" => Command::Select(arg(0)?, false),
            "select-many" => Command::SelectMany(args.to_vec()),
            "clear-selected" => Command::ClearSelected,
            "check" => Command::Check(arg(0)?, parse_bool(args.get(1), true)?),
            "uncheck" => Command::Check(arg(0)?, false),
            "check-many" => Command::CheckMany(args.to_vec()),
            "clear-checked" => Command::ClearChecked,
            "expand" => Command::Expand(arg(0)?, parse_bool(args.get(1), true)?),
            "collapse" => Command::Expand(arg(0)?, false),
            "expand-all" => Command::ExpandAll,
            "collapse-all" => Command::CollapseAll,
            "enable" => Command::Enable(arg(0)?, parse_bool(args.get(1), true)?),
            "disable" => Command::Enable(arg(0)?, false),
            "hide" => Command::Hide(arg(0)?),
            "show" => Command::Show(arg(0)?),
            "move-left" => Command::MoveLeft(arg(0)?),
            "move-right" => Command::MoveRight(arg(0)?),
            "move-up" => Command::MoveUp(arg(0)?),
            "move-down" => Command::MoveDown(arg(0)?),
            "edit" => Command::Edit {
                id: arg(0)?,
                text: arg(1)?,
            },
            "edit-cancel" => Command::EditCancel {
                id: arg(0)?,
                text: opt(1),
            },
            "click" => Command::Interact(Interaction::LabelClicked { node_id: arg(0)? }),
            "toggle" => Command::Interact(Interaction::ExpanderClicked { node_id: arg(0)? }),
            "checkbox" => Command::Interact(Interaction::CheckboxToggled {
                node_id: arg(0)?,
                checked: parse_bool(args.get(1), true)?,
            }),
            "drop" => Command::Interact(Interaction::Drop {
                dragged_id: arg(0)?,
                target_id: arg(1)?,
            }),
            "refresh" => Command::Refresh,
            "clear" => Command::Clear,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Some(command))
    }

    /// Runs the command against `view`.
    pub fn apply(&self, view: &mut TreeView) {
        match self {
            Command::Add { parent, id, text, icon, href } => {
                view.add(parent, id, icon, text, href);
            }
            Command::AddBefore { target, id, text, icon, href } => {
                view.add_before(target, id, icon, text, href);
            }
            Command::AddAfter { target, id, text, icon, href } => {
                view.add_after(target, id, icon, text, href);
            }
            Command::Remove(id) => {
                view.remove(id);
            }
            Command::RemoveChildren(id) => {
                view.remove_children(id);
            }
            Command::Update { id, text, icon, href } => {
                view.update(id, icon, text, href);
            }
            Command::Select(id, on) => view.select(id, *on),
            Command::SelectMany(ids) => view.select_many(ids),
            Command::ClearSelected => view.clear_selected(),
            Command::Check(id, on) => view.check(id, *on),
            Command::CheckMany(ids) => view.check_many(ids),
            Command::ClearChecked => view.clear_checked(),
            Command::Expand(id, on) => view.expand(id, *on),
            Command::ExpandAll => view.expand_all(),
            Command::CollapseAll => view.collapse_all(),
            Command::Enable(id, on) => view.enable(id, *on),
            Command::Hide(id) => view.hide(id),
            Command::Show(id) => view.show(id),
            Command::MoveLeft(id) => {
                view.move_left(id);
            }
            Command::MoveRight(id) => {
                view.move_right(id);
            }
            Command::MoveUp(id) => {
                view.move_up(id);
            }
            Command::MoveDown(id) => {
                view.move_down(id);
            }
            Command::Edit { id, text } => {
                if view.enable_inline_editing(id) {
                    view.handle(Interaction::EditInput {
                        node_id: id.clone(),
                        value: text.clone(),
                    });
                    view.handle(Interaction::EditKey {
                        node_id: id.clone(),
                        key: EditKey::Enter,
                    });
                }
            }
            Command::EditCancel { id, text } => {
                if view.enable_inline_editing(id) {
                    view.handle(Interaction::EditInput {
                        node_id: id.clone(),
                        value: text.clone(),
                    });
                    view.handle(Interaction::EditKey {
                        node_id: id.clone(),
                        key: EditKey::Escape,
                    });
                }
            }
            Command::Interact(interaction) => view.handle(interaction.clone()),
            Command::Refresh => view.refresh(),
            Command::Clear => view.clear(),
        }
    }
}

/// Parses a whole script, reporting the first bad line.
#[instrument(level = "debug", skip(source))]
pub fn parse_script(source: &str) -> ApplicationResult<Vec<Command>> {
    let mut commands = Vec::new();
    for (i, line) in source.lines().enumerate() {
        match Command::parse(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(message) => return Err(ApplicationError::script(i + 1, message)),
        }
    }
    debug!(count = commands.len(), "parsed script");
    Ok(commands)
}

/// Applies `commands` in order and refreshes the view at the end.
pub fn run_script(view: &mut TreeView, commands: &[Command]) {
    for command in commands {
        command.apply(view);
    }
    view.refresh();
}
