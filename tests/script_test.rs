//! Integration tests for command scripts driving a tree view.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use rstest::rstest;

use treeview::application::{parse_script, run_script, ApplicationError, TreeEvent, TreeView};
use treeview::config::Settings;
use treeview::util::testing;

#[test]
fn given_script_file_when_running_then_tree_is_reshaped() {
    // Arrange
    testing::init_test_setup();
    let source = fs::read_to_string("tests/resources/scripts/reorganize.txt").unwrap();
    let commands = parse_script(&source).unwrap();
    let mut view = TreeView::new(Settings::default());
    let events: Rc<RefCell<Vec<TreeEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    view.connect(move |e| sink.borrow_mut().push(e.clone()));

    // Act
    run_script(&mut view, &commands);

    // Assert
    let tree = view.tree();
    assert_eq!(tree.len(), 1);
    let children: Vec<_> = tree[0].nodes.iter().map(|r| r.node_id.as_str()).collect();
    assert_eq!(children, vec!["aa", "b"]);

    let checked: Vec<_> = view.checked_ids().iter().map(|id| id.to_string()).collect();
    assert_eq!(checked, vec!["a", "aa", "b"]);
    let selected: Vec<_> = view.selected_ids().iter().map(|id| id.to_string()).collect();
    assert_eq!(selected, vec!["aa"]);

    assert!(view.node("a").unwrap().expanded);
    let names: Vec<_> = events.borrow().iter().map(TreeEvent::name).collect();
    assert_eq!(names, vec!["nodeExpanded"]);
    assert_eq!(view.visual().items.len(), 1);
}

#[test]
fn given_unknown_command_when_parsing_then_error_names_the_line() {
    // Arrange
    let source = fs::read_to_string("tests/resources/scripts/broken.txt").unwrap();

    // Act
    let result = parse_script(&source);

    // Assert
    match result {
        Err(ApplicationError::Script { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("frobnicate"));
        }
        other => panic!("expected script error, got {other:?}"),
    }
}

#[rstest]
#[case("add a")]
#[case(r#"update "unterminated"#)]
#[case("select a maybe")]
fn given_malformed_line_when_parsing_then_rejected(#[case] line: &str) {
    assert!(parse_script(line).is_err());
}

#[test]
fn given_edit_commands_when_running_then_text_changes_only_on_commit() {
    // Arrange
    let source = r#"
add "" a "Node A"
add "" b "Node B"
edit a "Renamed"
edit-cancel b "Ignored"
"#;
    let mut view = TreeView::new(Settings::default());

    // Act
    run_script(&mut view, &parse_script(source).unwrap());

    // Assert
    assert_eq!(view.node("a").unwrap().text, "Renamed");
    assert_eq!(view.node("b").unwrap().text, "Node B");
    assert!(view.editor().session().is_none());
}

#[test]
fn given_drop_command_with_drag_enabled_when_running_then_node_moves() {
    // Arrange
    let settings = Settings {
        drag_n_drop: true,
        ..Settings::default()
    };
    let source = r#"
add "" a "Node A"
add "" b "Node B"
drop b a
"#;
    let mut view = TreeView::new(settings);

    // Act
    run_script(&mut view, &parse_script(source).unwrap());

    // Assert
    assert_eq!(view.node("b").unwrap().parent_id.as_str(), "a");
}
